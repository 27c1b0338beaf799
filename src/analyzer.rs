use crate::fallback::FallbackExtractor;
use crate::parser::DualModeParser;
use crate::records::{AnalysisReport, AnalysisSummary, FileRecord};
use crate::visitor::StructuralVisitor;
use anyhow::{bail, Result};
use colored::*;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// The main analyzer struct.
/// Configuration options for the analysis are stored here.
pub struct CodeAnalyzer {
    /// File extension to scan for (without the dot).
    pub extension: String,
    /// Identifiers treated as IPC entry-point objects when classifying
    /// handler registrations.
    pub handler_objects: Vec<String>,
}

impl CodeAnalyzer {
    /// Creates a new `CodeAnalyzer` scanning for the given extension.
    pub fn new(extension: &str) -> Self {
        Self {
            extension: extension.to_string(),
            handler_objects: vec!["ipcMain".to_string(), "handlerRegistry".to_string()],
        }
    }

    /// Runs the analysis on the specified root directory.
    ///
    /// This method:
    /// 1. Walks the directory tree to find candidate source files, sorted
    ///    by file name so discovery order is stable across runs.
    /// 2. Processes files one at a time in discovery order.
    /// 3. Parses each file under the dual-mode gates.
    /// 4. Runs the structural visitor on parsed trees, or the fallback
    ///    extractor when both parse modes failed.
    /// 5. Merges per-file facts into the report's flat lists.
    /// 6. Computes summary counts and returns the `AnalysisReport`.
    ///
    /// Only a missing root is a hard error; per-file read and parse
    /// failures are logged, counted, and absorbed.
    pub fn analyze(&self, root: &Path) -> Result<AnalysisReport> {
        if !root.is_dir() {
            bail!("directory not found: {}", root.display());
        }

        let mut parser = DualModeParser::new()?;
        let fallback = FallbackExtractor::new(&self.handler_objects);

        let mut files = Vec::new();
        let mut functions = Vec::new();
        let mut classes = Vec::new();
        let mut exports = Vec::new();
        let mut handlers = Vec::new();
        let mut listeners = Vec::new();
        let mut dependencies = Vec::new();
        let mut parse_failures = 0;
        let mut read_failures = 0;

        let entries = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .map_or(false, |ext| ext == self.extension.as_str())
            });

        for entry in entries {
            let path = entry.path();
            let source = match fs::read_to_string(path) {
                Ok(source) => source,
                Err(err) => {
                    eprintln!(
                        "{} skipping unreadable file {}: {}",
                        "warning:".yellow().bold(),
                        path.display(),
                        err
                    );
                    read_failures += 1;
                    continue;
                }
            };

            let rel = path.strip_prefix(root).unwrap_or(path);

            let facts = match parser.parse(&source, rel) {
                Ok(tree) => {
                    let mut visitor =
                        StructuralVisitor::new(rel, &source, &self.handler_objects);
                    visitor.visit(tree.root_node());
                    visitor.into_facts()
                }
                Err(failure) => {
                    eprintln!(
                        "{} {}; using pattern-based extraction",
                        "warning:".yellow().bold(),
                        failure
                    );
                    parse_failures += 1;
                    fallback.extract(&source, rel)
                }
            };

            // Flat lists mirror the per-file lists exactly; nothing is ever
            // re-derived from them.
            functions.extend(facts.functions.iter().cloned());
            classes.extend(facts.classes.iter().cloned());
            exports.extend(facts.exports.iter().cloned());
            handlers.extend(facts.handlers);
            listeners.extend(facts.listeners);
            dependencies.extend(facts.dependencies);

            files.push(FileRecord {
                path: rel.to_path_buf(),
                name: rel
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                size: source.len() as u64,
                lines: source.split('\n').count(),
                functions: facts.functions,
                classes: facts.classes,
                exports: facts.exports,
            });
        }

        let summary = AnalysisSummary {
            total_files: files.len(),
            total_functions: functions.len(),
            total_classes: classes.len(),
            total_exports: exports.len(),
            handler_count: handlers.len(),
            listener_count: listeners.len(),
            dependency_count: dependencies.len(),
            parse_failures,
            read_failures,
        };

        Ok(AnalysisReport {
            files,
            functions,
            classes,
            exports,
            handlers,
            listeners,
            dependencies,
            summary,
        })
    }
}
