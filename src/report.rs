use crate::records::AnalysisReport;
use std::collections::HashSet;
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Renders the report as a Markdown document.
///
/// Pure projection: the same report always yields byte-identical output.
/// Section order is fixed (Summary, Files, Functions, Classes, IPC
/// Handlers, Event Listeners, Dependencies); files appear in discovery
/// order and every list in original extraction order. Nothing is sorted.
pub fn render_markdown(report: &AnalysisReport) -> String {
    let mut md = String::new();

    let _ = writeln!(md, "# Code Analysis Report\n");

    let _ = writeln!(md, "## Summary\n");
    let _ = writeln!(md, "- **Total Files**: {}", report.summary.total_files);
    let _ = writeln!(md, "- **Total Functions**: {}", report.summary.total_functions);
    let _ = writeln!(md, "- **Total Classes**: {}", report.summary.total_classes);
    let _ = writeln!(md, "- **Total Exports**: {}", report.summary.total_exports);
    let _ = writeln!(md, "- **IPC Handlers**: {}", report.summary.handler_count);
    let _ = writeln!(md, "- **Event Listeners**: {}\n", report.summary.listener_count);

    let _ = writeln!(md, "## Files\n");
    for file in &report.files {
        let _ = writeln!(md, "### {}\n", file.name);
        let _ = writeln!(md, "- **Path**: `{}`", file.path.display());
        let _ = writeln!(md, "- **Size**: {:.2} KB", file.size as f64 / 1024.0);
        let _ = writeln!(md, "- **Lines**: {}", file.lines);
        let _ = writeln!(md, "- **Functions**: {}", file.functions.len());
        let _ = writeln!(md, "- **Classes**: {}", file.classes.len());
        let _ = writeln!(md, "- **Exports**: {}\n", file.exports.len());
    }

    if !report.functions.is_empty() {
        let _ = writeln!(md, "## Functions\n");
        let _ = writeln!(md, "| Name | Type | File | Line | Parameters | Async |");
        let _ = writeln!(md, "|------|------|------|------|------------|-------|");
        for func in &report.functions {
            let params = func.params.join(", ");
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} | {} | {} |",
                func.name,
                func.kind.as_str(),
                basename(&func.file),
                func.line,
                if params.is_empty() { "none" } else { params.as_str() },
                if func.is_async { "Yes" } else { "No" }
            );
        }
        md.push('\n');
    }

    if !report.classes.is_empty() {
        let _ = writeln!(md, "## Classes\n");
        for class in &report.classes {
            let _ = writeln!(md, "### {}\n", class.name);
            let _ = writeln!(md, "- **File**: `{}`", class.file.display());
            let _ = writeln!(md, "- **Line**: {}", class.line);
            if let Some(super_class) = &class.super_class {
                let _ = writeln!(md, "- **Extends**: {}", super_class);
            }
            let _ = writeln!(md, "- **Methods**: {}\n", class.methods.len());
            if !class.methods.is_empty() {
                let _ = writeln!(md, "**Methods:**\n");
                for method in &class.methods {
                    let _ = write!(md, "- `{}` ({})", method.name, method.kind.as_str());
                    if method.is_static {
                        md.push_str(" [static]");
                    }
                    if method.is_async {
                        md.push_str(" [async]");
                    }
                    md.push('\n');
                }
                md.push('\n');
            }
        }
    }

    if !report.handlers.is_empty() {
        let _ = writeln!(md, "## IPC Handlers\n");
        let _ = writeln!(md, "| Channel | Method | File | Line |");
        let _ = writeln!(md, "|---------|--------|------|------|");
        for handler in &report.handlers {
            let _ = writeln!(
                md,
                "| `{}` | {} | {} | {} |",
                handler.channel,
                handler.method,
                basename(&handler.file),
                handler.line
            );
        }
        md.push('\n');
    }

    if !report.listeners.is_empty() {
        let _ = writeln!(md, "## Event Listeners\n");
        let _ = writeln!(md, "| Event | File | Line |");
        let _ = writeln!(md, "|-------|------|------|");
        // Deduplicated on the exact (event, file, line) triple, first
        // occurrence wins.
        let mut seen = HashSet::new();
        for listener in &report.listeners {
            let key = (listener.event.clone(), listener.file.clone(), listener.line);
            if !seen.insert(key) {
                continue;
            }
            let _ = writeln!(
                md,
                "| `{}` | {} | {} |",
                listener.event,
                basename(&listener.file),
                listener.line
            );
        }
        md.push('\n');
    }

    if !report.dependencies.is_empty() {
        let _ = writeln!(md, "## Dependencies\n");
        // Group by source file preserving first-occurrence order of both
        // the files and their specifiers.
        let mut groups: Vec<(PathBuf, Vec<String>)> = Vec::new();
        for dep in &report.dependencies {
            match groups.iter_mut().find(|(from, _)| *from == dep.from) {
                Some((_, specs)) => {
                    if !specs.contains(&dep.to) {
                        specs.push(dep.to.clone());
                    }
                }
                None => groups.push((dep.from.clone(), vec![dep.to.clone()])),
            }
        }
        for (from, specs) in groups {
            let _ = writeln!(md, "### {}\n", basename(&from));
            for spec in specs {
                let _ = writeln!(md, "- `{}`", spec);
            }
            md.push('\n');
        }
    }

    md
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
