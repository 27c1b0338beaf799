use anyhow::Result;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tree_sitter::{Node, Parser, Tree};

/// Both parse modes rejected a file. This is an expected per-file outcome;
/// the caller recovers by running the fallback extractor.
#[derive(Debug, Error)]
#[error("failed to parse {}: module mode: {module_error}; script mode: {script_error}", file.display())]
pub struct ParseFailure {
    pub file: PathBuf,
    pub module_error: String,
    pub script_error: String,
}

/// Parses file text under two grammar assumptions.
///
/// The grammar accepts module and script syntax alike and always yields a
/// best-effort tree with ERROR nodes instead of aborting, so the two
/// assumptions become two acceptance gates over a single parse:
///
/// - module: the tree must be completely error-free;
/// - script: the bytes covered by top-most ERROR nodes must be at most half
///   of the input, leaving a usable partial tree.
///
/// Every node carries line/column and byte-range metadata, which downstream
/// extraction depends on.
pub struct DualModeParser {
    parser: Parser,
}

impl DualModeParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_javascript::LANGUAGE;
        parser.set_language(&language.into())?;
        Ok(Self { parser })
    }

    /// Parses `source`, returning the tree if either gate accepts it.
    pub fn parse(&mut self, source: &str, file: &Path) -> Result<Tree, ParseFailure> {
        let Some(tree) = self.parser.parse(source, None) else {
            return Err(ParseFailure {
                file: file.to_path_buf(),
                module_error: "parser produced no tree".to_string(),
                script_error: "parser produced no tree".to_string(),
            });
        };
        let root = tree.root_node();

        // Module gate: a well-formed module parses without a single error.
        if !root.has_error() {
            return Ok(tree);
        }

        // Script gate: tolerate recoverable defects as long as the majority
        // of the input still landed in real syntax nodes.
        let error_bytes = top_error_bytes(root);
        let total = source.len().max(1);
        if error_bytes * 2 <= total {
            return Ok(tree);
        }

        Err(ParseFailure {
            file: file.to_path_buf(),
            module_error: "syntax errors present".to_string(),
            script_error: format!(
                "error nodes cover {} of {} bytes",
                error_bytes, total
            ),
        })
    }
}

/// Sum of the byte spans of top-most ERROR nodes. Descent stops at an ERROR
/// node so nested errors are not counted twice.
fn top_error_bytes(node: Node) -> usize {
    if node.is_error() {
        return node.byte_range().len();
    }
    let mut total = 0;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        total += top_error_bytes(child);
    }
    total
}
