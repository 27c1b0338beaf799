// Lib file to expose modules for testing and external usage.
// This file serves as the root for the library crate.

/// Module containing the core analyzer logic.
/// This includes the `CodeAnalyzer` struct driving discovery, per-file
/// processing, and aggregation.
pub mod analyzer;

/// Module containing the regex-based fallback extractor.
/// Used when both parse modes reject a file.
pub mod fallback;

/// Module containing the dual-mode parser.
/// Wraps the tree-sitter JavaScript grammar behind two acceptance gates.
pub mod parser;

/// Module defining the analysis record data structures.
/// This includes `AnalysisReport`, `FileRecord`, `FunctionRecord`, etc.
pub mod records;

/// Module rendering the aggregated report as Markdown.
pub mod report;

/// Module containing utility functions.
/// Byte-offset to line mapping and parameter-list splitting.
pub mod utils;

/// Module containing the syntax-tree visitor implementation.
/// This is responsible for traversing parsed trees and collecting facts.
pub mod visitor;
