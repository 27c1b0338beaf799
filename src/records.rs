use serde::Serialize;
use std::path::PathBuf;

/// A single discovered source file and the facts it owns.
/// Identity is the path relative to the scan root.
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    /// Path relative to the scan root (unique key).
    pub path: PathBuf,
    /// Base file name, used in rendered tables.
    pub name: String,
    /// File size in bytes.
    pub size: u64,
    /// Physical line count (`'\n'`-separated segments).
    pub lines: usize,
    /// Functions defined in this file, in appearance order.
    pub functions: Vec<FunctionRecord>,
    /// Classes defined in this file, in appearance order.
    pub classes: Vec<ClassRecord>,
    /// Exports declared by this file, in appearance order.
    pub exports: Vec<ExportRecord>,
}

/// How a function was introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    /// A `function name(...)` declaration (or a function expression bound
    /// to a variable).
    Function,
    /// An arrow function bound to a variable.
    Arrow,
}

impl FunctionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionKind::Function => "function",
            FunctionKind::Arrow => "arrow",
        }
    }
}

/// A function extracted from a source file.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionRecord {
    /// Declared name, or the binding name for assigned functions.
    pub name: String,
    /// Declared vs. arrow-assigned.
    pub kind: FunctionKind,
    /// Defining file (relative path).
    pub file: PathBuf,
    /// 1-based source line.
    pub line: usize,
    /// Parameter labels; destructured and rest parameters are rendered as
    /// structural placeholders, not enumerated bindings.
    pub params: Vec<String>,
    pub is_async: bool,
    /// False whenever not determinable (fallback extraction).
    pub is_generator: bool,
}

/// A class extracted from a source file.
#[derive(Debug, Clone, Serialize)]
pub struct ClassRecord {
    pub name: String,
    pub file: PathBuf,
    pub line: usize,
    /// Superclass name when it is a plain identifier, otherwise `None`.
    pub super_class: Option<String>,
    /// Methods in declaration order. Owned exclusively by this record;
    /// there is no global method list.
    pub methods: Vec<MethodRecord>,
}

/// The role of a class method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Constructor,
    Get,
    Set,
    Method,
}

impl MethodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodKind::Constructor => "constructor",
            MethodKind::Get => "get",
            MethodKind::Set => "set",
            MethodKind::Method => "method",
        }
    }
}

/// A method owned by a [`ClassRecord`].
#[derive(Debug, Clone, Serialize)]
pub struct MethodRecord {
    pub name: String,
    pub kind: MethodKind,
    pub is_static: bool,
    pub is_async: bool,
}

/// What an `export` statement exported.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExportKind {
    Function { name: String },
    Class { name: String },
    /// A `const`/`let`/`var` declaration group; carries every bound name.
    Variables { names: Vec<String> },
    Default,
}

/// An export declared by a file.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRecord {
    #[serde(flatten)]
    pub kind: ExportKind,
    pub file: PathBuf,
}

/// A raw dependency edge: file → module specifier string. The specifier is
/// never resolved to an actual file.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyEdge {
    pub from: PathBuf,
    pub to: String,
    pub line: usize,
}

/// A callback registered against a named channel on an IPC entry-point
/// object (`obj.on/once/handle("channel", ...)` with a literal channel).
#[derive(Debug, Clone, Serialize)]
pub struct HandlerRegistration {
    pub channel: String,
    /// One of `on`, `once`, `handle`.
    pub method: String,
    pub file: PathBuf,
    pub line: usize,
}

/// A callback registered against a named event on any receiver
/// (`x.on/once/addEventListener("event", ...)` with a literal event).
#[derive(Debug, Clone, Serialize)]
pub struct EventListenerRegistration {
    pub event: String,
    pub file: PathBuf,
    pub line: usize,
}

/// Everything extracted from one file, by either the structural visitor or
/// the fallback extractor. The aggregator merges these into the report.
#[derive(Debug, Clone, Default)]
pub struct FileFacts {
    pub functions: Vec<FunctionRecord>,
    pub classes: Vec<ClassRecord>,
    pub exports: Vec<ExportRecord>,
    pub handlers: Vec<HandlerRegistration>,
    pub listeners: Vec<EventListenerRegistration>,
    pub dependencies: Vec<DependencyEdge>,
}

/// Summary statistics for the analysis result.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub total_files: usize,
    pub total_functions: usize,
    pub total_classes: usize,
    pub total_exports: usize,
    pub handler_count: usize,
    pub listener_count: usize,
    pub dependency_count: usize,
    /// Files where both parse modes failed (recovered via fallback).
    pub parse_failures: usize,
    /// Files skipped because they could not be read as UTF-8.
    pub read_failures: usize,
}

/// The root aggregate produced by one analysis run.
/// This struct is serialized to JSON if requested.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Files in discovery order.
    pub files: Vec<FileRecord>,
    /// Flat lists: order-preserving unions of the per-file lists.
    pub functions: Vec<FunctionRecord>,
    pub classes: Vec<ClassRecord>,
    pub exports: Vec<ExportRecord>,
    pub handlers: Vec<HandlerRegistration>,
    pub listeners: Vec<EventListenerRegistration>,
    pub dependencies: Vec<DependencyEdge>,
    pub summary: AnalysisSummary,
}
