use crate::records::{
    ClassRecord, DependencyEdge, EventListenerRegistration, FileFacts, FunctionKind,
    FunctionRecord, HandlerRegistration,
};
use crate::utils::{split_params, LineIndex};
use regex::Regex;
use std::path::Path;

lazy_static::lazy_static! {
    /// Named function declarations, with the raw parameter list captured.
    static ref FUNCTION_RE: Regex =
        Regex::new(r"(?:async\s+)?function\s+(\w+)\s*\(([^)]*)\)").unwrap();

    /// Arrow functions bound to a `const`/`let`/`var` name.
    static ref ARROW_RE: Regex =
        Regex::new(r"(?:const|let|var)\s+(\w+)\s*=\s*(async\s+)?\(([^)]*)\)\s*=>").unwrap();

    /// Class declarations with an optional `extends` clause.
    static ref CLASS_RE: Regex =
        Regex::new(r"class\s+(\w+)(?:\s+extends\s+(\w+))?\s*\{").unwrap();

    /// Call-style module loading.
    static ref REQUIRE_RE: Regex =
        Regex::new(r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap();

    /// Static import syntax.
    static ref IMPORT_RE: Regex =
        Regex::new(r#"import\s+.*?from\s+['"]([^'"]+)['"]"#).unwrap();

    /// Generic listener registrations on any receiver.
    static ref LISTENER_RE: Regex =
        Regex::new(r#"\.(?:on|once|addEventListener)\s*\(\s*['"]([^'"]+)['"]"#).unwrap();
}

/// Best-effort recovery for files the dual-mode parser rejected.
///
/// Pure text pattern matching, case-sensitive, standard non-overlapping
/// match semantics. This path never fails: anything the patterns do not
/// match is simply absent from the result (under-reporting, never
/// over-reporting). `is_generator` is never determinable here and stays
/// false; recovered classes carry no methods.
pub struct FallbackExtractor {
    /// Handler registrations on the configured IPC objects, built at
    /// construction from the handler-object set.
    handler_re: Regex,
}

impl FallbackExtractor {
    pub fn new(handler_objects: &[String]) -> Self {
        let objects = handler_objects
            .iter()
            .map(|o| regex::escape(o))
            .collect::<Vec<_>>()
            .join("|");
        let handler_re = Regex::new(&format!(
            r#"(?:{objects})\.(on|handle|once)\s*\(\s*['"]([^'"]+)['"]"#
        ))
        .unwrap();
        Self { handler_re }
    }

    /// Recovers whatever facts the patterns find in `source`.
    pub fn extract(&self, source: &str, file: &Path) -> FileFacts {
        let index = LineIndex::new(source);
        let mut facts = FileFacts::default();

        for caps in FUNCTION_RE.captures_iter(source) {
            let whole = caps.get(0).unwrap();
            facts.functions.push(FunctionRecord {
                name: caps[1].to_string(),
                kind: FunctionKind::Function,
                file: file.to_path_buf(),
                line: index.line_of(whole.start()),
                params: split_params(&caps[2]),
                is_async: whole.as_str().starts_with("async"),
                is_generator: false,
            });
        }

        for caps in ARROW_RE.captures_iter(source) {
            let whole = caps.get(0).unwrap();
            facts.functions.push(FunctionRecord {
                name: caps[1].to_string(),
                kind: FunctionKind::Arrow,
                file: file.to_path_buf(),
                line: index.line_of(whole.start()),
                params: split_params(&caps[3]),
                is_async: caps.get(2).is_some(),
                is_generator: false,
            });
        }

        for caps in CLASS_RE.captures_iter(source) {
            let whole = caps.get(0).unwrap();
            facts.classes.push(ClassRecord {
                name: caps[1].to_string(),
                file: file.to_path_buf(),
                line: index.line_of(whole.start()),
                super_class: caps.get(2).map(|m| m.as_str().to_string()),
                methods: Vec::new(),
            });
        }

        for re in [&*REQUIRE_RE, &*IMPORT_RE] {
            for caps in re.captures_iter(source) {
                let whole = caps.get(0).unwrap();
                facts.dependencies.push(DependencyEdge {
                    from: file.to_path_buf(),
                    to: caps[1].to_string(),
                    line: index.line_of(whole.start()),
                });
            }
        }

        for caps in self.handler_re.captures_iter(source) {
            let whole = caps.get(0).unwrap();
            facts.handlers.push(HandlerRegistration {
                channel: caps[2].to_string(),
                method: caps[1].to_string(),
                file: file.to_path_buf(),
                line: index.line_of(whole.start()),
            });
        }

        for caps in LISTENER_RE.captures_iter(source) {
            let whole = caps.get(0).unwrap();
            facts.listeners.push(EventListenerRegistration {
                event: caps[1].to_string(),
                file: file.to_path_buf(),
                line: index.line_of(whole.start()),
            });
        }

        facts
    }
}
