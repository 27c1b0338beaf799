use crate::records::{
    ClassRecord, DependencyEdge, EventListenerRegistration, ExportKind, ExportRecord, FileFacts,
    FunctionKind, FunctionRecord, HandlerRegistration, MethodKind, MethodRecord,
};
use std::path::{Path, PathBuf};
use tree_sitter::Node;

/// Registration verbs recognized on an IPC entry-point object.
const HANDLER_METHODS: &[&str] = &["on", "once", "handle"];
/// Generic listener-registration verbs, recognized on any receiver.
const LISTENER_METHODS: &[&str] = &["on", "once", "addEventListener"];

/// The main visitor for collecting structural facts from a parsed tree.
///
/// One pre-order traversal per file: each node's facts are recorded first,
/// then all named children are descended into, including ERROR subtrees,
/// so fragments recovered inside partial trees still contribute. The tree
/// is never mutated; parent context comes from the immutable `Node::parent`
/// link, which recursion never follows.
pub struct StructuralVisitor<'a> {
    /// The path of the file being visited, relative to the scan root.
    pub file: PathBuf,
    /// Identifiers whose method calls count as handler registrations.
    handler_objects: &'a [String],
    source: &'a str,
    facts: FileFacts,
}

impl<'a> StructuralVisitor<'a> {
    /// Creates a new `StructuralVisitor` for one file.
    pub fn new(file: &Path, source: &'a str, handler_objects: &'a [String]) -> Self {
        Self {
            file: file.to_path_buf(),
            handler_objects,
            source,
            facts: FileFacts::default(),
        }
    }

    /// Walks the tree rooted at `node` and records every fact found.
    pub fn visit(&mut self, node: Node) {
        self.visit_node(node);
    }

    /// Consumes the visitor, yielding the accumulated fact set.
    pub fn into_facts(self) -> FileFacts {
        self.facts
    }

    fn visit_node(&mut self, node: Node) {
        match node.kind() {
            "function_declaration" | "generator_function_declaration" => {
                self.record_declared_function(node);
            }
            "arrow_function" | "function_expression" | "function" | "generator_function" => {
                self.record_assigned_function(node);
            }
            "class_declaration" => self.record_class(node),
            "export_statement" => self.record_export(node),
            "import_statement" => self.record_import(node),
            "call_expression" => self.record_call(node),
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.visit_node(child);
        }
    }

    /// `function name(...)` and `function* name(...)` declarations.
    fn record_declared_function(&mut self, node: Node) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        self.facts.functions.push(FunctionRecord {
            name: self.text(name_node).to_string(),
            kind: FunctionKind::Function,
            file: self.file.clone(),
            line: line_of(node),
            params: self.param_labels(node),
            is_async: has_token(node, "async"),
            is_generator: node.kind() == "generator_function_declaration",
        });
    }

    /// Anonymous functions promoted via `const name = ...` bindings.
    /// Bindings that destructure are skipped, not given a synthetic name.
    fn record_assigned_function(&mut self, node: Node) {
        let Some(parent) = node.parent() else {
            return;
        };
        if parent.kind() != "variable_declarator" {
            return;
        }
        let Some(name_node) = parent.child_by_field_name("name") else {
            return;
        };
        if name_node.kind() != "identifier" {
            return;
        }
        // Error recovery can graft an unrelated function onto a broken
        // declarator as its value; such bindings are not real assignments
        // and must not lend the function their name.
        if declarator_has_error(parent) {
            return;
        }
        let kind = if node.kind() == "arrow_function" {
            FunctionKind::Arrow
        } else {
            FunctionKind::Function
        };
        self.facts.functions.push(FunctionRecord {
            name: self.text(name_node).to_string(),
            kind,
            file: self.file.clone(),
            line: line_of(node),
            params: self.param_labels(node),
            is_async: has_token(node, "async"),
            is_generator: node.kind() == "generator_function",
        });
    }

    fn record_class(&mut self, node: Node) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let mut methods = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                if member.kind() == "method_definition" {
                    if let Some(method) = self.method_record(member) {
                        methods.push(method);
                    }
                }
            }
        }
        self.facts.classes.push(ClassRecord {
            name: self.text(name_node).to_string(),
            file: self.file.clone(),
            line: line_of(node),
            super_class: self.superclass_name(node),
            methods,
        });
    }

    /// The superclass is recorded only when it is a plain identifier.
    fn superclass_name(&self, node: Node) -> Option<String> {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "class_heritage" {
                let expr = child.named_child(0)?;
                if expr.kind() == "identifier" {
                    return Some(self.text(expr).to_string());
                }
                return None;
            }
        }
        None
    }

    fn method_record(&self, node: Node) -> Option<MethodRecord> {
        let name_node = node.child_by_field_name("name")?;
        // Computed method names are not literal facts; skip them.
        if name_node.kind() == "computed_property_name" {
            return None;
        }
        let name = self.text(name_node).to_string();

        // Modifier tokens precede the name within the definition.
        let mut is_static = false;
        let mut is_async = false;
        let mut kind = MethodKind::Method;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child == name_node {
                break;
            }
            match child.kind() {
                "static" => is_static = true,
                "async" => is_async = true,
                "get" => kind = MethodKind::Get,
                "set" => kind = MethodKind::Set,
                _ => {}
            }
        }
        if kind == MethodKind::Method && name == "constructor" {
            kind = MethodKind::Constructor;
        }
        Some(MethodRecord {
            name,
            kind,
            is_static,
            is_async,
        })
    }

    /// `export` statements. Traversal continues into the declaration, so
    /// `export function foo()` also yields the FunctionRecord itself.
    fn record_export(&mut self, node: Node) {
        if has_token(node, "default") {
            self.facts.exports.push(ExportRecord {
                kind: ExportKind::Default,
                file: self.file.clone(),
            });
            return;
        }
        let Some(declaration) = node.child_by_field_name("declaration") else {
            // `export { a, b }` clauses carry no declaration; nothing is
            // recorded for them.
            return;
        };
        let kind = match declaration.kind() {
            "function_declaration" | "generator_function_declaration" => {
                let Some(name) = declaration.child_by_field_name("name") else {
                    return;
                };
                ExportKind::Function {
                    name: self.text(name).to_string(),
                }
            }
            "class_declaration" => {
                let Some(name) = declaration.child_by_field_name("name") else {
                    return;
                };
                ExportKind::Class {
                    name: self.text(name).to_string(),
                }
            }
            "lexical_declaration" | "variable_declaration" => {
                let mut names = Vec::new();
                let mut cursor = declaration.walk();
                for declarator in declaration.named_children(&mut cursor) {
                    if declarator.kind() != "variable_declarator" {
                        continue;
                    }
                    let Some(name) = declarator.child_by_field_name("name") else {
                        continue;
                    };
                    if name.kind() == "identifier" {
                        names.push(self.text(name).to_string());
                    }
                }
                ExportKind::Variables { names }
            }
            _ => return,
        };
        self.facts.exports.push(ExportRecord {
            kind,
            file: self.file.clone(),
        });
    }

    fn record_import(&mut self, node: Node) {
        let Some(source_node) = node.child_by_field_name("source") else {
            return;
        };
        let Some(specifier) = self.string_literal(source_node) else {
            return;
        };
        self.facts.dependencies.push(DependencyEdge {
            from: self.file.clone(),
            to: specifier,
            line: line_of(node),
        });
    }

    /// Call-site patterns: `require("spec")`, handler registrations on the
    /// configured IPC objects, and generic listener registrations on any
    /// receiver. A handler registration also matches the generic listener
    /// rule; both records are kept.
    fn record_call(&mut self, node: Node) {
        let Some(callee) = node.child_by_field_name("function") else {
            return;
        };

        if callee.kind() == "identifier" && self.text(callee) == "require" {
            if let Some(specifier) = self.first_string_argument(node) {
                self.facts.dependencies.push(DependencyEdge {
                    from: self.file.clone(),
                    to: specifier,
                    line: line_of(node),
                });
            }
            return;
        }

        if callee.kind() != "member_expression" {
            return;
        }
        let Some(object) = callee.child_by_field_name("object") else {
            return;
        };
        let Some(property) = callee.child_by_field_name("property") else {
            return;
        };
        let method = self.text(property);

        if object.kind() == "identifier"
            && HANDLER_METHODS.contains(&method)
            && self.handler_objects.iter().any(|o| o.as_str() == self.text(object))
        {
            if let Some(channel) = self.first_string_argument(node) {
                self.facts.handlers.push(HandlerRegistration {
                    channel,
                    method: method.to_string(),
                    file: self.file.clone(),
                    line: line_of(node),
                });
            }
        }

        if LISTENER_METHODS.contains(&method) {
            if let Some(event) = self.first_string_argument(node) {
                self.facts.listeners.push(EventListenerRegistration {
                    event,
                    file: self.file.clone(),
                    line: line_of(node),
                });
            }
        }
    }

    /// The first real argument of a call, if it is a literal string.
    /// Template strings and computed expressions are not literals.
    fn first_string_argument(&self, call: Node) -> Option<String> {
        let args = call.child_by_field_name("arguments")?;
        let mut cursor = args.walk();
        let first = args
            .named_children(&mut cursor)
            .find(|n| n.kind() != "comment")?;
        self.string_literal(first)
    }

    /// The inner text of a `string` node with the outer quotes stripped.
    /// Escape sequences are kept verbatim (`'a\'b'` yields `a\'b`); names
    /// are compared and rendered as they appear in the source.
    fn string_literal(&self, node: Node) -> Option<String> {
        if node.kind() != "string" {
            return None;
        }
        let raw = self.text(node);
        if raw.len() >= 2 {
            let bytes = raw.as_bytes();
            if (bytes[0] == b'\'' || bytes[0] == b'"') && bytes[bytes.len() - 1] == bytes[0] {
                return Some(raw[1..raw.len() - 1].to_string());
            }
        }
        Some(raw.to_string())
    }

    /// One label per parameter. Destructured shapes get a fixed placeholder
    /// rather than a recursive description of their inner bindings.
    fn param_labels(&self, function: Node) -> Vec<String> {
        // A bare-identifier arrow parameter has no surrounding parens.
        if let Some(single) = function.child_by_field_name("parameter") {
            return vec![self.param_label(single)];
        }
        let Some(params) = function.child_by_field_name("parameters") else {
            return Vec::new();
        };
        let mut labels = Vec::new();
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            if param.kind() == "comment" {
                continue;
            }
            labels.push(self.param_label(param));
        }
        labels
    }

    fn param_label(&self, param: Node) -> String {
        match param.kind() {
            "identifier" => self.text(param).to_string(),
            "rest_pattern" => match param.named_child(0) {
                Some(inner) => format!("...{}", self.param_label(inner)),
                None => "unknown".to_string(),
            },
            "assignment_pattern" => match param.child_by_field_name("left") {
                Some(left) => format!("{} = default", self.param_label(left)),
                None => "unknown".to_string(),
            },
            "object_pattern" => "{ destructured }".to_string(),
            "array_pattern" => "[ destructured ]".to_string(),
            _ => "unknown".to_string(),
        }
    }

    fn text(&self, node: Node) -> &'a str {
        &self.source[node.byte_range()]
    }
}

fn line_of(node: Node) -> usize {
    node.start_position().row + 1
}

fn declarator_has_error(node: Node) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.is_error() || c.is_missing());
    found
}

fn has_token(node: Node, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == token);
    found
}
