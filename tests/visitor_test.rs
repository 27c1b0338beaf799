// Unit tests for the structural visitor
// Each extraction rule is exercised on a small parsed snippet

use jscan_rs::parser::DualModeParser;
use jscan_rs::records::{ExportKind, FunctionKind, MethodKind};
use jscan_rs::visitor::StructuralVisitor;
use std::path::Path;

// Helper macro: parse a snippet, visit it, and bind the resulting facts
macro_rules! visit_code {
    ($code:expr, $facts:ident) => {
        let mut parser = DualModeParser::new().expect("grammar should load");
        let tree = parser
            .parse($code, Path::new("test.js"))
            .expect("Failed to parse");
        let handler_objects = vec!["ipcMain".to_string(), "handlerRegistry".to_string()];
        let mut visitor = StructuralVisitor::new(Path::new("test.js"), $code, &handler_objects);
        visitor.visit(tree.root_node());
        let $facts = visitor.into_facts();
    };
}

#[test]
fn test_declared_functions() {
    let code = "function plain(a, b) {}\nasync function fetchIt(url) {}\nfunction* gen() {}\n";
    visit_code!(code, facts);

    assert_eq!(facts.functions.len(), 3);

    let plain = &facts.functions[0];
    assert_eq!(plain.name, "plain");
    assert_eq!(plain.kind, FunctionKind::Function);
    assert_eq!(plain.params, vec!["a", "b"]);
    assert_eq!(plain.line, 1);
    assert!(!plain.is_async);
    assert!(!plain.is_generator);

    let fetch_it = &facts.functions[1];
    assert_eq!(fetch_it.name, "fetchIt");
    assert_eq!(fetch_it.line, 2);
    assert!(fetch_it.is_async);

    let gen = &facts.functions[2];
    assert_eq!(gen.name, "gen");
    assert!(gen.is_generator);
}

#[test]
fn test_assigned_functions() {
    let code = "const add = (a, b) => a + b;\nlet run = async () => {};\nvar legacy = function older(x) { return x; };\n";
    visit_code!(code, facts);

    assert_eq!(facts.functions.len(), 3);

    let add = &facts.functions[0];
    assert_eq!(add.name, "add");
    assert_eq!(add.kind, FunctionKind::Arrow);
    assert_eq!(add.params, vec!["a", "b"]);

    let run = &facts.functions[1];
    assert_eq!(run.kind, FunctionKind::Arrow);
    assert!(run.is_async);

    // A function expression takes its binding name, not its inner name.
    let legacy = &facts.functions[2];
    assert_eq!(legacy.name, "legacy");
    assert_eq!(legacy.kind, FunctionKind::Function);
}

#[test]
fn test_unassigned_callbacks_are_not_recorded() {
    let code = "items.forEach((x) => x * 2);\nsetTimeout(function () {}, 10);\n";
    visit_code!(code, facts);
    assert!(facts.functions.is_empty());
}

#[test]
fn test_parameter_placeholders() {
    let code = "function shapes(a, { b, c }, [d], ...rest) {}\nfunction defaults(x = 1) {}\nconst id = x => x;\n";
    visit_code!(code, facts);

    assert_eq!(
        facts.functions[0].params,
        vec!["a", "{ destructured }", "[ destructured ]", "...rest"]
    );
    assert_eq!(facts.functions[1].params, vec!["x = default"]);
    // A bare-identifier arrow parameter has no surrounding parens.
    assert_eq!(facts.functions[2].params, vec!["x"]);
}

#[test]
fn test_class_with_methods() {
    let code = r#"class Dog extends Animal {
  constructor(name) { this.name = name; }
  bark() {}
  static create() { return new Dog("pup"); }
  async fetch() {}
  get age() { return 1; }
  set age(v) {}
}
class Plain {}
"#;
    visit_code!(code, facts);

    assert_eq!(facts.classes.len(), 2);

    let dog = &facts.classes[0];
    assert_eq!(dog.name, "Dog");
    assert_eq!(dog.line, 1);
    assert_eq!(dog.super_class.as_deref(), Some("Animal"));
    assert_eq!(dog.methods.len(), 6);

    assert_eq!(dog.methods[0].name, "constructor");
    assert_eq!(dog.methods[0].kind, MethodKind::Constructor);
    assert_eq!(dog.methods[1].name, "bark");
    assert_eq!(dog.methods[1].kind, MethodKind::Method);
    assert!(dog.methods[2].is_static);
    assert!(dog.methods[3].is_async);
    assert_eq!(dog.methods[4].kind, MethodKind::Get);
    assert_eq!(dog.methods[5].kind, MethodKind::Set);

    let plain = &facts.classes[1];
    assert_eq!(plain.name, "Plain");
    assert!(plain.super_class.is_none());
    assert!(plain.methods.is_empty());
}

#[test]
fn test_non_identifier_superclass_is_dropped() {
    let code = "class Weird extends ns.Base {}\n";
    visit_code!(code, facts);
    assert_eq!(facts.classes.len(), 1);
    assert!(facts.classes[0].super_class.is_none());
}

#[test]
fn test_export_kinds() {
    let code = r#"export function onReady() {}
export class Widget {}
export const a = 1, b = 2;
export default function main() {}
export { a, b };
"#;
    visit_code!(code, facts);

    assert_eq!(facts.exports.len(), 4, "re-export clause records nothing");
    assert!(matches!(&facts.exports[0].kind, ExportKind::Function { name } if name == "onReady"));
    assert!(matches!(&facts.exports[1].kind, ExportKind::Class { name } if name == "Widget"));
    assert!(
        matches!(&facts.exports[2].kind, ExportKind::Variables { names } if names == &["a", "b"])
    );
    assert!(matches!(&facts.exports[3].kind, ExportKind::Default));

    // The exported declarations are also recorded as their own facts.
    let names: Vec<&str> = facts.functions.iter().map(|f| f.name.as_str()).collect();
    assert!(names.contains(&"onReady"));
    assert!(names.contains(&"main"));
    assert_eq!(facts.classes[0].name, "Widget");
}

#[test]
fn test_dependency_edges() {
    let code = r#"import fs from 'fs';
import { join } from "path";
const local = require('./local');
const dyn = import('./dyn');
const computed = require(prefix + '/mod');
"#;
    visit_code!(code, facts);

    let targets: Vec<&str> = facts.dependencies.iter().map(|d| d.to.as_str()).collect();
    assert_eq!(targets, vec!["fs", "path", "./local"]);
    assert_eq!(facts.dependencies[0].line, 1);
    assert_eq!(facts.dependencies[2].line, 3);
}

#[test]
fn test_handler_and_listener_rules() {
    let code = r#"ipcMain.on("ping", handlePing);
handlerRegistry.handle('fetch-data', fetchData);
emitter.once("done", cb);
socket.addEventListener('message', onMsg);
other.on("generic", cb);
"#;
    visit_code!(code, facts);

    assert_eq!(facts.handlers.len(), 2);
    assert_eq!(facts.handlers[0].channel, "ping");
    assert_eq!(facts.handlers[0].method, "on");
    assert_eq!(facts.handlers[0].line, 1);
    assert_eq!(facts.handlers[1].channel, "fetch-data");
    assert_eq!(facts.handlers[1].method, "handle");

    // `handle` is not a generic listener verb, so the listener list holds
    // everything except the handlerRegistry.handle call.
    let events: Vec<&str> = facts.listeners.iter().map(|l| l.event.as_str()).collect();
    assert_eq!(events, vec!["ping", "done", "message", "generic"]);
}

#[test]
fn test_handler_listener_overlap_is_preserved() {
    let code = "ipcMain.on(\"sync\", cb);\n";
    visit_code!(code, facts);
    // The same call is recorded both ways; this duplication is accepted.
    assert_eq!(facts.handlers.len(), 1);
    assert_eq!(facts.listeners.len(), 1);
    assert_eq!(facts.handlers[0].channel, facts.listeners[0].event);
}

#[test]
fn test_non_literal_names_are_ignored() {
    let code = r#"ipcMain.on(channelName, cb);
ipcMain.on(`built-${x}`, cb);
ipcMain.on("good" + "-suffix", cb);
emitter.on(eventVar, cb);
"#;
    visit_code!(code, facts);
    assert!(facts.handlers.is_empty());
    assert!(facts.listeners.is_empty());
}

#[test]
fn test_string_literals_keep_escapes_verbatim() {
    let code = "emitter.on('a\\'b', cb);\nconst mod = require(\"pkg\\\\sub\");\n";
    visit_code!(code, facts);
    assert_eq!(facts.listeners[0].event, "a\\'b");
    assert_eq!(facts.dependencies[0].to, "pkg\\\\sub");
}

#[test]
fn test_nested_functions_are_recorded() {
    let code = r#"function outer() {
  function inner() {}
  const deep = () => {};
}
"#;
    visit_code!(code, facts);
    let names: Vec<&str> = facts.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["outer", "inner", "deep"]);
}

#[test]
fn test_partial_tree_still_contributes() {
    // One small defect; the script gate accepts and the surviving
    // declarations are extracted.
    let code = "function good() {}\nconst broken = ;\nfunction alsoGood() {}\n";
    visit_code!(code, facts);
    let names: Vec<&str> = facts.functions.iter().map(|f| f.name.as_str()).collect();
    assert!(names.contains(&"good"));
    // Error recovery grafts `function alsoGood` onto the broken declarator
    // as its value; the grafted function must not surface under the
    // binding name of the defective statement.
    assert!(!names.contains(&"broken"));
}

#[test]
fn test_repaired_declarator_does_not_steal_function_names() {
    // A clean assignment right next to a defective one: only the clean
    // binding yields a record.
    let code = "const ok = () => {};\nlet bad = ;\nfunction trailing() {}\n";
    visit_code!(code, facts);
    let names: Vec<&str> = facts.functions.iter().map(|f| f.name.as_str()).collect();
    assert!(names.contains(&"ok"));
    assert!(!names.contains(&"bad"));
}
