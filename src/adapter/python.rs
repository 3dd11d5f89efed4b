use tree_sitter::{Node, Tree};

use crate::adapter::support::{max_nesting, node_text, qualify};
use crate::adapter::{FileExtraction, RawCall, RawSymbol};
use crate::model::SymbolKind;

/// Node kinds that introduce a statement nesting level in Python.
const PY_BLOCK_KINDS: &[&str] = &[
    "if_statement",
    "for_statement",
    "while_statement",
    "with_statement",
    "try_statement",
    "match_statement",
];

/// Extract symbols, imports, and call sites from a parsed Python file.
///
/// Walks the module with a scope stack so methods and nested functions get
/// file-qualified names (`Class.method`, `outer.inner`). Decorator text is
/// preserved verbatim (including the `@`) for the classifier and the
/// endpoint extractor.
pub(super) fn extract(tree: &Tree, source: &[u8]) -> FileExtraction {
    let mut ex = FileExtraction::default();
    let mut scope: Vec<String> = Vec::new();
    walk_block(tree.root_node(), source, &mut scope, &mut ex);
    ex
}

/// Process the statements of a module, class body, or function body.
fn walk_block(block: Node, source: &[u8], scope: &mut Vec<String>, ex: &mut FileExtraction) {
    let mut cursor = block.walk();
    for child in block.children(&mut cursor) {
        handle_statement(child, source, scope, ex, Vec::new());
    }
}

fn handle_statement(
    node: Node,
    source: &[u8],
    scope: &mut Vec<String>,
    ex: &mut FileExtraction,
    decorators: Vec<String>,
) {
    match node.kind() {
        "import_statement" => collect_plain_imports(node, source, ex),
        "import_from_statement" => {
            if let Some(module) = node.child_by_field_name("module_name") {
                ex.imports.push(node_text(module, source).to_owned());
            }
        }
        "decorated_definition" => {
            let mut decs = decorators;
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.kind() == "decorator" {
                    decs.push(node_text(child, source).to_owned());
                }
            }
            if let Some(def) = node.child_by_field_name("definition") {
                handle_statement(def, source, scope, ex, decs);
            }
        }
        "function_definition" => add_function(node, source, scope, ex, decorators),
        "class_definition" => add_class(node, source, scope, ex, decorators),
        "expression_statement" => {
            // Module-level (or class-body) calls: FastAPI() constructions,
            // app.include_router(...), and similar wiring.
            collect_calls(node, source, &qualify_scope(scope), ex);
            add_module_variable(node, source, scope, ex);
        }
        // Compound statements at module level may still contain defs (e.g.
        // a class defined under `if TYPE_CHECKING:`). Descend one level.
        "if_statement" | "try_statement" | "with_statement" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.kind() == "block" {
                    walk_block(child, source, scope, ex);
                }
            }
        }
        _ => {}
    }
}

fn collect_plain_imports(node: Node, source: &[u8], ex: &mut FileExtraction) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "dotted_name" => ex.imports.push(node_text(child, source).to_owned()),
            "aliased_import" => {
                if let Some(name) = child.child_by_field_name("name") {
                    ex.imports.push(node_text(name, source).to_owned());
                }
            }
            _ => {}
        }
    }
}

fn add_function(
    node: Node,
    source: &[u8],
    scope: &mut Vec<String>,
    ex: &mut FileExtraction,
    decorators: Vec<String>,
) {
    let name = match node.child_by_field_name("name") {
        Some(n) => node_text(n, source).to_owned(),
        None => return,
    };
    let qualified = qualify(scope, &name);
    let parent = parent_name(scope);
    let params = extract_params(node, source);
    let nesting = node
        .child_by_field_name("body")
        .map(|b| max_nesting(b, PY_BLOCK_KINDS))
        .unwrap_or(0);

    ex.symbols.push(RawSymbol {
        name: qualified.clone(),
        kind: SymbolKind::Function,
        start: node.start_position().row + 1,
        end: node.end_position().row + 1,
        decorators,
        parent,
        nesting,
        params,
        exported: !name.starts_with('_'),
    });

    if let Some(body) = node.child_by_field_name("body") {
        collect_calls(body, source, &qualified, ex);
        scope.push(name);
        walk_nested_defs(body, source, scope, ex);
        scope.pop();
    }
}

fn add_class(
    node: Node,
    source: &[u8],
    scope: &mut Vec<String>,
    ex: &mut FileExtraction,
    decorators: Vec<String>,
) {
    let name = match node.child_by_field_name("name") {
        Some(n) => node_text(n, source).to_owned(),
        None => return,
    };
    ex.symbols.push(RawSymbol {
        name: qualify(scope, &name),
        kind: SymbolKind::Class,
        start: node.start_position().row + 1,
        end: node.end_position().row + 1,
        decorators,
        parent: parent_name(scope),
        nesting: 0,
        params: Vec::new(),
        exported: !name.starts_with('_'),
    });

    if let Some(body) = node.child_by_field_name("body") {
        scope.push(name);
        walk_block(body, source, scope, ex);
        scope.pop();
    }
}

/// Inside a function body, only nested definitions produce further symbols;
/// plain statements were already covered by the call collection pass.
fn walk_nested_defs(body: Node, source: &[u8], scope: &mut Vec<String>, ex: &mut FileExtraction) {
    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        match child.kind() {
            "function_definition" | "class_definition" | "decorated_definition" => {
                handle_statement(child, source, scope, ex, Vec::new());
            }
            _ => {
                // Defs can hide under if/for/try inside a function too.
                if child.child_count() > 0 {
                    walk_nested_defs(child, source, scope, ex);
                }
            }
        }
    }
}

/// Module-level `NAME = value` assignments become Variable symbols.
fn add_module_variable(
    node: Node,
    source: &[u8],
    scope: &[String],
    ex: &mut FileExtraction,
) {
    if !scope.is_empty() {
        return;
    }
    let Some(assign) = node.child(0).filter(|c| c.kind() == "assignment") else {
        return;
    };
    let Some(left) = assign.child_by_field_name("left") else {
        return;
    };
    if left.kind() != "identifier" {
        return;
    }
    let name = node_text(left, source).to_owned();
    ex.symbols.push(RawSymbol {
        name: name.clone(),
        kind: SymbolKind::Variable,
        start: node.start_position().row + 1,
        end: node.end_position().row + 1,
        decorators: Vec::new(),
        parent: None,
        nesting: 0,
        params: Vec::new(),
        exported: !name.starts_with('_'),
    });
}

/// Collect `call` nodes under `node`, attributed to `caller`. Does not
/// descend into nested function/class definitions — those attribute their
/// own calls.
fn collect_calls(node: Node, source: &[u8], caller: &str, ex: &mut FileExtraction) {
    if matches!(node.kind(), "function_definition" | "class_definition") {
        return;
    }
    if node.kind() == "call"
        && let Some(func) = node.child_by_field_name("function")
    {
        let callee = node_text(func, source);
        if !callee.is_empty() {
            ex.calls.push(RawCall {
                caller: caller.to_owned(),
                callee: callee.to_owned(),
            });
        }
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_calls(child, source, caller, ex);
    }
}

fn extract_params(func: Node, source: &[u8]) -> Vec<String> {
    let mut params = Vec::new();
    let Some(param_list) = func.child_by_field_name("parameters") else {
        return params;
    };
    let mut cursor = param_list.walk();
    for child in param_list.children(&mut cursor) {
        let name = match child.kind() {
            "identifier" => Some(node_text(child, source)),
            "typed_parameter" => child
                .child(0)
                .filter(|n| n.kind() == "identifier")
                .map(|n| node_text(n, source)),
            "default_parameter" | "typed_default_parameter" => child
                .child_by_field_name("name")
                .map(|n| node_text(n, source)),
            _ => None,
        };
        if let Some(name) = name
            && name != "self"
            && name != "cls"
        {
            params.push(name.to_owned());
        }
    }
    params
}

fn parent_name(scope: &[String]) -> Option<String> {
    if scope.is_empty() {
        None
    } else {
        Some(scope.join("."))
    }
}

fn qualify_scope(scope: &[String]) -> String {
    scope.join(".")
}
