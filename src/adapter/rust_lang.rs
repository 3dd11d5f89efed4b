use tree_sitter::{Node, Tree};

use crate::adapter::support::{max_nesting, node_text, qualify};
use crate::adapter::{FileExtraction, RawCall, RawSymbol};
use crate::model::SymbolKind;

const RS_BLOCK_KINDS: &[&str] = &[
    "if_expression",
    "for_expression",
    "while_expression",
    "loop_expression",
    "match_expression",
];

/// Extract symbols, `use` imports, and call sites from a parsed Rust file.
///
/// Structs and enums map to the class kind; `impl` blocks qualify their
/// methods under the implemented type's name. Route attributes in the Actix
/// and Rocket style (`#[get("/users")]`) are captured as decorators.
pub(super) fn extract(tree: &Tree, source: &[u8]) -> FileExtraction {
    let mut ex = FileExtraction::default();
    let root = tree.root_node();
    let mut pending_attrs: Vec<String> = Vec::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        handle_item(child, source, &[], &mut pending_attrs, &mut ex);
    }
    ex
}

fn handle_item(
    node: Node,
    source: &[u8],
    scope: &[String],
    pending_attrs: &mut Vec<String>,
    ex: &mut FileExtraction,
) {
    match node.kind() {
        "attribute_item" => {
            pending_attrs.push(node_text(node, source).to_owned());
            return;
        }
        "use_declaration" => {
            if let Some(arg) = node.child_by_field_name("argument") {
                collect_use_paths(arg, source, "", &mut ex.imports);
            }
        }
        "function_item" => {
            add_function(node, source, scope, std::mem::take(pending_attrs), ex);
        }
        "struct_item" | "enum_item" | "trait_item" => {
            add_type(node, source, std::mem::take(pending_attrs), ex);
        }
        "impl_item" => {
            handle_impl(node, source, ex);
        }
        "static_item" | "const_item" => {
            add_const(node, source, ex);
        }
        "mod_item" => {
            // Inline modules contribute their items under a module scope.
            if let Some(name) = node.child_by_field_name("name")
                && let Some(body) = node.child_by_field_name("body")
            {
                let mut inner: Vec<String> = scope.to_vec();
                inner.push(node_text(name, source).to_owned());
                let mut attrs = Vec::new();
                let mut cursor = body.walk();
                for child in body.children(&mut cursor) {
                    handle_item(child, source, &inner, &mut attrs, ex);
                }
            }
        }
        _ => {}
    }
    pending_attrs.clear();
}

fn add_function(
    node: Node,
    source: &[u8],
    scope: &[String],
    attrs: Vec<String>,
    ex: &mut FileExtraction,
) {
    let Some(name_node) = node.child_by_field_name("name") else {
        return;
    };
    let name = node_text(name_node, source).to_owned();
    let qualified = qualify(scope, &name);
    let body = node.child_by_field_name("body");
    // Only attribute items that look like annotations are kept as
    // decorators; derives and cfgs are not routing or framework signals.
    let decorators: Vec<String> = attrs
        .into_iter()
        .filter(|a| !a.starts_with("#[derive") && !a.starts_with("#[cfg"))
        .collect();
    ex.symbols.push(RawSymbol {
        name: qualified.clone(),
        kind: SymbolKind::Function,
        start: node.start_position().row + 1,
        end: node.end_position().row + 1,
        decorators,
        parent: if scope.is_empty() {
            None
        } else {
            Some(scope.join("."))
        },
        nesting: body.map(|b| max_nesting(b, RS_BLOCK_KINDS)).unwrap_or(0),
        params: extract_params(node, source),
        exported: is_pub(node, source),
    });
    if let Some(body) = body {
        collect_calls(body, source, &qualified, ex);
    }
}

fn add_type(node: Node, source: &[u8], attrs: Vec<String>, ex: &mut FileExtraction) {
    let Some(name_node) = node.child_by_field_name("name") else {
        return;
    };
    let decorators: Vec<String> = attrs
        .into_iter()
        .filter(|a| !a.starts_with("#[derive") && !a.starts_with("#[cfg"))
        .collect();
    ex.symbols.push(RawSymbol {
        name: node_text(name_node, source).to_owned(),
        kind: SymbolKind::Class,
        start: node.start_position().row + 1,
        end: node.end_position().row + 1,
        decorators,
        parent: None,
        nesting: 0,
        params: Vec::new(),
        exported: is_pub(node, source),
    });
}

fn add_const(node: Node, source: &[u8], ex: &mut FileExtraction) {
    let Some(name_node) = node.child_by_field_name("name") else {
        return;
    };
    ex.symbols.push(RawSymbol {
        name: node_text(name_node, source).to_owned(),
        kind: SymbolKind::Variable,
        start: node.start_position().row + 1,
        end: node.end_position().row + 1,
        decorators: Vec::new(),
        parent: None,
        nesting: 0,
        params: Vec::new(),
        exported: is_pub(node, source),
    });
}

fn handle_impl(node: Node, source: &[u8], ex: &mut FileExtraction) {
    let Some(type_node) = node.child_by_field_name("type") else {
        return;
    };
    let type_name = node_text(type_node, source).to_owned();
    let Some(body) = node.child_by_field_name("body") else {
        return;
    };
    let scope = vec![type_name];
    let mut attrs = Vec::new();
    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        match child.kind() {
            "attribute_item" => attrs.push(node_text(child, source).to_owned()),
            "function_item" => {
                add_function(child, source, &scope, std::mem::take(&mut attrs), ex);
            }
            _ => attrs.clear(),
        }
    }
}

/// Flatten a `use` tree into dotted module paths, one per leaf. `use` lists
/// and globs expand to their prefix; aliases keep the original path.
fn collect_use_paths(node: Node, source: &[u8], prefix: &str, out: &mut Vec<String>) {
    match node.kind() {
        "identifier" | "crate" | "self" | "super" | "metavariable" => {
            out.push(join_path(prefix, node_text(node, source)));
        }
        "scoped_identifier" => {
            out.push(join_path(prefix, node_text(node, source)));
        }
        "scoped_use_list" => {
            let path = node
                .child_by_field_name("path")
                .map(|p| node_text(p, source))
                .unwrap_or("");
            let full = join_path(prefix, path);
            if let Some(list) = node.child_by_field_name("list") {
                let mut cursor = list.walk();
                for child in list.children(&mut cursor) {
                    if child.is_named() {
                        collect_use_paths(child, source, &full, out);
                    }
                }
            }
        }
        "use_list" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.is_named() {
                    collect_use_paths(child, source, prefix, out);
                }
            }
        }
        "use_as_clause" => {
            if let Some(path) = node.child_by_field_name("path") {
                collect_use_paths(path, source, prefix, out);
            }
        }
        "use_wildcard" => {
            // `use foo::*` keeps the prefix path itself.
            if !prefix.is_empty() {
                out.push(prefix.to_owned());
            } else if let Some(first) = node.named_child(0) {
                out.push(join_path("", node_text(first, source)));
            }
        }
        _ => {}
    }
}

fn join_path(prefix: &str, tail: &str) -> String {
    let tail = tail.replace("::", ".");
    if prefix.is_empty() {
        tail
    } else if tail == "self" {
        prefix.to_owned()
    } else {
        format!("{prefix}.{tail}")
    }
}

fn collect_calls(node: Node, source: &[u8], caller: &str, ex: &mut FileExtraction) {
    match node.kind() {
        "function_item" => return,
        "call_expression" => {
            // Covers plain calls, `path::to::fn()` and method calls, whose
            // function node is a field expression (`store.get`).
            if let Some(func) = node.child_by_field_name("function") {
                let callee = node_text(func, source).replace("::", ".");
                ex.calls.push(RawCall {
                    caller: caller.to_owned(),
                    callee,
                });
            }
        }
        _ => {}
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != "function_item" {
            collect_calls(child, source, caller, ex);
        }
    }
}

fn extract_params(func: Node, source: &[u8]) -> Vec<String> {
    let mut names = Vec::new();
    if let Some(params) = func.child_by_field_name("parameters") {
        let mut cursor = params.walk();
        for child in params.children(&mut cursor) {
            if child.kind() == "parameter"
                && let Some(pattern) = child.child_by_field_name("pattern")
                && pattern.kind() == "identifier"
            {
                names.push(node_text(pattern, source).to_owned());
            }
        }
    }
    names
}

fn is_pub(node: Node, source: &[u8]) -> bool {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "visibility_modifier" {
            return node_text(child, source).starts_with("pub");
        }
    }
    false
}
