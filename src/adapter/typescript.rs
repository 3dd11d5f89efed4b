use tree_sitter::{Node, Tree};

use crate::adapter::support::{max_nesting, node_text, qualify};
use crate::adapter::{FileExtraction, RawCall, RawSymbol};
use crate::model::SymbolKind;

/// Node kinds that introduce a statement nesting level in TS/JS.
const TS_BLOCK_KINDS: &[&str] = &[
    "if_statement",
    "for_statement",
    "for_in_statement",
    "while_statement",
    "do_statement",
    "switch_statement",
    "try_statement",
];

/// HTTP verbs recognized in route-registration calls (`app.get(...)`).
const ROUTE_VERBS: &[&str] = &[
    "get", "post", "put", "delete", "patch", "options", "head", "all", "use",
];

/// Extract symbols, imports, and call sites from a parsed TS/TSX/JS/JSX
/// file. `is_tsx` enables JSX component detection (the `.tsx`/`.jsx` file
/// carried a JSX-capable grammar).
///
/// Express-style route registrations (`app.get('/users', handler)`) are
/// recorded as decorator-form annotations on the named handler symbol so the
/// endpoint extractor sees one uniform decorator channel across languages.
pub(super) fn extract(tree: &Tree, source: &[u8], is_tsx: bool) -> FileExtraction {
    let mut ex = FileExtraction::default();
    // (handler short name, synthesized decorator text)
    let mut route_hints: Vec<(String, String)> = Vec::new();

    let root = tree.root_node();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        handle_statement(child, source, is_tsx, false, &mut ex, &mut route_hints);
    }

    attach_route_hints(&mut ex, route_hints);
    ex
}

fn handle_statement(
    node: Node,
    source: &[u8],
    is_tsx: bool,
    exported: bool,
    ex: &mut FileExtraction,
    hints: &mut Vec<(String, String)>,
) {
    match node.kind() {
        "import_statement" => {
            if let Some(spec) = string_child(node, source, "source") {
                ex.imports.push(spec);
            }
        }
        "export_statement" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                handle_statement(child, source, is_tsx, true, ex, hints);
            }
        }
        "function_declaration" => add_function(node, source, is_tsx, exported, &[], ex),
        "class_declaration" => add_class(node, source, is_tsx, exported, ex),
        "lexical_declaration" | "variable_declaration" => {
            handle_var_decl(node, source, is_tsx, exported, ex, hints);
        }
        "expression_statement" => {
            collect_calls(node, source, "", ex, hints);
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

fn add_function(
    node: Node,
    source: &[u8],
    is_tsx: bool,
    exported: bool,
    scope: &[String],
    ex: &mut FileExtraction,
) {
    let name = match node.child_by_field_name("name") {
        Some(n) => node_text(n, source).to_owned(),
        None => return,
    };
    let body = node.child_by_field_name("body");
    let kind = if is_tsx && body.map(contains_jsx).unwrap_or(false) {
        SymbolKind::Component
    } else {
        SymbolKind::Function
    };
    let qualified = qualify(scope, &name);
    ex.symbols.push(RawSymbol {
        name: qualified.clone(),
        kind,
        start: node.start_position().row + 1,
        end: node.end_position().row + 1,
        decorators: Vec::new(),
        parent: scope_parent(scope),
        nesting: body.map(|b| max_nesting(b, TS_BLOCK_KINDS)).unwrap_or(0),
        params: extract_params(node, source),
        exported,
    });
    if let Some(body) = body {
        let mut hints = Vec::new();
        collect_calls(body, source, &qualified, ex, &mut hints);
        attach_route_hints(ex, hints);
    }
}

fn add_class(node: Node, source: &[u8], is_tsx: bool, exported: bool, ex: &mut FileExtraction) {
    let name = match node.child_by_field_name("name") {
        Some(n) => node_text(n, source).to_owned(),
        None => return,
    };

    // Class decorators (@Controller, @Injectable) are direct children.
    let mut decorators = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "decorator" {
            decorators.push(node_text(child, source).to_owned());
        }
    }

    // A class extending a Component base is a UI class component, but only
    // in JSX-capable files; a plain `.ts` class stays a class.
    let kind = if is_tsx && extends_component(node, source) {
        SymbolKind::Component
    } else {
        SymbolKind::Class
    };

    ex.symbols.push(RawSymbol {
        name: name.clone(),
        kind,
        start: node.start_position().row + 1,
        end: node.end_position().row + 1,
        decorators,
        parent: None,
        nesting: 0,
        params: Vec::new(),
        exported,
    });

    let Some(body) = node.child_by_field_name("body") else {
        return;
    };
    let scope = vec![name];
    let mut cursor = body.walk();
    for member in body.children(&mut cursor) {
        if member.kind() == "method_definition" {
            add_method(member, source, &scope, ex);
        }
    }
}

fn add_method(node: Node, source: &[u8], scope: &[String], ex: &mut FileExtraction) {
    let name = match node.child_by_field_name("name") {
        Some(n) => node_text(n, source).to_owned(),
        None => return,
    };
    // Method decorators sit in the class body as siblings preceding the
    // method they annotate. Walk backwards, then restore source order.
    let mut decorators = Vec::new();
    let mut prev = node.prev_sibling();
    while let Some(sibling) = prev {
        if sibling.kind() != "decorator" {
            break;
        }
        decorators.push(node_text(sibling, source).to_owned());
        prev = sibling.prev_sibling();
    }
    decorators.reverse();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "decorator" {
            decorators.push(node_text(child, source).to_owned());
        }
    }
    let body = node.child_by_field_name("body");
    let qualified = qualify(scope, &name);
    ex.symbols.push(RawSymbol {
        name: qualified.clone(),
        kind: SymbolKind::Function,
        start: node.start_position().row + 1,
        end: node.end_position().row + 1,
        decorators,
        parent: scope_parent(scope),
        nesting: body.map(|b| max_nesting(b, TS_BLOCK_KINDS)).unwrap_or(0),
        params: extract_params(node, source),
        exported: false,
    });
    if let Some(body) = body {
        let mut hints = Vec::new();
        collect_calls(body, source, &qualified, ex, &mut hints);
        attach_route_hints(ex, hints);
    }
}

/// `const Foo = () => ...` and `export const BAR = value` declarations.
fn handle_var_decl(
    node: Node,
    source: &[u8],
    is_tsx: bool,
    exported: bool,
    ex: &mut FileExtraction,
    hints: &mut Vec<(String, String)>,
) {
    let mut cursor = node.walk();
    for declarator in node.children(&mut cursor) {
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        let Some(name_node) = declarator.child_by_field_name("name") else {
            continue;
        };
        if name_node.kind() != "identifier" {
            continue;
        }
        let name = node_text(name_node, source).to_owned();
        let value = declarator.child_by_field_name("value");

        match value {
            Some(v) if matches!(v.kind(), "arrow_function" | "function_expression" | "function") => {
                let body = v.child_by_field_name("body");
                let kind = if is_tsx && body.map(contains_jsx).unwrap_or(false) {
                    SymbolKind::Component
                } else {
                    SymbolKind::Function
                };
                ex.symbols.push(RawSymbol {
                    name: name.clone(),
                    kind,
                    start: declarator.start_position().row + 1,
                    end: declarator.end_position().row + 1,
                    decorators: Vec::new(),
                    parent: None,
                    nesting: body.map(|b| max_nesting(b, TS_BLOCK_KINDS)).unwrap_or(0),
                    params: extract_arrow_params(v, source),
                    exported,
                });
                if let Some(body) = body {
                    collect_calls(body, source, &name, ex, hints);
                }
            }
            Some(v) => {
                // Plain variables are only recorded when exported — module
                // locals add noise without being part of the file's surface.
                if exported {
                    ex.symbols.push(RawSymbol {
                        name,
                        kind: SymbolKind::Variable,
                        start: declarator.start_position().row + 1,
                        end: declarator.end_position().row + 1,
                        decorators: Vec::new(),
                        parent: None,
                        nesting: 0,
                        params: Vec::new(),
                        exported,
                    });
                }
                // `const x = require('./m')` style imports live in the value.
                collect_calls(v, source, "", ex, hints);
            }
            None => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Calls, requires, route registrations
// ---------------------------------------------------------------------------

/// Collect call expressions under `node`, attributed to `caller`. CommonJS
/// `require(...)` and dynamic `import(...)` arguments are recorded as import
/// specifiers instead of calls. Route-registration calls additionally push a
/// `(handler, decorator)` hint. Does not descend into nested declarations.
fn collect_calls(
    node: Node,
    source: &[u8],
    caller: &str,
    ex: &mut FileExtraction,
    hints: &mut Vec<(String, String)>,
) {
    if matches!(
        node.kind(),
        "function_declaration" | "class_declaration" | "method_definition" | "arrow_function"
    ) && !caller.is_empty()
    {
        // The enclosing symbol's own body is walked from its declaration.
        return;
    }

    if node.kind() == "call_expression" {
        handle_call(node, source, caller, ex, hints);
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if matches!(
            child.kind(),
            "function_declaration" | "class_declaration" | "method_definition"
        ) {
            continue;
        }
        collect_calls(child, source, caller, ex, hints);
    }
}

fn handle_call(
    node: Node,
    source: &[u8],
    caller: &str,
    ex: &mut FileExtraction,
    hints: &mut Vec<(String, String)>,
) {
    let Some(func) = node.child_by_field_name("function") else {
        return;
    };
    let callee = node_text(func, source).to_owned();

    // CommonJS require / dynamic import -> import edge, not a call.
    if callee == "require" || func.kind() == "import" {
        if let Some(spec) = first_string_arg(node, source) {
            ex.imports.push(spec);
        }
        return;
    }

    // Route registration: receiver.verb('/path', handlerIdent).
    if func.kind() == "member_expression"
        && let Some(prop) = func.child_by_field_name("property")
        && ROUTE_VERBS.contains(&node_text(prop, source))
        && let Some(path) = first_string_arg(node, source)
    {
        let receiver = func
            .child_by_field_name("object")
            .map(|o| node_text(o, source).to_owned())
            .unwrap_or_default();
        let verb = node_text(prop, source);
        if let Some(handler) = trailing_identifier_arg(node, source) {
            hints.push((handler, format!("@{receiver}.{verb}(\"{path}\")")));
        }
    }

    if !callee.is_empty() {
        ex.calls.push(RawCall {
            caller: caller.to_owned(),
            callee,
        });
    }
}

/// Attach synthesized route decorators to the named handler symbols.
fn attach_route_hints(ex: &mut FileExtraction, hints: Vec<(String, String)>) {
    for (handler, decorator) in hints {
        if let Some(sym) = ex
            .symbols
            .iter_mut()
            .find(|s| s.name == handler || s.name.ends_with(&format!(".{handler}")))
        {
            sym.decorators.push(decorator);
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn string_child(node: Node, source: &[u8], field: &str) -> Option<String> {
    let child = node.child_by_field_name(field)?;
    string_fragment(child, source)
}

fn string_fragment(node: Node, source: &[u8]) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "string_fragment" {
            return Some(node_text(child, source).to_owned());
        }
    }
    // Empty string literal.
    Some(String::new())
}

fn first_string_arg(call: Node, source: &[u8]) -> Option<String> {
    let args = call.child_by_field_name("arguments")?;
    let mut cursor = args.walk();
    for child in args.children(&mut cursor) {
        if let Some(s) = string_fragment(child, source) {
            return Some(s);
        }
    }
    None
}

/// Last identifier argument of a call — the conventional handler position in
/// `app.get('/path', middleware, handler)`.
fn trailing_identifier_arg(call: Node, source: &[u8]) -> Option<String> {
    let args = call.child_by_field_name("arguments")?;
    let mut last = None;
    let mut cursor = args.walk();
    for child in args.children(&mut cursor) {
        if child.kind() == "identifier" {
            last = Some(node_text(child, source).to_owned());
        }
    }
    last
}

/// True when the tree rooted at `node` contains JSX anywhere.
fn contains_jsx(node: Node) -> bool {
    if matches!(
        node.kind(),
        "jsx_element" | "jsx_fragment" | "jsx_self_closing_element"
    ) {
        return true;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if contains_jsx(child) {
            return true;
        }
    }
    false
}

/// True when the class has an `extends` heritage naming a Component base.
fn extends_component(class_node: Node, source: &[u8]) -> bool {
    let mut cursor = class_node.walk();
    for child in class_node.children(&mut cursor) {
        if child.kind() == "class_heritage" {
            let text = node_text(child, source);
            return text.contains("Component");
        }
    }
    false
}

fn extract_params(func: Node, source: &[u8]) -> Vec<String> {
    func.child_by_field_name("parameters")
        .map(|p| param_names(p, source))
        .unwrap_or_default()
}

fn extract_arrow_params(arrow: Node, source: &[u8]) -> Vec<String> {
    if let Some(p) = arrow.child_by_field_name("parameters") {
        return param_names(p, source);
    }
    // Single bare parameter: `x => ...`
    if let Some(p) = arrow.child_by_field_name("parameter") {
        return vec![node_text(p, source).to_owned()];
    }
    Vec::new()
}

/// Parameter names from a `formal_parameters` node. Destructured object
/// patterns contribute their property names — for components these are the
/// declared props.
fn param_names(params: Node, source: &[u8]) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = params.walk();
    for child in params.children(&mut cursor) {
        match child.kind() {
            "required_parameter" | "optional_parameter" => {
                if let Some(pattern) = child.child_by_field_name("pattern") {
                    pattern_names(pattern, source, &mut names);
                }
            }
            "identifier" => names.push(node_text(child, source).to_owned()),
            "object_pattern" => pattern_names(child, source, &mut names),
            _ => {}
        }
    }
    names
}

fn pattern_names(pattern: Node, source: &[u8], names: &mut Vec<String>) {
    match pattern.kind() {
        "identifier" => names.push(node_text(pattern, source).to_owned()),
        "object_pattern" => {
            let mut cursor = pattern.walk();
            for child in pattern.children(&mut cursor) {
                match child.kind() {
                    "shorthand_property_identifier_pattern" => {
                        names.push(node_text(child, source).to_owned());
                    }
                    "pair_pattern" => {
                        if let Some(key) = child.child_by_field_name("key") {
                            names.push(node_text(key, source).to_owned());
                        }
                    }
                    _ => {}
                }
            }
        }
        _ => {}
    }
}

fn scope_parent(scope: &[String]) -> Option<String> {
    if scope.is_empty() {
        None
    } else {
        Some(scope.join("."))
    }
}
