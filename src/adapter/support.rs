use tree_sitter::Node;

/// Extract the UTF-8 text of a node from the original source bytes.
pub fn node_text<'a>(node: Node<'a>, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

/// Maximum statement nesting depth under `node`.
///
/// `block_kinds` is the per-language set of node kinds that introduce a
/// nesting level (if/for/while/match arms and the like). The node itself
/// contributes a level when its kind is in the set.
pub fn max_nesting(node: Node, block_kinds: &[&str]) -> usize {
    let own = usize::from(block_kinds.contains(&node.kind()));
    let mut deepest = 0;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        deepest = deepest.max(max_nesting(child, block_kinds));
    }
    own + deepest
}

/// Join a scope stack and a name into a file-qualified symbol name.
pub fn qualify(scope: &[String], name: &str) -> String {
    if scope.is_empty() {
        name.to_owned()
    } else {
        format!("{}.{}", scope.join("."), name)
    }
}
