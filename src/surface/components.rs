use crate::model::{Component, ComponentKind, ProjectModel, SymbolId, SymbolKind};

/// React lifecycle methods that count as hook-like usage on class
/// components.
const LIFECYCLE_METHODS: &[&str] = &[
    "componentDidMount",
    "componentDidUpdate",
    "componentWillUnmount",
    "shouldComponentUpdate",
];

/// Build one component record per component symbol: declared prop names
/// (the symbol's parameters) and hook usage read off the call graph edges.
///
/// A component with child symbols is a class component — its hook usage
/// aggregates over the methods it owns.
pub fn extract_components(model: &mut ProjectModel) {
    let mut found: Vec<Component> = Vec::new();
    for sym in model.symbols() {
        if sym.kind != SymbolKind::Component {
            continue;
        }
        let children: Vec<SymbolId> = model
            .symbols()
            .iter()
            .filter(|s| s.parent == Some(sym.id))
            .map(|s| s.id)
            .collect();
        let kind = if children.is_empty() {
            ComponentKind::Function
        } else {
            ComponentKind::Class
        };

        let mut hooks: Vec<String> = Vec::new();
        let mut callers = vec![sym.id];
        callers.extend(children);
        for call in &model.calls {
            if callers.contains(&call.caller)
                && is_hook_like(&call.callee)
                && !hooks.contains(&call.callee)
            {
                hooks.push(call.callee.clone());
            }
        }

        found.push(Component {
            symbol: sym.id,
            kind,
            props: sym.params.clone(),
            hooks,
        });
    }
    model.components.extend(found);
}

/// `useXxx` naming convention, plus the class lifecycle methods.
fn is_hook_like(callee: &str) -> bool {
    let short = callee.rsplit('.').next().unwrap_or(callee);
    if LIFECYCLE_METHODS.contains(&short) {
        return true;
    }
    short.len() > 3
        && short.starts_with("use")
        && short.as_bytes()[3].is_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::extract_file;
    use crate::language::Lang;
    use std::path::PathBuf;

    fn surfaced(files: &[(&str, Lang, &str)]) -> ProjectModel {
        let mut model = ProjectModel::new();
        let mut extractions = Vec::new();
        for (path, lang, src) in files {
            let id = model.add_file(PathBuf::from(path), *lang, src.to_string());
            extractions.push((id, extract_file(&PathBuf::from(path), *lang, src)));
        }
        crate::resolver::apply(&mut model, extractions);
        extract_components(&mut model);
        model
    }

    #[test]
    fn test_function_component_props_and_hooks() {
        let src = "\
import { useState, useEffect } from 'react';

export const Counter = ({ start, label }) => {
  const [n, setN] = useState(start);
  useEffect(() => {}, []);
  return <div>{label}: {n}</div>;
};
";
        let model = surfaced(&[("Counter.tsx", Lang::TypeScript, src)]);
        assert_eq!(model.components.len(), 1);
        let c = &model.components[0];
        assert_eq!(c.kind, ComponentKind::Function);
        assert_eq!(c.props, vec!["start", "label"]);
        assert!(c.hooks.contains(&"useState".to_string()));
        assert!(c.hooks.contains(&"useEffect".to_string()));
    }

    #[test]
    fn test_plain_function_not_a_component() {
        let src = "export const sum = (a, b) => a + b;\n";
        let model = surfaced(&[("math.tsx", Lang::TypeScript, src)]);
        assert!(model.components.is_empty());
    }

    #[test]
    fn test_use_prefix_requires_uppercase_follower() {
        assert!(is_hook_like("useState"));
        assert!(is_hook_like("props.useCallback"));
        assert!(!is_hook_like("user"));
        assert!(!is_hook_like("useful"));
        assert!(!is_hook_like("use"));
        assert!(is_hook_like("componentDidMount"));
    }
}
