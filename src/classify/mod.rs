//! Framework and role classification.
//!
//! Runs after resolution with the whole model in view. Evidence comes from
//! three channels per file: import specifiers, decorator text, and raw
//! source patterns. Tags accumulate — a file can be both a FastAPI file
//! and a CLI file — and per-file tags aggregate into one project-level tag
//! per detected framework.

pub mod rules;

use std::collections::BTreeMap;

use crate::model::{
    Confidence, FileId, FrameworkTag, ProjectModel, Role, SymbolKind, TagScope,
};
use rules::{CLI_RULE, ENTRY_SOURCE_MARKERS, FRAMEWORK_RULES, FrameworkRule, ROLE_RULES};

pub fn classify(model: &mut ProjectModel) {
    let mut file_tags: Vec<FrameworkTag> = Vec::new();
    let mut file_roles: Vec<(FileId, Vec<Role>)> = Vec::new();

    for file in model.files() {
        let imports: Vec<&str> = model
            .imports
            .iter()
            .filter(|e| e.from == file.id)
            .map(|e| e.specifier.as_str())
            .collect();
        let decorators: Vec<&str> = model
            .symbols_in(file.id)
            .iter()
            .flat_map(|&s| model.symbol(s).decorators.iter())
            .map(String::as_str)
            .collect();

        for rule in FRAMEWORK_RULES.iter().chain(std::iter::once(&CLI_RULE)) {
            if let Some(tag) = match_rule(rule, file.id, &imports, &decorators, &file.text) {
                file_tags.push(tag);
            }
        }

        file_roles.push((file.id, roles_for(file, model)));
    }

    // Project-level tags: one per framework, strongest file evidence wins,
    // signals merged. BTreeMap keeps framework order deterministic.
    let mut by_framework: BTreeMap<&str, (Confidence, Vec<String>)> = BTreeMap::new();
    for tag in &file_tags {
        let entry = by_framework
            .entry(tag.framework.as_str())
            .or_insert((Confidence::Low, Vec::new()));
        if tag.confidence > entry.0 {
            entry.0 = tag.confidence;
        }
        for sig in &tag.signals {
            if !entry.1.contains(sig) {
                entry.1.push(sig.clone());
            }
        }
    }
    let project_tags: Vec<FrameworkTag> = by_framework
        .into_iter()
        .map(|(framework, (confidence, signals))| FrameworkTag {
            scope: TagScope::Project,
            framework: framework.to_owned(),
            signals,
            confidence,
        })
        .collect();
    model.tags.extend(project_tags);
    model.tags.extend(file_tags);

    for (id, roles) in file_roles {
        model.file_mut(id).roles = roles;
    }

    annotate_symbol_roles(model);
}

fn match_rule(
    rule: &FrameworkRule,
    file: FileId,
    imports: &[&str],
    decorators: &[&str],
    source: &str,
) -> Option<FrameworkTag> {
    let mut signals = Vec::new();
    let mut import_hit = false;
    let mut usage_hit = false;

    for prefix in rule.import_prefixes {
        if imports.iter().any(|i| i.starts_with(prefix)) {
            import_hit = true;
            signals.push(format!("import:{prefix}"));
        }
    }
    for marker in rule.decorator_markers {
        if decorators.iter().any(|d| d.contains(marker)) {
            usage_hit = true;
            signals.push(format!("decorator:{marker}"));
        }
    }
    for pattern in rule.source_patterns {
        if source.contains(pattern) {
            usage_hit = true;
            signals.push(format!("source:{pattern}"));
        }
    }

    if signals.is_empty() {
        return None;
    }
    // Import plus actual usage is conclusive; either alone is weaker.
    let confidence = match (import_hit, usage_hit) {
        (true, true) => Confidence::High,
        (true, false) => Confidence::Medium,
        (false, _) => Confidence::Low,
    };
    Some(FrameworkTag {
        scope: TagScope::File(file),
        framework: rule.framework.to_owned(),
        signals,
        confidence,
    })
}

fn roles_for(file: &crate::model::SourceFile, model: &ProjectModel) -> Vec<Role> {
    let mut roles = Vec::new();
    let file_name = file
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    for rule in ROLE_RULES {
        let name_hit = rule.names.contains(&file_name)
            || rule.prefixes.iter().any(|p| file_name.starts_with(p))
            || rule.suffixes.iter().any(|s| file_name.ends_with(s));
        let dir_hit = file.path.components().any(|c| {
            c.as_os_str()
                .to_str()
                .is_some_and(|d| rule.dirs.contains(&d))
        });
        if name_hit || dir_hit {
            roles.push(rule.role);
        }
    }

    if !roles.contains(&Role::EntryPoint)
        && ENTRY_SOURCE_MARKERS.iter().any(|m| file.text.contains(m))
    {
        roles.push(Role::EntryPoint);
    }

    if model
        .symbols_in(file.id)
        .iter()
        .any(|&s| model.symbol(s).kind == SymbolKind::Component)
    {
        roles.push(Role::UiComponent);
    }

    roles
}

/// Route handlers get their role from route-shaped decorators; component
/// symbols mirror their kind as a role so role queries are uniform.
fn annotate_symbol_roles(model: &mut ProjectModel) {
    let marked: Vec<(crate::model::SymbolId, Role)> = model
        .symbols()
        .iter()
        .filter_map(|s| {
            if s.kind == SymbolKind::Component {
                Some((s.id, Role::UiComponent))
            } else if s.decorators.iter().any(|d| is_route_decorator(d)) {
                Some((s.id, Role::RouteHandler))
            } else {
                None
            }
        })
        .collect();
    for (id, role) in marked {
        let sym = model.symbol_mut(id);
        if !sym.roles.contains(&role) {
            sym.roles.push(role);
        }
    }
}

pub(crate) fn is_route_decorator(text: &str) -> bool {
    const VERBS: &[&str] = &[
        ".get(", ".post(", ".put(", ".delete(", ".patch(", ".options(", ".head(", ".route(", ".all(",
    ];
    if text.starts_with("#[") {
        return ["#[get(", "#[post(", "#[put(", "#[delete(", "#[patch(", "#[head(", "#[options(", "#[route("]
            .iter()
            .any(|p| text.starts_with(p));
    }
    let lowered = text.to_ascii_lowercase();
    VERBS.iter().any(|v| lowered.contains(v))
        || lowered.starts_with("@get(")
        || lowered.starts_with("@post(")
        || lowered.starts_with("@put(")
        || lowered.starts_with("@delete(")
        || lowered.starts_with("@patch(")
}

/// Coarse project type derived from the classification result. Order
/// matters: a web framework outranks a UI stack, which outranks CLI.
pub fn project_type(model: &ProjectModel) -> &'static str {
    const WEB: &[&str] = &[
        "FastAPI", "Flask", "Django", "Express", "NestJS", "Actix", "Rocket", "Axum",
    ];
    const UI: &[&str] = &["React", "Next.js"];
    let project_frameworks: Vec<&str> = model
        .tags
        .iter()
        .filter(|t| t.scope == TagScope::Project)
        .map(|t| t.framework.as_str())
        .collect();

    if project_frameworks.iter().any(|f| WEB.contains(f)) {
        "web service"
    } else if project_frameworks.iter().any(|f| UI.contains(f)) {
        "ui application"
    } else if project_frameworks.contains(&"CLI") {
        "command-line tool"
    } else if model.files().iter().any(|f| f.roles.contains(&Role::EntryPoint)) {
        "application"
    } else {
        "library"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::extract_file;
    use crate::language::Lang;
    use std::path::PathBuf;

    fn classified(files: &[(&str, Lang, &str)]) -> ProjectModel {
        let mut model = ProjectModel::new();
        let mut extractions = Vec::new();
        for (path, lang, src) in files {
            let id = model.add_file(PathBuf::from(path), *lang, src.to_string());
            extractions.push((id, extract_file(&PathBuf::from(path), *lang, src)));
        }
        crate::resolver::apply(&mut model, extractions);
        classify(&mut model);
        model
    }

    #[test]
    fn test_fastapi_high_confidence() {
        let src = "\
from fastapi import FastAPI

app = FastAPI()

@app.get(\"/users\")
def list_users():
    return []
";
        let model = classified(&[("api.py", Lang::Python, src)]);
        let tag = model
            .tags
            .iter()
            .find(|t| t.scope == TagScope::Project && t.framework == "FastAPI")
            .expect("project tag");
        assert_eq!(tag.confidence, Confidence::High);
        assert!(tag.signals.iter().any(|s| s.starts_with("import:")));
    }

    #[test]
    fn test_import_only_is_medium() {
        let model = classified(&[("m.py", Lang::Python, "import flask\n")]);
        let tag = model.tags.iter().find(|t| t.framework == "Flask").unwrap();
        assert_eq!(tag.confidence, Confidence::Medium);
    }

    #[test]
    fn test_tags_accumulate() {
        let src = "import flask\nimport click\n";
        let model = classified(&[("tool.py", Lang::Python, src)]);
        let project: Vec<&str> = model
            .tags
            .iter()
            .filter(|t| t.scope == TagScope::Project)
            .map(|t| t.framework.as_str())
            .collect();
        assert!(project.contains(&"Flask"));
        assert!(project.contains(&"CLI"));
    }

    #[test]
    fn test_entry_point_roles() {
        let model = classified(&[
            ("main.py", Lang::Python, "print('hi')\n"),
            (
                "runner.py",
                Lang::Python,
                "if __name__ == \"__main__\":\n    pass\n",
            ),
            ("lib.py", Lang::Python, "def f():\n    pass\n"),
        ]);
        let roles = |name: &str| {
            model
                .files()
                .iter()
                .find(|f| f.path == PathBuf::from(name))
                .unwrap()
                .roles
                .clone()
        };
        assert!(roles("main.py").contains(&Role::EntryPoint));
        assert!(roles("runner.py").contains(&Role::EntryPoint));
        assert!(!roles("lib.py").contains(&Role::EntryPoint));
    }

    #[test]
    fn test_test_file_role_by_prefix_and_dir() {
        let model = classified(&[
            ("test_api.py", Lang::Python, "def test_x():\n    pass\n"),
            ("tests/helpers.py", Lang::Python, "def x():\n    pass\n"),
        ]);
        for f in model.files() {
            assert!(f.roles.contains(&Role::Test), "{:?}", f.path);
        }
    }

    #[test]
    fn test_route_handler_symbol_role() {
        let src = "\
@app.route(\"/health\")
def health():
    return \"ok\"
";
        let model = classified(&[("srv.py", Lang::Python, src)]);
        let health = model.symbols().iter().find(|s| s.name == "health").unwrap();
        assert!(health.roles.contains(&Role::RouteHandler));
    }

    #[test]
    fn test_project_type_ranking() {
        let web = classified(&[("api.py", Lang::Python, "import fastapi\nimport click\n")]);
        assert_eq!(project_type(&web), "web service");
        let cli = classified(&[("tool.py", Lang::Python, "import click\n")]);
        assert_eq!(project_type(&cli), "command-line tool");
        let lib = classified(&[("lib.py", Lang::Python, "def f():\n    pass\n")]);
        assert_eq!(project_type(&lib), "library");
    }
}
