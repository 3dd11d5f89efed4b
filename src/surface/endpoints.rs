use std::sync::OnceLock;

use regex::Regex;

use crate::model::{Endpoint, HttpMethod, ProjectModel, TagScope};

/// Decorator-style route pattern: `@receiver.verb("/path")`. Covers FastAPI,
/// Flask, NestJS-style method decorators, and the synthesized Express
/// registration decorators.
fn at_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"@(?:[\w$]+\.)*((?i:get|post|put|delete|patch|options|head|route|all|use))\s*\(\s*['"]([^'"]*)['"]"#,
        )
        .unwrap()
    })
}

/// Rust route attribute: `#[get("/path")]`, `#[rocket::get("/path")]`.
fn attr_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"#\[(?:\w+::)?(get|post|put|delete|patch|options|head|route)\s*\(\s*"([^"]*)""#)
            .unwrap()
    })
}

/// Flask-style method list: `methods=["POST", "PUT"]`.
fn methods_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"methods\s*=\s*\[\s*['"](\w+)['"]"#).unwrap())
}

/// Scan every symbol's decorators for routing patterns and record one
/// endpoint per match. Paths are kept verbatim, parameter syntax included.
pub fn extract_endpoints(model: &mut ProjectModel) {
    let mut found: Vec<Endpoint> = Vec::new();
    for sym in model.symbols() {
        for deco in &sym.decorators {
            let captures = if deco.starts_with("#[") {
                attr_pattern().captures(deco)
            } else {
                at_pattern().captures(deco)
            };
            let Some(cap) = captures else { continue };

            let verb = cap[1].to_ascii_lowercase();
            let path = cap[2].to_owned();
            let mut method = match HttpMethod::from_verb(&verb) {
                Some(m) => m,
                None => continue,
            };
            // `@app.route("/x", methods=["POST"])` narrows Any to the
            // first listed method.
            if method == HttpMethod::Any
                && let Some(mcap) = methods_pattern().captures(deco)
                && let Some(narrowed) = HttpMethod::from_verb(&mcap[1])
            {
                method = narrowed;
            }
            found.push(Endpoint {
                symbol: sym.id,
                method,
                path,
                framework: framework_for(model, sym.file),
            });
        }
    }
    model.endpoints.extend(found);
}

/// Best route-capable framework tag on the file, highest confidence first.
fn framework_for(model: &ProjectModel, file: crate::model::FileId) -> String {
    const ROUTE_CAPABLE: &[&str] = &[
        "FastAPI", "Flask", "Django", "Express", "NestJS", "Actix", "Rocket", "Axum",
    ];
    model
        .tags
        .iter()
        .filter(|t| t.scope == TagScope::File(file))
        .filter(|t| ROUTE_CAPABLE.contains(&t.framework.as_str()))
        .max_by_key(|t| t.confidence)
        .map(|t| t.framework.clone())
        .unwrap_or_else(|| "unknown".to_owned())
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
        crate::classify::classify(&mut model);
        extract_endpoints(&mut model);
        model
    }

    #[test]
    fn test_fastapi_endpoint_with_path_parameter() {
        let src = "\
from fastapi import FastAPI

app = FastAPI()

@app.get(\"/users/{user_id}\")
def read_user(user_id: int):
    return {}
";
        let model = surfaced(&[("api.py", Lang::Python, src)]);
        assert_eq!(model.endpoints.len(), 1);
        let ep = &model.endpoints[0];
        assert_eq!(ep.method, HttpMethod::Get);
        assert_eq!(ep.path, "/users/{user_id}");
        assert_eq!(ep.framework, "FastAPI");
        assert_eq!(model.symbol(ep.symbol).name, "read_user");
    }

    #[test]
    fn test_flask_route_methods_narrowing() {
        let src = "\
from flask import Flask

app = Flask(__name__)

@app.route(\"/submit\", methods=[\"POST\"])
def submit():
    return \"\"

@app.route(\"/health\")
def health():
    return \"ok\"
";
        let model = surfaced(&[("srv.py", Lang::Python, src)]);
        let submit = model
            .endpoints
            .iter()
            .find(|e| e.path == "/submit")
            .unwrap();
        assert_eq!(submit.method, HttpMethod::Post);
        let health = model
            .endpoints
            .iter()
            .find(|e| e.path == "/health")
            .unwrap();
        assert_eq!(health.method, HttpMethod::Any);
    }

    #[test]
    fn test_actix_attribute_endpoint() {
        let src = "\
use actix_web::get;

#[get(\"/items/{id}\")]
async fn item(path: u32) {}
";
        let model = surfaced(&[("src/routes.rs", Lang::Rust, src)]);
        assert_eq!(model.endpoints.len(), 1);
        assert_eq!(model.endpoints[0].method, HttpMethod::Get);
        assert_eq!(model.endpoints[0].path, "/items/{id}");
        assert_eq!(model.endpoints[0].framework, "Actix");
    }

    #[test]
    fn test_express_registration_endpoint() {
        let src = "\
const express = require('express');
const app = express();

function listUsers(req, res) {}
app.get('/users', listUsers);
";
        let model = surfaced(&[("server.js", Lang::JavaScript, src)]);
        assert_eq!(model.endpoints.len(), 1);
        let ep = &model.endpoints[0];
        assert_eq!(ep.method, HttpMethod::Get);
        assert_eq!(ep.path, "/users");
        assert_eq!(ep.framework, "Express");
    }

    #[test]
    fn test_non_route_decorator_ignored() {
        let src = "\
@staticmethod
def helper():
    pass
";
        let model = surfaced(&[("u.py", Lang::Python, src)]);
        assert!(model.endpoints.is_empty());
    }
}
