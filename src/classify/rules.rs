//! Declarative detection rules. Adding a framework means adding a row.

use crate::model::Role;

/// One framework detection rule. A file matches when any import specifier
/// starts with one of the prefixes, any decorator contains one of the
/// decorator markers, or the raw source contains one of the source
/// patterns. Which signal classes fired determines confidence.
pub struct FrameworkRule {
    pub framework: &'static str,
    /// Matched against import specifiers by prefix (`import fastapi`,
    /// `from fastapi import`, `require('express')`).
    pub import_prefixes: &'static [&'static str],
    /// Matched against decorator/attribute text by substring.
    pub decorator_markers: &'static [&'static str],
    /// Matched against raw source text by substring.
    pub source_patterns: &'static [&'static str],
}

pub const FRAMEWORK_RULES: &[FrameworkRule] = &[
    FrameworkRule {
        framework: "FastAPI",
        import_prefixes: &["fastapi"],
        decorator_markers: &["@app.get", "@app.post", "@app.put", "@app.delete", "@router."],
        source_patterns: &["FastAPI("],
    },
    FrameworkRule {
        framework: "Flask",
        import_prefixes: &["flask"],
        decorator_markers: &["@app.route", "@blueprint.route", "@bp.route"],
        source_patterns: &["Flask(__name__"],
    },
    FrameworkRule {
        framework: "Django",
        import_prefixes: &["django"],
        decorator_markers: &[],
        source_patterns: &["DJANGO_SETTINGS_MODULE", "urlpatterns"],
    },
    FrameworkRule {
        framework: "Express",
        import_prefixes: &["express"],
        decorator_markers: &[],
        source_patterns: &["express()"],
    },
    FrameworkRule {
        framework: "NestJS",
        import_prefixes: &["@nestjs/"],
        decorator_markers: &["@Controller", "@Injectable", "@Module", "@Get(", "@Post(", "@Put(", "@Delete("],
        source_patterns: &[],
    },
    FrameworkRule {
        framework: "React",
        import_prefixes: &["react"],
        decorator_markers: &[],
        source_patterns: &["useState(", "useEffect("],
    },
    FrameworkRule {
        framework: "Next.js",
        import_prefixes: &["next/", "next"],
        decorator_markers: &[],
        source_patterns: &["getServerSideProps", "getStaticProps"],
    },
    FrameworkRule {
        framework: "Actix",
        import_prefixes: &["actix_web"],
        decorator_markers: &["#[get(", "#[post(", "#[put(", "#[delete("],
        source_patterns: &["HttpServer::new"],
    },
    FrameworkRule {
        framework: "Rocket",
        import_prefixes: &["rocket"],
        decorator_markers: &["#[rocket::", "#[launch"],
        source_patterns: &["rocket::build"],
    },
    FrameworkRule {
        framework: "Axum",
        import_prefixes: &["axum"],
        decorator_markers: &[],
        source_patterns: &["Router::new"],
    },
];

/// Command-line tooling counts as a framework signal for project typing
/// even though it carries no routes.
pub const CLI_RULE: FrameworkRule = FrameworkRule {
    framework: "CLI",
    import_prefixes: &["argparse", "click", "clap", "commander", "yargs"],
    decorator_markers: &["@click.command", "@click.group"],
    source_patterns: &["ArgumentParser(", "Parser::parse"],
};

/// File-name driven role rules, matched against the final path component.
pub struct RoleRule {
    pub role: Role,
    /// Exact file names.
    pub names: &'static [&'static str],
    /// Name prefixes and suffixes.
    pub prefixes: &'static [&'static str],
    pub suffixes: &'static [&'static str],
    /// Any-ancestor directory names.
    pub dirs: &'static [&'static str],
}

pub const ROLE_RULES: &[RoleRule] = &[
    RoleRule {
        role: Role::EntryPoint,
        names: &[
            "main.py", "main.rs", "main.go", "main.ts", "main.js", "index.ts", "index.js",
            "app.py", "manage.py", "server.js", "server.ts",
        ],
        prefixes: &[],
        suffixes: &[],
        dirs: &[],
    },
    RoleRule {
        role: Role::Configuration,
        names: &["settings.py", "config.py", "config.ts", "config.js", "conf.py"],
        prefixes: &[],
        suffixes: &[".config.js", ".config.ts", ".config.mjs"],
        dirs: &[],
    },
    RoleRule {
        role: Role::Test,
        names: &["conftest.py"],
        prefixes: &["test_"],
        suffixes: &["_test.py", "_test.go", "_test.rs", ".test.ts", ".test.tsx", ".test.js", ".spec.ts", ".spec.js"],
        dirs: &["tests", "__tests__", "test"],
    },
];

/// Source markers that make a file an entry point regardless of its name.
pub const ENTRY_SOURCE_MARKERS: &[&str] = &[
    "if __name__ == \"__main__\"",
    "if __name__ == '__main__'",
    "fn main(",
    "func main(",
    ".listen(",
    "app.run(",
];
