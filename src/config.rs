use std::path::Path;

use serde::Deserialize;

use crate::graph::metrics::ComplexityWeights;

/// Configuration loaded from `code-atlas.toml` at the project root.
#[derive(Debug, Deserialize, Default)]
pub struct AtlasConfig {
    /// Additional path patterns to exclude from analysis (beyond .gitignore
    /// and the built-in exclusions).
    pub exclude: Option<Vec<String>>,
    /// Restrict analysis to these languages (names or extensions).
    pub languages: Option<Vec<String>>,
    /// Complexity weight overrides.
    pub weights: Option<ComplexityWeights>,
}

impl AtlasConfig {
    /// Load configuration from `code-atlas.toml` in the given root directory.
    ///
    /// Returns a default (empty) configuration if the file does not exist or
    /// cannot be parsed.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join("code-atlas.toml");

        if !config_path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => config,
                Err(err) => {
                    eprintln!("warning: failed to parse code-atlas.toml: {err}. Using defaults.");
                    Self::default()
                }
            },
            Err(err) => {
                eprintln!("warning: failed to read code-atlas.toml: {err}. Using defaults.");
                Self::default()
            }
        }
    }

    /// Effective complexity weights. Overrides with a non-positive weight
    /// are rejected with a warning, keeping the score monotonic.
    pub fn effective_weights(&self) -> ComplexityWeights {
        match self.weights {
            Some(w) if w.validate() => w,
            Some(_) => {
                eprintln!("warning: complexity weights must be positive. Using defaults.");
                ComplexityWeights::default()
            }
            None => ComplexityWeights::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_default() {
        let dir = TempDir::new().unwrap();
        let config = AtlasConfig::load(dir.path());
        assert!(config.exclude.is_none());
        assert_eq!(config.effective_weights().symbols, 2);
    }

    #[test]
    fn test_load_with_weights() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("code-atlas.toml"),
            "exclude = [\"generated\"]\n\n[weights]\nsymbols = 1\nnesting = 5\nfan_out = 2\n",
        )
        .unwrap();
        let config = AtlasConfig::load(dir.path());
        assert_eq!(config.exclude.as_deref(), Some(&["generated".to_string()][..]));
        let w = config.effective_weights();
        assert_eq!((w.symbols, w.nesting, w.fan_out), (1, 5, 2));
    }

    #[test]
    fn test_zero_weight_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("code-atlas.toml"),
            "[weights]\nsymbols = 0\nnesting = 3\nfan_out = 1\n",
        )
        .unwrap();
        let config = AtlasConfig::load(dir.path());
        assert_eq!(config.effective_weights().symbols, 2);
    }

    #[test]
    fn test_malformed_config_is_default() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("code-atlas.toml"), "exclude = 5\n").unwrap();
        let config = AtlasConfig::load(dir.path());
        assert!(config.exclude.is_none());
    }
}
