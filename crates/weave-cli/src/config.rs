//! Configuration loading.

use crate::cli::Args;
use camino::{Utf8Path, Utf8PathBuf};
use miette::Diagnostic;
use thiserror::Error;
use weave_compiler::CompilerOptions;

/// Name of the configuration file looked up next to templates.
pub const CONFIG_FILE: &str = "weave.json";

/// Errors from loading configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    #[diagnostic(code(weave::config::read))]
    Read {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    #[diagnostic(code(weave::config::parse))]
    Parse {
        path: Utf8PathBuf,
        source: serde_json::Error,
    },

    #[error("The bind symbol must not be empty")]
    #[diagnostic(
        code(weave::config::bind_symbol),
        help("use a marker such as `:` so directive attributes can be told apart")
    )]
    EmptyBindSymbol,
}

/// Resolved configuration for one run.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// The weave.json that was loaded, if any.
    pub path: Option<Utf8PathBuf>,
    /// Options handed to the compiler.
    pub options: CompilerOptions,
}

impl Config {
    /// Load configuration for a template directory, then apply CLI overrides.
    pub fn load(template_dir: &Utf8Path, args: &Args) -> Result<Self, ConfigError> {
        let path = args.config.clone().or_else(|| Self::find(template_dir));

        let mut options = match &path {
            Some(path) => {
                tracing::debug!(path = %path, "loading configuration");
                Self::read_options(path)?
            }
            None => CompilerOptions::default(),
        };

        if let Some(bind) = &args.bind {
            options.bind_symbol = bind.as_str().into();
        }
        if !args.priority.is_empty() {
            options.priority = args.priority.iter().map(|name| name.trim().into()).collect();
        }
        if options.bind_symbol.is_empty() {
            return Err(ConfigError::EmptyBindSymbol);
        }

        Ok(Self { path, options })
    }

    /// Find weave.json in a directory or its parents.
    pub fn find(dir: &Utf8Path) -> Option<Utf8PathBuf> {
        let mut current = dir;
        loop {
            let candidate = current.join(CONFIG_FILE);
            if candidate.is_file() {
                return Some(candidate);
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }

    fn read_options(path: &Utf8Path) -> Result<CompilerOptions, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn temp_dir() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, root)
    }

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["weave", "page.html"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_find_in_parent() {
        let (_dir, root) = temp_dir();
        let nested = root.join("views").join("partials");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.join(CONFIG_FILE), "{}").unwrap();

        let found = Config::find(&nested).unwrap();
        assert_eq!(found, root.join(CONFIG_FILE));
        assert_eq!(Config::find(&root), Some(root.join(CONFIG_FILE)));
    }

    #[test]
    fn test_load_defaults_without_file() {
        let (_dir, root) = temp_dir();
        let config = Config::load(&root, &args(&[])).unwrap();
        // A weave.json further up the real filesystem would be picked up too.
        if config.path.is_none() {
            assert_eq!(config.options, CompilerOptions::default());
        }
    }

    #[test]
    fn test_load_file_and_overrides() {
        let (_dir, root) = temp_dir();
        fs::write(
            root.join(CONFIG_FILE),
            r#"{ "bindSymbol": "x-", "priority": ["each"] }"#,
        )
        .unwrap();

        let config = Config::load(&root, &args(&[])).unwrap();
        assert_eq!(config.options.bind_symbol, "x-");
        assert_eq!(config.options.priority, vec!["each"]);
        assert!(config.path.is_some());

        let config = Config::load(&root, &args(&["--bind", "w-"])).unwrap();
        assert_eq!(config.options.bind_symbol, "w-");
        assert_eq!(config.options.priority, vec!["each"]);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let (_dir, root) = temp_dir();
        let path = root.join("custom.json");
        fs::write(&path, r#"{ "bindSymbol": "@" }"#).unwrap();

        let config = Config::load(&root, &args(&["--config", path.as_str()])).unwrap();
        assert_eq!(config.path.as_ref(), Some(&path));
        assert_eq!(config.options.bind_symbol, "@");
        assert_eq!(config.options.priority, vec!["forin", "each"]);
    }

    #[test]
    fn test_invalid_file() {
        let (_dir, root) = temp_dir();
        fs::write(root.join(CONFIG_FILE), "{ bindSymbol: }").unwrap();

        match Config::load(&root, &args(&[])) {
            Err(ConfigError::Parse { path, .. }) => assert!(path.ends_with(CONFIG_FILE)),
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_bind_symbol_rejected() {
        let (_dir, root) = temp_dir();
        fs::write(root.join(CONFIG_FILE), "{}").unwrap();

        let result = Config::load(&root, &args(&["--bind", ""]));
        assert!(matches!(result, Err(ConfigError::EmptyBindSymbol)));
    }
}
