//! Runtime configuration loaded from `callinfo.toml`
//!
//! ```toml
//! [engine]
//! max_prototype_depth = 1024
//! implicit_receiver = "global"
//! host_interop = true
//! ```

use std::path::Path;

use callinfo_engine::EngineOptions;
use serde::Deserialize;

use crate::error::RuntimeError;

/// Configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "callinfo.toml";

/// Options for creating a `Runtime`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeOptions {
    /// Realm options
    pub engine: EngineOptions,
}

impl RuntimeOptions {
    /// Parse options from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, RuntimeError> {
        Ok(toml::from_str(content)?)
    }

    /// Load options from an explicit file. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self, RuntimeError> {
        if !path.exists() {
            return Err(RuntimeError::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let options = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(options)
    }

    /// Load `callinfo.toml` from `dir`, falling back to defaults when absent
    pub fn discover(dir: &Path) -> Result<Self, RuntimeError> {
        let path = dir.join(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            tracing::debug!(dir = %dir.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load `callinfo.toml` from the working directory, or defaults
    pub fn load_default() -> Result<Self, RuntimeError> {
        Self::discover(&std::env::current_dir()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callinfo_engine::ImplicitReceiver;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(
            RuntimeOptions::from_toml_str("").unwrap(),
            RuntimeOptions::default()
        );
    }

    #[test]
    fn test_partial_engine_table() {
        let options = RuntimeOptions::from_toml_str(
            r#"
            [engine]
            implicit_receiver = "undefined"
            host_interop = true
            "#,
        )
        .unwrap();
        assert_eq!(options.engine.implicit_receiver, ImplicitReceiver::Undefined);
        assert!(options.engine.host_interop);
        assert_eq!(options.engine.max_prototype_depth, 1024);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = RuntimeOptions::from_toml_str("[engine]\nmax_depth = 3\n").unwrap_err();
        assert!(matches!(err, RuntimeError::Config(_)));
    }
}
