//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Selects the chain descriptor entry by network name.
pub const CHAIN_ENV_VAR: &str = "EDUSEAL_CHAIN";
pub const PROOF_APP_ID_ENV_VAR: &str = "EDUSEAL_PROOF_APP_ID";
pub const PROOF_APP_SECRET_ENV_VAR: &str = "EDUSEAL_PROOF_APP_SECRET";
pub const PROOF_PROVIDER_ID_ENV_VAR: &str = "EDUSEAL_PROOF_PROVIDER_ID";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load a TOML file, apply environment overrides, validate.
///
/// A missing file is not an error: defaults plus environment are used.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let mut config = if path.exists() {
        let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
        toml::from_str(&content).map_err(ConfigError::Parse)?
    } else {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        AppConfig::default()
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay values from `lookup` (normally the process environment).
///
/// Empty values are ignored so an exported-but-blank variable does not
/// shadow the file.
pub fn apply_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(network) = get(CHAIN_ENV_VAR) {
        config.chain.network = network;
    }
    if let Some(app_id) = get(PROOF_APP_ID_ENV_VAR) {
        config.proof.app_id = Some(app_id);
    }
    if let Some(secret) = get(PROOF_APP_SECRET_ENV_VAR) {
        config.proof.app_secret = Some(secret);
    }
    if let Some(provider) = get(PROOF_PROVIDER_ID_ENV_VAR) {
        config.proof.provider_id = Some(provider);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = AppConfig::default();
        config.proof.app_id = Some("from-file".into());

        let env: HashMap<&str, &str> = [
            (CHAIN_ENV_VAR, "polygon_amoy"),
            (PROOF_APP_ID_ENV_VAR, "from-env"),
            (PROOF_PROVIDER_ID_ENV_VAR, ""),
        ]
        .into_iter()
        .collect();

        apply_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.chain.network, "polygon_amoy");
        assert_eq!(config.proof.app_id.as_deref(), Some("from-env"));
        assert!(config.proof.provider_id.is_none());
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let path = std::env::temp_dir().join("eduseal_invalid_config.toml");
        fs::write(&path, "[rpc]\nrpc_timeout_secs = 0\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("rpc.rpc_timeout_secs"));

        fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let path = std::env::temp_dir().join("eduseal_broken_config.toml");
        fs::write(&path, "[chain\nnetwork = ").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        fs::remove_file(&path).unwrap_or_default();
    }
}
