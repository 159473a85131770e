//! Configuration schema definitions.
//!
//! Every section has defaults so a minimal (or empty) TOML file is valid.
//! Secrets are never read from the file alone: `loader.rs` layers the
//! environment on top.

use serde::{Deserialize, Serialize};

/// Root configuration for the credential bridge.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Which chain descriptor to use.
    pub chain: ChainConfig,

    /// RPC behaviour (timeouts, failover, confirmations).
    pub rpc: RpcConfig,

    /// Proof session service settings and credentials.
    pub proof: ProofConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Chain selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Path to the chain metadata descriptor (JSON).
    pub metadata_path: String,

    /// Network name to select from the descriptor (e.g. "devnet", "polygon_amoy").
    pub network: String,

    /// Block explorer base URL; transactions link to `{explorer_url}/tx/{hash}`.
    pub explorer_url: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            metadata_path: "metadata.json".to_string(),
            network: "devnet".to_string(),
            explorer_url: "https://amoy.polygonscan.com".to_string(),
        }
    }
}

/// RPC client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Extra JSON-RPC endpoints tried after the descriptor's `rpc_url`.
    pub failover_urls: Vec<String>,

    /// Per-call timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Block depth required before a mint counts as confirmed.
    pub confirmation_blocks: u32,

    /// Receipt polling interval in milliseconds.
    pub receipt_poll_ms: u64,

    /// Give up waiting for a receipt after this many seconds.
    pub confirmation_timeout_secs: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            failover_urls: Vec::new(),
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            receipt_poll_ms: 2000,
            confirmation_timeout_secs: 300,
        }
    }
}

/// Proof session service configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProofConfig {
    /// Base URL of the proof session service.
    pub endpoint: String,

    pub app_id: Option<String>,
    pub app_secret: Option<String>,
    pub provider_id: Option<String>,

    /// How long the workflow waits in `Verifying` before giving up.
    pub verification_timeout_secs: u64,

    /// Session status polling backoff (base, max) in milliseconds.
    pub poll_base_ms: u64,
    pub poll_max_ms: u64,

    /// Timeout for a single HTTP call to the session service.
    pub request_timeout_secs: u64,
}

impl Default for ProofConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8787".to_string(),
            app_id: None,
            app_secret: None,
            provider_id: None,
            verification_timeout_secs: 600,
            poll_base_ms: 1000,
            poll_max_ms: 10_000,
            request_timeout_secs: 15,
        }
    }
}

impl ProofConfig {
    /// The three session credentials, or `None` if any is absent or blank.
    pub fn credentials(&self) -> Option<ProofCredentials> {
        fn present(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }

        Some(ProofCredentials {
            app_id: present(&self.app_id)?,
            app_secret: present(&self.app_secret)?,
            provider_id: present(&self.provider_id)?,
        })
    }
}

impl std::fmt::Debug for ProofConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProofConfig")
            .field("endpoint", &self.endpoint)
            .field("app_id", &self.app_id)
            .field("app_secret", &self.app_secret.as_ref().map(|_| "<redacted>"))
            .field("provider_id", &self.provider_id)
            .field("verification_timeout_secs", &self.verification_timeout_secs)
            .finish()
    }
}

/// Credentials required to open a proof session.
#[derive(Clone, PartialEq, Eq)]
pub struct ProofCredentials {
    pub app_id: String,
    pub app_secret: String,
    pub provider_id: String,
}

impl std::fmt::Debug for ProofCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProofCredentials")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .field("provider_id", &self.provider_id)
            .finish()
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    pub json_logs: bool,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Exporter bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.chain.network, "devnet");
        assert_eq!(config.rpc.rpc_timeout_secs, 10);
        assert_eq!(config.proof.verification_timeout_secs, 600);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_partial_section() {
        let config: AppConfig = toml::from_str(
            r#"
            [chain]
            network = "polygon_amoy"

            [proof]
            app_id = "app"
            "#,
        )
        .unwrap();
        assert_eq!(config.chain.network, "polygon_amoy");
        assert_eq!(config.chain.metadata_path, "metadata.json");
        assert_eq!(config.proof.app_id.as_deref(), Some("app"));
    }

    #[test]
    fn test_credentials_require_all_three() {
        let mut proof = ProofConfig {
            app_id: Some("app".into()),
            app_secret: Some("secret".into()),
            ..Default::default()
        };
        assert!(proof.credentials().is_none());

        proof.provider_id = Some("   ".into());
        assert!(proof.credentials().is_none());

        proof.provider_id = Some("provider".into());
        let creds = proof.credentials().unwrap();
        assert_eq!(creds.provider_id, "provider");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let proof = ProofConfig {
            app_secret: Some("hunter2".into()),
            ..Default::default()
        };
        assert!(!format!("{:?}", proof).contains("hunter2"));
    }
}
