//! Configuration for the decision service

use std::fmt;
use std::path::{Path, PathBuf};

use credit_scoring::{DecisionThresholds, ExplainPolicy};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "CREDIT_";

/// Main service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub ledger: LedgerConfig,

    #[serde(default)]
    pub audit: AuditConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Load from a TOML file, then apply `CREDIT_*` environment overrides.
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(path)?;
                Self::from_toml_str(&contents)?
            }
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: ServiceConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    ///
    /// Recognised keys: `CREDIT_LOG_LEVEL`, `CREDIT_LOG_JSON`,
    /// `CREDIT_LEDGER_PATH` (switches the ledger to JSONL at that path).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(&format!("{ENV_PREFIX}LOG_LEVEL")) {
            self.logging.level = level;
        }
        if let Some(json) = lookup(&format!("{ENV_PREFIX}LOG_JSON")) {
            self.logging.json = json.parse().map_err(|_| {
                ConfigError::Invalid(format!("{ENV_PREFIX}LOG_JSON must be true or false, got {json}"))
            })?;
        }
        if let Some(path) = lookup(&format!("{ENV_PREFIX}LEDGER_PATH")) {
            self.ledger = LedgerConfig::Jsonl {
                path: PathBuf::from(path),
            };
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.model.thresholds()?;
        self.model.explain_policy()?;
        if self.audit.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "audit.max_attempts must be at least 1".into(),
            ));
        }
        if let LedgerConfig::Jsonl { path } = &self.ledger {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("ledger.path must not be empty".into()));
            }
        }
        Ok(())
    }
}

/// Which scoring backend serves requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Local,
    Demo,
}

/// Model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub backend: BackendKind,

    #[serde(default = "default_approve_threshold")]
    pub approve_threshold: f64,

    #[serde(default = "default_review_threshold")]
    pub review_threshold: f64,

    /// Maximum reason codes per decision
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Minimum |contribution| for a reason code
    #[serde(default = "default_materiality")]
    pub materiality: f64,

    /// Seed for the demo backend
    #[serde(default = "default_demo_seed")]
    pub demo_seed: u64,
}

impl ModelConfig {
    pub fn thresholds(&self) -> Result<DecisionThresholds, ConfigError> {
        DecisionThresholds::new(self.approve_threshold, self.review_threshold)
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn explain_policy(&self) -> Result<ExplainPolicy, ConfigError> {
        if !self.materiality.is_finite() || self.materiality < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "model.materiality must be a non-negative number, got {}",
                self.materiality
            )));
        }
        Ok(ExplainPolicy {
            top_k: self.top_k,
            materiality: self.materiality,
        })
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Local,
            approve_threshold: default_approve_threshold(),
            review_threshold: default_review_threshold(),
            top_k: default_top_k(),
            materiality: default_materiality(),
            demo_seed: default_demo_seed(),
        }
    }
}

/// Audit ledger backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LedgerConfig {
    /// In-memory ledger (for development/testing)
    #[default]
    Memory,

    /// Append-only JSON Lines file
    Jsonl { path: PathBuf },
}

/// Audit behaviour
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Append attempts before a fault is escalated
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Secret for keyed applicant hashing
    #[serde(default)]
    pub applicant_hash_key: Option<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            applicant_hash_key: None,
        }
    }
}

impl fmt::Debug for AuditConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditConfig")
            .field("max_attempts", &self.max_attempts)
            .field(
                "applicant_hash_key",
                &self.applicant_hash_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_approve_threshold() -> f64 {
    0.65
}

fn default_review_threshold() -> f64 {
    0.40
}

fn default_top_k() -> usize {
    3
}

fn default_materiality() -> f64 {
    0.10
}

fn default_demo_seed() -> u64 {
    7
}

fn default_max_attempts() -> u32 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.model.backend, BackendKind::Local);
        assert_eq!(config.model.approve_threshold, 0.65);
        assert_eq!(config.model.review_threshold, 0.40);
        assert_eq!(config.ledger, LedgerConfig::Memory);
        assert_eq!(config.audit.max_attempts, 5);
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = ServiceConfig::from_toml_str(
            r#"
            [model]
            backend = "demo"
            approve_threshold = 0.7

            [ledger]
            type = "jsonl"
            path = "/var/lib/credit/audit.jsonl"

            [audit]
            applicant_hash_key = "k"
            "#,
        )
        .unwrap();

        assert_eq!(config.model.backend, BackendKind::Demo);
        assert_eq!(config.model.approve_threshold, 0.7);
        assert_eq!(config.model.review_threshold, 0.40);
        assert_eq!(
            config.ledger,
            LedgerConfig::Jsonl {
                path: PathBuf::from("/var/lib/credit/audit.jsonl")
            }
        );
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let err = ServiceConfig::from_toml_str(
            r#"
            [model]
            approve_threshold = 0.3
            review_threshold = 0.5
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CREDIT_LOG_LEVEL", "debug"),
            ("CREDIT_LOG_JSON", "true"),
            ("CREDIT_LEDGER_PATH", "/tmp/audit.jsonl"),
        ]);
        let mut config = ServiceConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert!(matches!(config.ledger, LedgerConfig::Jsonl { .. }));

        let mut config = ServiceConfig::default();
        let bad = config.apply_overrides(|key| (key == "CREDIT_LOG_JSON").then(|| "yes".to_string()));
        assert!(bad.is_err());
    }

    #[test]
    fn test_load_missing_config() {
        let config = ServiceConfig::load(Some(Path::new("/nonexistent/credit.toml"))).unwrap();
        assert_eq!(config.model, ModelConfig::default());
    }

    #[test]
    fn test_hash_key_not_in_debug() {
        let audit = AuditConfig {
            applicant_hash_key: Some("super-secret".into()),
            ..AuditConfig::default()
        };
        assert!(!format!("{audit:?}").contains("super-secret"));
    }
}
