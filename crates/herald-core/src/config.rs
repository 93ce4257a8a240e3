//! DispatchConfig - 配信設定
//!
//! JSON で、全フィールド省略可:
//!
//! ```json
//! {
//!   "pacing": { "interval_ms": 50, "batch_size": 150, "cool_down_ms": 3000 },
//!   "classification": { "permanent_codes": [403] }
//! }
//! ```
//!
//! `DispatchConfig::load()` は `HERALD_CONFIG` が指すファイルを読む。
//! 未設定ならデフォルト値。

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::PacingPolicy;
use crate::impls::FailureClassifier;

pub const CONFIG_ENV: &str = "HERALD_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    pub pacing: PacingConfig,
    pub classification: ClassificationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PacingConfig {
    pub interval_ms: u64,
    pub batch_size: usize,
    pub cool_down_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        let p = PacingPolicy::default();
        Self {
            interval_ms: p.interval.as_millis() as u64,
            batch_size: p.batch_size,
            cool_down_ms: p.cool_down.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassificationConfig {
    /// recipient に恒久的に届かないことを意味するステータスコード
    pub permanent_codes: Vec<u16>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            permanent_codes: vec![403],
        }
    }
}

impl DispatchConfig {
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// `$HERALD_CONFIG` があればそれ、なければデフォルト
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pacing.batch_size == 0 {
            return Err(ConfigError::Invalid("pacing.batch_size must be at least 1".into()));
        }
        if self.classification.permanent_codes.iter().any(|c| !(100..=599).contains(c)) {
            return Err(ConfigError::Invalid(
                "classification.permanent_codes must be status codes (100-599)".into(),
            ));
        }
        Ok(())
    }

    pub fn pacing_policy(&self) -> PacingPolicy {
        PacingPolicy {
            interval: Duration::from_millis(self.pacing.interval_ms),
            batch_size: self.pacing.batch_size,
            cool_down: Duration::from_millis(self.pacing.cool_down_ms),
        }
    }

    pub fn classifier(&self) -> FailureClassifier {
        FailureClassifier::new(self.classification.permanent_codes.iter().copied())
    }
}
