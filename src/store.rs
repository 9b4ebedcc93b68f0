//! Owner of the persisted threshold configuration.
//!
//! Memory is authoritative; the JSON document on disk is rewritten in full
//! after every accepted update. Writes go to a sibling temporary file that is
//! then renamed over the target, so readers never see a torn document.

use std::{
    io,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        PoisonError, RwLock,
    },
    time::Duration,
};

use serde::Deserialize;
use serde_json::Value;

use crate::{config::PersistPolicy, error::ConfigError, models::ThresholdConfig};

// ---

/// Proposed thresholds as received from a caller.
///
/// Fields are kept as raw JSON so that type errors surface as
/// [`ConfigError::InvalidInput`] rather than as a deserialization failure.
#[derive(Debug, Clone, Default)]
pub struct LimitsUpdate {
    pub min: Value,
    pub max: Value,
    pub offset: Value,
}

impl LimitsUpdate {
    /// Pick `min`, `max` and `offset` out of a request body.
    ///
    /// Only a JSON object has named fields; any other body yields nulls.
    pub fn from_json(body: &Value) -> Self {
        let field = |key: &str| {
            body.as_object()
                .and_then(|fields| fields.get(key))
                .cloned()
                .unwrap_or(Value::Null)
        };

        Self {
            min: field("min"),
            max: field("max"),
            offset: field("offset"),
        }
    }

    pub fn new(min: f64, max: f64, offset: f64) -> Self {
        Self {
            min: Value::from(min),
            max: Value::from(max),
            offset: Value::from(offset),
        }
    }

    /// Check input types, then range, then offset, in that order.
    pub fn validate(&self) -> Result<ThresholdConfig, ConfigError> {
        // ---
        let (Some(min), Some(max), Some(offset)) =
            (self.min.as_f64(), self.max.as_f64(), self.offset.as_f64())
        else {
            return Err(ConfigError::InvalidInput);
        };

        if min >= max {
            return Err(ConfigError::InvalidRange);
        }
        if !(-10.0..=10.0).contains(&offset) {
            return Err(ConfigError::InvalidOffset);
        }

        Ok(ThresholdConfig {
            min_temperature: min,
            max_temperature: max,
            temp_offset: offset,
        })
    }
}

/// Persisted document with every field optional, merged over defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredThresholds {
    min_temperature: Option<f64>,
    max_temperature: Option<f64>,
    temp_offset: Option<f64>,
}

impl StoredThresholds {
    /// Named fields of an object document. Anything else has none.
    fn parse(text: &str) -> Result<Self, serde_json::Error> {
        match serde_json::from_str::<Value>(text)? {
            doc @ Value::Object(_) => serde_json::from_value(doc),
            _ => Ok(Self::default()),
        }
    }

    fn merge_over(self, base: ThresholdConfig) -> ThresholdConfig {
        ThresholdConfig {
            min_temperature: self.min_temperature.unwrap_or(base.min_temperature),
            max_temperature: self.max_temperature.unwrap_or(base.max_temperature),
            temp_offset: self.temp_offset.unwrap_or(base.temp_offset),
        }
    }
}

/// Threshold configuration shared by all request handlers.
pub struct ConfigStore {
    path: PathBuf,
    current: RwLock<ThresholdConfig>,
    write_lock: tokio::sync::Mutex<()>,
    write_seq: AtomicU64,
    persist_timeout: Duration,
    policy: PersistPolicy,
}

impl ConfigStore {
    /// Load the document at `path`, falling back to defaults.
    ///
    /// Never fails: a missing document is expected on first boot, and an
    /// unreadable or unparseable one is logged and ignored. Stored values are
    /// trusted as-is.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        // ---
        let path = path.into();
        let defaults = ThresholdConfig::default();

        let config = match std::fs::read_to_string(&path) {
            Ok(text) => match StoredThresholds::parse(&text) {
                Ok(stored) => {
                    let merged = stored.merge_over(defaults);
                    tracing::info!(path = %path.display(), config = ?merged, "Threshold config loaded");
                    merged
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Threshold config unparseable, using defaults");
                    defaults
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No threshold config on disk, using defaults");
                defaults
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Threshold config unreadable, using defaults");
                defaults
            }
        };

        Self {
            path,
            current: RwLock::new(config),
            write_lock: tokio::sync::Mutex::new(()),
            write_seq: AtomicU64::new(0),
            persist_timeout: Duration::from_secs(5),
            policy: PersistPolicy::BestEffort,
        }
    }

    pub fn with_persist_policy(mut self, policy: PersistPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_persist_timeout(mut self, timeout: Duration) -> Self {
        self.persist_timeout = timeout;
        self
    }

    /// The configuration currently in effect.
    pub fn current(&self) -> ThresholdConfig {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validate `proposed`, make it the current config and persist it.
    ///
    /// Under [`PersistPolicy::BestEffort`] memory is replaced first and a
    /// failed write is only logged. Under [`PersistPolicy::Strict`] memory is
    /// replaced only once the write succeeded; otherwise
    /// [`ConfigError::Persistence`] is returned and the old config stays.
    pub async fn update(&self, proposed: &LimitsUpdate) -> Result<ThresholdConfig, ConfigError> {
        // ---
        let next = proposed.validate()?;

        // Serialize writers so the file always holds the last accepted config.
        let _guard = self.write_lock.lock().await;

        match self.policy {
            PersistPolicy::BestEffort => {
                self.replace(next);
                if let Err(e) = self.persist(&next).await {
                    tracing::error!(path = %self.path.display(), error = %e, "Failed to save threshold config");
                }
            }
            PersistPolicy::Strict => {
                self.persist(&next)
                    .await
                    .map_err(|e| ConfigError::Persistence(e.to_string()))?;
                self.replace(next);
            }
        }

        tracing::info!(config = ?next, "Threshold config updated");
        Ok(next)
    }

    fn replace(&self, config: ThresholdConfig) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = config;
    }

    async fn persist(&self, config: &ThresholdConfig) -> io::Result<()> {
        // ---
        let body = serde_json::to_string_pretty(config)?;
        // A timed-out write may still be running in the blocking pool, so
        // every attempt gets its own temporary file.
        let seq = self.write_seq.fetch_add(1, Ordering::Relaxed);
        let tmp = temp_path(&self.path, seq);

        let write = async {
            tokio::fs::write(&tmp, body).await?;
            tokio::fs::rename(&tmp, &self.path).await
        };

        let result = match tokio::time::timeout(self.persist_timeout, write).await {
            Ok(result) => result,
            Err(_) => Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("write did not finish within {:?}", self.persist_timeout),
            )),
        };

        if result.is_err() {
            let _ = tokio::fs::remove_file(&tmp).await;
        }
        result
    }
}

fn temp_path(path: &Path, seq: u64) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{seq}.tmp"));
    path.with_file_name(name)
}
