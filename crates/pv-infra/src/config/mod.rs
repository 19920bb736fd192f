use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Shape of the delay curve between retry attempts.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    Constant,
    Linear,
    Exponential,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub backoff: BackoffKind,
    pub backoff_base_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub blob_root: PathBuf,
    pub retry: RetryConfig,
}

impl AppConfig {
    /// Load configuration from defaults, an optional file and
    /// `PLOTVAULT_*` environment overrides, in that order.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("database_url", "plotvault.db")?
            .set_default("blob_root", "plotvault-blobs")?
            .set_default("retry.max_attempts", 3_i64)?
            .set_default("retry.backoff", "linear")?
            .set_default("retry.backoff_base_ms", 200_i64)?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name("plotvault").required(false)),
        };
        builder = builder.add_source(Environment::with_prefix("PLOTVAULT").separator("__"));

        builder
            .build()?
            .try_deserialize()
            .context("invalid configuration")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn loads_defaults_from_an_empty_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("plotvault.toml");
        // File::from with an absent path errors, so point at a real but empty file.
        std::fs::File::create(&missing).expect("create file");

        let cfg = AppConfig::load(Some(&missing)).expect("load");
        assert_eq!(cfg.database_url, "plotvault.db");
        assert_eq!(cfg.retry.max_attempts, 3);
        assert_eq!(cfg.retry.backoff, BackoffKind::Linear);
        assert_eq!(cfg.retry.backoff_base_ms, 200);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("plotvault.toml");
        let mut file = std::fs::File::create(&path).expect("create file");
        writeln!(
            file,
            "database_url = \"archive.db\"\n\n[retry]\nmax_attempts = 5\nbackoff = \"exponential\"\nbackoff_base_ms = 50"
        )
        .expect("write config");

        let cfg = AppConfig::load(Some(&path)).expect("load");
        assert_eq!(cfg.database_url, "archive.db");
        assert_eq!(cfg.retry.max_attempts, 5);
        assert_eq!(cfg.retry.backoff, BackoffKind::Exponential);
        assert_eq!(cfg.retry.backoff_base_ms, 50);
    }
}
