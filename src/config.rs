//! Server configuration module.
//!
//! Handles loading, validating, and overriding `config.toml`. Every key is
//! optional; the stock defaults serve the current directory as the share.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! root = "."                # Mount point of the share; logical paths resolve beneath it
//! default_folder = ""       # Folder used when a listing names none ("" = share root)
//!
//! [images]
//! quality = 75              # JPEG output quality (1-100)
//! fast_decode = true        # Draft-scale large sources before the final resample
//!
//! [random]
//! default_count = 1         # Images drawn when no count is given
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Environment
//!
//! Two variables from the container deployment override the file:
//!
//! | Variable | Overrides |
//! |---|---|
//! | `NAS_MOUNT_PATH` | `root` |
//! | `NAS_PATH` | `default_folder` |
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{DecodeMode, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding [`ServerConfig::root`].
pub const ENV_ROOT: &str = "NAS_MOUNT_PATH";
/// Environment variable overriding [`ServerConfig::default_folder`].
pub const ENV_DEFAULT_FOLDER: &str = "NAS_PATH";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Server configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Mount point of the shared tree.
    pub root: PathBuf,
    /// Logical folder used when a call names none.
    pub default_folder: String,
    /// Output encoding and decode speed.
    pub images: ImagesConfig,
    /// Random selection settings.
    pub random: RandomConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            default_folder: String::new(),
            images: ImagesConfig::default(),
            random: RandomConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.images.quality) {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if self.random.default_count == 0 {
            return Err(ConfigError::Validation(
                "random.default_count must be at least 1".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        if self.root.as_os_str().is_empty() {
            return Err(ConfigError::Validation("root must not be empty".into()));
        }
        Ok(())
    }

    /// Apply environment overrides through `lookup`.
    ///
    /// Empty values are ignored, matching how the deployment leaves unset
    /// variables as empty strings.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let set = |key| lookup(key).filter(|v| !v.is_empty());
        if let Some(root) = set(ENV_ROOT) {
            self.root = PathBuf::from(root);
        }
        if let Some(folder) = set(ENV_DEFAULT_FOLDER) {
            self.default_folder = folder;
        }
    }

    pub fn quality(&self) -> Quality {
        Quality::new(self.images.quality)
    }

    pub fn decode_mode(&self) -> DecodeMode {
        if self.images.fast_decode {
            DecodeMode::Fast
        } else {
            DecodeMode::Exact
        }
    }
}

/// Output image settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
    /// Trade a little quality for speed on large downscales.
    pub fast_decode: bool,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            quality: 75,
            fast_decode: true,
        }
    }
}

/// Random selection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RandomConfig {
    /// Number of images drawn when a request gives no count.
    pub default_count: usize,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self { default_count: 1 }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Parse and validate a config from TOML text.
pub fn parse_config(content: &str) -> Result<ServerConfig, ConfigError> {
    let config: ServerConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration: the file at `path` (or stock defaults when `None`),
/// then the process environment on top.
pub fn load_config(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    let mut config = match path {
        Some(path) => toml::from_str(&fs::read_to_string(path)?)?,
        None => ServerConfig::default(),
    };
    config.apply_env(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# LAN File Distributor Configuration
# ==================================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.
#
# Environment overrides:
#   NAS_MOUNT_PATH -> root
#   NAS_PATH       -> default_folder

# Mount point of the shared tree. Every client path resolves beneath it;
# paths that climb out of it are refused.
root = "."

# Folder listed or sampled when a request names none ("" = share root).
default_folder = ""

# ---------------------------------------------------------------------------
# Output images
# ---------------------------------------------------------------------------
[images]
# JPEG encoding quality (1 = worst, 100 = best).
quality = 75

# When both width and height are requested, shrink large sources with a
# cheap filter to twice the target before the final Lanczos pass.
fast_decode = true

# ---------------------------------------------------------------------------
# Random selection
# ---------------------------------------------------------------------------
[random]
# Images drawn when a request gives no count.
default_count = 1

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
