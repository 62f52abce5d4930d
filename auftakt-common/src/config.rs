//! Configuration loading and resolution
//!
//! Config file resolution follows this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`AUFTAKT_CONFIG`)
//! 3. Per-user TOML config file (`<config dir>/auftakt/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A missing file at the per-user location is not an error. A file named
//! explicitly (CLI or environment) must exist and parse.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "AUFTAKT_CONFIG";

/// Default spacing between card timestamps within one collection (milliseconds)
pub const DEFAULT_CARD_SPACING_MS: i64 = 100_000;

/// Upper bound for `card_spacing_ms` (one day)
pub const MAX_CARD_SPACING_MS: i64 = 86_400_000;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing level when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Tool configuration (TOML)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuftaktConfig {
    /// File extensions treated as audio takes (case-insensitive, no leading dot)
    pub audio_extensions: Vec<String>,

    /// Spacing between successive card timestamps in one collection
    pub card_spacing_ms: i64,

    /// Encoder executable used by the transcode and concatenate collaborators
    pub ffmpeg_path: String,

    /// Entry names skipped during traversal
    pub ignore_patterns: Vec<String>,

    pub logging: LoggingConfig,
}

impl Default for AuftaktConfig {
    fn default() -> Self {
        Self {
            audio_extensions: vec!["m4a".to_string()],
            card_spacing_ms: DEFAULT_CARD_SPACING_MS,
            ffmpeg_path: "ffmpeg".to_string(),
            ignore_patterns: vec![
                ".DS_Store".to_string(),
                "Thumbs.db".to_string(),
                ".git".to_string(),
                ".svn".to_string(),
            ],
            logging: LoggingConfig::default(),
        }
    }
}

impl AuftaktConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Read TOML failed ({}): {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Reject values that would break card ordering or file filtering
    pub fn validate(&self) -> Result<()> {
        if self.card_spacing_ms <= 0 || self.card_spacing_ms > MAX_CARD_SPACING_MS {
            return Err(Error::Config(format!(
                "card_spacing_ms must be in 1..={}, got {}",
                MAX_CARD_SPACING_MS, self.card_spacing_ms
            )));
        }
        if self.audio_extensions.iter().any(|e| e.trim().is_empty()) {
            return Err(Error::Config(
                "audio_extensions must not contain empty entries".to_string(),
            ));
        }
        if self.ffmpeg_path.trim().is_empty() {
            return Err(Error::Config("ffmpeg_path must not be empty".to_string()));
        }
        Ok(())
    }

    /// Whether a path carries one of the configured audio extensions
    pub fn is_audio_file(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| {
                let ext = ext.to_string_lossy();
                self.audio_extensions
                    .iter()
                    .any(|candidate| candidate.trim_start_matches('.').eq_ignore_ascii_case(&ext))
            })
            .unwrap_or(false)
    }

    /// Whether an entry name matches one of the ignore patterns
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore_patterns.iter().any(|pattern| name.contains(pattern.as_str()))
    }
}

/// Resolves which config file (if any) applies to this process
pub struct ConfigResolver {
    cli_arg: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_arg: Option<PathBuf>) -> Self {
        Self { cli_arg }
    }

    /// Resolve and load configuration
    pub fn resolve(&self) -> Result<AuftaktConfig> {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_arg {
            info!("Loading config from command line: {}", path.display());
            return AuftaktConfig::load(path);
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                let path = PathBuf::from(path);
                info!("Loading config from {}: {}", CONFIG_ENV_VAR, path.display());
                return AuftaktConfig::load(&path);
            }
        }

        // Priority 3: Per-user TOML config file
        if let Some(path) = default_config_path() {
            if path.exists() {
                info!("Loading config from {}", path.display());
                return AuftaktConfig::load(&path);
            }
            debug!("No config file at {}, using defaults", path.display());
        }

        // Priority 4: Compiled defaults
        Ok(AuftaktConfig::default())
    }
}

/// Get default configuration file path for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("auftakt").join("config.toml"))
}
