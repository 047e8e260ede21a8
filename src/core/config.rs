//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.storydeck/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DeckConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_story: Option<String>,
    pub collection: Option<String>,
    pub tick_ms: Option<u64>,
    pub show_actions: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub file: Option<String>,
    pub level: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_COLLECTION: &str = "Demo";
pub const DEFAULT_TICK_MS: u64 = 100;
pub const DEFAULT_LOG_FILE: &str = "storydeck.log";
pub const DEFAULT_LOG_LEVEL: &str = "debug";

/// Shortest tick the event loop accepts; anything lower busy-loops the terminal.
const MIN_TICK_MS: u64 = 10;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Story to open first. `None` opens the first registered entry.
    pub initial_story: Option<String>,
    pub collection: String,
    pub tick_ms: u64,
    pub show_actions: bool,
    pub log_file: String,
    pub log_level: String,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.storydeck/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".storydeck").join("config.toml"))
}

/// Load config from `~/.storydeck/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `DeckConfig::default()`.
pub fn load_config() -> Result<DeckConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(DeckConfig::default())
        }
    }
}

/// Load config from an explicit path, generating a default file if absent.
pub fn load_config_from(path: &Path) -> Result<DeckConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(DeckConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: DeckConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Storydeck Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_story = "counter"      # Or set STORYDECK_STORY, or pass --story
# collection = "Demo"            # Explorer collection the demo stories land in
# tick_ms = 100                  # Event loop tick (timers, intervals, ports)
# show_actions = true            # Show values sent on the "actions" port

# [logging]
# file = "storydeck.log"
# level = "debug"                # "error", "warn", "info", "debug", "trace", "off"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_story` is from the `--story` flag (None = not specified).
pub fn resolve(config: &DeckConfig, cli_story: Option<&str>) -> ResolvedConfig {
    resolve_with_env(config, cli_story, std::env::var("STORYDECK_STORY").ok())
}

fn resolve_with_env(
    config: &DeckConfig,
    cli_story: Option<&str>,
    env_story: Option<String>,
) -> ResolvedConfig {
    // Story: CLI → env → config → first entry
    let initial_story = cli_story
        .map(|s| s.to_string())
        .or(env_story)
        .or_else(|| config.general.default_story.clone());

    let tick_ms = config.general.tick_ms.unwrap_or(DEFAULT_TICK_MS);
    let tick_ms = if tick_ms < MIN_TICK_MS {
        warn!("tick_ms = {} is too low, using {}", tick_ms, MIN_TICK_MS);
        MIN_TICK_MS
    } else {
        tick_ms
    };

    ResolvedConfig {
        initial_story,
        collection: config
            .general
            .collection
            .clone()
            .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
        tick_ms,
        show_actions: config.general.show_actions.unwrap_or(true),
        log_file: config
            .logging
            .file
            .clone()
            .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
        log_level: config
            .logging
            .level
            .clone()
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
    }
}
