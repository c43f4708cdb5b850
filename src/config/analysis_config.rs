//! Analysis Configuration - ORC constants, export targets and method defaults
//!
//! The ORC numerator terms used to be literals baked into the chart code.
//! They now live here, together with which reserve figure each ORC call site
//! (chart display vs summary export) should use.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::types::MethodSelection;

/// Environment variable pointing at a config file.
pub const CONFIG_ENV_VAR: &str = "ORC_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "orc_config.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for an analysis run.
///
/// Load with `AnalysisConfig::load()` which searches:
/// 1. `$ORC_CONFIG` env var
/// 2. `./orc_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// ORC numerator constants and reserve sourcing
    #[serde(default)]
    pub orc: OrcConfig,

    /// Output workbook settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Initial enabled-method flags
    #[serde(default)]
    pub methods: MethodSelection,
}

impl AnalysisConfig {
    /// Load configuration using the standard search order, falling back to
    /// defaults when a candidate file is missing or invalid.
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded analysis config from {}", CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV_VAR);
            }
        }

        // 2. Check ./orc_config.toml
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded analysis config from ./{}", LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        // 3. Defaults
        info!("No {} found, using built-in defaults", LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, err) => ConfigError::Parse(path.to_path_buf(), err),
            other => other,
        })
    }

    /// Parse and validate a TOML document. Unknown keys only warn.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        // Two-pass: check for unknown keys first (warnings only)
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        for w in super::validation::validate_consistency(&config) {
            warn!("{}", w);
        }
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Reject values that cannot produce a meaningful ORC or workbook.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        Self::check_volume(
            self.orc.cumulative_oil_production,
            "orc.cumulative_oil_production",
            &mut errors,
        );
        Self::check_volume(
            self.orc.remaining_oil_reserves,
            "orc.remaining_oil_reserves",
            &mut errors,
        );
        Self::check_workbook_name(&self.export.results_file, "export.results_file", &mut errors);
        Self::check_workbook_name(&self.export.summary_file, "export.summary_file", &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_volume(value: f64, name: &str, errors: &mut Vec<String>) {
        if !value.is_finite() || value < 0.0 {
            errors.push(format!("{name} = {value} must be a finite, non-negative volume"));
        }
    }

    fn check_workbook_name(name: &str, field: &str, errors: &mut Vec<String>) {
        let lower = name.trim().to_lowercase();
        if lower.is_empty() || !lower.ends_with(".xlsx") || lower == ".xlsx" {
            errors.push(format!("{field} = '{name}' must be a .xlsx file name"));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(#[source] toml::ser::Error),

    #[error("Config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ============================================================================
// ORC
// ============================================================================

/// Which remaining-reserve figure an ORC call site puts in the numerator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReserveSource {
    /// The configured `orc.remaining_oil_reserves` constant
    #[default]
    Fixed,
    /// The cross-method average of the current run (fixed value when none)
    Average,
}

/// ORC numerator inputs that do not come from the imported sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrcConfig {
    /// Накопленные добыча нефть
    #[serde(default = "default_cumulative_oil_production")]
    pub cumulative_oil_production: f64,

    /// V остаточные used when a call site is on `ReserveSource::Fixed`
    #[serde(default = "default_remaining_oil_reserves")]
    pub remaining_oil_reserves: f64,

    /// Reserve figure behind the displayed ORC
    #[serde(default)]
    pub display_reserve_source: ReserveSource,

    /// Reserve figure behind the ORC written to the summary workbook
    #[serde(default)]
    pub export_reserve_source: ReserveSource,
}

fn default_cumulative_oil_production() -> f64 {
    46_564_979.630
}
fn default_remaining_oil_reserves() -> f64 {
    11_166_666.667
}

impl Default for OrcConfig {
    fn default() -> Self {
        Self {
            cumulative_oil_production: default_cumulative_oil_production(),
            remaining_oil_reserves: default_remaining_oil_reserves(),
            display_reserve_source: ReserveSource::Fixed,
            export_reserve_source: ReserveSource::Fixed,
        }
    }
}

// ============================================================================
// Export
// ============================================================================

/// Output workbook names and optional sheets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Raw data + per-method sheets
    #[serde(default = "default_results_file")]
    pub results_file: String,

    /// ORC summary
    #[serde(default = "default_summary_file")]
    pub summary_file: String,

    /// Also write the per-method chart table into the summary workbook
    #[serde(default)]
    pub include_method_results_sheet: bool,
}

fn default_results_file() -> String {
    "calculation_results.xlsx".to_string()
}
fn default_summary_file() -> String {
    "chart_results.xlsx".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            results_file: default_results_file(),
            summary_file: default_summary_file(),
            include_method_results_sheet: false,
        }
    }
}
