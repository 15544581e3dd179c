//! Configuration management for `BreathePrint`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::BreathePrintError;
use crate::air_quality::composer::{DEFAULT_CONFIDENCE, DEFAULT_DATA_SOURCE};
use crate::air_quality::estimator::DEFAULT_JITTER_AMPLITUDE;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreathePrintConfig {
    /// Concentration estimator settings
    #[serde(default)]
    pub estimator: EstimatorConfig,
    /// Reading composition settings
    #[serde(default)]
    pub composer: ComposerConfig,
    /// Witness report storage
    #[serde(default)]
    pub reports: ReportsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Estimator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Full width of the uniform jitter added to each pollutant
    #[serde(default = "default_jitter_amplitude")]
    pub jitter_amplitude: f64,
    /// Confidence reported on estimated readings
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Data source label reported on estimated readings
    #[serde(default = "default_data_source")]
    pub data_source: String,
}

/// Composer settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComposerConfig {
    /// Let SO₂ and CO contribute to the overall AQI
    #[serde(default)]
    pub index_so2_co: bool,
}

/// Witness report storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Report store directory
    #[serde(default = "default_reports_location")]
    pub location: String,
    /// Default radius for nearby report searches
    #[serde(default = "default_search_radius")]
    pub search_radius_km: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_jitter_amplitude() -> f64 {
    DEFAULT_JITTER_AMPLITUDE
}

fn default_confidence() -> f64 {
    DEFAULT_CONFIDENCE
}

fn default_data_source() -> String {
    DEFAULT_DATA_SOURCE.to_string()
}

fn default_reports_location() -> String {
    dirs::data_dir()
        .map(|dir| dir.join("breatheprint").join("reports"))
        .unwrap_or_else(|| PathBuf::from("breatheprint-reports"))
        .to_string_lossy()
        .into_owned()
}

fn default_search_radius() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            jitter_amplitude: default_jitter_amplitude(),
            confidence: default_confidence(),
            data_source: default_data_source(),
        }
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            location: default_reports_location(),
            search_radius_km: default_search_radius(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for BreathePrintConfig {
    fn default() -> Self {
        Self {
            estimator: EstimatorConfig::default(),
            composer: ComposerConfig::default(),
            reports: ReportsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl BreathePrintConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. BREATHEPRINT_ESTIMATOR__JITTER_AMPLITUDE
        builder = builder.add_source(
            Environment::with_prefix("BREATHEPRINT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: BreathePrintConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("breatheprint").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.estimator.data_source.is_empty() {
            self.estimator.data_source = default_data_source();
        }
        if self.reports.location.is_empty() {
            self.reports.location = default_reports_location();
        }
        if self.reports.search_radius_km == 0 {
            self.reports.search_radius_km = default_search_radius();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        let jitter = self.estimator.jitter_amplitude;
        if !(0.0..=50.0).contains(&jitter) {
            return Err(BreathePrintError::config(format!(
                "Estimator jitter_amplitude must be between 0 and 50, got {jitter}"
            ))
            .into());
        }

        let confidence = self.estimator.confidence;
        if !(0.0..=1.0).contains(&confidence) {
            return Err(BreathePrintError::config(format!(
                "Estimator confidence must be between 0 and 1, got {confidence}"
            ))
            .into());
        }

        if self.reports.search_radius_km > 100 {
            return Err(BreathePrintError::config(
                "Report search_radius_km cannot exceed 100 km",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(BreathePrintError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(BreathePrintError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if self.estimator.data_source.trim().is_empty() {
            return Err(BreathePrintError::config("Estimator data_source cannot be empty").into());
        }

        Ok(())
    }
}
