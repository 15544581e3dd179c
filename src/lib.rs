//! `BreathePrint` - air quality estimation for witness reports
//!
//! This library estimates pollutant concentrations for North American
//! locations, derives EPA-style AQI readings, and keeps the witness reports
//! those readings are attached to.

pub mod air_quality;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod report_store;

// Re-export core types for public API
pub use air_quality::{AirQualityService, Estimator, Gazetteer, ReadingComposer, RegionResolver};
pub use config::BreathePrintConfig;
pub use error::BreathePrintError;
pub use models::{AirQualityReading, AqiCategory, Coordinate, NewWitnessReport, WitnessReport};
pub use report_store::ReportStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, BreathePrintError>;
