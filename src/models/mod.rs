//! Data models for BreathePrint
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates
//! - Air quality: Pollutant readings and the composite AQI reading
//! - Report: Witness reports persisted by the report store

pub mod air_quality;
pub mod location;
pub mod report;

// Re-export all public types for convenient access
pub use air_quality::{
    AirQualityReading, AqiCategory, AreaType, Conditions, Country, Pollutant, PollutantLevel,
    PollutantReading, Season, TimeOfDay, Traffic,
};
pub use location::Coordinate;
pub use report::{NewWitnessReport, WitnessReport};
