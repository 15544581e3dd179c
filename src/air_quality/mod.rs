//! Air quality estimation
//!
//! Resolves a coordinate to a named place, estimates pollutant
//! concentrations from regional and temporal heuristics, and composes the
//! EPA-style reading.

pub mod breakpoints;
pub mod composer;
pub mod estimator;
pub mod noise;
pub mod region;
pub mod service;

pub use breakpoints::{Breakpoint, BreakpointTable, calculate_pm25_aqi};
pub use composer::{ReadingComposer, health_message};
pub use estimator::{Estimate, Estimator, PollutantConcentrations, RegionRule, TemporalContext};
pub use noise::{FixedNoise, NoiseSource, RandomNoise};
pub use region::{Gazetteer, GazetteerEntry, RegionResolver, ResolvedRegion};
pub use service::AirQualityService;
