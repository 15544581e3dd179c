//! Reading Composer
//!
//! Turns raw concentrations into the composite reading: per-pollutant detail,
//! the overall AQI and the region annotations.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::breakpoints::BreakpointTable;
use super::estimator::PollutantConcentrations;
use super::region::ResolvedRegion;
use crate::models::{
    AirQualityReading, AqiCategory, AreaType, Conditions, Coordinate, Pollutant, PollutantReading,
};

pub const DEFAULT_DATA_SOURCE: &str = "NASA TEMPO Satellite Network";
pub const DEFAULT_CONFIDENCE: f64 = 0.88;

/// Advisory text for an AQI.
///
/// The area type is accepted for callers that have it, but every band has a
/// single advisory regardless of area.
#[must_use]
pub fn health_message(aqi: u16, _area_type: AreaType) -> &'static str {
    AqiCategory::from_aqi(aqi).advisory()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadingComposer {
    indexed: Vec<Pollutant>,
    data_source: String,
    confidence: f64,
}

impl Default for ReadingComposer {
    fn default() -> Self {
        Self {
            indexed: Pollutant::INDEXED.to_vec(),
            data_source: DEFAULT_DATA_SOURCE.to_string(),
            confidence: DEFAULT_CONFIDENCE,
        }
    }
}

impl ReadingComposer {
    /// Include SO₂ and CO in the overall AQI
    #[must_use]
    pub fn with_so2_co_indexed(mut self, enabled: bool) -> Self {
        self.indexed = if enabled {
            Pollutant::ALL.to_vec()
        } else {
            Pollutant::INDEXED.to_vec()
        };
        self
    }

    #[must_use]
    pub fn with_data_source(mut self, data_source: impl Into<String>) -> Self {
        self.data_source = data_source.into();
        self
    }

    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Sub-index of one pollutant, `None` when not indexed or off the scale
    #[must_use]
    pub fn sub_index(&self, pollutant: Pollutant, concentration: f64) -> Option<u16> {
        if !self.indexed.contains(&pollutant) {
            return None;
        }
        BreakpointTable::for_pollutant(pollutant).sub_index(concentration)
    }

    /// Compose a reading. Never fails on finite input.
    #[must_use]
    pub fn compose(
        &self,
        values: &PollutantConcentrations,
        region: &ResolvedRegion<'_>,
        conditions: Option<Conditions>,
        location: Coordinate,
    ) -> AirQualityReading {
        let mut pollutants = BTreeMap::new();
        let mut aqi: Option<u16> = None;

        for pollutant in Pollutant::ALL {
            let value = values.get(pollutant);
            let sub_index = self.sub_index(pollutant, value);

            if self.indexed.contains(&pollutant) && sub_index.is_none() {
                warn!("{pollutant} concentration {value:.1} is outside the AQI scale");
            }
            debug!("{pollutant}: {value:.1} {} -> {sub_index:?}", pollutant.unit());

            aqi = aqi.max(sub_index);
            pollutants.insert(pollutant, PollutantReading::new(pollutant, value, sub_index));
        }

        let aqi = aqi.unwrap_or_else(|| {
            warn!("No computable AQI sub-index, reporting 0");
            0
        });

        let entry = region.entry;
        AirQualityReading {
            aqi,
            pollutants,
            data_source: self.data_source.clone(),
            is_real_data: false,
            confidence: self.confidence,
            conditions,
            area_name: entry.name.clone(),
            area_type: entry.area_type,
            country: entry.country,
            health_message: health_message(aqi, entry.area_type).to_string(),
            location,
            is_default_location: region.is_default,
        }
    }
}
