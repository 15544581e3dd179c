//! Air quality service
//!
//! Ties region resolution, estimation and composition together behind the
//! operations the CLI and report flow use.

use std::fmt::Display;

use chrono::{Local, NaiveDateTime};
use tracing::{info, instrument, warn};

use super::composer::ReadingComposer;
use super::estimator::Estimator;
use super::noise::{NoiseSource, RandomNoise};
use super::region::{Gazetteer, RegionResolver};
use crate::config::BreathePrintConfig;
use crate::error::BreathePrintError;
use crate::models::{AirQualityReading, Coordinate};

#[derive(Debug, Clone, Default)]
pub struct AirQualityService {
    gazetteer: Gazetteer,
    estimator: Estimator,
    composer: ReadingComposer,
}

impl AirQualityService {
    #[must_use]
    pub fn new(config: &BreathePrintConfig) -> Self {
        let composer = ReadingComposer::default()
            .with_so2_co_indexed(config.composer.index_so2_co)
            .with_data_source(config.estimator.data_source.clone())
            .with_confidence(config.estimator.confidence);

        Self {
            gazetteer: Gazetteer::north_america(),
            estimator: Estimator::new(config.estimator.jitter_amplitude),
            composer,
        }
    }

    #[must_use]
    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    /// Reading for `coordinate` at local time `now`
    #[instrument(level = "debug", skip(self, noise))]
    pub fn reading_at<N: NoiseSource + ?Sized>(
        &self,
        coordinate: Coordinate,
        now: NaiveDateTime,
        noise: &mut N,
    ) -> AirQualityReading {
        let region = RegionResolver::new(&self.gazetteer).resolve(&coordinate);
        let estimation_point = region.estimation_coordinate(coordinate);
        let estimate = self.estimator.estimate(&estimation_point, &now, noise);

        let reading = self.composer.compose(
            &estimate.concentrations,
            &region,
            Some(estimate.conditions),
            estimation_point,
        );

        info!(
            "AQI {} ({}) near {}",
            reading.aqi,
            reading.category(),
            reading.area_name
        );
        reading
    }

    /// Reading for `coordinate` right now
    #[must_use]
    pub fn current_air_quality(&self, coordinate: Coordinate) -> AirQualityReading {
        let now = Local::now().naive_local();
        self.reading_at(coordinate, now, &mut RandomNoise::thread())
    }

    /// Reading at a named gazetteer entry
    pub fn air_quality_for_city(&self, name: &str) -> crate::Result<AirQualityReading> {
        let entry = self.gazetteer.find(name).ok_or_else(|| {
            BreathePrintError::validation(format!("City {name} not found in North America database"))
        })?;
        Ok(self.current_air_quality(entry.coordinate()))
    }

    /// Names of all gazetteer entries
    #[must_use]
    pub fn available_cities(&self) -> Vec<&str> {
        self.gazetteer.names()
    }

    /// Run `fetch`, falling back to the fixed reading when it fails
    pub fn with_fallback<F, E>(coordinate: Coordinate, fetch: F) -> AirQualityReading
    where
        F: FnOnce() -> Result<AirQualityReading, E>,
        E: Display,
    {
        fetch().unwrap_or_else(|e| {
            warn!("Air quality lookup failed, using fallback reading: {e}");
            AirQualityReading::fallback(coordinate)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::air_quality::noise::FixedNoise;
    use crate::models::{AqiCategory, Pollutant, Season};
    use chrono::NaiveDate;

    fn july_afternoon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 15)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_los_angeles_summer_afternoon() {
        let service = AirQualityService::default();
        let reading = service.reading_at(
            Coordinate::new(34.05, -118.24),
            july_afternoon(),
            &mut FixedNoise::CENTERED,
        );

        let conditions = reading.conditions.unwrap();
        assert!(conditions.wild_fire_season);
        assert!(!conditions.rush_hour);
        assert_eq!(conditions.season, Season::Summer);
        assert_eq!(reading.area_name, "Los Angeles");
        assert_eq!(reading.pollutant(Pollutant::Pm25).unwrap().value, 50.0);
        assert!(reading.aqi >= 100);
        assert_eq!(reading.category(), AqiCategory::UnhealthyForSensitiveGroups);
    }

    #[test]
    fn test_random_readings_stay_in_range() {
        let service = AirQualityService::default();
        let mut noise = RandomNoise::seeded(7);
        for _ in 0..200 {
            let reading =
                service.reading_at(Coordinate::new(34.05, -118.24), july_afternoon(), &mut noise);
            let pm25 = reading.pollutant(Pollutant::Pm25).unwrap().value;
            assert!((46.0..=54.0).contains(&pm25));
            assert!(reading.aqi >= 100);
        }
    }

    #[test]
    fn test_outside_north_america_uses_default_region() {
        let service = AirQualityService::default();
        let london = Coordinate::new(51.5, -0.13);
        let reading = service.reading_at(london, july_afternoon(), &mut FixedNoise::CENTERED);

        assert!(reading.is_default_location);
        assert_eq!(reading.area_name, "New York City");
        // The reading describes the place actually estimated
        assert_eq!(reading.location, Coordinate::new(40.7128, -74.0060));
        // No west-coast wildfire boost from the default place
        assert!(!reading.conditions.unwrap().wild_fire_season);
    }

    #[test]
    fn test_city_lookup() {
        let service = AirQualityService::default();
        let reading = service.air_quality_for_city("Phoenix").unwrap();
        assert_eq!(reading.area_name, "Phoenix");
        assert!(!reading.is_default_location);

        let err = service.air_quality_for_city("Atlantis").unwrap_err();
        assert!(matches!(err, BreathePrintError::Validation { .. }));
        assert!(err.to_string().contains("Atlantis"));
    }

    #[test]
    fn test_available_cities() {
        let service = AirQualityService::default();
        let cities = service.available_cities();
        assert_eq!(cities.len(), 19);
        assert!(cities.contains(&"Montreal"));
    }

    #[test]
    fn test_config_flows_into_reading() {
        let mut config = BreathePrintConfig::default();
        config.estimator.data_source = "Ground Station".to_string();
        config.estimator.confidence = 0.5;
        config.estimator.jitter_amplitude = 0.0;

        let service = AirQualityService::new(&config);
        let reading = service.reading_at(
            Coordinate::new(34.05, -118.24),
            july_afternoon(),
            &mut RandomNoise::thread(),
        );

        assert_eq!(reading.data_source, "Ground Station");
        assert_eq!(reading.confidence, 0.5);
        assert_eq!(reading.pollutant(Pollutant::Pm25).unwrap().value, 50.0);
    }

    #[test]
    fn test_widest_allowed_jitter_keeps_pollutants_indexed() {
        let mut config = BreathePrintConfig::default();
        config.estimator.jitter_amplitude = 50.0;
        config.validate().unwrap();

        let service = AirQualityService::new(&config);
        let winter_night = NaiveDate::from_ymd_opt(2025, 1, 11)
            .unwrap()
            .and_hms_opt(2, 0, 0)
            .unwrap();
        let reading = service.reading_at(
            Coordinate::new(60.0, -105.0),
            winter_night,
            &mut FixedNoise(0.0),
        );

        let pm10 = reading.pollutant(Pollutant::Pm10).unwrap();
        assert_eq!(pm10.value, 0.0);
        assert_eq!(pm10.sub_index, Some(0));
        for pollutant in Pollutant::INDEXED {
            let detail = reading.pollutant(pollutant).unwrap();
            assert!(detail.value >= 0.0);
            assert!(detail.sub_index.is_some(), "{pollutant} has no sub-index");
        }
    }

    #[test]
    fn test_with_fallback() {
        let location = Coordinate::new(40.0, -100.0);
        let reading = AirQualityService::with_fallback(location, || {
            Err::<AirQualityReading, _>(BreathePrintError::general("upstream unavailable"))
        });
        assert_eq!(reading.aqi, AirQualityReading::FALLBACK_AQI);
        assert_eq!(reading.location, location);

        let service = AirQualityService::default();
        let ok = AirQualityService::with_fallback(location, || {
            Ok::<_, BreathePrintError>(service.current_air_quality(location))
        });
        assert_ne!(ok.data_source, AirQualityReading::FALLBACK_SOURCE);
    }
}
