//! Regional and temporal pollutant concentration estimator
//!
//! Builds plausible pollutant concentrations for a coordinate and a local
//! wall-clock time. Regional rules are independent bounding-box tests and
//! stack additively when several match; temporal rules follow season, time of
//! day, rush hour and weekend.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::noise::NoiseSource;
use crate::models::{Conditions, Coordinate, Pollutant, Season, TimeOfDay};

/// Default full width of the uniform jitter (±4)
pub const DEFAULT_JITTER_AMPLITUDE: f64 = 8.0;

pub const MIN_PM25: f64 = 3.0;
pub const MIN_PM10: f64 = 0.0;
pub const MIN_NO2: f64 = 5.0;
pub const MIN_O3: f64 = 10.0;
pub const MIN_SO2: f64 = 1.0;
pub const MIN_CO: f64 = 0.1;

/// Raw concentrations before AQI conversion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollutantConcentrations {
    /// μg/m³
    pub pm25: f64,
    /// μg/m³
    pub pm10: f64,
    /// ppb
    pub no2: f64,
    /// ppb
    pub o3: f64,
    /// ppb
    pub so2: f64,
    /// ppm
    pub co: f64,
}

impl PollutantConcentrations {
    #[must_use]
    pub fn get(&self, pollutant: Pollutant) -> f64 {
        match pollutant {
            Pollutant::Pm25 => self.pm25,
            Pollutant::Pm10 => self.pm10,
            Pollutant::No2 => self.no2,
            Pollutant::O3 => self.o3,
            Pollutant::So2 => self.so2,
            Pollutant::Co => self.co,
        }
    }
}

/// Time buckets derived from the local clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalContext {
    pub is_summer: bool,
    pub is_winter: bool,
    pub is_daytime: bool,
    pub is_rush_hour: bool,
    pub is_weekend: bool,
}

impl TemporalContext {
    #[must_use]
    pub fn from_datetime(now: &NaiveDateTime) -> Self {
        // Zero-based months: June..=September is summer, December..=March winter
        let month = now.month0();
        let hour = now.hour();

        Self {
            is_summer: (5..=8).contains(&month),
            is_winter: month <= 2 || month == 11,
            is_daytime: (6..20).contains(&hour),
            is_rush_hour: (7..=9).contains(&hour) || (16..=19).contains(&hour),
            is_weekend: matches!(now.weekday(), Weekday::Sat | Weekday::Sun),
        }
    }

    #[must_use]
    pub fn season(&self) -> Season {
        if self.is_summer {
            Season::Summer
        } else if self.is_winter {
            Season::Winter
        } else {
            Season::SpringFall
        }
    }

    #[must_use]
    pub fn time_of_day(&self) -> TimeOfDay {
        if self.is_daytime {
            TimeOfDay::Daytime
        } else {
            TimeOfDay::Nighttime
        }
    }
}

/// Baseline levels the rules adjust
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    pub pm25: f64,
    pub no2: f64,
    pub o3: f64,
}

impl Default for Baseline {
    fn default() -> Self {
        Self {
            pm25: 15.0,
            no2: 15.0,
            o3: 30.0,
        }
    }
}

/// Regional modifier rules, applied in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionRule {
    WestCoast,
    EastCoast,
    Midwest,
    Southwest,
    Mexico,
    Canada,
}

impl RegionRule {
    pub const ALL: [RegionRule; 6] = [
        RegionRule::WestCoast,
        RegionRule::EastCoast,
        RegionRule::Midwest,
        RegionRule::Southwest,
        RegionRule::Mexico,
        RegionRule::Canada,
    ];

    /// Bounding-box membership on raw degrees; rules may overlap
    #[must_use]
    pub fn matches(self, coordinate: &Coordinate) -> bool {
        let Coordinate { lat, lon } = *coordinate;
        match self {
            RegionRule::WestCoast => lon < -110.0,
            RegionRule::EastCoast => lon > -80.0,
            RegionRule::Midwest => (-100.0..=-80.0).contains(&lon) && (35.0..=50.0).contains(&lat),
            RegionRule::Southwest => {
                (-115.0..=-95.0).contains(&lon) && (25.0..=40.0).contains(&lat)
            }
            RegionRule::Mexico => lat > 15.0 && lat < 32.0,
            RegionRule::Canada => lat > 49.0,
        }
    }

    /// Every rule matching the coordinate, in application order
    #[must_use]
    pub fn matching(coordinate: &Coordinate) -> Vec<RegionRule> {
        Self::ALL
            .into_iter()
            .filter(|rule| rule.matches(coordinate))
            .collect()
    }

    pub fn apply(self, baseline: &mut Baseline, time: &TemporalContext) {
        match self {
            RegionRule::WestCoast => {
                // Wildfire smoke during the west coast fire season
                baseline.pm25 += if time.is_summer { 35.0 } else { 5.0 };
                baseline.o3 += 10.0;
            }
            RegionRule::EastCoast => {
                baseline.pm25 += 12.0;
                baseline.no2 += 15.0;
                if time.is_summer {
                    baseline.o3 += 20.0;
                }
            }
            RegionRule::Midwest => {
                baseline.pm25 += 10.0;
                baseline.no2 += 12.0;
                if time.is_winter {
                    // Heating emissions
                    baseline.pm25 += 8.0;
                }
            }
            RegionRule::Southwest => {
                baseline.pm25 += 8.0;
                baseline.o3 += 15.0;
            }
            RegionRule::Mexico => {
                baseline.pm25 += 20.0;
                baseline.no2 += 18.0;
            }
            RegionRule::Canada => {
                baseline.pm25 -= 5.0;
                if time.is_summer {
                    // Forest fire smoke
                    baseline.pm25 += 15.0;
                }
            }
        }
    }
}

/// Apply time-of-day, rush hour and weekend effects
pub fn apply_temporal(baseline: &mut Baseline, time: &TemporalContext) {
    if time.is_daytime {
        baseline.o3 += 15.0;
        if time.is_rush_hour && !time.is_weekend {
            baseline.no2 += 15.0;
            baseline.pm25 += 8.0;
        }
    } else {
        baseline.o3 -= 10.0;
        baseline.no2 -= 5.0;
    }

    if time.is_weekend {
        baseline.no2 -= 5.0;
        baseline.pm25 -= 3.0;
    }
}

/// Output of one estimation
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub concentrations: PollutantConcentrations,
    pub conditions: Conditions,
    /// Regional rules that contributed, in application order
    pub regions: Vec<RegionRule>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimator {
    jitter_amplitude: f64,
}

impl Default for Estimator {
    fn default() -> Self {
        Self::new(DEFAULT_JITTER_AMPLITUDE)
    }
}

impl Estimator {
    #[must_use]
    pub fn new(jitter_amplitude: f64) -> Self {
        Self { jitter_amplitude }
    }

    /// Baseline after regional and temporal modifiers, before jitter
    #[must_use]
    pub fn baseline(coordinate: &Coordinate, time: &TemporalContext) -> (Baseline, Vec<RegionRule>) {
        let mut baseline = Baseline::default();
        let regions = RegionRule::matching(coordinate);
        for rule in &regions {
            rule.apply(&mut baseline, time);
        }
        apply_temporal(&mut baseline, time);
        (baseline, regions)
    }

    /// Estimate concentrations at `coordinate` for local time `now`
    #[instrument(level = "debug", skip(self, noise))]
    pub fn estimate<N: NoiseSource + ?Sized>(
        &self,
        coordinate: &Coordinate,
        now: &NaiveDateTime,
        noise: &mut N,
    ) -> Estimate {
        let time = TemporalContext::from_datetime(now);
        let (baseline, regions) = Self::baseline(coordinate, &time);
        let wild_fire_season = time.is_summer && regions.contains(&RegionRule::WestCoast);

        debug!(?regions, ?baseline, "Applied regional and temporal modifiers");

        let amplitude = self.jitter_amplitude;
        let pm25 = (baseline.pm25 + noise.jitter(amplitude)).max(MIN_PM25);
        let pm10 = (pm25 * 2.0 + noise.jitter(amplitude)).max(MIN_PM10);
        let no2 = (baseline.no2 + noise.jitter(amplitude)).max(MIN_NO2);
        let o3 = (baseline.o3 + noise.jitter(amplitude)).max(MIN_O3);
        let so2 = (5.0 + noise.jitter(amplitude) * 0.5).max(MIN_SO2);
        let co = (0.4 + noise.jitter(amplitude) * 0.1).max(MIN_CO);

        Estimate {
            concentrations: PollutantConcentrations {
                pm25,
                pm10,
                no2,
                o3,
                so2,
                co,
            },
            conditions: Conditions {
                wild_fire_season,
                rush_hour: time.is_rush_hour,
                weekend: time.is_weekend,
                time_of_day: time.time_of_day(),
                season: time.season(),
            },
            regions,
        }
    }
}
