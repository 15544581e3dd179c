//! Air quality reading model and display helpers

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::Coordinate;

/// Tracked pollutants
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    Pm25,
    Pm10,
    No2,
    O3,
    So2,
    Co,
}

impl Pollutant {
    /// Every tracked pollutant
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::No2,
        Pollutant::O3,
        Pollutant::So2,
        Pollutant::Co,
    ];

    /// Pollutants that contribute to the overall AQI unless configured otherwise
    pub const INDEXED: [Pollutant; 4] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::No2,
        Pollutant::O3,
    ];

    /// Display unit of the concentration
    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            Pollutant::Pm25 | Pollutant::Pm10 => "μg/m³",
            Pollutant::No2 | Pollutant::O3 | Pollutant::So2 => "ppb",
            Pollutant::Co => "ppm",
        }
    }

    /// Upper bounds of the good and moderate levels
    #[must_use]
    pub fn level_thresholds(self) -> (f64, f64) {
        match self {
            Pollutant::Pm25 => (12.0, 35.4),
            Pollutant::Pm10 => (54.0, 154.0),
            Pollutant::No2 => (53.0, 100.0),
            Pollutant::O3 => (54.0, 70.0),
            Pollutant::So2 => (35.0, 75.0),
            Pollutant::Co => (4.4, 9.4),
        }
    }

    /// Classify a concentration into a qualitative level
    #[must_use]
    pub fn level(self, value: f64) -> PollutantLevel {
        let (good, moderate) = self.level_thresholds();
        if value <= good {
            PollutantLevel::Good
        } else if value <= moderate {
            PollutantLevel::Moderate
        } else {
            PollutantLevel::Unhealthy
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::No2 => "NO₂",
            Pollutant::O3 => "O₃",
            Pollutant::So2 => "SO₂",
            Pollutant::Co => "CO",
        };
        f.write_str(name)
    }
}

/// Qualitative pollutant level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollutantLevel {
    Good,
    Moderate,
    Unhealthy,
}

/// Detail for one pollutant within a reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollutantReading {
    /// Concentration in `unit`
    pub value: f64,
    pub unit: String,
    pub level: PollutantLevel,
    /// False hides the value from presentation; it is never removed from the record
    pub available: bool,
    /// AQI sub-index, absent when not indexed or not computable
    pub sub_index: Option<u16>,
}

impl PollutantReading {
    /// Build a reading with the pollutant's fixed unit and derived level
    #[must_use]
    pub fn new(pollutant: Pollutant, value: f64, sub_index: Option<u16>) -> Self {
        Self {
            value,
            unit: pollutant.unit().to_string(),
            level: pollutant.level(value),
            available: true,
            sub_index,
        }
    }
}

/// Part of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeOfDay {
    Daytime,
    Nighttime,
}

/// Coarse season bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Summer,
    Winter,
    #[serde(rename = "Spring/Fall")]
    SpringFall,
}

/// Contextual flags that shaped an estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conditions {
    pub wild_fire_season: bool,
    pub rush_hour: bool,
    pub weekend: bool,
    pub time_of_day: TimeOfDay,
    pub season: Season,
}

/// Land use of a gazetteer place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaType {
    Urban,
    Coastal,
    Desert,
}

/// Traffic intensity of a gazetteer place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Traffic {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Country {
    #[serde(rename = "USA")]
    Usa,
    Canada,
    Mexico,
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Country::Usa => "USA",
            Country::Canada => "Canada",
            Country::Mexico => "Mexico",
        })
    }
}

/// EPA AQI category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    /// Category of an AQI value
    #[must_use]
    pub fn from_aqi(aqi: u16) -> Self {
        match aqi {
            0..=50 => AqiCategory::Good,
            51..=100 => AqiCategory::Moderate,
            101..=150 => AqiCategory::UnhealthyForSensitiveGroups,
            151..=200 => AqiCategory::Unhealthy,
            201..=300 => AqiCategory::VeryUnhealthy,
            _ => AqiCategory::Hazardous,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }

    /// Marker colour used on the report map
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            AqiCategory::Good => "#10b981",
            AqiCategory::Moderate => "#fbbf24",
            AqiCategory::UnhealthyForSensitiveGroups => "#f97316",
            AqiCategory::Unhealthy => "#ef4444",
            AqiCategory::VeryUnhealthy => "#991b1b",
            AqiCategory::Hazardous => "#581c87",
        }
    }

    /// Fixed health advisory for the category
    #[must_use]
    pub fn advisory(self) -> &'static str {
        match self {
            AqiCategory::Good => "Air quality is good. Perfect for outdoor activities!",
            AqiCategory::Moderate => {
                "Air quality is acceptable. Sensitive individuals should limit prolonged outdoor exertion."
            }
            AqiCategory::UnhealthyForSensitiveGroups => {
                "Unhealthy for sensitive groups. Children, elderly, and people with respiratory conditions should reduce outdoor activities."
            }
            AqiCategory::Unhealthy => {
                "Unhealthy air quality. Everyone should reduce prolonged outdoor exertion. Sensitive groups should avoid outdoor activities."
            }
            AqiCategory::VeryUnhealthy => {
                "Very unhealthy. Everyone should avoid prolonged outdoor exertion. Stay indoors if possible."
            }
            AqiCategory::Hazardous => {
                "Hazardous conditions. Everyone should avoid all outdoor activities. Use air purifiers indoors."
            }
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Composite air quality reading handed to display and storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirQualityReading {
    /// Overall AQI, the maximum pollutant sub-index
    pub aqi: u16,
    pub pollutants: BTreeMap<Pollutant, PollutantReading>,
    pub data_source: String,
    /// Always false for estimated readings
    pub is_real_data: bool,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
    /// Absent on the static fallback reading
    pub conditions: Option<Conditions>,
    pub area_name: String,
    pub area_type: AreaType,
    pub country: Country,
    pub health_message: String,
    /// Coordinate the estimate was made for
    pub location: Coordinate,
    pub is_default_location: bool,
}

impl AirQualityReading {
    pub const FALLBACK_AQI: u16 = 75;
    pub const FALLBACK_SOURCE: &'static str = "NASA TEMPO Satellite Network (Fallback)";

    /// Static reading returned when an upstream data fetch fails
    #[must_use]
    pub fn fallback(location: Coordinate) -> Self {
        let fixed = [
            (Pollutant::No2, 30.0, PollutantLevel::Moderate),
            (Pollutant::O3, 45.0, PollutantLevel::Good),
            (Pollutant::Pm25, 25.0, PollutantLevel::Moderate),
            (Pollutant::Pm10, 50.0, PollutantLevel::Moderate),
            (Pollutant::So2, 10.0, PollutantLevel::Good),
            (Pollutant::Co, 0.5, PollutantLevel::Good),
        ];
        let pollutants = fixed
            .into_iter()
            .map(|(pollutant, value, level)| {
                let reading = PollutantReading {
                    value,
                    unit: pollutant.unit().to_string(),
                    level,
                    available: true,
                    sub_index: None,
                };
                (pollutant, reading)
            })
            .collect();

        Self {
            aqi: Self::FALLBACK_AQI,
            pollutants,
            data_source: Self::FALLBACK_SOURCE.to_string(),
            is_real_data: false,
            confidence: 0.75,
            conditions: None,
            area_name: "North America".to_string(),
            area_type: AreaType::Urban,
            country: Country::Usa,
            health_message: AqiCategory::from_aqi(Self::FALLBACK_AQI)
                .advisory()
                .to_string(),
            location,
            is_default_location: false,
        }
    }

    #[must_use]
    pub fn category(&self) -> AqiCategory {
        AqiCategory::from_aqi(self.aqi)
    }

    /// Detail for one pollutant
    #[must_use]
    pub fn pollutant(&self, pollutant: Pollutant) -> Option<&PollutantReading> {
        self.pollutants.get(&pollutant)
    }
}
