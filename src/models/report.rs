//! Witness report records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{AirQualityReading, Coordinate};

/// A captured photo together with the air quality at the time of capture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WitnessReport {
    /// Assigned by the report store
    pub id: String,
    /// Assigned by the report store
    pub timestamp: DateTime<Utc>,
    /// Encoded image, usually a data URL; never inspected
    pub image: String,
    pub location: Coordinate,
    pub air_quality: AirQualityReading,
    pub description: String,
}

/// A witness report that has not been saved yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWitnessReport {
    pub image: String,
    pub location: Coordinate,
    pub air_quality: AirQualityReading,
    #[serde(default)]
    pub description: String,
}

impl NewWitnessReport {
    #[must_use]
    pub fn new(location: Coordinate, air_quality: AirQualityReading) -> Self {
        Self {
            image: String::new(),
            location,
            air_quality,
            description: String::new(),
        }
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach the identity assigned by the store
    #[must_use]
    pub fn into_report(self, id: String, timestamp: DateTime<Utc>) -> WitnessReport {
        WitnessReport {
            id,
            timestamp,
            image: self.image,
            location: self.location,
            air_quality: self.air_quality,
            description: self.description,
        }
    }
}
