//! Region Resolution Module
//!
//! Maps coordinates onto the nearest named place of a fixed North American
//! gazetteer. Coordinates outside North America resolve to a default place so
//! the regional heuristics stay consistent with the label.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::BreathePrintError;
use crate::models::{AreaType, Coordinate, Country, Traffic};

/// Latitude/longitude box, bounds inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&coordinate.lat)
            && (self.min_lon..=self.max_lon).contains(&coordinate.lon)
    }
}

/// Area where regional classification is meaningful
pub const NORTH_AMERICA: BoundingBox = BoundingBox {
    min_lat: 15.0,
    max_lat: 70.0,
    min_lon: -170.0,
    max_lon: -50.0,
};

/// A named place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GazetteerEntry {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "type")]
    pub area_type: AreaType,
    pub traffic: Traffic,
    pub country: Country,
}

impl GazetteerEntry {
    pub fn new(
        name: impl Into<String>,
        lat: f64,
        lon: f64,
        area_type: AreaType,
        traffic: Traffic,
        country: Country,
    ) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
            area_type,
            traffic,
            country,
        }
    }

    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// Immutable set of named places plus the out-of-bounds default
#[derive(Debug, Clone)]
pub struct Gazetteer {
    entries: Vec<GazetteerEntry>,
    default: GazetteerEntry,
    bounds: BoundingBox,
}

impl Gazetteer {
    /// Build a gazetteer; at least one entry is required
    pub fn new(
        entries: Vec<GazetteerEntry>,
        default: GazetteerEntry,
        bounds: BoundingBox,
    ) -> crate::Result<Self> {
        if entries.is_empty() {
            return Err(BreathePrintError::validation(
                "Gazetteer needs at least one entry",
            ));
        }
        Ok(Self {
            entries,
            default,
            bounds,
        })
    }

    /// Built-in major cities of the USA, Canada and Mexico
    #[must_use]
    pub fn north_america() -> Self {
        use AreaType::{Coastal, Desert, Urban};
        use Country::{Canada, Mexico, Usa};
        use Traffic::{High, Medium};

        let entries = vec![
            // United States
            GazetteerEntry::new("New York City", 40.7128, -74.0060, Urban, High, Usa),
            GazetteerEntry::new("Los Angeles", 34.0522, -118.2437, Urban, High, Usa),
            GazetteerEntry::new("Chicago", 41.8781, -87.6298, Urban, High, Usa),
            GazetteerEntry::new("Houston", 29.7604, -95.3698, Urban, High, Usa),
            GazetteerEntry::new("Phoenix", 33.4484, -112.0740, Desert, Medium, Usa),
            GazetteerEntry::new("Philadelphia", 39.9526, -75.1652, Urban, High, Usa),
            GazetteerEntry::new("San Antonio", 29.4241, -98.4936, Urban, Medium, Usa),
            GazetteerEntry::new("San Diego", 32.7157, -117.1611, Coastal, Medium, Usa),
            GazetteerEntry::new("Dallas", 32.7767, -96.7970, Urban, High, Usa),
            GazetteerEntry::new("San Jose", 37.3382, -121.8863, Urban, High, Usa),
            // Canada
            GazetteerEntry::new("Toronto", 43.6532, -79.3832, Urban, High, Canada),
            GazetteerEntry::new("Montreal", 45.5017, -73.5673, Urban, High, Canada),
            GazetteerEntry::new("Vancouver", 49.2827, -123.1207, Coastal, Medium, Canada),
            GazetteerEntry::new("Calgary", 51.0447, -114.0719, Urban, Medium, Canada),
            GazetteerEntry::new("Ottawa", 45.4215, -75.6972, Urban, Medium, Canada),
            // Mexico
            GazetteerEntry::new("Mexico City", 19.4326, -99.1332, Urban, High, Mexico),
            GazetteerEntry::new("Guadalajara", 20.6597, -103.3496, Urban, High, Mexico),
            GazetteerEntry::new("Monterrey", 25.6866, -100.3161, Urban, High, Mexico),
            GazetteerEntry::new("Tijuana", 32.5149, -117.0382, Urban, High, Mexico),
        ];
        let default = entries[0].clone();

        Self {
            entries,
            default,
            bounds: NORTH_AMERICA,
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[GazetteerEntry] {
        &self.entries
    }

    #[must_use]
    pub fn default_entry(&self) -> &GazetteerEntry {
        &self.default
    }

    /// Entry with exactly this name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&GazetteerEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Entry names in gazetteer order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    /// Nearest entry in degree space; the first of equally near entries wins
    #[must_use]
    pub fn nearest(&self, coordinate: &Coordinate) -> &GazetteerEntry {
        let mut closest = None;
        let mut min_distance = f64::INFINITY;

        for entry in &self.entries {
            let distance = coordinate.degree_distance(&entry.coordinate());
            if distance < min_distance {
                min_distance = distance;
                closest = Some(entry);
            }
        }

        closest.unwrap_or(&self.default)
    }
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self::north_america()
    }
}

/// Result of resolving a coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedRegion<'g> {
    pub entry: &'g GazetteerEntry,
    /// True when the coordinate was out of bounds and the default was used
    pub is_default: bool,
}

impl ResolvedRegion<'_> {
    /// Coordinate estimation should use for this region
    #[must_use]
    pub fn estimation_coordinate(&self, requested: Coordinate) -> Coordinate {
        if self.is_default {
            self.entry.coordinate()
        } else {
            requested
        }
    }
}

/// Service for resolving coordinates against a gazetteer
#[derive(Debug, Clone, Copy)]
pub struct RegionResolver<'g> {
    gazetteer: &'g Gazetteer,
}

impl<'g> RegionResolver<'g> {
    #[must_use]
    pub fn new(gazetteer: &'g Gazetteer) -> Self {
        Self { gazetteer }
    }

    /// Resolve a coordinate to the nearest named place
    #[must_use]
    pub fn resolve(&self, coordinate: &Coordinate) -> ResolvedRegion<'g> {
        if !self.gazetteer.bounds.contains(coordinate) {
            warn!(
                "Location {} outside North America, using default {}",
                coordinate.format_coordinates(),
                self.gazetteer.default.name
            );
            return ResolvedRegion {
                entry: &self.gazetteer.default,
                is_default: true,
            };
        }

        let entry = self.gazetteer.nearest(coordinate);
        debug!(
            "Resolved {} to {}, {}",
            coordinate.format_coordinates(),
            entry.name,
            entry.country
        );

        ResolvedRegion {
            entry,
            is_default: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(34.05, -118.24, "Los Angeles")]
    #[case(40.75, -73.99, "New York City")]
    #[case(49.25, -123.10, "Vancouver")]
    #[case(19.40, -99.10, "Mexico City")]
    #[case(32.52, -117.03, "Tijuana")]
    #[case(45.40, -75.70, "Ottawa")]
    #[case(61.22, -149.90, "Vancouver")]
    fn test_resolve_nearest(#[case] lat: f64, #[case] lon: f64, #[case] expected: &str) {
        let gazetteer = Gazetteer::north_america();
        let resolved = RegionResolver::new(&gazetteer).resolve(&Coordinate::new(lat, lon));

        assert!(!resolved.is_default);
        assert_eq!(resolved.entry.name, expected);
    }

    #[rstest]
    #[case(51.5, -0.13)] // London
    #[case(35.68, 139.69)] // Tokyo
    #[case(-33.87, 151.21)] // Sydney
    #[case(14.99, -90.0)]
    #[case(70.01, -100.0)]
    #[case(40.0, -170.01)]
    #[case(40.0, -49.99)]
    fn test_resolve_outside_north_america(#[case] lat: f64, #[case] lon: f64) {
        let gazetteer = Gazetteer::north_america();
        let requested = Coordinate::new(lat, lon);
        let resolved = RegionResolver::new(&gazetteer).resolve(&requested);

        assert!(resolved.is_default);
        assert_eq!(resolved.entry.name, "New York City");
        assert_eq!(
            resolved.estimation_coordinate(requested),
            Coordinate::new(40.7128, -74.0060)
        );
    }

    #[test]
    fn test_bounds_are_inclusive() {
        for (lat, lon) in [(15.0, -170.0), (70.0, -50.0), (15.0, -50.0), (70.0, -170.0)] {
            assert!(NORTH_AMERICA.contains(&Coordinate::new(lat, lon)));
        }
    }

    #[test]
    fn test_resolved_entry_is_nearest_over_grid() {
        let gazetteer = Gazetteer::north_america();
        let resolver = RegionResolver::new(&gazetteer);

        for lat_step in 0..=55 {
            for lon_step in 0..=60 {
                let coordinate =
                    Coordinate::new(15.0 + f64::from(lat_step), -170.0 + 2.0 * f64::from(lon_step));
                let resolved = resolver.resolve(&coordinate);
                assert!(!resolved.is_default);

                let best = coordinate.degree_distance(&resolved.entry.coordinate());
                for entry in gazetteer.entries() {
                    assert!(best <= coordinate.degree_distance(&entry.coordinate()));
                }
            }
        }
    }

    #[test]
    fn test_tie_goes_to_first_entry() {
        let a = GazetteerEntry::new("A", 10.0, 0.0, AreaType::Urban, Traffic::Low, Country::Usa);
        let b = GazetteerEntry::new("B", -10.0, 0.0, AreaType::Urban, Traffic::Low, Country::Usa);
        let everywhere = BoundingBox {
            min_lat: -90.0,
            max_lat: 90.0,
            min_lon: -180.0,
            max_lon: 180.0,
        };
        let gazetteer = Gazetteer::new(vec![a, b.clone()], b, everywhere).unwrap();

        let resolved = RegionResolver::new(&gazetteer).resolve(&Coordinate::new(0.0, 0.0));
        assert_eq!(resolved.entry.name, "A");
    }

    #[test]
    fn test_empty_gazetteer_rejected() {
        let default = Gazetteer::north_america().default_entry().clone();
        let result = Gazetteer::new(Vec::new(), default, NORTH_AMERICA);
        assert!(matches!(result, Err(BreathePrintError::Validation { .. })));
    }

    #[test]
    fn test_find_and_names() {
        let gazetteer = Gazetteer::north_america();
        assert_eq!(gazetteer.names().len(), 19);
        assert_eq!(gazetteer.names()[0], "New York City");
        assert_eq!(gazetteer.names()[18], "Tijuana");

        let phoenix = gazetteer.find("Phoenix").unwrap();
        assert_eq!(phoenix.area_type, AreaType::Desert);
        assert_eq!(phoenix.traffic, Traffic::Medium);
        assert!(gazetteer.find("London").is_none());
    }
}
