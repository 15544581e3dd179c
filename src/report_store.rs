//! Persistent witness report store
//!
//! Each report lives in a fjall keyspace under its own `report:<id>` key,
//! postcard encoded. A small id index keeps insertion order. Identifiers are
//! millisecond timestamps, bumped when two saves land in the same millisecond.

use anyhow::{Context, Result};
use chrono::Utc;
use fjall::Keyspace;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument};

use crate::error::BreathePrintError;
use crate::models::{Coordinate, NewWitnessReport, WitnessReport};

const INDEX_KEY: &str = "report_ids";

fn report_key(id: &str) -> Vec<u8> {
    format!("report:{id}").into_bytes()
}

pub struct ReportStore {
    store: Keyspace,
    // Serializes read-modify-write of the id index
    write_lock: Mutex<()>,
}

fn get_from_store(store: &Keyspace, key: &[u8]) -> Result<Option<Vec<u8>>> {
    Ok(store.get(key)?.map(|v| v.to_vec()))
}

impl ReportStore {
    /// Open or create the store at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let db = fjall::Database::builder(path)
            .open()
            .with_context(|| format!("Failed to open report store at {}", path.display()))?;
        let reports = db.keyspace("reports", fjall::KeyspaceCreateOptions::default)?;
        debug!("Opened report store at {}", path.display());
        Ok(Self {
            store: reports,
            write_lock: Mutex::new(()),
        })
    }

    fn ids(&self) -> Result<Vec<i64>> {
        match get_from_store(&self.store, INDEX_KEY.as_bytes())? {
            Some(bytes) => postcard::from_bytes(&bytes).context("Corrupt witness report index"),
            None => Ok(Vec::new()),
        }
    }

    fn write_ids(&self, ids: &[i64]) -> Result<()> {
        let bytes = postcard::to_stdvec(ids)?;
        self.store.insert(INDEX_KEY.as_bytes().to_vec(), bytes)?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| BreathePrintError::storage("Report store lock poisoned").into())
    }

    /// Persist a new report, assigning its id and timestamp
    #[instrument(level = "debug", skip(self, report), fields(location = %report.location.format_coordinates()))]
    pub fn save(&self, report: NewWitnessReport) -> Result<WitnessReport> {
        let _guard = self.lock()?;
        let mut ids = self.ids()?;

        let timestamp = Utc::now();
        let latest = ids.iter().copied().max().unwrap_or(i64::MIN);
        let id = timestamp.timestamp_millis().max(latest.saturating_add(1));

        let saved = report.into_report(id.to_string(), timestamp);
        self.store
            .insert(report_key(&saved.id), postcard::to_stdvec(&saved)?)?;
        ids.push(id);
        self.write_ids(&ids)?;

        info!("Saved witness report {} (AQI {})", saved.id, saved.air_quality.aqi);
        Ok(saved)
    }

    /// All reports, oldest first
    pub fn all(&self) -> Result<Vec<WitnessReport>> {
        let mut reports = Vec::new();
        for id in self.ids()? {
            if let Some(report) = self.get(&id.to_string())? {
                reports.push(report);
            }
        }
        Ok(reports)
    }

    /// Reports within `radius_km` of `center`, nearest first
    #[instrument(level = "debug", skip(self))]
    pub fn near(&self, center: &Coordinate, radius_km: f64) -> Result<Vec<WitnessReport>> {
        let mut nearby: Vec<(f64, WitnessReport)> = self
            .all()?
            .into_iter()
            .map(|report| (center.distance_km(&report.location), report))
            .filter(|(distance, _)| *distance <= radius_km)
            .collect();
        nearby.sort_by(|a, b| a.0.total_cmp(&b.0));

        debug!("Found {} reports within {radius_km} km", nearby.len());
        Ok(nearby.into_iter().map(|(_, report)| report).collect())
    }

    pub fn get(&self, id: &str) -> Result<Option<WitnessReport>> {
        get_from_store(&self.store, &report_key(id))?
            .map(|bytes| {
                postcard::from_bytes(&bytes)
                    .with_context(|| format!("Corrupt witness report {id}"))
            })
            .transpose()
    }

    /// Delete a report, returning whether it existed
    pub fn remove(&self, id: &str) -> Result<bool> {
        let _guard = self.lock()?;
        let key = report_key(id);
        if get_from_store(&self.store, &key)?.is_none() {
            return Ok(false);
        }

        self.store.remove(key)?;
        let mut ids = self.ids()?;
        ids.retain(|stored| stored.to_string() != id);
        self.write_ids(&ids)?;

        debug!("Removed witness report {id}");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AirQualityReading;

    fn pending(lat: f64, lon: f64) -> NewWitnessReport {
        let location = Coordinate::new(lat, lon);
        NewWitnessReport::new(location, AirQualityReading::fallback(location))
            .with_image("data:image/png;base64,AAAA")
    }

    #[test]
    fn test_save_assigns_unique_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportStore::open(dir.path()).unwrap();

        let first = store.save(pending(34.05, -118.24)).unwrap();
        let second = store.save(pending(34.05, -118.24)).unwrap();

        assert_ne!(first.id, second.id);
        assert!(second.id.parse::<i64>().unwrap() > first.id.parse::<i64>().unwrap());
        assert!(second.timestamp >= first.timestamp);
        assert_eq!(store.all().unwrap(), vec![first, second]);
    }

    #[test]
    fn test_each_report_has_its_own_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportStore::open(dir.path()).unwrap();

        let saved = store.save(pending(34.05, -118.24)).unwrap();

        let bytes = get_from_store(&store.store, &report_key(&saved.id))
            .unwrap()
            .unwrap();
        let decoded: WitnessReport = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, saved);
        assert_eq!(store.ids().unwrap(), vec![saved.id.parse::<i64>().unwrap()]);
    }

    #[test]
    fn test_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportStore::open(dir.path()).unwrap();

        assert!(store.all().unwrap().is_empty());
        assert!(store.get("1").unwrap().is_none());
        assert!(!store.remove("1").unwrap());
    }

    #[test]
    fn test_near_filters_and_sorts_by_distance() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportStore::open(dir.path()).unwrap();

        let far = store.save(pending(34.10, -118.24)).unwrap(); // ~5.5 km north
        let close = store.save(pending(34.051, -118.24)).unwrap();
        store.save(pending(40.7128, -74.0060)).unwrap();

        let center = Coordinate::new(34.05, -118.24);
        let nearby = store.near(&center, 10.0).unwrap();
        assert_eq!(nearby, vec![close, far]);

        assert_eq!(store.near(&center, 1.0).unwrap().len(), 1);
        assert_eq!(store.all().unwrap().len(), 3);
    }

    #[test]
    fn test_get_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportStore::open(dir.path()).unwrap();

        let kept = store.save(pending(45.5, -73.57)).unwrap();
        let saved = store
            .save(pending(45.5, -73.57).with_description("Haze downtown"))
            .unwrap();

        let loaded = store.get(&saved.id).unwrap().unwrap();
        assert_eq!(loaded.description, "Haze downtown");
        assert_eq!(loaded.air_quality, saved.air_quality);

        assert!(store.remove(&saved.id).unwrap());
        assert!(store.get(&saved.id).unwrap().is_none());
        assert!(!store.remove(&saved.id).unwrap());
        assert_eq!(store.all().unwrap(), vec![kept]);
    }
}
