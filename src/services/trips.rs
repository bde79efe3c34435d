use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use chrono::Utc;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    error::{StorageError, TripStoreError},
    models::trip::{Trip, TripDraft},
    services::kv::SharedKv,
    validation::validate_trip,
};

pub const TRIPS_KEY: &str = "tripData";

/// Why a stored blob could not be read back as a trip list.
#[derive(Debug, Error)]
enum TripParseError {
    #[error("stored value is blank")]
    Blank,
    #[error("stored value is not a JSON array: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Owns the trip list stored under [`TRIPS_KEY`]. Clones share the write lock.
#[derive(Clone)]
pub struct TripStore {
    kv: SharedKv,
    write_lock: Arc<Mutex<()>>,
    ids: Arc<TripIdGenerator>,
}

impl TripStore {
    pub fn new(kv: SharedKv) -> Self {
        Self {
            kv,
            write_lock: Arc::new(Mutex::new(())),
            ids: Arc::new(TripIdGenerator::default()),
        }
    }

    /// All trips in creation order. Missing, unreadable or non-array data reads as empty;
    /// malformed entries inside an array are skipped.
    pub async fn list_trips(&self) -> Vec<Trip> {
        match self.kv.get(TRIPS_KEY).await {
            Ok(raw) => decode_or_empty(raw.as_deref()),
            Err(err) => {
                warn!("failed to read trips, treating as empty: {err}");
                Vec::new()
            }
        }
    }

    pub async fn trip(&self, id: &str) -> Option<Trip> {
        self.list_trips().await.into_iter().find(|trip| trip.id == id)
    }

    pub async fn add_trip(&self, draft: &TripDraft) -> Result<Trip, TripStoreError> {
        let new_trip = validate_trip(draft)?;

        let _guard = self.write_lock.lock().await;
        let mut trips = self.load_for_update().await?;
        let id = self.ids.next_unused(&trips);
        let trip = Trip::from_new(id, new_trip);
        trips.push(trip.clone());
        self.save(&trips).await?;

        info!(id = %trip.id, route = %trip.route_text(), "trip created");
        Ok(trip)
    }

    /// Removes the trip with `id`. Unknown ids leave the stored list untouched.
    pub async fn delete_trip(&self, id: &str) -> Result<(), TripStoreError> {
        let _guard = self.write_lock.lock().await;
        let mut trips = self.load_for_update().await?;
        let before = trips.len();
        trips.retain(|trip| trip.id != id);
        if trips.len() == before {
            debug!(id, "no trip to delete");
            return Ok(());
        }
        self.save(&trips).await?;

        info!(id, "trip deleted");
        Ok(())
    }

    /// Backend failures propagate here so a failed read never overwrites stored trips.
    async fn load_for_update(&self) -> Result<Vec<Trip>, StorageError> {
        let raw = self.kv.get(TRIPS_KEY).await?;
        Ok(decode_or_empty(raw.as_deref()))
    }

    async fn save(&self, trips: &[Trip]) -> Result<(), StorageError> {
        let data = serde_json::to_string(trips).map_err(|source| StorageError::Encode {
            key: TRIPS_KEY.to_string(),
            source,
        })?;
        self.kv.set(TRIPS_KEY, &data).await
    }
}

fn decode_or_empty(raw: Option<&str>) -> Vec<Trip> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match decode(raw) {
        Ok(trips) => trips,
        Err(err) => {
            warn!("existing trip data is corrupted, treating as empty: {err}");
            Vec::new()
        }
    }
}

/// Keeps every well-formed entry of the stored array and drops the rest.
fn decode(raw: &str) -> Result<Vec<Trip>, TripParseError> {
    if raw.trim().is_empty() {
        return Err(TripParseError::Blank);
    }
    let entries: Vec<Value> = serde_json::from_str(raw)?;
    let total = entries.len();
    let trips = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<Trip>(entry) {
            Ok(trip) => Some(trip),
            Err(err) => {
                warn!(index, "skipping malformed stored trip: {err}");
                None
            }
        })
        .collect::<Vec<_>>();
    if trips.len() < total {
        warn!(kept = trips.len(), total, "stored trip list had malformed entries");
    }
    Ok(trips)
}

/// Hands out millisecond timestamps as ids, bumping past any value already issued or stored.
#[derive(Debug, Default)]
struct TripIdGenerator {
    last: AtomicI64,
}

impl TripIdGenerator {
    fn next(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }

    fn next_unused(&self, existing: &[Trip]) -> String {
        loop {
            let candidate = self.next().to_string();
            if existing.iter().all(|trip| trip.id != candidate) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_strictly_increase_within_one_millisecond() {
        let ids = TripIdGenerator::default();
        let issued = (0..100).map(|_| ids.next()).collect::<Vec<_>>();
        assert!(issued.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn ids_skip_values_already_stored() {
        let ids = TripIdGenerator::default();
        let taken = ids.next() + 1;
        let existing = vec![Trip {
            id: taken.to_string(),
            load_location: "Dhaka".into(),
            unload_location: "Sylhet".into(),
            date: Utc::now(),
        }];

        let id = ids.next_unused(&existing);
        assert_ne!(id, taken.to_string());
    }

    #[test]
    fn blank_and_non_array_blobs_decode_as_empty() {
        for raw in ["", "   ", "not json", "{}", r#"{"id":"1"}"#] {
            assert!(decode_or_empty(Some(raw)).is_empty(), "{raw}");
        }
        assert!(decode_or_empty(None).is_empty());
        assert!(decode_or_empty(Some("[]")).is_empty());
    }

    #[test]
    fn malformed_entries_are_skipped_and_the_rest_kept() {
        let raw = r#"[
            {"id":"1","loadLocation":"Dhaka","unloadLocation":"Sylhet","date":"2024-01-01T00:00:00.000Z"},
            {"id":"2","loadLocation":"Dhaka","unloadLocation":"Khulna","date":"2024-01-02"},
            7,
            {"id":"3","loadLocation":"Rajshahi","unloadLocation":"Dhaka","date":"2024-01-03T00:00:00.000Z"}
        ]"#;

        let ids = decode_or_empty(Some(raw))
            .into_iter()
            .map(|trip| trip.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, ["1", "3"]);
    }
}
