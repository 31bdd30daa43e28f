use anyhow::{Context, Result};
use school_run_tracker::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// A route frozen at one point in time, as exported from the store.
#[derive(Debug, Deserialize)]
pub struct SnapshotFile {
    pub trip_key: TripKey,
    #[serde(default)]
    pub trip: Option<TripDocument>,
    #[serde(default)]
    pub students: Vec<StudentEntry>,
    #[serde(default)]
    pub overrides: DurationOverrides,
    #[serde(default)]
    pub events: Vec<DomainEvent>,
}

#[derive(Debug, Deserialize)]
pub struct TripDocument {
    #[serde(default = "live")]
    pub status: TripStatus,
    #[serde(default, alias = "tripStartHM")]
    pub trip_start_hm: Option<String>,
}

fn live() -> TripStatus {
    TripStatus::Live
}

pub fn parse_snapshot(text: &str) -> Result<SnapshotFile> {
    serde_json::from_str(text).context("Snapshot is not valid JSON")
}

pub fn read_snapshot(path: &Path) -> Result<SnapshotFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    parse_snapshot(&text)
}

impl SnapshotFile {
    /// Loads the file's contents into an in-memory provider.
    pub fn into_provider(self) -> Result<(StaticTrackerProvider, TripKey)> {
        let key = self.trip_key;

        let events = EventLog::from_events(self.events).context("Snapshot event log is invalid")?;
        log::debug!("Loaded {} events for {}", events.len(), key);

        let mut provider = StaticTrackerProvider::new()
            .with_route(key.route_id.clone(), self.students)
            .with_events(key.clone(), events)
            .with_overrides(key.clone(), self.overrides);

        if let Some(trip) = self.trip {
            provider = provider.with_trip(Trip::from_parts(key.clone(), trip.status, trip.trip_start_hm));
        } else {
            log::info!("Trip {} has not started", key);
        }

        Ok((provider, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MORNING: &str = r#"{
        "trip_key": "north_2024-05-02_AM",
        "trip": {"status": "LIVE", "tripStartHM": "07:00"},
        "students": [
            {"id": "chen", "stopOrder": 3, "minsAM": 7},
            {"id": "amira", "stopOrder": 1, "minsAM": "5"},
            {"id": "bilal", "stopOrder": 2, "minsAM": 10},
            {"id": "dana", "stopOrder": null}
        ],
        "overrides": {"bilal": null},
        "events": [
            {"type": "BUS_STARTED", "timestamp": "2024-05-02T07:00:00"},
            {"type": "PICKED_AM", "student_id": "amira", "timestamp": "2024-05-02T07:03:00"}
        ]
    }"#;

    #[test]
    fn test_snapshot_into_provider() {
        let (provider, key) = parse_snapshot(MORNING).unwrap().into_provider().unwrap();
        assert_eq!(key.to_string(), "north_2024-05-02_AM");

        let snapshot = RouteSnapshot::load(&provider, key);
        let statuses: Vec<String> = snapshot.board().iter().map(|e| e.status.to_string()).collect();
        assert_eq!(statuses, ["PICKED: 07:03", "07:00", "07:10"]);
    }

    #[test]
    fn test_snapshot_without_trip() {
        let text = r#"{"trip_key": "north_2024-05-02_PM", "students": [{"id": "amira", "stop_order": 1}]}"#;
        let (provider, key) = parse_snapshot(text).unwrap().into_provider().unwrap();

        let snapshot = RouteSnapshot::load(&provider, key);
        assert!(snapshot.trip.is_none());
        assert_eq!(snapshot.board()[0].status, EtaStatus::Unavailable);
    }

    #[test]
    fn test_snapshot_rejects_unordered_log() {
        let text = r#"{
            "trip_key": "north_2024-05-02_AM",
            "events": [
                {"type": "BUS_STARTED", "timestamp": "2024-05-02T07:00:00"},
                {"type": "PICKED_AM", "student_id": "amira", "timestamp": "2024-05-02T06:59:00"}
            ]
        }"#;
        assert!(parse_snapshot(text).unwrap().into_provider().is_err());
    }

    #[test]
    fn test_snapshot_accepts_store_export() {
        let text = r#"{
            "trip_key": "north_2024-05-02_AM",
            "trip": {"tripStartHM": "07:00"},
            "students": [
                {"id": "amira", "stopOrder": 1, "minsAM": 5, "doneAM": null, "status": null},
                {"id": "bilal", "stopOrder": 2, "minsAM": 10, "doneAM": false}
            ],
            "events": [
                {"type": "PICKED_AM", "studentId": "amira", "timestamp": "2024-05-02T07:04:00"}
            ]
        }"#;
        let (provider, key) = parse_snapshot(text).unwrap().into_provider().unwrap();

        let snapshot = RouteSnapshot::load(&provider, key);
        let statuses: Vec<String> = snapshot.board().iter().map(|e| e.status.to_string()).collect();
        assert_eq!(statuses, ["PICKED: 07:04", "07:00"]);
    }

    #[test]
    fn test_snapshot_rejects_bad_trip_key() {
        assert!(parse_snapshot(r#"{"trip_key": "north"}"#).is_err());
    }
}
