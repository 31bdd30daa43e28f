//! In-memory tracker provider.
//!
//! Holds rosters, trips, logs and overrides in plain maps. Used for snapshot
//! files, tests, and anywhere the real store has already been read.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::identifiers::*;
use crate::models::{event_log::EventLog, roster::*, traits::*, trip::*, types::*};

#[derive(Clone, Debug, Default)]
pub struct StaticTrackerProvider {
    rosters: HashMap<RouteIdentifier, Vec<StudentEntry>>,
    trips: HashMap<TripKey, Trip>,
    logs: HashMap<TripKey, EventLog>,
    overrides: HashMap<TripKey, DurationOverrides>,
}

impl StaticTrackerProvider {
    /// Create a new empty provider
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, route_id: impl Into<RouteIdentifier>, students: Vec<StudentEntry>) -> Self {
        self.rosters.insert(route_id.into(), students);
        self
    }

    pub fn with_trip(mut self, trip: Trip) -> Self {
        self.trips.insert(trip.key().clone(), trip);
        self
    }

    pub fn with_events(mut self, key: TripKey, log: EventLog) -> Self {
        self.logs.insert(key, log);
        self
    }

    pub fn with_overrides(mut self, key: TripKey, overrides: DurationOverrides) -> Self {
        self.overrides.insert(key, overrides);
        self
    }

    // ---- Store writes ----

    /// Starts the trip and logs `BUS_STARTED`.
    pub fn start_trip(&mut self, key: TripKey, trip_start_hm: &str, at: Option<chrono::NaiveDateTime>) -> Result<()> {
        info!(trip = %key, trip_start_hm, "starting trip");
        self.logs
            .entry(key.clone())
            .or_default()
            .append(DomainEvent::bus(EventType::BusStarted, at))?;
        self.trips.insert(key.clone(), Trip::start(key, trip_start_hm));
        Ok(())
    }

    /// Ends the trip and logs `BUS_ENDED`.
    pub fn end_trip(&mut self, key: &TripKey, at: Option<chrono::NaiveDateTime>) -> Result<()> {
        info!(trip = %key, "ending trip");
        let trip = self
            .trips
            .get_mut(key)
            .ok_or_else(|| TrackerError::TripNotFound(key.identifier()))?;
        trip.end()?;
        self.logs
            .entry(key.clone())
            .or_default()
            .append(DomainEvent::bus(EventType::BusEnded, at))
    }

    /// Appends an event to a live trip.
    ///
    /// Terminal drops also mark the student done for the session, the way the
    /// driver dashboard records them.
    pub fn record_event(&mut self, key: &TripKey, event: DomainEvent) -> Result<()> {
        match self.trips.get(key) {
            None => return Err(TrackerError::TripNotFound(key.identifier())),
            Some(trip) if !trip.is_live() => return Err(TrackerError::TripAlreadyEnded(key.identifier())),
            Some(_) => {}
        }

        let student = match &event.student_id {
            Some(student_id) => {
                let roster = self.rosters.get_mut(&key.route_id);
                let student = roster
                    .and_then(|students| students.iter_mut().find(|s| &s.id == student_id))
                    .ok_or_else(|| TrackerError::StudentNotFound(student_id.clone()))?;
                Some(student)
            }
            None => None,
        };

        let event_type = event.event_type;
        self.logs.entry(key.clone()).or_default().append(event)?;
        debug!(trip = %key, %event_type, "recorded event");

        if let Some(student) = student {
            match event_type {
                EventType::DroppedSchoolAm => student.done_am = true,
                EventType::DroppedPm => student.done_pm = true,
                _ => {}
            }
        }
        Ok(())
    }

    /// Sets or resets (`None`) today's minutes for a student.
    pub fn set_override(&mut self, key: &TripKey, student_id: impl Into<StudentIdentifier>, minutes: Option<Minutes>) {
        self.overrides.entry(key.clone()).or_default().set(student_id, minutes);
    }
}

impl TrackerProvider for StaticTrackerProvider {
    fn get_trip(&self, key: &TripKey) -> Option<Trip> {
        self.trips.get(key).cloned()
    }

    fn students_on_route(&self, route_id: &RouteIdentifier) -> Vec<StudentEntry> {
        self.rosters.get(route_id).cloned().unwrap_or_default()
    }

    fn events_for(&self, key: &TripKey) -> EventLog {
        self.logs.get(key).cloned().unwrap_or_default()
    }

    fn overrides_for(&self, key: &TripKey) -> DurationOverrides {
        self.overrides.get(key).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn key(session: Session) -> TripKey {
        TripKey::new("north", NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(), session)
    }

    fn at(h: u32, m: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2024, 5, 2).unwrap().and_hms_opt(h, m, 0)
    }

    fn provider() -> StaticTrackerProvider {
        StaticTrackerProvider::new().with_route(
            "north",
            vec![StudentEntry::new("amira", Some(1)), StudentEntry::new("bilal", Some(2))],
        )
    }

    #[test]
    fn test_empty_provider() {
        let provider = StaticTrackerProvider::new();
        let key = key(Session::Am);

        assert!(provider.get_trip(&key).is_none());
        assert!(provider.students_on_route(&key.route_id).is_empty());
        assert!(provider.events_for(&key).is_empty());
        assert!(provider.overrides_for(&key).is_empty());
    }

    #[test]
    fn test_trip_lifecycle_is_logged() {
        let mut provider = provider();
        let key = key(Session::Am);

        provider.start_trip(key.clone(), "07:00", at(7, 0)).unwrap();
        assert_eq!(provider.get_trip(&key).unwrap().start_hm(), Some("07:00"));

        provider.end_trip(&key, at(7, 40)).unwrap();
        assert!(!provider.get_trip(&key).unwrap().is_live());
        assert!(matches!(provider.end_trip(&key, at(7, 41)), Err(TrackerError::TripAlreadyEnded(_))));

        let types: Vec<EventType> = provider.events_for(&key).events().iter().map(|e| e.event_type).collect();
        assert_eq!(types, [EventType::BusStarted, EventType::BusEnded]);
    }

    #[test]
    fn test_record_event_marks_done() {
        let mut provider = provider();
        let key = key(Session::Am);
        provider.start_trip(key.clone(), "07:00", at(7, 0)).unwrap();

        provider
            .record_event(&key, DomainEvent::student(EventType::PickedAm, "amira", at(7, 2)))
            .unwrap();
        assert!(!provider.students_on_route(&key.route_id)[0].done_am);

        provider
            .record_event(&key, DomainEvent::student(EventType::DroppedSchoolAm, "amira", at(7, 30)))
            .unwrap();
        assert!(provider.students_on_route(&key.route_id)[0].done_am);
        assert_eq!(provider.events_for(&key).len(), 3);
    }

    #[test]
    fn test_record_event_rejections() {
        let mut provider = provider();
        let key = key(Session::Am);
        let event = DomainEvent::student(EventType::PickedAm, "amira", at(7, 2));

        assert!(matches!(
            provider.record_event(&key, event.clone()),
            Err(TrackerError::TripNotFound(_))
        ));

        provider.start_trip(key.clone(), "07:00", at(7, 0)).unwrap();
        assert!(matches!(
            provider.record_event(&key, DomainEvent::student(EventType::PickedAm, "zoe", at(7, 3))),
            Err(TrackerError::StudentNotFound(_))
        ));

        provider.end_trip(&key, at(7, 40)).unwrap();
        assert!(matches!(
            provider.record_event(&key, event),
            Err(TrackerError::TripAlreadyEnded(_))
        ));
    }

    #[test]
    fn test_rejected_event_leaves_student_untouched() {
        let mut provider = provider();
        let key = key(Session::Pm);
        provider.start_trip(key.clone(), "14:00", at(14, 0)).unwrap();

        let late = DomainEvent::student(EventType::DroppedPm, "amira", at(13, 59));
        assert!(matches!(
            provider.record_event(&key, late),
            Err(TrackerError::OutOfOrderEvent { .. })
        ));
        assert!(!provider.students_on_route(&key.route_id)[0].done_pm);
    }

    #[test]
    fn test_overrides_per_trip() {
        let mut provider = provider();
        let am = key(Session::Am);

        provider.set_override(&am, "amira", Some(3));
        assert_eq!(provider.overrides_for(&am).get(&"amira".into()), Some(3));
        assert!(provider.overrides_for(&key(Session::Pm)).is_empty());

        provider.set_override(&am, "amira", None);
        assert_eq!(provider.overrides_for(&am).get(&"amira".into()), None);
    }
}
