//! Read-model interface over the backing store.
//!
//! The store owns and mutates all of this data; implementations hand out
//! snapshots. They can be in-memory, database-backed, or remote.

use crate::identifiers::RouteIdentifier;
use crate::models::event_log::EventLog;
use crate::models::roster::{DurationOverrides, StudentEntry};
use crate::models::trip::{Trip, TripKey};

/// Provider of route, trip and event snapshots.
pub trait TrackerProvider: Send + Sync {
    /// The trip document, if the driver has started it.
    fn get_trip(&self, key: &TripKey) -> Option<Trip>;

    /// Every student assigned to the route, sequenced or not, in store order.
    fn students_on_route(&self, route_id: &RouteIdentifier) -> Vec<StudentEntry>;

    /// The trip's event log. Empty when nothing has been recorded.
    fn events_for(&self, key: &TripKey) -> EventLog;

    /// Today's duration overrides for the trip.
    fn overrides_for(&self, key: &TripKey) -> DurationOverrides;
}
