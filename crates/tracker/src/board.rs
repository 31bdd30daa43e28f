//! Route snapshots and the per-trip status board.
//!
//! A [`RouteSnapshot`] freezes everything the estimator needs for one trip so
//! every student on the board is computed against the same point in time.

use tracing::debug;

use crate::eta::{estimate, EtaStatus};
use crate::identifiers::StudentIdentifier;
use crate::models::{
    event_log::EventLog,
    roster::{sequence, DurationOverrides, StudentEntry},
    traits::TrackerProvider,
    trip::{Trip, TripKey},
    types::Session,
};

/// Consistent view of one trip and its route.
#[derive(Clone, Debug)]
pub struct RouteSnapshot {
    pub key: TripKey,
    pub trip: Option<Trip>,
    pub students: Vec<StudentEntry>,
    pub overrides: DurationOverrides,
    pub log: EventLog,
}

/// One row of the board.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BoardEntry {
    pub student_id: StudentIdentifier,
    pub stop_order: i64,
    pub status: EtaStatus,
}

/// Counters shown on the driver dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TripProgress {
    pub total: usize,
    /// Students with the session's pickup event
    pub picked: usize,
    /// Students done for the session
    pub dropped: usize,
    pub remaining: usize,
    /// `dropped` as a rounded percentage of `total`
    pub percent: u8,
}

impl RouteSnapshot {
    pub fn load(provider: &dyn TrackerProvider, key: TripKey) -> Self {
        let snapshot = Self {
            trip: provider.get_trip(&key),
            students: provider.students_on_route(&key.route_id),
            overrides: provider.overrides_for(&key),
            log: provider.events_for(&key),
            key,
        };
        debug!(
            trip = %snapshot.key,
            students = snapshot.students.len(),
            events = snapshot.log.len(),
            "loaded route snapshot"
        );
        snapshot
    }

    pub fn session(&self) -> Session {
        self.key.session
    }

    fn trip_start_hm(&self) -> Option<&str> {
        self.trip.as_ref().and_then(Trip::start_hm)
    }

    pub fn estimate_for(&self, student_id: &StudentIdentifier) -> EtaStatus {
        if self.trip.is_none() {
            return EtaStatus::Unavailable;
        }
        estimate(
            self.session(),
            student_id,
            self.trip_start_hm(),
            &self.students,
            &self.overrides,
            &self.log.views(),
        )
    }

    /// Status of every sequenced student, in stop order.
    pub fn board(&self) -> Vec<BoardEntry> {
        let views = self.log.views();
        let trip_start_hm = self.trip_start_hm();

        sequence(&self.students)
            .into_iter()
            .map(|student| {
                let status = match &self.trip {
                    Some(_) => estimate(
                        self.session(),
                        &student.id,
                        trip_start_hm,
                        &self.students,
                        &self.overrides,
                        &views,
                    ),
                    None => EtaStatus::Unavailable,
                };
                BoardEntry {
                    student_id: student.id.clone(),
                    // sequence() only yields students with a stop order
                    stop_order: student.stop_order.unwrap_or_default(),
                    status,
                }
            })
            .collect()
    }

    /// Counts over every student on the route, sequenced or not.
    pub fn progress(&self) -> TripProgress {
        let session = self.session();
        let views = self.log.views();

        let total = self.students.len();
        let picked = self
            .students
            .iter()
            .filter(|s| views.pickup(session.pickup_event(), &s.id).is_some())
            .count();
        let dropped = self.students.iter().filter(|s| s.is_done(session)).count();

        let percent = if total == 0 {
            0
        } else {
            ((dropped * 100) as f64 / total as f64).round() as u8
        };

        TripProgress {
            total,
            picked,
            dropped,
            remaining: total - dropped,
            percent,
        }
    }

    /// The stop the bus should head to next.
    ///
    /// Stops are served in order, so the next one sits right after the
    /// completed ones; a student on leave or already done there means no
    /// stop is highlighted.
    pub fn next_stop(&self) -> Option<&StudentEntry> {
        let session = self.session();
        let dropped = self.students.iter().filter(|s| s.is_done(session)).count();

        sequence(&self.students)
            .into_iter()
            .nth(dropped)
            .filter(|s| !s.is_done(session) && !s.is_on_leave())
    }
}
