//! Stop-sequence ETA estimation.
//!
//! Given a snapshot of a route, works out where one student stands in the
//! current session and, when nothing has happened to them yet, when the bus
//! should reach them. The bus is assumed to visit stops strictly in stop
//! order, spending each pending student's configured minutes on the way.

use tracing::debug;

use crate::clock::{parse_clock, ClockTime};
use crate::eta::status::EtaStatus;
use crate::identifiers::StudentIdentifier;
use crate::models::event_log::EventViews;
use crate::models::roster::{sequence, DurationOverrides, Minutes, StudentEntry};
use crate::models::types::{EventType, Session};

/// Placeholder lead time shown for PM students while the bus is still on its
/// way to school.
pub const SCHOOL_ARRIVAL_PLACEHOLDER_MINUTES: Minutes = 10;

/// Computes the status of `student_id` for `session`.
///
/// Never fails: bad input degrades to [`EtaStatus::Unavailable`], missing
/// durations count as zero.
pub fn estimate(
    session: Session,
    student_id: &StudentIdentifier,
    trip_start_hm: Option<&str>,
    students: &[StudentEntry],
    overrides: &DurationOverrides,
    events: &EventViews<'_>,
) -> EtaStatus {
    let Some(start) = parse_clock(trip_start_hm) else {
        debug!(?trip_start_hm, "no usable trip start");
        return EtaStatus::Unavailable;
    };

    let route = sequence(students);
    let Some(me) = route.iter().copied().find(|s| &s.id == student_id) else {
        debug!(%student_id, "student is not sequenced on this route");
        return EtaStatus::Unavailable;
    };

    let plan = RoutePlan {
        route: &route,
        overrides,
        events,
    };

    match session {
        Session::Am => plan.morning(me, start),
        Session::Pm => plan.afternoon(me, start),
    }
}

struct RoutePlan<'r, 'e> {
    route: &'r [&'r StudentEntry],
    overrides: &'r DurationOverrides,
    events: &'r EventViews<'e>,
}

impl RoutePlan<'_, '_> {
    fn morning(&self, me: &StudentEntry, start: Minutes) -> EtaStatus {
        if me.done_am {
            let dropped = self.events.dropoff(EventType::DroppedSchoolAm, &me.id);
            return EtaStatus::AtSchool(dropped.and_then(|e| e.time()));
        }

        if let Some(at) = self
            .events
            .pickup(EventType::PickedAm, &me.id)
            .and_then(|e| e.time())
        {
            return EtaStatus::Picked(at);
        }

        let ahead = self
            .route
            .iter()
            .copied()
            .take_while(|s| s.id != me.id)
            .filter(|s| self.events.pickup(EventType::PickedAm, &s.id).is_none());

        EtaStatus::Estimated(ClockTime::wrapping(
            start.wrapping_add(self.minutes(ahead, Session::Am)),
        ))
    }

    fn afternoon(&self, me: &StudentEntry, start: Minutes) -> EtaStatus {
        let reached_school = self
            .events
            .dropoff(EventType::DroppedSchoolAm, &me.id)
            .is_some();
        if !reached_school && !me.done_am {
            return EtaStatus::NotAtSchool;
        }

        if me.done_pm {
            let dropped = self.events.dropoff(EventType::DroppedPm, &me.id);
            return EtaStatus::Home(dropped.and_then(|e| e.time()));
        }

        if let Some(at) = self
            .events
            .pickup(EventType::PickedSchoolPm, &me.id)
            .and_then(|e| e.time())
        {
            return EtaStatus::Picked(at);
        }

        let Some(arrival) = self.events.bus_event(EventType::BusArrivedSchool) else {
            return EtaStatus::AwaitingSchoolArrival(ClockTime::wrapping(
                start.wrapping_add(SCHOOL_ARRIVAL_PLACEHOLDER_MINUTES),
            ));
        };
        let Some(arrival) = arrival.time() else {
            debug!("school arrival recorded without a timestamp");
            return EtaStatus::Unavailable;
        };

        let ahead = self
            .route
            .iter()
            .copied()
            .take_while(|s| s.id != me.id)
            .filter(|s| self.events.dropoff(EventType::DroppedPm, &s.id).is_none());

        EtaStatus::Estimated(arrival.add_minutes(self.minutes(ahead, Session::Pm)))
    }

    /// Total stop time of `students`. Wraps instead of overflowing on absurd input.
    fn minutes<'s>(&self, students: impl Iterator<Item = &'s StudentEntry>, session: Session) -> Minutes {
        students.fold(0, |total: Minutes, s| {
            total.wrapping_add(self.overrides.effective_minutes(s, session))
        })
    }
}
