//! Append-only event log of a single trip.

use chrono::NaiveDateTime;
use tracing::warn;

use crate::clock::format_instant;
use crate::identifiers::StudentIdentifier;
use crate::models::types::*;

/// Ordered events of one trip.
///
/// Timestamps never decrease. Events without a timestamp are accepted and
/// keep their position, but do not move the ordering watermark.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<DomainEvent>,
    latest: Option<NaiveDateTime>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: impl IntoIterator<Item = DomainEvent>) -> Result<Self> {
        let mut log = Self::new();
        for event in events {
            log.append(event)?;
        }
        Ok(log)
    }

    pub fn append(&mut self, event: DomainEvent) -> Result<()> {
        match (event.event_type.is_student_scoped(), &event.student_id) {
            (true, None) => {
                return Err(TrackerError::InvalidEvent(format!(
                    "{} requires a student id",
                    event.event_type
                )));
            }
            (false, Some(student_id)) => {
                return Err(TrackerError::InvalidEvent(format!(
                    "{} is a bus event but names student {}",
                    event.event_type, student_id
                )));
            }
            _ => {}
        }

        if let Some(timestamp) = event.timestamp {
            if let Some(latest) = self.latest.filter(|latest| timestamp < *latest) {
                warn!(
                    event_type = %event.event_type,
                    %timestamp,
                    %latest,
                    "rejecting out of order event"
                );
                return Err(TrackerError::OutOfOrderEvent {
                    event_type: event.event_type,
                    timestamp,
                    latest,
                });
            }
            self.latest = Some(timestamp);
        }

        self.events.push(event);
        Ok(())
    }

    pub fn events(&self) -> &[DomainEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn views(&self) -> EventViews<'_> {
        EventViews::classify(&self.events)
    }

    /// Entries for a parent's timeline, highlighting the student's own events.
    pub fn timeline_for(&self, student_id: &StudentIdentifier) -> Vec<TimelineEntry> {
        self.events
            .iter()
            .map(|event| TimelineEntry {
                time: format_instant(event.timestamp.as_ref()),
                title: event.event_type.title(),
                event_type: event.event_type,
                highlight: event.is_for(student_id),
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimelineEntry {
    /// `HH:MM`, or the placeholder when the time is unknown
    pub time: String,
    pub title: &'static str,
    pub event_type: EventType,
    pub highlight: bool,
}

/// A log split by event category, each part in log order.
#[derive(Clone, Debug, Default)]
pub struct EventViews<'a> {
    pub pickups: Vec<&'a DomainEvent>,
    pub dropoffs: Vec<&'a DomainEvent>,
    pub bus: Vec<&'a DomainEvent>,
}

impl<'a> EventViews<'a> {
    pub fn classify(events: impl IntoIterator<Item = &'a DomainEvent>) -> Self {
        let mut views = Self::default();
        for event in events {
            match event.event_type.category() {
                EventCategory::Pickup => views.pickups.push(event),
                EventCategory::Dropoff => views.dropoffs.push(event),
                EventCategory::Bus => views.bus.push(event),
            }
        }
        views
    }

    /// First pickup of the given type for a student.
    pub fn pickup(&self, event_type: EventType, student_id: &StudentIdentifier) -> Option<&'a DomainEvent> {
        self.pickups.iter().copied().find(|e| e.is(event_type, student_id))
    }

    /// First dropoff of the given type for a student.
    pub fn dropoff(&self, event_type: EventType, student_id: &StudentIdentifier) -> Option<&'a DomainEvent> {
        self.dropoffs.iter().copied().find(|e| e.is(event_type, student_id))
    }

    /// First bus-level event of the given type.
    pub fn bus_event(&self, event_type: EventType) -> Option<&'a DomainEvent> {
        self.bus.iter().copied().find(|e| e.event_type == event_type)
    }
}
