//! Core data types and enums for trip tracking.

use chrono::NaiveDateTime;

use crate::clock::ClockTime;
use crate::identifiers::*;

// ============================================================================
// Enums
// ============================================================================

/// One of the two daily runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Session {
    /// Home to school
    #[strum(to_string = "AM")]
    #[cfg_attr(feature = "serde", serde(rename = "AM"))]
    Am,
    /// School to home
    #[strum(to_string = "PM")]
    #[cfg_attr(feature = "serde", serde(rename = "PM"))]
    Pm,
}

impl Session {
    /// The event marking a student as boarded in this session.
    pub fn pickup_event(self) -> EventType {
        match self {
            Self::Am => EventType::PickedAm,
            Self::Pm => EventType::PickedSchoolPm,
        }
    }

    /// The terminal event for a student in this session.
    pub fn dropoff_event(self) -> EventType {
        match self {
            Self::Am => EventType::DroppedSchoolAm,
            Self::Pm => EventType::DroppedPm,
        }
    }
}

/// Event vocabulary recorded in a trip's log.
///
/// The string forms are shared with existing consumers and must not change.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum EventType {
    #[strum(to_string = "BUS_STARTED")]
    BusStarted,
    #[strum(to_string = "BUS_ARRIVED_SCHOOL")]
    BusArrivedSchool,
    #[strum(to_string = "PICKED_AM")]
    PickedAm,
    #[strum(to_string = "DROPPED_SCHOOL_AM")]
    DroppedSchoolAm,
    #[strum(to_string = "PICKED_SCHOOL_PM")]
    PickedSchoolPm,
    #[strum(to_string = "DROPPED_PM")]
    DroppedPm,
    #[strum(to_string = "BUS_ENDED")]
    BusEnded,
}

/// Which view of the log an event belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventCategory {
    Pickup,
    Dropoff,
    Bus,
}

impl EventType {
    pub fn category(self) -> EventCategory {
        match self {
            Self::PickedAm | Self::PickedSchoolPm => EventCategory::Pickup,
            Self::DroppedSchoolAm | Self::DroppedPm => EventCategory::Dropoff,
            Self::BusStarted | Self::BusArrivedSchool | Self::BusEnded => EventCategory::Bus,
        }
    }

    /// Whether the event must name a student.
    pub fn is_student_scoped(self) -> bool {
        self.category() != EventCategory::Bus
    }

    /// Human readable title for timelines.
    pub fn title(self) -> &'static str {
        match self {
            Self::BusStarted => "Bus started",
            Self::BusArrivedSchool => "Bus arrived at school",
            Self::PickedAm => "Picked up from home",
            Self::DroppedSchoolAm => "Dropped at school",
            Self::PickedSchoolPm => "Picked up from school",
            Self::DroppedPm => "Dropped home",
            Self::BusEnded => "Trip completed",
        }
    }
}

// ============================================================================
// Data Structures
// ============================================================================

/// A single entry in a trip's event log.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DomainEvent {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub event_type: EventType,
    #[cfg_attr(feature = "serde", serde(default, alias = "studentId"))]
    pub student_id: Option<StudentIdentifier>,
    /// `None` while the store has not resolved the server timestamp yet.
    #[cfg_attr(feature = "serde", serde(default))]
    pub timestamp: Option<NaiveDateTime>,
}

impl DomainEvent {
    pub fn bus(event_type: EventType, timestamp: Option<NaiveDateTime>) -> Self {
        Self {
            event_type,
            student_id: None,
            timestamp,
        }
    }

    pub fn student(
        event_type: EventType,
        student_id: impl Into<StudentIdentifier>,
        timestamp: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            event_type,
            student_id: Some(student_id.into()),
            timestamp,
        }
    }

    pub fn is_for(&self, student_id: &StudentIdentifier) -> bool {
        self.student_id.as_ref() == Some(student_id)
    }

    pub fn is(&self, event_type: EventType, student_id: &StudentIdentifier) -> bool {
        self.event_type == event_type && self.is_for(student_id)
    }

    /// Wall-clock time of the event, if recorded.
    pub fn time(&self) -> Option<ClockTime> {
        self.timestamp.as_ref().map(ClockTime::of)
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Student not found: {0}")]
    StudentNotFound(StudentIdentifier),

    #[error("Trip not found: {0}")]
    TripNotFound(TripIdentifier),

    #[error("Trip already ended: {0}")]
    TripAlreadyEnded(TripIdentifier),

    #[error("Event {event_type} at {timestamp} is earlier than the last recorded event at {latest}")]
    OutOfOrderEvent {
        event_type: EventType,
        timestamp: NaiveDateTime,
        latest: NaiveDateTime,
    },

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Invalid trip key: {0}")]
    InvalidTripKey(String),

    #[error("Invalid clock time: {0}")]
    InvalidClockTime(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
