//! Trip tracking models, types, and traits.

pub mod event_log;
pub mod roster;
pub mod traits;
pub mod trip;
pub mod types;

// Re-exports for convenience
pub use event_log::{EventLog, EventViews, TimelineEntry};
pub use roster::{sequence, DurationOverrides, Minutes, StudentEntry, LEAVE_STATUS};
pub use traits::TrackerProvider;
pub use trip::{Trip, TripKey, TripStatus};
pub use types::{DomainEvent, EventCategory, EventType, Result, Session, TrackerError};
