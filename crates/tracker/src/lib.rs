//! # school-run-tracker
//!
//! Status and ETA estimation for school bus runs.
//!
//! ## Features
//!
//! - **Stop-sequence ETAs**: predicts when the bus reaches each student from
//!   the trip start (AM) or the school arrival (PM), walking stops in order
//! - **Event logs**: append-only, ordered trip logs split into pickup,
//!   dropoff and bus views
//! - **Legacy wire strings**: event and status enums render the exact tokens
//!   existing dashboards match on
//! - **Snapshots**: load a whole route through a [`TrackerProvider`] and
//!   compute the board, progress counters and next stop
//!
//! ## Example
//!
//! ```
//! use school_run_tracker::prelude::*;
//! use chrono::NaiveDate;
//!
//! let key = TripKey::new("north", NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(), Session::Am);
//! let mut provider = StaticTrackerProvider::new().with_route(
//!     "north",
//!     vec![
//!         StudentEntry::new("amira", Some(1)).with_minutes(Some(5), None),
//!         StudentEntry::new("bilal", Some(2)).with_minutes(Some(10), None),
//!     ],
//! );
//! provider.start_trip(key.clone(), "07:00", None).unwrap();
//!
//! let snapshot = RouteSnapshot::load(&provider, key);
//! assert_eq!(snapshot.estimate_for(&"bilal".into()).to_string(), "07:05");
//! ```

pub mod board;
pub mod clock;
pub mod eta;
pub mod identifiers;
pub mod models;
pub mod provider;

// Re-exports for convenience
pub mod prelude {
    pub use crate::board::{BoardEntry, RouteSnapshot, TripProgress};
    pub use crate::clock::{default_session, format_clock, format_instant, parse_clock, ClockTime};
    pub use crate::eta::{estimate, EtaStatus, StatusCategory};
    pub use crate::identifiers::*;
    pub use crate::models::{
        event_log::*, roster::*, traits::*, trip::*, types::*,
    };
    pub use crate::provider::StaticTrackerProvider;
}

pub use prelude::*;
