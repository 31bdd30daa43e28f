//! ETA and status estimation.

pub mod estimator;
pub mod status;

pub use estimator::{estimate, SCHOOL_ARRIVAL_PLACEHOLDER_MINUTES};
pub use status::{EtaStatus, StatusCategory};
