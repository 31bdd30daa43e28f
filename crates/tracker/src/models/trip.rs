//! Trips: one run of a route on a given day and session.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::identifiers::{RouteIdentifier, TripIdentifier};
use crate::models::types::{Result, Session, TrackerError};

/// Identifies a trip by route, service date and session.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TripKey {
    pub route_id: RouteIdentifier,
    pub date: NaiveDate,
    pub session: Session,
}

impl TripKey {
    pub fn new(route_id: impl Into<RouteIdentifier>, date: NaiveDate, session: Session) -> Self {
        Self {
            route_id: route_id.into(),
            date,
            session,
        }
    }

    /// Document id used by the store, e.g. `north_2024-05-02_AM`.
    pub fn identifier(&self) -> TripIdentifier {
        TripIdentifier::new(self.to_string())
    }
}

impl fmt::Display for TripKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.route_id, self.date.format("%Y-%m-%d"), self.session)
    }
}

/// Splits from the right, so route ids may themselves contain underscores.
impl FromStr for TripKey {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || TrackerError::InvalidTripKey(s.to_string());

        let mut parts = s.rsplitn(3, '_');
        let session = parts.next().ok_or_else(invalid)?;
        let date = parts.next().ok_or_else(invalid)?;
        let route = parts.next().filter(|r| !r.is_empty()).ok_or_else(invalid)?;

        Ok(Self {
            route_id: RouteIdentifier::new(route),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| invalid())?,
            session: session.parse().map_err(|_| invalid())?,
        })
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TripKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for TripKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum TripStatus {
    #[strum(to_string = "LIVE")]
    Live,
    #[strum(to_string = "ENDED")]
    Ended,
}

/// A started trip. Trips that have not started are simply absent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trip {
    key: TripKey,
    status: TripStatus,
    trip_start_hm: Option<String>,
}

impl Trip {
    /// Starts a trip at the driver's chosen `HH:MM`.
    pub fn start(key: TripKey, trip_start_hm: impl Into<String>) -> Self {
        Self {
            key,
            status: TripStatus::Live,
            trip_start_hm: Some(trip_start_hm.into()),
        }
    }

    /// Rebuilds a trip from a stored document, whatever its state.
    pub fn from_parts(key: TripKey, status: TripStatus, trip_start_hm: Option<String>) -> Self {
        Self {
            key,
            status,
            trip_start_hm,
        }
    }

    pub fn end(&mut self) -> Result<()> {
        if self.status == TripStatus::Ended {
            return Err(TrackerError::TripAlreadyEnded(self.key.identifier()));
        }
        self.status = TripStatus::Ended;
        Ok(())
    }

    pub fn key(&self) -> &TripKey {
        &self.key
    }

    pub fn status(&self) -> TripStatus {
        self.status
    }

    pub fn is_live(&self) -> bool {
        self.status == TripStatus::Live
    }

    pub fn start_hm(&self) -> Option<&str> {
        self.trip_start_hm.as_deref()
    }
}
