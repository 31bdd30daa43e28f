//! Status values produced by the estimator and their legacy string forms.

use std::fmt;
use std::str::FromStr;

use crate::clock::{ClockTime, PLACEHOLDER};
use crate::models::types::TrackerError;

const NOT_AT_SCHOOL: &str = "NOT AT SCHOOL";
const AT_HOME: &str = "AT HOME";
const AT_SCHOOL: &str = "AT SCHOOL";
const HOME_PREFIX: &str = "HOME: ";
const SCHOOL_PREFIX: &str = "SCHOOL: ";
const PICKED_PREFIX: &str = "PICKED: ";
const AWAITING_SUFFIX: &str = " (at school)";

/// Where a student stands in today's run.
///
/// `Display` renders the exact strings dashboards have always matched on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EtaStatus {
    /// `--:--`
    Unavailable,
    /// `NOT AT SCHOOL`
    NotAtSchool,
    /// `HOME: HH:MM`, or `AT HOME` without a recorded time
    Home(Option<ClockTime>),
    /// `PICKED: HH:MM`
    Picked(ClockTime),
    /// `HH:MM (at school)`
    AwaitingSchoolArrival(ClockTime),
    /// `HH:MM`
    Estimated(ClockTime),
    /// `SCHOOL: HH:MM`, or `AT SCHOOL` without a recorded time
    AtSchool(Option<ClockTime>),
}

/// Coarse grouping used to pick a chip style on dashboards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum StatusCategory {
    Unknown,
    NotAtSchool,
    AtHome,
    Picked,
    AtSchool,
    AwaitingSchoolArrival,
    Pending,
}

impl EtaStatus {
    pub fn category(&self) -> StatusCategory {
        match self {
            Self::Unavailable => StatusCategory::Unknown,
            Self::NotAtSchool => StatusCategory::NotAtSchool,
            Self::Home(_) => StatusCategory::AtHome,
            Self::Picked(_) => StatusCategory::Picked,
            Self::AwaitingSchoolArrival(_) => StatusCategory::AwaitingSchoolArrival,
            Self::Estimated(_) => StatusCategory::Pending,
            Self::AtSchool(_) => StatusCategory::AtSchool,
        }
    }

    /// The clock time carried by the status, recorded or predicted.
    pub fn time(&self) -> Option<ClockTime> {
        match *self {
            Self::Unavailable | Self::NotAtSchool => None,
            Self::Home(t) | Self::AtSchool(t) => t,
            Self::Picked(t) | Self::AwaitingSchoolArrival(t) | Self::Estimated(t) => Some(t),
        }
    }

    /// True for predictions, false for recorded facts and sentinels.
    pub fn is_estimate(&self) -> bool {
        matches!(self, Self::AwaitingSchoolArrival(_) | Self::Estimated(_))
    }
}

impl fmt::Display for EtaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => f.write_str(PLACEHOLDER),
            Self::NotAtSchool => f.write_str(NOT_AT_SCHOOL),
            Self::Home(Some(t)) => write!(f, "{HOME_PREFIX}{t}"),
            Self::Home(None) => f.write_str(AT_HOME),
            Self::Picked(t) => write!(f, "{PICKED_PREFIX}{t}"),
            Self::AwaitingSchoolArrival(t) => write!(f, "{t}{AWAITING_SUFFIX}"),
            Self::Estimated(t) => write!(f, "{t}"),
            Self::AtSchool(Some(t)) => write!(f, "{SCHOOL_PREFIX}{t}"),
            Self::AtSchool(None) => f.write_str(AT_SCHOOL),
        }
    }
}

impl FromStr for EtaStatus {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let clock = |t: &str| t.parse::<ClockTime>().map_err(|_| TrackerError::InvalidStatus(s.to_string()));

        match s {
            PLACEHOLDER => return Ok(Self::Unavailable),
            NOT_AT_SCHOOL => return Ok(Self::NotAtSchool),
            AT_HOME => return Ok(Self::Home(None)),
            AT_SCHOOL => return Ok(Self::AtSchool(None)),
            _ => {}
        }

        if let Some(t) = s.strip_prefix(HOME_PREFIX) {
            Ok(Self::Home(Some(clock(t)?)))
        } else if let Some(t) = s.strip_prefix(SCHOOL_PREFIX) {
            Ok(Self::AtSchool(Some(clock(t)?)))
        } else if let Some(t) = s.strip_prefix(PICKED_PREFIX) {
            Ok(Self::Picked(clock(t)?))
        } else if let Some(t) = s.strip_suffix(AWAITING_SUFFIX) {
            Ok(Self::AwaitingSchoolArrival(clock(t)?))
        } else {
            Ok(Self::Estimated(clock(s)?))
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for EtaStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for EtaStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
