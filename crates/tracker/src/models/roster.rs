//! Students on a route and their per-day duration overrides.

use std::collections::HashMap;

use crate::identifiers::StudentIdentifier;
use crate::models::types::Session;

/// Whole minutes. Negative values are kept as configured.
pub type Minutes = i64;

/// Status tag set by the admin panel for a student who is away.
pub const LEAVE_STATUS: &str = "LEAVE";

/// A student as stored on a route.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StudentEntry {
    pub id: StudentIdentifier,

    /// Position in the visiting sequence; `None` keeps the student off the route plan.
    #[cfg_attr(
        feature = "serde",
        serde(default, alias = "stopOrder", deserialize_with = "lenient::stop_order")
    )]
    pub stop_order: Option<i64>,

    #[cfg_attr(
        feature = "serde",
        serde(default, alias = "minsAM", deserialize_with = "lenient::minutes")
    )]
    pub mins_am: Option<Minutes>,

    #[cfg_attr(
        feature = "serde",
        serde(default, alias = "minsPM", deserialize_with = "lenient::minutes")
    )]
    pub mins_pm: Option<Minutes>,

    #[cfg_attr(
        feature = "serde",
        serde(default, alias = "doneAM", deserialize_with = "lenient::flag")
    )]
    pub done_am: bool,

    #[cfg_attr(
        feature = "serde",
        serde(default, alias = "donePM", deserialize_with = "lenient::flag")
    )]
    pub done_pm: bool,

    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "lenient::tag"))]
    pub status: Option<String>,
}

impl StudentEntry {
    pub fn new(id: impl Into<StudentIdentifier>, stop_order: Option<i64>) -> Self {
        Self {
            id: id.into(),
            stop_order,
            mins_am: None,
            mins_pm: None,
            done_am: false,
            done_pm: false,
            status: None,
        }
    }

    pub fn with_minutes(mut self, am: Option<Minutes>, pm: Option<Minutes>) -> Self {
        self.mins_am = am;
        self.mins_pm = pm;
        self
    }

    pub fn with_done(mut self, am: bool, pm: bool) -> Self {
        self.done_am = am;
        self.done_pm = pm;
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn is_sequenced(&self) -> bool {
        self.stop_order.is_some()
    }

    pub fn is_on_leave(&self) -> bool {
        self.status.as_deref() == Some(LEAVE_STATUS)
    }

    pub fn is_done(&self, session: Session) -> bool {
        match session {
            Session::Am => self.done_am,
            Session::Pm => self.done_pm,
        }
    }

    pub fn configured_minutes(&self, session: Session) -> Option<Minutes> {
        match session {
            Session::Am => self.mins_am,
            Session::Pm => self.mins_pm,
        }
    }
}

/// Orders the sequenced students by stop order.
///
/// Unsequenced entries are dropped. Equal stop orders keep their input order.
pub fn sequence(students: &[StudentEntry]) -> Vec<&StudentEntry> {
    let mut list: Vec<&StudentEntry> = students.iter().filter(|s| s.is_sequenced()).collect();
    list.sort_by_key(|s| s.stop_order);
    list
}

/// Per-day duration overrides for one trip, keyed by student.
///
/// A `None` value is an explicit reset and behaves like a missing entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DurationOverrides {
    #[cfg_attr(feature = "serde", serde(deserialize_with = "lenient::override_map"))]
    entries: HashMap<StudentIdentifier, Option<Minutes>>,
}

impl DurationOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, student_id: impl Into<StudentIdentifier>, minutes: Option<Minutes>) {
        self.entries.insert(student_id.into(), minutes);
    }

    /// The override in force for a student, ignoring resets.
    pub fn get(&self, student_id: &StudentIdentifier) -> Option<Minutes> {
        self.entries.get(student_id).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Minutes the bus spends on a student's stop today: override, else the
    /// configured value, else zero.
    pub fn effective_minutes(&self, student: &StudentEntry, session: Session) -> Minutes {
        self.get(&student.id)
            .or_else(|| student.configured_minutes(session))
            .unwrap_or(0)
    }
}

impl FromIterator<(StudentIdentifier, Option<Minutes>)> for DurationOverrides {
    fn from_iter<I: IntoIterator<Item = (StudentIdentifier, Option<Minutes>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Store documents are loosely typed: durations may arrive as numbers,
/// numeric strings or junk. Junk counts as zero minutes; `null` stays `None`.
/// Done flags that are `null` or junk read as `false`.
#[cfg(feature = "serde")]
mod lenient {
    use std::collections::HashMap;

    use serde::{Deserialize, Deserializer};

    use super::Minutes;
    use crate::clock::parse_leading_int;
    use crate::identifiers::StudentIdentifier;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawNumber {
        Int(i64),
        Float(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    impl RawNumber {
        fn to_minutes(&self) -> Minutes {
            match self {
                Self::Int(i) => *i,
                Self::Float(f) if f.is_finite() => f.trunc() as Minutes,
                Self::Text(s) => parse_leading_int(s).unwrap_or(0),
                _ => 0,
            }
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFlag {
        Bool(bool),
        Int(i64),
        Other(serde::de::IgnoredAny),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTag {
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(match Option::<RawFlag>::deserialize(d)? {
            Some(RawFlag::Bool(b)) => b,
            Some(RawFlag::Int(i)) => i != 0,
            _ => false,
        })
    }

    pub fn tag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Option::<RawTag>::deserialize(d)? {
            Some(RawTag::Text(s)) => Some(s),
            _ => None,
        })
    }

    pub fn minutes<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Minutes>, D::Error> {
        Ok(Option::<RawNumber>::deserialize(d)?.map(|raw| raw.to_minutes()))
    }

    /// Only whole numbers place a student on the route; a fractional
    /// stop order such as 1.5 leaves the student unsequenced.
    pub fn stop_order<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        Ok(match Option::<RawNumber>::deserialize(d)? {
            Some(RawNumber::Int(i)) => Some(i),
            Some(RawNumber::Float(f)) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
            _ => None,
        })
    }

    pub fn override_map<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<HashMap<StudentIdentifier, Option<Minutes>>, D::Error> {
        let raw = HashMap::<StudentIdentifier, Option<RawNumber>>::deserialize(d)?;
        Ok(raw
            .into_iter()
            .map(|(id, value)| (id, value.map(|v| v.to_minutes())))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids<'a>(list: &[&'a StudentEntry]) -> Vec<&'a str> {
        list.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_sequence_orders_and_filters() {
        let students = vec![
            StudentEntry::new("c", Some(3)),
            StudentEntry::new("unplanned", None),
            StudentEntry::new("a", Some(1)),
            StudentEntry::new("b", Some(2)),
        ];

        assert_eq!(ids(&sequence(&students)), ["a", "b", "c"]);
    }

    #[test]
    fn test_sequence_ties_keep_input_order() {
        let students = vec![
            StudentEntry::new("second", Some(2)),
            StudentEntry::new("first_tie", Some(1)),
            StudentEntry::new("second_tie", Some(1)),
        ];

        assert_eq!(ids(&sequence(&students)), ["first_tie", "second_tie", "second"]);
    }

    #[test]
    fn test_effective_minutes() {
        let student = StudentEntry::new("amira", Some(1)).with_minutes(Some(6), Some(9));
        let other = StudentEntry::new("bilal", Some(2));
        let mut overrides = DurationOverrides::new();

        assert_eq!(overrides.effective_minutes(&student, Session::Am), 6);
        assert_eq!(overrides.effective_minutes(&student, Session::Pm), 9);
        assert_eq!(overrides.effective_minutes(&other, Session::Am), 0);

        overrides.set("amira", Some(0));
        assert_eq!(overrides.effective_minutes(&student, Session::Am), 0);

        assert_eq!(overrides.effective_minutes(&student, Session::Pm), 0);

        overrides.set("amira", None);
        assert_eq!(overrides.effective_minutes(&student, Session::Am), 6);
        assert_eq!(overrides.effective_minutes(&student, Session::Pm), 9);
        assert_eq!(overrides.len(), 1);
    }

    #[test]
    fn test_leave_and_done_flags() {
        let student = StudentEntry::new("amira", Some(1))
            .with_done(true, false)
            .with_status(LEAVE_STATUS);

        assert!(student.is_on_leave());
        assert!(student.is_done(Session::Am));
        assert!(!student.is_done(Session::Pm));
        assert!(!StudentEntry::new("bilal", None).with_status("AWAITING").is_on_leave());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_lenient_student_document() {
        let student: StudentEntry = serde_json::from_str(
            r#"{"id":"amira","stopOrder":2,"minsAM":"7","minsPM":"soon","doneAM":true}"#,
        )
        .unwrap();

        assert_eq!(student.stop_order, Some(2));
        assert_eq!(student.mins_am, Some(7));
        assert_eq!(student.mins_pm, Some(0));
        assert!(student.done_am);
        assert!(!student.done_pm);

        let unplanned: StudentEntry =
            serde_json::from_str(r#"{"id":"bilal","stop_order":"3","mins_am":null}"#).unwrap();
        assert_eq!(unplanned.stop_order, None);
        assert_eq!(unplanned.mins_am, None);

        let halfway: StudentEntry = serde_json::from_str(r#"{"id":"chen","stopOrder":1.5}"#).unwrap();
        assert_eq!(halfway.stop_order, None);
        let whole: StudentEntry = serde_json::from_str(r#"{"id":"dana","stopOrder":2.0}"#).unwrap();
        assert_eq!(whole.stop_order, Some(2));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_lenient_flags_and_status() {
        let student: StudentEntry = serde_json::from_str(
            r#"{"id":"amira","stopOrder":1,"minsAM":5,"doneAM":null,"donePM":"yes","status":null}"#,
        )
        .unwrap();
        assert!(!student.done_am);
        assert!(!student.done_pm);
        assert_eq!(student.status, None);

        let away: StudentEntry =
            serde_json::from_str(r#"{"id":"bilal","doneAM":1,"donePM":0,"status":"LEAVE"}"#)
                .unwrap();
        assert!(away.done_am);
        assert!(!away.done_pm);
        assert!(away.is_on_leave());

        let tagged: StudentEntry = serde_json::from_str(r#"{"id":"chen","status":42}"#).unwrap();
        assert_eq!(tagged.status, None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_lenient_overrides() {
        let overrides: DurationOverrides =
            serde_json::from_str(r#"{"amira":4,"bilal":null,"chen":"x","dana":2.7}"#).unwrap();

        assert_eq!(overrides.get(&"amira".into()), Some(4));
        assert_eq!(overrides.get(&"bilal".into()), None);
        assert_eq!(overrides.get(&"chen".into()), Some(0));
        assert_eq!(overrides.get(&"dana".into()), Some(2));
        assert_eq!(overrides.len(), 4);
    }
}
