use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A leaf value held by a scalar field or a scalar-list element
///
/// Serialized untagged, except that a date is wrapped as
/// `{"date": "<rfc3339>"}`. A bare JSON string is always a
/// [`ScalarValue::String`], whatever its text looks like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Date(#[serde(with = "tagged_date")] DateTime<FixedOffset>),
    String(String),
}

mod tagged_date {
    use chrono::{DateTime, FixedOffset};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Tagged {
        date: DateTime<FixedOffset>,
    }

    pub fn serialize<S: Serializer>(
        date: &DateTime<FixedOffset>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        Tagged { date: *date }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<FixedOffset>, D::Error> {
        Tagged::deserialize(deserializer).map(|t| t.date)
    }
}

impl ScalarValue {
    pub fn as_date(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            ScalarValue::Date(d) => Some(d),
            _ => None,
        }
    }
}

/// Canonical string form, used for every non-date value in audit entries
///
/// A double always keeps a fractional part or exponent (`1.0`, `0.25`,
/// `1e21`) so it never reads as an integer.
impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Boolean(b) => write!(f, "{}", b),
            ScalarValue::Integer(i) => write!(f, "{}", i),
            ScalarValue::Double(d) => write!(f, "{:?}", d),
            ScalarValue::Date(d) => write!(f, "{}", d.to_rfc3339()),
            ScalarValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        ScalarValue::String(s.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self {
        ScalarValue::String(s)
    }
}

impl From<i64> for ScalarValue {
    fn from(i: i64) -> Self {
        ScalarValue::Integer(i)
    }
}

impl From<f64> for ScalarValue {
    fn from(d: f64) -> Self {
        ScalarValue::Double(d)
    }
}

impl From<bool> for ScalarValue {
    fn from(b: bool) -> Self {
        ScalarValue::Boolean(b)
    }
}

impl From<DateTime<FixedOffset>> for ScalarValue {
    fn from(d: DateTime<FixedOffset>) -> Self {
        ScalarValue::Date(d)
    }
}

/// Reference to a binary attachment
///
/// Only metadata is modelled; audit entries report the filename and never
/// touch the payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlobRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    #[serde(default)]
    pub length: u64,
}

impl BlobRef {
    pub fn named(filename: impl Into<String>) -> Self {
        Self {
            filename: Some(filename.into()),
            ..Self::default()
        }
    }
}
