//! Audit configuration
//!
//! Fixed for the lifetime of a process and passed explicitly into the
//! engine. Every field has a default, so an empty TOML document is valid.
//!
//! ```toml
//! excluded_fields = ["dc:created", "dc:creator", "dc:modified", "dc:contributors"]
//! date_pattern = "%m/%d/%Y"
//! time_zone = "local"        # or a fixed offset such as "+02:00" / "UTC"
//! empty_value = "EMPTY"
//! event_names = ["beforeDocumentModification"]
//! ```

use chrono::format::{Item, StrftimeItems};
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::errors::{AuditError, Result};

/// System-managed fields never reported, whatever their dirtiness
pub const DEFAULT_EXCLUDED_FIELDS: &[&str] =
    &["dc:created", "dc:creator", "dc:modified", "dc:contributors"];

/// Month/day/4-digit-year, e.g. `03/17/2016`
pub const DEFAULT_DATE_PATTERN: &str = "%m/%d/%Y";

/// Token written for an absent value
pub const DEFAULT_EMPTY_VALUE: &str = "EMPTY";

/// Host event the listener reacts to
pub const DEFAULT_EVENT_NAME: &str = "beforeDocumentModification";

/// Zone in which date values are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeZoneSetting {
    /// The process's local zone
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl TimeZoneSetting {
    pub fn utc() -> Self {
        TimeZoneSetting::Fixed(Utc.fix())
    }

    /// Parse `local`, `UTC`/`Z`, or a `+HH:MM` / `-HH:MM` offset
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for anything else.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        match trimmed {
            "local" | "Local" => return Ok(TimeZoneSetting::Local),
            "UTC" | "utc" | "Z" => return Ok(TimeZoneSetting::utc()),
            _ => {}
        }

        let invalid = || AuditError::InvalidConfig {
            reason: format!("unsupported time zone `{}`", raw),
        };

        let (sign, rest) = if let Some(rest) = trimmed.strip_prefix('+') {
            (1, rest)
        } else if let Some(rest) = trimmed.strip_prefix('-') {
            (-1, rest)
        } else {
            return Err(invalid());
        };
        let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
        if !(0..60).contains(&minutes) {
            return Err(invalid());
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(TimeZoneSetting::Fixed)
            .ok_or_else(invalid)
    }
}

impl TryFrom<String> for TimeZoneSetting {
    type Error = AuditError;

    fn try_from(value: String) -> Result<Self> {
        TimeZoneSetting::parse(&value)
    }
}

impl From<TimeZoneSetting> for String {
    fn from(value: TimeZoneSetting) -> Self {
        match value {
            TimeZoneSetting::Local => "local".to_string(),
            TimeZoneSetting::Fixed(offset) => offset.to_string(),
        }
    }
}

/// Immutable settings for one audit pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Top-level field names skipped by `diff_document`
    pub excluded_fields: BTreeSet<String>,
    /// strftime pattern for date values
    pub date_pattern: String,
    pub time_zone: TimeZoneSetting,
    pub empty_value: String,
    /// Host event names the listener handles; others are ignored
    pub event_names: Vec<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            excluded_fields: DEFAULT_EXCLUDED_FIELDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            date_pattern: DEFAULT_DATE_PATTERN.to_string(),
            time_zone: TimeZoneSetting::Local,
            empty_value: DEFAULT_EMPTY_VALUE.to_string(),
            event_names: vec![DEFAULT_EVENT_NAME.to_string()],
        }
    }
}

impl AuditConfig {
    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` on malformed TOML, unknown keys, or an
    /// invalid date pattern.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: AuditConfig = toml::from_str(raw).map_err(|e| AuditError::InvalidConfig {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the file cannot be read or fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| AuditError::InvalidConfig {
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&raw)
    }

    /// Replace the exclusion set
    pub fn with_excluded_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_time_zone(mut self, time_zone: TimeZoneSetting) -> Self {
        self.time_zone = time_zone;
        self
    }

    pub fn is_excluded(&self, field_name: &str) -> bool {
        self.excluded_fields.contains(field_name)
    }

    pub fn handles_event(&self, event_name: &str) -> bool {
        self.event_names.iter().any(|n| n == event_name)
    }

    /// # Errors
    ///
    /// Returns `InvalidConfig` if the date pattern has an unknown specifier or
    /// the empty-value token is blank.
    pub fn validate(&self) -> Result<()> {
        if StrftimeItems::new(&self.date_pattern).any(|item| matches!(item, Item::Error)) {
            return Err(AuditError::InvalidConfig {
                reason: format!("invalid date pattern `{}`", self.date_pattern),
            });
        }
        if self.empty_value.trim().is_empty() {
            return Err(AuditError::InvalidConfig {
                reason: "empty_value must not be blank".to_string(),
            });
        }
        Ok(())
    }
}
