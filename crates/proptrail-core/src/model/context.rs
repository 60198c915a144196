use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of the triggering event, copied verbatim into every descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerContext {
    pub event_time: DateTime<Utc>,
    pub actor_name: String,
    pub subject_id: String,
    pub lifecycle_state: String,
    pub origin_id: String,
}

impl TriggerContext {
    pub fn new(
        event_time: DateTime<Utc>,
        actor_name: impl Into<String>,
        subject_id: impl Into<String>,
        lifecycle_state: impl Into<String>,
        origin_id: impl Into<String>,
    ) -> Self {
        Self {
            event_time,
            actor_name: actor_name.into(),
            subject_id: subject_id.into(),
            lifecycle_state: lifecycle_state.into(),
            origin_id: origin_id.into(),
        }
    }
}
