use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's attendance commitment to an event, keyed by `(eventId, userId)`.
/// There is at most one record per pair; withdrawing flips `status` and the
/// record is reused on re-confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rsvp {
    /// Derived composite key, `"<eventId>#<userId>"`.
    pub rsvp_id: String,
    pub event_id: Uuid,
    pub user_id: String,
    pub status: RsvpStatus,
    /// Set on first confirmation and preserved across withdraw/re-confirm.
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    Confirmed,
    Withdrawn,
}

impl Rsvp {
    pub fn composite_id(event_id: Uuid, user_id: &str) -> String {
        format!("{event_id}#{user_id}")
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == RsvpStatus::Confirmed
    }
}
