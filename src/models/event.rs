use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scheduled cleanup event. Field names at the wire boundary are
/// camelCase (`eventId`, `organizerId`, `dateTime`, ...).
///
/// `event_id` and `organizer_id` are fixed at creation; only the organizer
/// may mutate or delete the event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub event_id: Uuid,
    pub organizer_id: String,
    pub title: String,
    pub location: Location,
    pub date_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    pub supplies: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Creation payload. Required fields arrive as `Option` so the service can
/// report a proper `ValidationError` instead of a deserialization failure;
/// `dateTime` arrives as a string and is parsed as RFC 3339.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub location: Option<LocationInput>,
    pub date_time: Option<String>,
    pub capacity: Option<u32>,
    pub supplies: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationInput {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
}

/// Partial update. Enumerates the mutable fields only; `eventId`,
/// `organizerId` and `createdAt` are immutable and unknown fields are
/// rejected outright.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub location: Option<LocationInput>,
    pub date_time: Option<String>,
    pub capacity: Option<u32>,
    pub supplies: Option<String>,
}

impl UpdateEventRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.location.is_none()
            && self.date_time.is_none()
            && self.capacity.is_none()
            && self.supplies.is_none()
    }
}
