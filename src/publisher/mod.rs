//! Fire-and-forget domain event publishing.
//!
//! State changes are committed to the store first; publishing is
//! best-effort notification for downstream consumers (the notification
//! service, eventually an EventBridge bus). A publish failure is never
//! surfaced to the caller of the operation that produced the event.

use async_trait::async_trait;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::RsvpStatus;

/// A fact about what happened, named the way downstream consumers see it.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainEvent {
    NewEventCreated {
        event_id: Uuid,
        title: String,
        organizer_id: String,
    },
    EventDeleted {
        event_id: Uuid,
        organizer_id: String,
    },
    UserRsvpd {
        event_id: Uuid,
        user_id: String,
        status: RsvpStatus,
    },
    UserRsvpWithdrawn {
        event_id: Uuid,
        user_id: String,
        status: RsvpStatus,
    },
}

impl DomainEvent {
    /// Wire detail-type, matching what consumers subscribe on.
    pub fn detail_type(&self) -> &'static str {
        match self {
            DomainEvent::NewEventCreated { .. } => "NewEventCreated",
            DomainEvent::EventDeleted { .. } => "EventDeleted",
            DomainEvent::UserRsvpd { .. } => "UserRSVPd",
            DomainEvent::UserRsvpWithdrawn { .. } => "UserRSVPWithdrawn",
        }
    }

    /// Structured detail payload, camelCase like the entity wire shapes.
    pub fn detail(&self) -> Value {
        match self {
            DomainEvent::NewEventCreated {
                event_id,
                title,
                organizer_id,
            } => json!({
                "eventId": event_id,
                "title": title,
                "organizerId": organizer_id,
            }),
            DomainEvent::EventDeleted {
                event_id,
                organizer_id,
            } => json!({
                "eventId": event_id,
                "organizerId": organizer_id,
            }),
            DomainEvent::UserRsvpd {
                event_id,
                user_id,
                status,
            }
            | DomainEvent::UserRsvpWithdrawn {
                event_id,
                user_id,
                status,
            } => json!({
                "eventId": event_id,
                "userId": user_id,
                "status": status,
            }),
        }
    }
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: DomainEvent);
}

/// Logs each event instead of delivering it anywhere. Stands in for the
/// real event bus in development and keeps the same observable shape.
#[derive(Debug, Default)]
pub struct LogPublisher;

#[async_trait]
impl EventPublisher for LogPublisher {
    async fn publish(&self, event: DomainEvent) {
        tracing::info!(
            event_type = event.detail_type(),
            detail = %event.detail(),
            "event_bridge.publish"
        );
    }
}

/// Captures events in memory so tests can assert on what was published.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    events: std::sync::Mutex<Vec<DomainEvent>>,
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: DomainEvent) {
        self.events.lock().unwrap_or_else(|p| p.into_inner()).push(event);
    }
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<DomainEvent> {
        self.events.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}
