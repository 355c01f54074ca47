use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::models::{Rsvp, RsvpStatus};
use crate::publisher::{DomainEvent, EventPublisher};
use crate::services::events::{rsvp_key, rsvp_prefix, EventService};
use crate::store::{EntityStore, StoreError};
use crate::utils::error::AppError;

/// Per-(event, user) attendance ledger.
///
/// Withdrawal is logical: the record stays with `status = withdrawn` and is
/// reused on re-confirmation, preserving the original `registeredAt`. Only
/// the parent event's cascading delete removes records physically. A
/// withdrawn record behaves as absent for a second withdraw.
pub struct RsvpService {
    store: Arc<dyn EntityStore>,
    publisher: Arc<dyn EventPublisher>,
    events: Arc<EventService>,
}

impl RsvpService {
    pub fn new(
        store: Arc<dyn EntityStore>,
        publisher: Arc<dyn EventPublisher>,
        events: Arc<EventService>,
    ) -> Self {
        Self {
            store,
            publisher,
            events,
        }
    }

    async fn load(&self, event_id: Uuid, user_id: &str) -> Result<Option<Rsvp>, AppError> {
        match self.store.get(&rsvp_key(event_id, user_id)).await? {
            Some(record) => Ok(Some(
                serde_json::from_value(record).map_err(StoreError::Corrupt)?,
            )),
            None => Ok(None),
        }
    }

    /// Admits the user to the event. The capacity count and the insert run
    /// under the event's lock as one admission decision, so concurrent
    /// confirmations cannot overshoot the cap, and an admission racing a
    /// delete of the event observes it as gone.
    pub async fn confirm_rsvp(&self, event_id: Uuid, user_id: &str) -> Result<Rsvp, AppError> {
        let _guard = self.events.locks().acquire(event_id).await;

        let event = self.events.get_event(event_id).await.map_err(|e| {
            if matches!(e, AppError::NotFound(_)) {
                tracing::warn!(event_id = %event_id, user_id = %user_id, "rsvp.create.event_not_found");
            }
            e
        })?;

        let existing = self.load(event_id, user_id).await?;
        if existing.as_ref().is_some_and(Rsvp::is_confirmed) {
            tracing::warn!(event_id = %event_id, user_id = %user_id, "rsvp.create.already_rsvpd");
            return Err(AppError::Conflict("Already RSVPd to this event".to_string()));
        }

        if let Some(capacity) = event.capacity {
            let confirmed = self.list_confirmed(event_id).await?.len();
            if confirmed >= capacity as usize {
                tracing::warn!(event_id = %event_id, user_id = %user_id, capacity, "rsvp.create.at_capacity");
                return Err(AppError::Conflict("Event is at full capacity".to_string()));
            }
        }

        let rsvp = Rsvp {
            rsvp_id: Rsvp::composite_id(event_id, user_id),
            event_id,
            user_id: user_id.to_string(),
            status: RsvpStatus::Confirmed,
            registered_at: existing
                .map(|previous| previous.registered_at)
                .unwrap_or_else(Utc::now),
        };
        self.store
            .put(
                &rsvp_key(event_id, user_id),
                serde_json::to_value(&rsvp).map_err(StoreError::Corrupt)?,
            )
            .await?;

        tracing::info!(event_id = %event_id, user_id = %user_id, "rsvp.create.success");
        self.publisher
            .publish(DomainEvent::UserRsvpd {
                event_id,
                user_id: user_id.to_string(),
                status: RsvpStatus::Confirmed,
            })
            .await;
        Ok(rsvp)
    }

    pub async fn withdraw_rsvp(&self, event_id: Uuid, user_id: &str) -> Result<(), AppError> {
        let _guard = self.events.locks().acquire(event_id).await;

        let Some(mut rsvp) = self.load(event_id, user_id).await? else {
            tracing::warn!(event_id = %event_id, user_id = %user_id, "rsvp.delete.not_found");
            return Err(AppError::NotFound("RSVP not found".to_string()));
        };
        if rsvp.status == RsvpStatus::Withdrawn {
            tracing::warn!(event_id = %event_id, user_id = %user_id, "rsvp.delete.not_found");
            return Err(AppError::NotFound("RSVP not found".to_string()));
        }

        rsvp.status = RsvpStatus::Withdrawn;
        self.store
            .put(
                &rsvp_key(event_id, user_id),
                serde_json::to_value(&rsvp).map_err(StoreError::Corrupt)?,
            )
            .await?;

        tracing::info!(event_id = %event_id, user_id = %user_id, "rsvp.delete.success");
        self.publisher
            .publish(DomainEvent::UserRsvpWithdrawn {
                event_id,
                user_id: user_id.to_string(),
                status: RsvpStatus::Withdrawn,
            })
            .await;
        Ok(())
    }

    pub async fn get_rsvp(&self, event_id: Uuid, user_id: &str) -> Result<Rsvp, AppError> {
        self.load(event_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("RSVP not found".to_string()))
    }

    pub async fn list_confirmed(&self, event_id: Uuid) -> Result<Vec<Rsvp>, AppError> {
        let mut confirmed = Vec::new();
        for record in self.store.scan(&rsvp_prefix(event_id)).await? {
            let rsvp: Rsvp = serde_json::from_value(record).map_err(StoreError::Corrupt)?;
            if rsvp.is_confirmed() {
                confirmed.push(rsvp);
            }
        }
        Ok(confirmed)
    }
}
