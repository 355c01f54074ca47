use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::models::{CreateEventRequest, Event, Location, LocationInput, UpdateEventRequest};
use crate::publisher::{DomainEvent, EventPublisher};
use crate::services::locks::EventLocks;
use crate::store::{EntityStore, StoreError};
use crate::utils::error::AppError;

/// Owns the event lifecycle: creation, update, organizer-only deletion and
/// the cascading removal of dependent RSVPs.
pub struct EventService {
    store: Arc<dyn EntityStore>,
    publisher: Arc<dyn EventPublisher>,
    locks: Arc<EventLocks>,
}

pub(crate) fn event_key(event_id: Uuid) -> String {
    format!("event#{event_id}")
}

pub(crate) fn rsvp_key(event_id: Uuid, user_id: &str) -> String {
    format!("rsvp#{event_id}#{user_id}")
}

pub(crate) fn rsvp_prefix(event_id: Uuid) -> String {
    format!("rsvp#{event_id}#")
}

fn decode_event(record: Value) -> Result<Event, AppError> {
    serde_json::from_value(record).map_err(|e| AppError::StoreError(StoreError::Corrupt(e)))
}

fn parse_date_time(raw: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| {
            AppError::ValidationError(
                "Invalid dateTime format. Use ISO 8601 format (YYYY-MM-DDTHH:MM:SSZ).".to_string(),
            )
        })
}

fn validate_location(input: LocationInput) -> Result<Location, AppError> {
    let (Some(latitude), Some(longitude)) = (input.latitude, input.longitude) else {
        return Err(AppError::ValidationError(
            "Invalid location format. Must include latitude and longitude.".to_string(),
        ));
    };
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(AppError::ValidationError(
            "Location coordinates out of range.".to_string(),
        ));
    }
    Ok(Location {
        latitude,
        longitude,
        address: input.address,
    })
}

const DEFAULT_SUPPLIES: &str = "Bring your own if possible.";

impl EventService {
    pub fn new(
        store: Arc<dyn EntityStore>,
        publisher: Arc<dyn EventPublisher>,
        locks: Arc<EventLocks>,
    ) -> Self {
        Self {
            store,
            publisher,
            locks,
        }
    }

    pub(crate) fn locks(&self) -> &Arc<EventLocks> {
        &self.locks
    }

    pub async fn create_event(
        &self,
        organizer_id: &str,
        request: CreateEventRequest,
    ) -> Result<Event, AppError> {
        let (Some(title), Some(location), Some(date_time)) =
            (request.title, request.location, request.date_time)
        else {
            tracing::warn!(organizer_id = %organizer_id, "event.create.missing_fields");
            return Err(AppError::ValidationError(
                "Missing required fields: title, location, dateTime".to_string(),
            ));
        };
        if title.trim().is_empty() {
            return Err(AppError::ValidationError("Title must not be empty".to_string()));
        }
        let location = validate_location(location)?;
        let date_time = parse_date_time(&date_time)?;

        let event = Event {
            event_id: Uuid::new_v4(),
            organizer_id: organizer_id.to_string(),
            title,
            location,
            date_time,
            capacity: request.capacity,
            supplies: request.supplies.unwrap_or_else(|| DEFAULT_SUPPLIES.to_string()),
            created_at: Utc::now(),
            updated_at: None,
        };

        // The id is freshly generated; a collision means the generator is
        // broken, not that the caller raced.
        let key = event_key(event.event_id);
        if self.store.get(&key).await?.is_some() {
            return Err(AppError::Conflict(
                "Generated event id already exists".to_string(),
            ));
        }
        self.store.put(&key, serde_json::to_value(&event).map_err(StoreError::Corrupt)?).await?;

        tracing::info!(event_id = %event.event_id, organizer_id = %organizer_id, "event.create.success");
        self.publisher
            .publish(DomainEvent::NewEventCreated {
                event_id: event.event_id,
                title: event.title.clone(),
                organizer_id: event.organizer_id.clone(),
            })
            .await;

        Ok(event)
    }

    pub async fn get_event(&self, event_id: Uuid) -> Result<Event, AppError> {
        match self.store.get(&event_key(event_id)).await? {
            Some(record) => decode_event(record),
            None => Err(AppError::NotFound("Event not found".to_string())),
        }
    }

    pub async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        self.store
            .scan("event#")
            .await?
            .into_iter()
            .map(decode_event)
            .collect()
    }

    pub async fn update_event(
        &self,
        event_id: Uuid,
        caller_id: &str,
        patch: UpdateEventRequest,
    ) -> Result<Event, AppError> {
        // Serialized per event so concurrent patches cannot lose writes.
        let _guard = self.locks.acquire(event_id).await;

        let mut event = self.get_event(event_id).await?;
        if event.organizer_id != caller_id {
            tracing::warn!(event_id = %event_id, caller_id = %caller_id, "event.update.auth_error");
            return Err(AppError::Forbidden(
                "You are not authorized to update this event".to_string(),
            ));
        }
        if patch.is_empty() {
            return Err(AppError::ValidationError("Payload missing".to_string()));
        }

        if let Some(title) = patch.title {
            if title.trim().is_empty() {
                return Err(AppError::ValidationError("Title must not be empty".to_string()));
            }
            event.title = title;
        }
        if let Some(location) = patch.location {
            event.location = validate_location(location)?;
        }
        if let Some(date_time) = patch.date_time {
            event.date_time = parse_date_time(&date_time)?;
        }
        if let Some(capacity) = patch.capacity {
            event.capacity = Some(capacity);
        }
        if let Some(supplies) = patch.supplies {
            event.supplies = supplies;
        }
        event.updated_at = Some(Utc::now());

        self.store
            .put(&event_key(event_id), serde_json::to_value(&event).map_err(StoreError::Corrupt)?)
            .await?;
        tracing::info!(event_id = %event_id, "event.update.success");
        Ok(event)
    }

    /// Removes the event and every RSVP keyed under it. Runs under the
    /// event's lock, so an admission racing with the delete either
    /// completes first or observes the event as gone.
    pub async fn delete_event(&self, event_id: Uuid, caller_id: &str) -> Result<(), AppError> {
        {
            let _guard = self.locks.acquire(event_id).await;

            let event = self.get_event(event_id).await?;
            if event.organizer_id != caller_id {
                tracing::warn!(event_id = %event_id, caller_id = %caller_id, "event.delete.auth_error");
                return Err(AppError::Forbidden(
                    "You are not authorized to delete this event".to_string(),
                ));
            }

            self.store.delete(&event_key(event_id)).await?;
            for record in self.store.scan(&rsvp_prefix(event_id)).await? {
                let rsvp: crate::models::Rsvp =
                    serde_json::from_value(record).map_err(StoreError::Corrupt)?;
                self.store.delete(&rsvp_key(event_id, &rsvp.user_id)).await?;
            }
        }
        self.locks.discard(event_id);

        tracing::info!(event_id = %event_id, "event.delete.success");
        self.publisher
            .publish(DomainEvent::EventDeleted {
                event_id,
                organizer_id: caller_id.to_string(),
            })
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publisher::RecordingPublisher;
    use crate::store::MemoryStore;

    fn beach_cleanup() -> CreateEventRequest {
        CreateEventRequest {
            title: Some("Beach Cleanup".to_string()),
            location: Some(LocationInput {
                latitude: Some(34.05),
                longitude: Some(-118.24),
                address: Some("Santa Monica Beach".to_string()),
            }),
            date_time: Some("2025-07-15T09:00:00Z".to_string()),
            capacity: Some(50),
            supplies: Some("Gloves and bags provided".to_string()),
        }
    }

    fn service() -> (EventService, Arc<RecordingPublisher>) {
        let publisher = Arc::new(RecordingPublisher::new());
        let service = EventService::new(
            Arc::new(MemoryStore::new()),
            publisher.clone(),
            Arc::new(EventLocks::new()),
        );
        (service, publisher)
    }

    #[tokio::test]
    async fn created_event_is_readable_and_announced() {
        let (service, publisher) = service();

        let event = service.create_event("org-1", beach_cleanup()).await.unwrap();
        assert_eq!(event.organizer_id, "org-1");
        assert_eq!(event.capacity, Some(50));
        assert!(event.updated_at.is_none());

        let fetched = service.get_event(event.event_id).await.unwrap();
        assert_eq!(fetched, event);

        let recorded = publisher.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].detail_type(), "NewEventCreated");
    }

    #[tokio::test]
    async fn event_ids_are_unique_across_creations() {
        let (service, _) = service();
        let a = service.create_event("org-1", beach_cleanup()).await.unwrap();
        let b = service.create_event("org-1", beach_cleanup()).await.unwrap();
        assert_ne!(a.event_id, b.event_id);
        assert_eq!(service.list_events().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn missing_required_fields_fail_validation() {
        let (service, publisher) = service();

        let mut request = beach_cleanup();
        request.title = None;
        let err = service.create_event("org-1", request).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let mut request = beach_cleanup();
        request.location = Some(LocationInput {
            latitude: Some(34.05),
            longitude: None,
            address: None,
        });
        let err = service.create_event("org-1", request).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        assert!(publisher.recorded().is_empty());
    }

    #[tokio::test]
    async fn malformed_date_time_fails_validation() {
        let (service, _) = service();
        let mut request = beach_cleanup();
        request.date_time = Some("July 15th, 9am".to_string());
        let err = service.create_event("org-1", request).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn supplies_default_when_omitted() {
        let (service, _) = service();
        let mut request = beach_cleanup();
        request.supplies = None;
        let event = service.create_event("org-1", request).await.unwrap();
        assert_eq!(event.supplies, "Bring your own if possible.");
    }

    #[tokio::test]
    async fn get_missing_event_is_not_found() {
        let (service, _) = service();
        let err = service.get_event(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_patches_mutable_fields_and_sets_updated_at() {
        let (service, _) = service();
        let event = service.create_event("org-1", beach_cleanup()).await.unwrap();

        let patch = UpdateEventRequest {
            title: Some("Beach Cleanup (rescheduled)".to_string()),
            date_time: Some("2025-08-01T09:00:00Z".to_string()),
            capacity: Some(75),
            ..Default::default()
        };
        let updated = service.update_event(event.event_id, "org-1", patch).await.unwrap();

        assert_eq!(updated.title, "Beach Cleanup (rescheduled)");
        assert_eq!(updated.capacity, Some(75));
        assert!(updated.updated_at.is_some());
        // Immutable fields untouched.
        assert_eq!(updated.event_id, event.event_id);
        assert_eq!(updated.organizer_id, "org-1");
        assert_eq!(updated.created_at, event.created_at);
    }

    #[tokio::test]
    async fn update_by_non_organizer_is_forbidden_and_changes_nothing() {
        let (service, _) = service();
        let event = service.create_event("org-1", beach_cleanup()).await.unwrap();

        let patch = UpdateEventRequest {
            title: Some("Hijacked".to_string()),
            ..Default::default()
        };
        let err = service.update_event(event.event_id, "org-2", patch).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let stored = service.get_event(event.event_id).await.unwrap();
        assert_eq!(stored, event);
    }

    #[tokio::test]
    async fn empty_patch_is_rejected() {
        let (service, _) = service();
        let event = service.create_event("org-1", beach_cleanup()).await.unwrap();
        let err = service
            .update_event(event.event_id, "org-1", UpdateEventRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn delete_by_non_organizer_is_forbidden() {
        let (service, _) = service();
        let event = service.create_event("org-1", beach_cleanup()).await.unwrap();
        let err = service.delete_event(event.event_id, "org-2").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert!(service.get_event(event.event_id).await.is_ok());
    }

    #[tokio::test]
    async fn delete_removes_event_and_announces() {
        let (service, publisher) = service();
        let event = service.create_event("org-1", beach_cleanup()).await.unwrap();

        service.delete_event(event.event_id, "org-1").await.unwrap();

        let err = service.get_event(event.event_id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let recorded = publisher.recorded();
        assert_eq!(recorded.last().unwrap().detail_type(), "EventDeleted");
    }
}
