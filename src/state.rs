use std::sync::Arc;

use crate::identity::IdentityResolver;
use crate::publisher::EventPublisher;
use crate::services::{EventLocks, EventService, RsvpService};
use crate::store::EntityStore;

/// Shared application state. The store, publisher, and identity resolver
/// are injected so tests and production wire different backings; both
/// services share one per-event lock registry.
pub struct AppState {
    pub events: Arc<EventService>,
    pub rsvps: Arc<RsvpService>,
    pub identity: Arc<dyn IdentityResolver>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn EntityStore>,
        publisher: Arc<dyn EventPublisher>,
        identity: Arc<dyn IdentityResolver>,
    ) -> Arc<Self> {
        let locks = Arc::new(EventLocks::new());
        let events = Arc::new(EventService::new(store.clone(), publisher.clone(), locks));
        let rsvps = Arc::new(RsvpService::new(store, publisher, events.clone()));
        Arc::new(Self {
            events,
            rsvps,
            identity,
        })
    }
}
