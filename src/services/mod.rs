pub mod events;
pub mod locks;
pub mod rsvps;

pub use events::EventService;
pub use locks::EventLocks;
pub use rsvps::RsvpService;
