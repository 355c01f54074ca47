pub mod event;
pub mod rsvp;

pub use event::{CreateEventRequest, Event, Location, LocationInput, UpdateEventRequest};
pub use rsvp::{Rsvp, RsvpStatus};
