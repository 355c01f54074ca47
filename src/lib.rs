//! Bloom event service: event lifecycle and RSVP ledger for volunteer
//! cleanup events, exposed over a thin axum surface.

pub mod config;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod publisher;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;
