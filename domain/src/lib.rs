//! Room and message operations.
//!
//! Every mutation here persists first and only then publishes the matching
//! `events::DomainEvent`; a failed write never produces an event.

pub use entity_api::{messages, rooms, Id};

pub mod error;
pub mod message;
pub mod room;
