//! Typed request bodies for the room and message endpoints.

pub(crate) mod message;
pub(crate) mod room;
