pub use entity::{messages, rooms, Id};

pub mod error;
pub mod message;
pub mod room;
