//! Event system infrastructure for AMA rooms.
//!
//! This crate provides the event system that decouples room/message
//! persistence from the real-time notification of connected clients.
//!
//! # Architecture
//!
//! - **DomainEvent**: room-scoped envelope around a [`RoomEvent`]
//! - **RoomEvent**: the notification payload actually pushed to subscribers
//! - **EventHandler**: Trait for implementing event handlers
//! - **EventPublisher**: Publishes events to registered handlers
//!
//! This crate has no dependencies on internal crates (entity, domain, etc.),
//! avoiding circular dependencies.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// A type alias that represents any Entity's internal id field data type.
/// This matches the definition in the entity crate to maintain compatibility.
pub type Id = Uuid;

/// Payload of a `message_created` notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCreated {
    pub id: Id,
    pub message: String,
}

/// Payload of a `message_answered` notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAnswered {
    pub id: Id,
}

/// Payload shared by both reaction notifications. `count` is the new total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCount {
    pub id: Id,
    pub count: i64,
}

/// The notification delivered to every subscriber of a room.
///
/// Serializes as `{"kind": "<variant>", "value": {..payload..}}`, which is
/// the wire format clients consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RoomEvent {
    MessageCreated(MessageCreated),
    MessageAnswered(MessageAnswered),
    MessageReactionIncreased(ReactionCount),
    MessageReactionDecreased(ReactionCount),
}

impl RoomEvent {
    /// The `kind` tag as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            RoomEvent::MessageCreated(_) => "message_created",
            RoomEvent::MessageAnswered(_) => "message_answered",
            RoomEvent::MessageReactionIncreased(_) => "message_reaction_increased",
            RoomEvent::MessageReactionDecreased(_) => "message_reaction_decreased",
        }
    }

    /// Id of the message the event is about.
    pub fn message_id(&self) -> Id {
        match self {
            RoomEvent::MessageCreated(payload) => payload.id,
            RoomEvent::MessageAnswered(payload) => payload.id,
            RoomEvent::MessageReactionIncreased(payload) => payload.id,
            RoomEvent::MessageReactionDecreased(payload) => payload.id,
        }
    }
}

/// Domain events that represent business-level changes in the system.
/// These events are emitted when domain operations complete successfully.
///
/// `room_id` is used only for routing and is never serialized to
/// subscribers; use [`DomainEvent::event`] for the wire payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEvent {
    /// The room the originating mutation targeted.
    pub room_id: Id,
    pub event: RoomEvent,
}

impl DomainEvent {
    pub fn message_created(room_id: Id, message_id: Id, message: impl Into<String>) -> Self {
        Self {
            room_id,
            event: RoomEvent::MessageCreated(MessageCreated {
                id: message_id,
                message: message.into(),
            }),
        }
    }

    pub fn message_answered(room_id: Id, message_id: Id) -> Self {
        Self {
            room_id,
            event: RoomEvent::MessageAnswered(MessageAnswered { id: message_id }),
        }
    }

    pub fn reaction_increased(room_id: Id, message_id: Id, count: i64) -> Self {
        Self {
            room_id,
            event: RoomEvent::MessageReactionIncreased(ReactionCount {
                id: message_id,
                count,
            }),
        }
    }

    pub fn reaction_decreased(room_id: Id, message_id: Id, count: i64) -> Self {
        Self {
            room_id,
            event: RoomEvent::MessageReactionDecreased(ReactionCount {
                id: message_id,
                count,
            }),
        }
    }
}

/// Trait for handling domain events.
/// Implementations can perform side effects like sending notifications,
/// updating caches, logging, etc.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent);
}

/// Publishes domain events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    /// Store the returned publisher in your application state.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    /// Publish an event to all registered handlers.
    /// Handlers must not block on delivery; the fanout handler only enqueues.
    pub async fn publish(&self, event: DomainEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}
