use crate::error::DeliveryError;
use dashmap::DashMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

/// The fanout partition key.
pub type RoomId = events::Id;

/// A serialized event, shared by every subscriber it is delivered to.
pub type Payload = Arc<str>;

/// Unique identifier for a subscriber (server-generated)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(uuid::Uuid);

impl SubscriberId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registry-side view of a subscriber: how to push to it and how to
/// terminate it. Teardown itself belongs to the owning `Subscription`.
///
/// The queue is unbounded: a peer that drains slowly only delays its own
/// deliveries and is never evicted for it.
#[derive(Debug, Clone)]
pub struct SubscriberHandle {
    id: SubscriberId,
    sender: UnboundedSender<Payload>,
    cancellation: CancellationToken,
}

impl SubscriberHandle {
    pub(crate) fn new(
        id: SubscriberId,
        sender: UnboundedSender<Payload>,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            id,
            sender,
            cancellation,
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Queue a payload for the subscriber without waiting.
    pub fn deliver(&self, payload: Payload) -> Result<(), DeliveryError> {
        self.sender
            .send(payload)
            .map_err(|_| DeliveryError::Closed)
    }

    /// Force the subscriber's lifecycle to terminate.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

/// Room-partitioned registry of live subscribers.
///
/// This is the only path to the underlying map. Every operation on a room
/// runs under that room's shard lock, so a snapshot never observes a
/// half-applied register or unregister.
pub struct ConnectionRegistry {
    rooms: DashMap<RoomId, HashMap<SubscriberId, SubscriberHandle>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    /// Add a subscriber to a room, creating the room's set if needed.
    pub fn register(&self, room_id: RoomId, handle: SubscriberHandle) {
        self.rooms
            .entry(room_id)
            .or_default()
            .insert(handle.id(), handle);
    }

    /// Remove a subscriber from a room. Returns whether anything was removed;
    /// removing an absent subscriber is a no-op.
    pub fn unregister(&self, room_id: &RoomId, subscriber_id: &SubscriberId) -> bool {
        let removed = match self.rooms.get_mut(room_id) {
            Some(mut subscribers) => subscribers.remove(subscriber_id).is_some(),
            None => false,
        };

        // Checked under the shard lock, so a concurrent register wins.
        self.rooms
            .remove_if(room_id, |_, subscribers| subscribers.is_empty());

        removed
    }

    /// The live subscribers of a room at this instant.
    pub fn snapshot_for(&self, room_id: &RoomId) -> Vec<SubscriberHandle> {
        self.rooms
            .get(room_id)
            .map(|subscribers| subscribers.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, room_id: &RoomId, subscriber_id: &SubscriberId) -> bool {
        self.rooms
            .get(room_id)
            .is_some_and(|subscribers| subscribers.contains_key(subscriber_id))
    }

    pub fn subscriber_count(&self, room_id: &RoomId) -> usize {
        self.rooms
            .get(room_id)
            .map(|subscribers| subscribers.len())
            .unwrap_or(0)
    }

    /// Number of rooms with at least one live subscriber.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
