//! Real-time fanout of room events to WebSocket subscribers.
//!
//! # Architecture
//!
//! - **Room-partitioned registry**: `ConnectionRegistry` maps a room id to
//!   its live subscribers. It is the only way to reach the map, so every
//!   read and write happens under the room's lock.
//! - **One task per subscriber**: each subscriber is a `Subscription`
//!   driven by `Subscription::run`, which forwards queued events to the peer
//!   and unregisters itself when the peer leaves or it is cancelled.
//! - **Queued fanout**: `Manager::publish` hands events to a dedicated
//!   worker task, so the request that produced an event never waits on
//!   delivery.
//! - **Cancel on failure**: a subscriber whose channel is broken has its
//!   cancellation token triggered; it is never retried. A subscriber that
//!   is merely slow keeps queueing.
//! - **Ephemeral events**: subscribers that were not connected miss the
//!   event; there is no replay.
//!
//! # Message Flow
//!
//! 1. Client opens `/subscribe/{room_id}`; the web layer validates the room
//!    and upgrades to a WebSocket
//! 2. `Manager::admit` returns a `PendingSubscription`; after the upgrade it
//!    is activated, which registers the subscriber, and the upgrade task
//!    runs the resulting `Subscription` until termination
//! 3. A mutation persists its change and publishes a `DomainEvent`
//! 4. `FanoutEventHandler` enqueues it; the worker snapshots the room and
//!    pushes `{"kind": .., "value": ..}` to every subscriber
//!
//! # Modules
//!
//! - `connection`: `ConnectionRegistry`, `SubscriberHandle` and ids
//! - `subscription`: per-subscriber lifecycle and the `PeerChannel` seam
//! - `manager`: admission, publishing and the fanout worker
//! - `domain_event_handler`: bridge from `events::EventPublisher`
//! - `error`: subscribe, delivery and channel errors

pub mod connection;
pub mod domain_event_handler;
pub mod error;
pub mod manager;
pub mod subscription;

#[cfg(test)]
pub(crate) mod test_support;

pub use domain_event_handler::FanoutEventHandler;
pub use manager::Manager;
pub use subscription::{
    PeerChannel, PendingSubscription, Subscription, SubscriptionState, Termination,
};
