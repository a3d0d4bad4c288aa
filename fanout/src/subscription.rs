//! Lifecycle of a single room subscriber.
//!
//! [`crate::Manager::admit`] hands out a `PendingSubscription` once the room
//! has been validated; nothing is registered yet. Activating it after the
//! transport upgrade registers the subscriber and yields an `Active`
//! `Subscription`. [`Subscription::run`] then owns the peer channel until
//! the peer goes away or the subscription is cancelled, and always leaves
//! the registry clean behind it.

use crate::connection::{ConnectionRegistry, Payload, RoomId, SubscriberHandle, SubscriberId};
use crate::error::ChannelError;
use async_trait::async_trait;
use log::*;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    /// Admission in progress; nothing registered yet.
    Pending,
    /// Registered and receiving events.
    Active,
    /// Unregistered; nothing more will be delivered.
    Terminated,
}

/// Why a subscription ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The peer closed the connection.
    PeerClosed,
    /// The cancellation token fired (failed delivery or server shutdown).
    Cancelled,
    /// Writing a payload to the peer failed.
    ChannelFailed,
}

/// The persistent connection a subscriber is attached to.
#[async_trait]
pub trait PeerChannel: Send {
    /// Push one serialized event to the peer.
    async fn push(&mut self, payload: &str) -> Result<(), ChannelError>;

    /// Resolve once the peer has closed the connection.
    /// Must be cancel safe: it is raced against incoming payloads.
    async fn closed(&mut self);
}

/// A subscribe request for a validated room, waiting on its transport.
/// Dropping it leaves no trace in the registry.
pub struct PendingSubscription {
    room_id: RoomId,
    registry: Arc<ConnectionRegistry>,
    shutdown: CancellationToken,
}

impl PendingSubscription {
    pub(crate) fn new(
        room_id: RoomId,
        registry: Arc<ConnectionRegistry>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            room_id,
            registry,
            shutdown,
        }
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn state(&self) -> SubscriptionState {
        SubscriptionState::Pending
    }

    /// Register the subscriber now that its peer channel exists. Its
    /// cancellation token is a child of the manager's shutdown token.
    pub fn activate(self) -> Subscription {
        let id = SubscriberId::new();
        let (sender, receiver) = mpsc::unbounded_channel();
        let cancellation = self.shutdown.child_token();

        self.registry.register(
            self.room_id,
            SubscriberHandle::new(id, sender, cancellation.clone()),
        );
        info!("Registered subscriber {id} for room {}", self.room_id);

        Subscription::new(self.room_id, id, receiver, cancellation, self.registry)
    }
}

pub struct Subscription {
    room_id: RoomId,
    id: SubscriberId,
    receiver: UnboundedReceiver<Payload>,
    cancellation: CancellationToken,
    registry: Arc<ConnectionRegistry>,
    state: SubscriptionState,
}

impl Subscription {
    fn new(
        room_id: RoomId,
        id: SubscriberId,
        receiver: UnboundedReceiver<Payload>,
        cancellation: CancellationToken,
        registry: Arc<ConnectionRegistry>,
    ) -> Self {
        Self {
            room_id,
            id,
            receiver,
            cancellation,
            registry,
            state: SubscriptionState::Active,
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn state(&self) -> SubscriptionState {
        self.state
    }

    /// A token that terminates this subscription when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Forward queued events to `channel` until the peer closes, a write
    /// fails, or the subscription is cancelled. Cleanup runs on every path.
    pub async fn run<C: PeerChannel>(mut self, mut channel: C) -> Termination {
        debug!(
            "Subscriber {} active in room {}",
            self.id, self.room_id
        );

        // Cancellation is polled first; payloads still queued when it fires
        // are dropped.
        let termination = loop {
            tokio::select! {
                biased;

                _ = self.cancellation.cancelled() => break Termination::Cancelled,
                payload = self.receiver.recv() => match payload {
                    Some(payload) => {
                        if let Err(e) = channel.push(&payload).await {
                            warn!(
                                "Failed to push event to subscriber {} in room {}: {e}",
                                self.id, self.room_id
                            );
                            break Termination::ChannelFailed;
                        }
                    }
                    // Every sender is gone: the handle was unregistered elsewhere.
                    None => break Termination::Cancelled,
                },
                _ = channel.closed() => break Termination::PeerClosed,
            }
        };

        self.terminate();
        info!(
            "Subscriber {} left room {} ({termination:?})",
            self.id, self.room_id
        );

        termination
    }

    fn terminate(&mut self) {
        if self.state == SubscriptionState::Terminated {
            return;
        }

        self.state = SubscriptionState::Terminated;
        self.receiver.close();
        self.cancellation.cancel();
        self.registry.unregister(&self.room_id, &self.id);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.terminate();
    }
}
