use crate::connection::{ConnectionRegistry, Payload, RoomId};
use crate::subscription::{PendingSubscription, Subscription};
use events::DomainEvent;
use log::*;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

/// Outcome of fanning one event out to a room.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Entry point of the fanout subsystem: admits subscribers and publishes
/// room events to them.
pub struct Manager {
    registry: Arc<ConnectionRegistry>,
    queue: UnboundedSender<DomainEvent>,
    shutdown: CancellationToken,
}

impl Manager {
    /// Create the manager and spawn its fanout worker on the current runtime.
    ///
    /// Cancelling `shutdown` stops the worker and terminates every
    /// subscription created through this manager.
    pub fn start(shutdown: CancellationToken) -> Arc<Self> {
        let registry = Arc::new(ConnectionRegistry::new());
        let (queue, events) = mpsc::unbounded_channel();

        tokio::spawn(run_fanout(
            Arc::clone(&registry),
            events,
            shutdown.clone(),
        ));

        Arc::new(Self {
            registry,
            queue,
            shutdown,
        })
    }

    /// Admit a subscriber to a room whose existence was already checked.
    /// Nothing is registered until the returned subscription is activated.
    pub fn admit(&self, room_id: RoomId) -> PendingSubscription {
        PendingSubscription::new(room_id, Arc::clone(&self.registry), self.shutdown.clone())
    }

    /// Register a new subscriber for a room. The returned subscription is
    /// `Active`; drive it with [`Subscription::run`].
    pub fn subscribe(&self, room_id: RoomId) -> Subscription {
        self.admit(room_id).activate()
    }

    /// Hand an event to the fanout worker and return immediately.
    pub fn publish(&self, event: DomainEvent) {
        if let Err(e) = self.queue.send(event) {
            warn!(
                "Fanout worker is gone, dropping {} event for room {}",
                e.0.event.kind(),
                e.0.room_id
            );
        }
    }

    /// Deliver an event to the room's current subscribers right away.
    pub fn deliver(&self, event: &DomainEvent) -> DeliveryReport {
        deliver(&self.registry, event)
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn subscriber_count(&self, room_id: &RoomId) -> usize {
        self.registry.subscriber_count(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.registry.room_count()
    }

    /// Stop the worker and cancel every subscription.
    pub fn shutdown(&self) {
        info!("Shutting down fanout, cancelling all subscriptions");
        self.shutdown.cancel();
    }
}

async fn run_fanout(
    registry: Arc<ConnectionRegistry>,
    mut events: UnboundedReceiver<DomainEvent>,
    shutdown: CancellationToken,
) {
    debug!("Fanout worker started");

    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => break,
            event = events.recv() => match event {
                Some(event) => {
                    deliver(&registry, &event);
                }
                None => break,
            },
        }
    }

    debug!("Fanout worker stopped");
}

fn deliver(registry: &ConnectionRegistry, event: &DomainEvent) -> DeliveryReport {
    let mut report = DeliveryReport::default();

    let subscribers = registry.snapshot_for(&event.room_id);
    if subscribers.is_empty() {
        return report;
    }

    let payload: Payload = match serde_json::to_string(&event.event) {
        Ok(json) => json.into(),
        Err(e) => {
            error!("Failed to serialize {} event: {e}", event.event.kind());
            return report;
        }
    };

    for subscriber in subscribers {
        // Already on its way out: nothing to deliver, nothing to report.
        if subscriber.is_cancelled() {
            continue;
        }

        match subscriber.deliver(Arc::clone(&payload)) {
            Ok(()) => report.delivered += 1,
            Err(e) => {
                warn!(
                    "Failed to deliver {} event to subscriber {} in room {}: {e}. Cancelling subscriber.",
                    event.event.kind(),
                    subscriber.id(),
                    event.room_id
                );
                report.failed += 1;
                subscriber.cancel();
            }
        }
    }

    debug!(
        "Fanned out {} event to room {}: {} delivered, {} failed",
        event.event.kind(),
        event.room_id,
        report.delivered,
        report.failed
    );

    report
}
