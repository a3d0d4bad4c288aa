use crate::Manager;
use async_trait::async_trait;
use events::{DomainEvent, EventHandler};
use log::*;
use std::sync::Arc;

/// Forwards domain events to the fanout worker.
///
/// Only enqueues, so the request that produced the event is never held up
/// by delivery to subscribers.
pub struct FanoutEventHandler {
    manager: Arc<Manager>,
}

impl FanoutEventHandler {
    pub fn new(manager: Arc<Manager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl EventHandler for FanoutEventHandler {
    async fn handle(&self, event: &DomainEvent) {
        debug!(
            "Handling {} event for room {}",
            event.event.kind(),
            event.room_id
        );

        self.manager.publish(event.clone());
    }
}
