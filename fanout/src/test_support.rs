//! In-memory peer channel for exercising subscriptions without a socket.

use crate::error::ChannelError;
use crate::subscription::PeerChannel;
use async_trait::async_trait;
use std::future::pending;
use tokio::sync::{mpsc, oneshot};

pub(crate) struct FakeChannel {
    pushed: mpsc::UnboundedSender<String>,
    close: Option<oneshot::Receiver<()>>,
    fail_pushes: bool,
}

impl FakeChannel {
    pub(crate) fn fail_pushes(&mut self) {
        self.fail_pushes = true;
    }
}

/// The test's side of a `FakeChannel`.
pub(crate) struct FakePeer {
    received: mpsc::UnboundedReceiver<String>,
    close: Option<oneshot::Sender<()>>,
}

impl FakePeer {
    pub(crate) async fn next_payload(&mut self) -> Option<String> {
        self.received.recv().await
    }

    pub(crate) fn try_next_payload(&mut self) -> Option<String> {
        self.received.try_recv().ok()
    }

    pub(crate) fn close(&mut self) {
        if let Some(close) = self.close.take() {
            let _ = close.send(());
        }
    }
}

pub(crate) fn fake_channel() -> (FakeChannel, FakePeer) {
    let (pushed, received) = mpsc::unbounded_channel();
    let (close_tx, close_rx) = oneshot::channel();
    (
        FakeChannel {
            pushed,
            close: Some(close_rx),
            fail_pushes: false,
        },
        FakePeer {
            received,
            close: Some(close_tx),
        },
    )
}

#[async_trait]
impl PeerChannel for FakeChannel {
    async fn push(&mut self, payload: &str) -> Result<(), ChannelError> {
        if self.fail_pushes {
            return Err(ChannelError::new("broken pipe"));
        }
        self.pushed
            .send(payload.to_owned())
            .map_err(|_| ChannelError::new("peer dropped"))
    }

    async fn closed(&mut self) {
        // A FakePeer dropped without an explicit close keeps the channel open.
        let explicit = match self.close.as_mut() {
            Some(close) => close.await.is_ok(),
            None => false,
        };
        self.close = None;
        if !explicit {
            pending::<()>().await;
        }
    }
}
