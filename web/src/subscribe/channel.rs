use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use fanout::error::ChannelError;
use fanout::PeerChannel;
use log::*;

/// An upgraded WebSocket used as a subscriber's peer channel.
pub(crate) struct WebSocketChannel {
    socket: WebSocket,
}

impl WebSocketChannel {
    pub(crate) fn new(socket: WebSocket) -> Self {
        Self { socket }
    }
}

#[async_trait]
impl PeerChannel for WebSocketChannel {
    async fn push(&mut self, payload: &str) -> Result<(), ChannelError> {
        self.socket
            .send(Message::Text(payload.to_owned().into()))
            .await
            .map_err(ChannelError::new)
    }

    // Subscribers never send anything meaningful; inbound frames are read
    // only to notice the close.
    async fn closed(&mut self) {
        loop {
            match self.socket.recv().await {
                Some(Ok(Message::Close(frame))) => {
                    trace!("Peer sent close frame: {frame:?}");
                    return;
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    debug!("WebSocket read failed, treating as closed: {e}");
                    return;
                }
                None => return,
            }
        }
    }
}
