//! WebSocket endpoint for room subscriptions.
//!
//! The lifecycle itself (registration, fanout, cleanup) lives in the
//! `fanout` crate; this module only validates the room, performs the
//! upgrade and hands the socket over as a `fanout::PeerChannel`.

mod channel;
pub(crate) mod handler;

pub(crate) use channel::WebSocketChannel;
