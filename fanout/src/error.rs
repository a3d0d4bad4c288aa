//! Error types for the `fanout` crate.
use std::error::Error as StdError;
use std::fmt;

/// Reasons a client cannot become a subscriber of a room.
/// Both are surfaced to the subscribing client; neither leaves anything
/// behind in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeError {
    /// The requested room does not exist.
    RoomNotFound,
    /// The transport could not be upgraded to a persistent channel.
    ChannelUpgradeFailed,
}

impl fmt::Display for SubscribeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubscribeError::RoomNotFound => write!(f, "room not found"),
            SubscribeError::ChannelUpgradeFailed => {
                write!(f, "failed to upgrade to a websocket connection")
            }
        }
    }
}

impl StdError for SubscribeError {}

/// A single subscriber could not accept an event. Never leaves the fanout
/// worker; it is logged and resolved by cancelling that subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    /// The subscriber's queue has no receiver: its lifecycle already ended.
    Closed,
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DeliveryError::Closed => write!(f, "subscriber is closed"),
        }
    }
}

impl StdError for DeliveryError {}

/// Failure writing to the underlying peer connection.
#[derive(Debug)]
pub struct ChannelError {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl ChannelError {
    pub fn new<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self {
            source: Some(err.into()),
        }
    }
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "peer channel error: {source}"),
            None => write!(f, "peer channel error"),
        }
    }
}

impl StdError for ChannelError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}
