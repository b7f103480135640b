use duet_core::RoomToken;
use std::time::Duration;
use thiserror::Error;

/// Why local capture could not be obtained.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MediaError {
    #[error("permission to capture audio/video was denied: {0}")]
    PermissionDenied(String),
    #[error("no usable capture device: {0}")]
    DeviceUnavailable(String),
}

/// The relay connection is gone or could not be established.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("failed to connect to relay at {url}")]
    Connect {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },
    #[error("relay connection closed")]
    Closed,
}

/// Terminal failures of a call.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("room {0} is full")]
    RendezvousFull(RoomToken),
    #[error("local media unavailable")]
    MediaAcquisition(#[from] MediaError),
    #[error("media transport failed: {0}")]
    Transport(String),
    #[error("handshake did not complete within {0:?}")]
    HandshakeTimeout(Duration),
    #[error(transparent)]
    Channel(#[from] ChannelError),
}
