use crate::error::ChannelError;
use crate::transport::SignalingOutput;
use async_trait::async_trait;
use duet_core::{RelayRequest, RoomToken, SignalingMessage};
use tokio::sync::mpsc;
use tracing::{debug, error};

/// Sends signaling messages to the other occupant of one room.
#[derive(Clone)]
pub struct SignalChannel {
    room: RoomToken,
    requests: mpsc::UnboundedSender<RelayRequest>,
}

impl SignalChannel {
    pub fn new(room: RoomToken, requests: mpsc::UnboundedSender<RelayRequest>) -> Self {
        Self { room, requests }
    }

    pub fn room(&self) -> &RoomToken {
        &self.room
    }

    /// Leaves the room; the relay tells the other occupant with a `Bye`.
    pub fn leave(&self) -> Result<(), ChannelError> {
        self.requests
            .send(RelayRequest::Bye {
                room: self.room.clone(),
            })
            .map_err(|_| ChannelError::Closed)
    }
}

#[async_trait]
impl SignalingOutput for SignalChannel {
    async fn send_signal(&self, msg: SignalingMessage) {
        debug!("Client sending {} in room {}", msg.label(), self.room);
        if self
            .requests
            .send(RelayRequest::Message { payload: msg })
            .is_err()
        {
            error!("Relay connection closed, signaling message dropped");
        }
    }
}
