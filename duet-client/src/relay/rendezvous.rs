use crate::error::ChannelError;
use crate::relay::RelayLink;
use duet_core::{RelayEvent, RelayRequest, RendezvousResult, RoomToken};
use tracing::{debug, info};

/// Asks the relay for a slot in a room and waits for the verdict.
pub struct RoomRendezvous<'a> {
    link: &'a mut RelayLink,
}

impl<'a> RoomRendezvous<'a> {
    pub fn new(link: &'a mut RelayLink) -> Self {
        Self { link }
    }

    /// Events that follow the verdict (`ready`, messages) stay queued on the link.
    pub async fn join(self, token: &RoomToken) -> Result<RendezvousResult, ChannelError> {
        self.link.send(RelayRequest::CreateOrJoin {
            room: token.clone(),
        })?;
        info!("Attempted to create or join room {}", token);

        loop {
            let event = self.link.recv().await.ok_or(ChannelError::Closed)?;
            match event {
                RelayEvent::Created { room, peer_id } if room == *token => {
                    info!("Created room {}, my client id is {}", room, peer_id);
                    return Ok(RendezvousResult::Created);
                }
                RelayEvent::Joined { room, peer_id } if room == *token => {
                    info!("Joined room {} with client id {}", room, peer_id);
                    return Ok(RendezvousResult::Joined);
                }
                RelayEvent::Full { room } if room == *token => {
                    info!("Room {} is full", room);
                    return Ok(RendezvousResult::Full);
                }
                RelayEvent::Log { entries } => debug!("{}", entries.join(" ")),
                other => debug!("Ignoring {:?} while waiting for rendezvous", other),
            }
        }
    }
}
