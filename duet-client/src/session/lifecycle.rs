use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::media::MediaSource;
use crate::relay::RelayLink;
use crate::session::handle::session_channels;
use crate::session::{Notice, Session, SessionControl, SessionHandle, SessionOutcome};
use crate::transport::{MediaTransportFactory, WebRtcTransportFactory};
use duet_core::RoomToken;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Everything a session needs besides the relay link.
#[derive(Clone)]
pub struct CallDeps {
    pub media_source: Arc<dyn MediaSource>,
    pub transport_factory: Arc<dyn MediaTransportFactory>,
    /// Measured from `ready`. `None` never gives up.
    pub handshake_timeout: Option<Duration>,
}

/// Runs sessions on `link` until one ends for a reason other than a full room.
///
/// Every full room is answered with a fresh token and a `Notice::RoomFull`.
pub(crate) async fn run_call(
    room: RoomToken,
    mut link: RelayLink,
    mut control: SessionControl,
    deps: CallDeps,
) -> SessionOutcome {
    let mut token = room;
    loop {
        let outcome = Session::new(token.clone(), &mut link, &mut control, &deps)
            .run()
            .await;

        match outcome {
            SessionOutcome::RoomFull(rejected) => {
                let next = rejected.regenerate();
                warn!("Room {} is full, retrying in room {}", rejected, next);
                control.notify(Notice::RoomFull {
                    room: rejected,
                    next: next.clone(),
                });
                token = next;
            }
            other => return other,
        }
    }
}

/// Spawns a call on its own task.
pub fn spawn_call(
    room: RoomToken,
    link: RelayLink,
    deps: CallDeps,
) -> (SessionHandle, JoinHandle<SessionOutcome>) {
    let (handle, control) = session_channels(room.clone());
    let task = tokio::spawn(run_call(room, link, control, deps));
    (handle, task)
}

/// Connects to the configured relay and starts a call backed by webrtc.
pub async fn start_call(
    config: &SessionConfig,
    media_source: Arc<dyn MediaSource>,
) -> Result<(SessionHandle, JoinHandle<SessionOutcome>), SessionError> {
    let room = config.room.clone().unwrap_or_else(RoomToken::generate);
    let link = RelayLink::connect(&config.relay_url).await?;
    info!("Starting call in room {}", room);

    let deps = CallDeps {
        media_source,
        transport_factory: Arc::new(WebRtcTransportFactory::new(config.transport.clone())),
        handshake_timeout: config.handshake_timeout,
    };
    Ok(spawn_call(room, link, deps))
}
