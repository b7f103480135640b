use crate::error::{ChannelError, MediaError, SessionError};
use crate::media::LocalMedia;
use crate::negotiation::{NegotiationMachine, NegotiationState};
use crate::relay::{RelayLink, RoomRendezvous, SignalChannel};
use crate::session::lifecycle::CallDeps;
use crate::session::{Notice, SessionCommand, SessionControl, SessionStatus};
use crate::transport::TransportEvent;
use duet_core::{RelayEvent, RendezvousResult, RoomToken, SignalingMessage};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// We hung up.
    Local,
    /// The other occupant said bye or dropped off the relay.
    Remote,
    /// The media transport closed underneath us.
    Transport,
}

/// How one session ended.
#[derive(Debug)]
pub enum SessionOutcome {
    Closed(CloseReason),
    Failed(SessionError),
    /// The room already had two occupants; the call restarts under a new token.
    RoomFull(RoomToken),
}

impl SessionOutcome {
    pub fn into_result(self) -> Result<CloseReason, SessionError> {
        match self {
            SessionOutcome::Closed(reason) => Ok(reason),
            SessionOutcome::Failed(e) => Err(e),
            SessionOutcome::RoomFull(token) => Err(SessionError::RendezvousFull(token)),
        }
    }
}

/// One attempt at a call within a single room.
///
/// Runs as an actor: relay events, media acquisition, transport callbacks,
/// commands and the handshake timer are handled one at a time, so each
/// negotiation step sees the state left by the previous one.
pub struct Session<'a> {
    token: RoomToken,
    link: &'a mut RelayLink,
    control: &'a mut SessionControl,
    deps: &'a CallDeps,
    machine: NegotiationMachine,
    channel: SignalChannel,
    local_media: Option<LocalMedia>,
}

impl<'a> Session<'a> {
    pub(crate) fn new(
        token: RoomToken,
        link: &'a mut RelayLink,
        control: &'a mut SessionControl,
        deps: &'a CallDeps,
    ) -> Self {
        let channel = link.signal_channel(token.clone());
        let machine = NegotiationMachine::new(Arc::new(channel.clone()));
        Self {
            token,
            link,
            control,
            deps,
            machine,
            channel,
            local_media: None,
        }
    }

    fn publish(&self) {
        self.control.publish(SessionStatus {
            token: self.token.clone(),
            role: self.machine.role(),
            state: self.machine.state(),
        });
    }

    pub async fn run(mut self) -> SessionOutcome {
        self.publish();
        let outcome = self.drive().await;
        self.shutdown().await;
        self.publish();
        info!("Session in room {} ended: {:?}", self.token, outcome);
        outcome
    }

    async fn drive(&mut self) -> SessionOutcome {
        let verdict = tokio::select! {
            verdict = RoomRendezvous::new(&mut *self.link).join(&self.token) => verdict,
            Some(SessionCommand::Hangup) = self.control.commands.recv() => {
                info!("Hung up before room {} answered", self.token);
                return self.hang_up().await;
            }
        };
        let role = match verdict {
            Ok(RendezvousResult::Full) => return SessionOutcome::RoomFull(self.token.clone()),
            Ok(result) => match result.role() {
                Some(role) => role,
                None => return SessionOutcome::RoomFull(self.token.clone()),
            },
            Err(e) => {
                error!("Rendezvous in room {} failed: {}", self.token, e);
                self.machine.fail("relay unavailable during rendezvous").await;
                return SessionOutcome::Failed(e.into());
            }
        };

        self.machine.assign_role(role);
        self.publish();

        info!("Getting user media (video and audio)");
        let (media_tx, mut media_rx) = oneshot::channel::<Result<LocalMedia, MediaError>>();
        let source = Arc::clone(&self.deps.media_source);
        tokio::spawn(async move {
            let _ = media_tx.send(source.acquire().await);
        });
        let mut media_pending = true;

        let (transport_tx, mut transport_rx) = mpsc::channel::<TransportEvent>(256);
        let mut deadline: Option<Instant> = None;
        let mut commands_open = true;

        loop {
            let timer_armed = deadline.is_some() && self.machine.state().is_negotiating();
            let wake_at = deadline.unwrap_or_else(Instant::now);

            let step = tokio::select! {
                event = self.link.recv() => match event {
                    Some(event) => self.handle_relay_event(event, &mut deadline).await,
                    None => {
                        error!("Relay connection lost");
                        self.machine.fail("relay connection lost").await;
                        Some(SessionOutcome::Failed(ChannelError::Closed.into()))
                    }
                },

                media = &mut media_rx, if media_pending => {
                    media_pending = false;
                    match media {
                        Ok(result) => self.handle_media(result, transport_tx.clone()).await,
                        Err(_) => {
                            let e = MediaError::DeviceUnavailable("capture task ended".to_owned());
                            Some(self.media_failed(e).await)
                        }
                    }
                }

                Some(event) = transport_rx.recv() => self.handle_transport_event(event).await,

                cmd = self.control.commands.recv(), if commands_open => match cmd {
                    Some(SessionCommand::Hangup) => {
                        info!("Hanging up");
                        Some(self.hang_up().await)
                    }
                    None => {
                        commands_open = false;
                        None
                    }
                },

                _ = tokio::time::sleep_until(wake_at), if timer_armed => {
                    let limit = self.deps.handshake_timeout.unwrap_or_default();
                    warn!(
                        "Handshake stuck in {} for {:?}, giving up",
                        self.machine.state(),
                        limit
                    );
                    self.machine.fail("handshake timeout").await;
                    Some(SessionOutcome::Failed(SessionError::HandshakeTimeout(limit)))
                }
            };

            self.publish();

            if let Some(outcome) = step {
                return outcome;
            }
        }
    }

    /// Leaves the room and closes from whatever state the session is in.
    async fn hang_up(&mut self) -> SessionOutcome {
        if let Err(e) = self.channel.leave() {
            warn!("Could not tell the relay we are leaving: {}", e);
        }
        self.machine.close().await;
        SessionOutcome::Closed(CloseReason::Local)
    }

    async fn handle_relay_event(
        &mut self,
        event: RelayEvent,
        deadline: &mut Option<Instant>,
    ) -> Option<SessionOutcome> {
        match event {
            RelayEvent::Ready => {
                info!("Room {} is ready", self.token);
                if deadline.is_none() {
                    *deadline = self
                        .deps
                        .handshake_timeout
                        .map(|limit| Instant::now() + limit);
                }
                self.machine.on_ready().await;
                None
            }
            RelayEvent::Message { payload } => {
                debug!("Client received {}", payload.label());
                let is_bye = matches!(payload, SignalingMessage::Bye);
                let was_terminal = self.machine.state().is_terminal();
                self.machine.on_signal(payload).await;
                if is_bye && !was_terminal {
                    return Some(SessionOutcome::Closed(CloseReason::Remote));
                }
                None
            }
            RelayEvent::Log { entries } => {
                debug!("{}", entries.join(" "));
                None
            }
            other => {
                warn!("Unexpected relay event after rendezvous: {:?}", other);
                None
            }
        }
    }

    async fn handle_media(
        &mut self,
        result: Result<LocalMedia, MediaError>,
        transport_tx: mpsc::Sender<TransportEvent>,
    ) -> Option<SessionOutcome> {
        let media = match result {
            Ok(media) => media,
            Err(e) => return Some(self.media_failed(e).await),
        };
        debug!("Local media acquired: {:?}", media);

        let created = self.deps.transport_factory.create(&media, transport_tx).await;
        self.local_media = Some(media);

        match created {
            Ok(transport) => {
                self.machine.attach_transport(transport).await;
                None
            }
            Err(e) => {
                error!("Failed to create media transport: {:#}", e);
                self.machine.fail("transport construction failed").await;
                Some(SessionOutcome::Failed(SessionError::Transport(format!(
                    "{:#}",
                    e
                ))))
            }
        }
    }

    async fn media_failed(&mut self, e: MediaError) -> SessionOutcome {
        error!("getUserMedia error: {}", e);
        self.control.notify(Notice::MediaUnavailable(e.to_string()));
        self.machine.fail("local media unavailable").await;
        SessionOutcome::Failed(e.into())
    }

    async fn handle_transport_event(&mut self, event: TransportEvent) -> Option<SessionOutcome> {
        match event {
            TransportEvent::CandidateGenerated(candidate) => {
                self.machine.on_local_candidate(candidate).await;
                None
            }
            TransportEvent::TrackReceived { kind, track_id } => {
                info!("Remote {} track added ({})", kind, track_id);
                None
            }
            TransportEvent::Connected => {
                self.machine.on_transport_connected();
                None
            }
            TransportEvent::Failed => {
                if self.machine.state().is_terminal() {
                    return None;
                }
                self.machine.fail("media transport failed").await;
                Some(SessionOutcome::Failed(SessionError::Transport(
                    "peer connection failed".to_owned(),
                )))
            }
            TransportEvent::Closed => {
                if self.machine.state().is_terminal() {
                    return None;
                }
                self.machine.close().await;
                Some(SessionOutcome::Closed(CloseReason::Transport))
            }
        }
    }

    /// A session turned away by a full room stays `Idle`.
    async fn shutdown(&mut self) {
        let state = self.machine.state();
        if !state.is_terminal() && state != NegotiationState::Idle {
            self.machine.close().await;
        }
        if let Some(mut media) = self.local_media.take() {
            media.release();
        }
    }
}
