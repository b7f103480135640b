use crate::negotiation::NegotiationState;
use duet_core::{ParticipantRole, RoomToken};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::debug;

/// Snapshot of a call, published after every event the session handles.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStatus {
    pub token: RoomToken,
    pub role: Option<ParticipantRole>,
    pub state: NegotiationState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Hangup,
}

/// Things the user should be told about.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    RoomFull { room: RoomToken, next: RoomToken },
    MediaUnavailable(String),
}

/// Caller's side of a running call.
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    status: watch::Receiver<SessionStatus>,
    notices: mpsc::UnboundedReceiver<Notice>,
}

/// Session's side of the same channels; survives restarts with a new token.
pub(crate) struct SessionControl {
    pub(crate) commands: mpsc::Receiver<SessionCommand>,
    pub(crate) status: watch::Sender<SessionStatus>,
    pub(crate) notices: mpsc::UnboundedSender<Notice>,
}

impl SessionControl {
    pub(crate) fn publish(&self, status: SessionStatus) {
        self.status.send_if_modified(|current| {
            if *current == status {
                return false;
            }
            *current = status;
            true
        });
    }

    pub(crate) fn notify(&self, notice: Notice) {
        if self.notices.send(notice).is_err() {
            debug!("Notice dropped, nobody is listening");
        }
    }
}

pub(crate) fn session_channels(token: RoomToken) -> (SessionHandle, SessionControl) {
    let (command_tx, command_rx) = mpsc::channel(8);
    let (status_tx, status_rx) = watch::channel(SessionStatus {
        token,
        role: None,
        state: NegotiationState::Idle,
    });
    let (notice_tx, notice_rx) = mpsc::unbounded_channel();

    let handle = SessionHandle {
        commands: command_tx,
        status: status_rx,
        notices: notice_rx,
    };
    let control = SessionControl {
        commands: command_rx,
        status: status_tx,
        notices: notice_tx,
    };
    (handle, control)
}

impl SessionHandle {
    pub fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    /// A separate receiver for callers that want to follow every status change.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.clone()
    }

    /// Asks the session to leave the room and tear down. Returns false if it already ended.
    pub async fn hangup(&self) -> bool {
        self.commands.send(SessionCommand::Hangup).await.is_ok()
    }

    /// Waits until the published status satisfies `predicate`, or `timeout` elapses.
    pub async fn wait_for(
        &mut self,
        timeout: Duration,
        predicate: impl FnMut(&SessionStatus) -> bool,
    ) -> Option<SessionStatus> {
        let waited = tokio::time::timeout(timeout, self.status.wait_for(predicate)).await;
        match waited {
            Ok(Ok(status)) => Some(status.clone()),
            _ => None,
        }
    }

    pub async fn wait_for_state(
        &mut self,
        state: NegotiationState,
        timeout: Duration,
    ) -> Option<SessionStatus> {
        self.wait_for(timeout, |status| status.state == state).await
    }

    pub async fn next_notice(&mut self) -> Option<Notice> {
        self.notices.recv().await
    }
}
