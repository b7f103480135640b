use std::fmt;

/// Where a session stands in the offer/answer handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    /// Rendezvous has not resolved yet.
    Idle,
    /// Role is known; local capture has been requested.
    AwaitingLocalMedia,
    /// Transport exists; waiting for the other occupant (or its offer).
    AwaitingPeer,
    OfferSent,
    /// An offer is being applied and answered.
    OfferReceived,
    AnswerSent,
    /// The answer is being applied.
    AnswerReceived,
    Connected,
    Closed,
    Failed,
}

impl NegotiationState {
    pub fn is_terminal(self) -> bool {
        matches!(self, NegotiationState::Closed | NegotiationState::Failed)
    }

    /// True before the handshake has completed and before any teardown.
    pub fn is_negotiating(self) -> bool {
        !self.is_terminal() && self != NegotiationState::Connected
    }
}

impl fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
