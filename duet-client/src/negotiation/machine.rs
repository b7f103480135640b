use crate::negotiation::{CandidateBuffer, NegotiationState};
use crate::transport::{MediaTransport, SignalingOutput};
use duet_core::{IceCandidate, ParticipantRole, SdpKind, SessionDescription, SignalingMessage};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Drives the offer/answer/candidate exchange against one media transport.
///
/// Every handler is a no-op once the machine is `Closed` or `Failed`, so stray
/// or duplicate events never fault. A step whose transport call fails is logged
/// and abandoned; the machine stays in the state it had reached.
pub struct NegotiationMachine {
    state: NegotiationState,
    role: Option<ParticipantRole>,
    transport: Option<Arc<dyn MediaTransport>>,
    signaling: Arc<dyn SignalingOutput>,
    candidates: CandidateBuffer,
    /// Signals that arrived before the transport existed, replayed in order.
    early_signals: VecDeque<SignalingMessage>,
    remote_description_set: bool,
    peer_ready: bool,
}

impl NegotiationMachine {
    pub fn new(signaling: Arc<dyn SignalingOutput>) -> Self {
        Self {
            state: NegotiationState::Idle,
            role: None,
            transport: None,
            signaling,
            candidates: CandidateBuffer::new(),
            early_signals: VecDeque::new(),
            remote_description_set: false,
            peer_ready: false,
        }
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn role(&self) -> Option<ParticipantRole> {
        self.role
    }

    pub fn buffered_candidates(&self) -> usize {
        self.candidates.len()
    }

    pub fn remote_description_set(&self) -> bool {
        self.remote_description_set
    }

    fn transition(&mut self, next: NegotiationState) {
        if self.state != next {
            info!("Negotiation {} -> {}", self.state, next);
            self.state = next;
        }
    }

    /// Records the role handed out at rendezvous. Only the first call counts.
    pub fn assign_role(&mut self, role: ParticipantRole) {
        if let Some(current) = self.role {
            warn!("Role already assigned ({:?}), ignoring {:?}", current, role);
            return;
        }
        if self.state != NegotiationState::Idle {
            return;
        }
        self.role = Some(role);
        self.transition(NegotiationState::AwaitingLocalMedia);
    }

    /// Hands over the transport built once local media was available.
    pub async fn attach_transport(&mut self, transport: Arc<dyn MediaTransport>) {
        if self.state != NegotiationState::AwaitingLocalMedia || self.transport.is_some() {
            warn!("Transport attached in state {}, closing it", self.state);
            if let Err(e) = transport.close().await {
                warn!("Failed to close unused transport: {:#}", e);
            }
            return;
        }

        self.transport = Some(transport);
        self.transition(NegotiationState::AwaitingPeer);

        while let Some(signal) = self.early_signals.pop_front() {
            debug!("Replaying early {}", signal.label());
            self.on_signal(signal).await;
            if self.state.is_terminal() {
                return;
            }
        }

        if self.peer_ready {
            self.start_if_initiator().await;
        }
    }

    /// Both occupants are present in the room.
    pub async fn on_ready(&mut self) {
        if self.peer_ready {
            debug!("Duplicate ready ignored");
            return;
        }
        self.peer_ready = true;

        match self.state {
            NegotiationState::AwaitingPeer => self.start_if_initiator().await,
            NegotiationState::Idle | NegotiationState::AwaitingLocalMedia => {
                debug!("Peer ready before local media; offer deferred");
            }
            other => debug!("Ready ignored in state {}", other),
        }
    }

    async fn start_if_initiator(&mut self) {
        match self.role {
            Some(ParticipantRole::Initiator) => self.send_offer().await,
            _ => debug!("Responder waits for the offer"),
        }
    }

    async fn send_offer(&mut self) {
        if self.state != NegotiationState::AwaitingPeer {
            return;
        }
        let Some(transport) = self.transport.clone() else {
            return;
        };

        info!("Creating an offer");
        let offer = match transport.create_offer().await {
            Ok(offer) => offer,
            Err(e) => {
                warn!("Failed to create offer: {:#}", e);
                return;
            }
        };
        if let Err(e) = transport.set_local_description(offer.clone()).await {
            warn!("Failed to set local offer: {:#}", e);
            return;
        }

        self.signaling
            .send_signal(SignalingMessage::Description(offer))
            .await;
        self.transition(NegotiationState::OfferSent);
    }

    /// Handles one message relayed from the other occupant.
    pub async fn on_signal(&mut self, signal: SignalingMessage) {
        if self.state.is_terminal() {
            debug!("Dropping {} after teardown", signal.label());
            return;
        }

        if matches!(signal, SignalingMessage::Bye) {
            info!("Session terminated by remote peer");
            self.close().await;
            return;
        }

        if self.transport.is_none() {
            debug!("Queueing {} until the transport exists", signal.label());
            self.early_signals.push_back(signal);
            return;
        }

        match signal {
            SignalingMessage::Description(desc) => match desc.kind {
                SdpKind::Offer => self.accept_offer(desc).await,
                SdpKind::Answer => self.accept_answer(desc).await,
            },
            SignalingMessage::Candidate(candidate) => self.on_remote_candidate(candidate).await,
            SignalingMessage::Bye => {}
        }
    }

    async fn accept_offer(&mut self, offer: SessionDescription) {
        if !matches!(
            self.state,
            NegotiationState::AwaitingPeer | NegotiationState::OfferSent
        ) {
            warn!("Ignoring offer in state {}", self.state);
            return;
        }
        let Some(transport) = self.transport.clone() else {
            return;
        };

        info!("Got offer, sending answer to peer");
        self.transition(NegotiationState::OfferReceived);

        if let Err(e) = transport.set_remote_description(offer).await {
            warn!("Failed to apply remote offer: {:#}", e);
            return;
        }
        self.remote_description_set = true;
        self.drain_candidates(&transport).await;

        let answer = match transport.create_answer().await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Failed to create answer: {:#}", e);
                return;
            }
        };
        if let Err(e) = transport.set_local_description(answer.clone()).await {
            warn!("Failed to set local answer: {:#}", e);
            return;
        }

        self.signaling
            .send_signal(SignalingMessage::Description(answer))
            .await;
        self.transition(NegotiationState::AnswerSent);
    }

    async fn accept_answer(&mut self, answer: SessionDescription) {
        if self.state != NegotiationState::OfferSent {
            warn!("Ignoring answer in state {}", self.state);
            return;
        }
        let Some(transport) = self.transport.clone() else {
            return;
        };

        info!("Got answer");
        self.transition(NegotiationState::AnswerReceived);

        if let Err(e) = transport.set_remote_description(answer).await {
            warn!("Failed to apply remote answer: {:#}", e);
            return;
        }
        self.remote_description_set = true;
        self.drain_candidates(&transport).await;
        self.transition(NegotiationState::Connected);
    }

    async fn on_remote_candidate(&mut self, candidate: IceCandidate) {
        if !self.remote_description_set {
            self.candidates.push(candidate);
            debug!(
                "Buffered remote candidate ({} pending)",
                self.candidates.len()
            );
            return;
        }
        if let Some(transport) = self.transport.clone() {
            apply_candidate(transport.as_ref(), candidate).await;
        }
    }

    async fn drain_candidates(&mut self, transport: &Arc<dyn MediaTransport>) {
        let pending = self.candidates.take();
        if !pending.is_empty() {
            debug!("Applying {} buffered remote candidate(s)", pending.len());
        }
        for candidate in pending {
            apply_candidate(transport.as_ref(), candidate).await;
        }
    }

    /// Forwards a candidate discovered by the local transport. `None` marks the end of gathering.
    pub async fn on_local_candidate(&mut self, candidate: Option<IceCandidate>) {
        if self.state.is_terminal() {
            return;
        }
        match candidate {
            Some(candidate) => {
                self.signaling
                    .send_signal(SignalingMessage::Candidate(candidate))
                    .await;
            }
            None => debug!("End of candidates"),
        }
    }

    /// The transport reports a working connection.
    pub fn on_transport_connected(&mut self) {
        match self.state {
            NegotiationState::AnswerSent => self.transition(NegotiationState::Connected),
            NegotiationState::Connected => {}
            other => debug!("Transport connected while in state {}", other),
        }
    }

    /// The transport gave up; the session cannot make progress anymore.
    pub async fn fail(&mut self, reason: &str) {
        if self.state.is_terminal() {
            return;
        }
        warn!("Negotiation failed: {}", reason);
        self.teardown().await;
        self.transition(NegotiationState::Failed);
    }

    /// Local hang-up or remote bye.
    pub async fn close(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        self.teardown().await;
        self.transition(NegotiationState::Closed);
    }

    async fn teardown(&mut self) {
        self.candidates.clear();
        self.early_signals.clear();
        let Some(transport) = self.transport.take() else {
            return;
        };
        if let Err(e) = transport.close().await {
            warn!("Failed to close media transport: {:#}", e);
        }
    }
}

async fn apply_candidate(transport: &dyn MediaTransport, candidate: IceCandidate) {
    if let Err(e) = transport.add_remote_candidate(candidate).await {
        warn!("Failed to add remote candidate: {:#}", e);
    }
}
