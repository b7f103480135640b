use duet_client::NegotiationState;
use duet_core::{ParticipantRole, SdpKind, SessionDescription, SignalingMessage};

use crate::integration::{create_test_machine, init_tracing};
use crate::utils::{MockTransport, TransportCall};

#[tokio::test]
async fn test_second_offer_is_ignored() {
    init_tracing();

    let (mut machine, transport, signaling) =
        create_test_machine(ParticipantRole::Responder, MockTransport::new("b")).await;

    for sdp in ["first", "second"] {
        machine
            .on_signal(SignalingMessage::Description(SessionDescription::offer(
                sdp,
            )))
            .await;
    }

    assert_eq!(machine.state(), NegotiationState::AnswerSent);
    assert_eq!(transport.count(&TransportCall::SetRemote(SdpKind::Offer)).await, 1);
    assert_eq!(transport.count(&TransportCall::CreateAnswer).await, 1);
    assert_eq!(signaling.descriptions(SdpKind::Answer).await.len(), 1);
}

#[tokio::test]
async fn test_second_answer_is_ignored() {
    init_tracing();

    let (mut machine, transport, _signaling) =
        create_test_machine(ParticipantRole::Initiator, MockTransport::new("a")).await;
    machine.on_ready().await;

    for sdp in ["first", "second"] {
        machine
            .on_signal(SignalingMessage::Description(SessionDescription::answer(
                sdp,
            )))
            .await;
    }

    assert_eq!(machine.state(), NegotiationState::Connected);
    assert_eq!(transport.count(&TransportCall::SetRemote(SdpKind::Answer)).await, 1);
}

#[tokio::test]
async fn test_answer_without_offer_is_ignored() {
    init_tracing();

    let (mut machine, transport, _signaling) =
        create_test_machine(ParticipantRole::Responder, MockTransport::new("b")).await;

    machine
        .on_signal(SignalingMessage::Description(SessionDescription::answer(
            "unsolicited",
        )))
        .await;

    assert_eq!(machine.state(), NegotiationState::AwaitingPeer);
    assert!(transport.calls().await.is_empty());
}

#[tokio::test]
async fn test_duplicate_ready_sends_one_offer() {
    init_tracing();

    let (mut machine, transport, signaling) =
        create_test_machine(ParticipantRole::Initiator, MockTransport::new("a")).await;

    machine.on_ready().await;
    machine.on_ready().await;

    assert_eq!(machine.state(), NegotiationState::OfferSent);
    assert_eq!(transport.count(&TransportCall::CreateOffer).await, 1);
    assert_eq!(signaling.descriptions(SdpKind::Offer).await.len(), 1);
}

#[tokio::test]
async fn test_role_is_assigned_once() {
    init_tracing();

    let (mut machine, _transport, _signaling) =
        create_test_machine(ParticipantRole::Responder, MockTransport::new("b")).await;

    machine.assign_role(ParticipantRole::Initiator);

    assert_eq!(machine.role(), Some(ParticipantRole::Responder));
    assert_eq!(machine.state(), NegotiationState::AwaitingPeer);
}
