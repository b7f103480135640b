use duet_client::{CloseReason, NegotiationState, SessionOutcome, spawn_call};
use duet_core::{RelayRequest, RoomToken};

use crate::integration::init_tracing;
use crate::utils::{MockMediaSource, MockTransportFactory, WAIT, call_deps, scripted_link};

#[tokio::test]
async fn test_hangup_while_relay_is_silent() {
    init_tracing();

    let room = RoomToken::new("quiet");
    let (link, mut relay) = scripted_link();

    let media = MockMediaSource::new();
    let transports = MockTransportFactory::new();
    let (handle, task) = spawn_call(room.clone(), link, call_deps(&media, &transports, None));

    assert_eq!(
        relay.requests.recv().await,
        Some(RelayRequest::CreateOrJoin { room: room.clone() })
    );
    assert!(handle.hangup().await);

    let outcome = tokio::time::timeout(WAIT, task)
        .await
        .expect("session ignored the hangup")
        .unwrap();
    assert!(matches!(outcome, SessionOutcome::Closed(CloseReason::Local)));
    assert_eq!(handle.status().state, NegotiationState::Closed);
    assert_eq!(handle.status().role, None);

    assert_eq!(relay.requests.recv().await, Some(RelayRequest::Bye { room }));
    assert_eq!(media.acquired(), 0);
    assert!(transports.created().await.is_empty());
}
