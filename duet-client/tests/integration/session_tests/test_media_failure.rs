use duet_client::{MediaError, NegotiationState, Notice, SessionError, SessionOutcome, spawn_call};
use duet_core::{PeerId, RelayEvent, RelayRequest, RoomToken};

use crate::integration::init_tracing;
use crate::utils::{MockMediaSource, MockTransportFactory, WAIT, call_deps, scripted_link};

#[tokio::test]
async fn test_media_failure_is_fatal_and_reported() {
    init_tracing();

    let room = RoomToken::new("camera-shy");
    let (link, mut relay) = scripted_link();
    relay
        .events
        .send(RelayEvent::Created {
            room: room.clone(),
            peer_id: PeerId::new(),
        })
        .unwrap();

    let media = MockMediaSource::failing(MediaError::PermissionDenied("user said no".to_owned()));
    let transports = MockTransportFactory::new();
    let (mut handle, task) = spawn_call(room.clone(), link, call_deps(&media, &transports, None));

    let notice = tokio::time::timeout(WAIT, handle.next_notice())
        .await
        .expect("no notice")
        .expect("notice channel closed");
    assert!(matches!(notice, Notice::MediaUnavailable(_)));

    let outcome = task.await.unwrap();
    assert!(matches!(
        outcome,
        SessionOutcome::Failed(SessionError::MediaAcquisition(
            MediaError::PermissionDenied(_)
        ))
    ));
    assert_eq!(handle.status().state, NegotiationState::Failed);

    assert!(transports.created().await.is_empty());
    assert_eq!(media.released(), 0);
    assert_eq!(
        relay.requests.recv().await,
        Some(RelayRequest::CreateOrJoin { room })
    );
}
