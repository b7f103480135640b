use crate::media::LocalMedia;
use crate::transport::{MediaTransport, MediaTransportFactory, TransportConfig, TransportEvent};
use anyhow::{Context, Result};
use async_trait::async_trait;
use duet_core::{IceCandidate, SessionDescription};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::track::track_remote::TrackRemote;

/// `MediaTransport` backed by a webrtc-rs peer connection.
pub struct ConnectionWrapper {
    pub peer_connection: Arc<RTCPeerConnection>,
}

impl ConnectionWrapper {
    /// Builds the peer connection, attaches the local tracks and wires callbacks into `event_tx`.
    pub async fn new(
        config: TransportConfig,
        media: &LocalMedia,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Self> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let ice_servers = if config.ice_servers.is_empty() {
            vec![]
        } else {
            vec![RTCIceServer {
                urls: config.ice_servers,
                ..Default::default()
            }]
        };

        let rtc_config = RTCConfiguration {
            ice_servers,
            ..Default::default()
        };

        let peer_connection = Arc::new(
            api.new_peer_connection(rtc_config)
                .await
                .context("Failed to create peer connection")?,
        );

        let state_tx = event_tx.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();

                Box::pin(async move {
                    info!("Peer connection state changed: {}", s);
                    let event = match s {
                        RTCPeerConnectionState::Connected => TransportEvent::Connected,
                        RTCPeerConnectionState::Failed => TransportEvent::Failed,
                        RTCPeerConnectionState::Closed => TransportEvent::Closed,
                        RTCPeerConnectionState::Disconnected => {
                            warn!("Peer connection disconnected, waiting for ICE to recover");
                            return;
                        }
                        _ => return,
                    };
                    let _ = tx.send(event).await;
                })
            },
        ));

        let ice_tx = event_tx.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();

            Box::pin(async move {
                let candidate = match c {
                    Some(candidate) => match candidate.to_json() {
                        Ok(init) => Some(IceCandidate::from(init)),
                        Err(e) => {
                            warn!("Failed to serialize local candidate: {}", e);
                            return;
                        }
                    },
                    None => None,
                };
                let _ = tx.send(TransportEvent::CandidateGenerated(candidate)).await;
            })
        }));

        let track_tx = event_tx.clone();
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let tx = track_tx.clone();

                Box::pin(async move {
                    let kind = track.kind().to_string();
                    let track_id = track.id().to_string();
                    debug!("Remote {} track added: {}", kind, track_id);
                    let _ = tx
                        .send(TransportEvent::TrackReceived { kind, track_id })
                        .await;
                })
            },
        ));

        for track in media.tracks() {
            peer_connection
                .add_track(Arc::clone(track))
                .await
                .context("Failed to add local track")?;
        }

        info!(
            "Peer connection created with {} local track(s)",
            media.tracks().len()
        );

        Ok(Self { peer_connection })
    }
}

#[async_trait]
impl MediaTransport for ConnectionWrapper {
    async fn create_offer(&self) -> Result<SessionDescription> {
        let offer = self.peer_connection.create_offer(None).await?;
        Ok(SessionDescription::try_from(offer)?)
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        let answer = self.peer_connection.create_answer(None).await?;
        Ok(SessionDescription::try_from(answer)?)
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<()> {
        let desc = RTCSessionDescription::try_from(desc).context("Invalid local description")?;
        self.peer_connection.set_local_description(desc).await?;
        Ok(())
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()> {
        let desc = RTCSessionDescription::try_from(desc).context("Invalid remote description")?;
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    async fn add_remote_candidate(&self, candidate: IceCandidate) -> Result<()> {
        let init: RTCIceCandidateInit = candidate.into();
        self.peer_connection.add_ice_candidate(init).await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection.close().await?;
        Ok(())
    }
}

/// Creates a `ConnectionWrapper` per session.
#[derive(Debug, Clone, Default)]
pub struct WebRtcTransportFactory {
    config: TransportConfig,
}

impl WebRtcTransportFactory {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl MediaTransportFactory for WebRtcTransportFactory {
    async fn create(
        &self,
        media: &LocalMedia,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Arc<dyn MediaTransport>> {
        let transport = ConnectionWrapper::new(self.config.clone(), media, events).await?;
        Ok(Arc::new(transport))
    }
}
