use crate::error::MediaError;
use crate::media::{LocalMedia, MediaSource};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

/// Produces an Opus audio track and a VP8 video track with no device behind them.
///
/// Negotiation only needs the tracks to exist; feeding samples is up to the caller.
#[derive(Debug, Clone, Default)]
pub struct SyntheticMediaSource;

impl SyntheticMediaSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MediaSource for SyntheticMediaSource {
    async fn acquire(&self) -> Result<LocalMedia, MediaError> {
        let stream_id = format!("duet-{}", Uuid::new_v4().simple());

        let audio = Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_OPUS.to_owned(),
                clock_rate: 48000,
                channels: 2,
                ..Default::default()
            },
            "audio".to_owned(),
            stream_id.clone(),
        ));

        let video = Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                clock_rate: 90000,
                ..Default::default()
            },
            "video".to_owned(),
            stream_id.clone(),
        ));

        info!("Acquired synthetic audio+video stream {}", stream_id);

        let tracks: Vec<Arc<dyn TrackLocal + Send + Sync>> =
            vec![audio as Arc<dyn TrackLocal + Send + Sync>, video];
        Ok(LocalMedia::new(tracks).with_releaser(move || {
            info!("Released synthetic stream {}", stream_id);
        }))
    }
}
