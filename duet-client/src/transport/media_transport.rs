use crate::media::LocalMedia;
use crate::transport::TransportEvent;
use anyhow::Result;
use async_trait::async_trait;
use duet_core::{IceCandidate, SessionDescription};
use std::sync::Arc;
use tokio::sync::mpsc;

/// The peer-to-peer media transport the negotiation drives.
///
/// Discovered local candidates, connection changes and remote tracks are
/// reported through the `TransportEvent` channel handed to the factory.
#[async_trait]
pub trait MediaTransport: Send + Sync {
    async fn create_offer(&self) -> Result<SessionDescription>;

    async fn create_answer(&self) -> Result<SessionDescription>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<()>;

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()>;

    async fn add_remote_candidate(&self, candidate: IceCandidate) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

/// Builds one transport per session, carrying the session's local media.
#[async_trait]
pub trait MediaTransportFactory: Send + Sync {
    async fn create(
        &self,
        media: &LocalMedia,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Arc<dyn MediaTransport>>;
}
