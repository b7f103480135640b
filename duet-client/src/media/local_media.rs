use crate::error::MediaError;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use webrtc::track::track_local::TrackLocal;

type Releaser = Box<dyn FnOnce() + Send + Sync>;

/// Audio+video capture handle owned by one session.
///
/// The capture is released exactly once: on `release()` or, failing that, on drop.
pub struct LocalMedia {
    tracks: Vec<Arc<dyn TrackLocal + Send + Sync>>,
    releaser: Option<Releaser>,
}

impl LocalMedia {
    pub fn new(tracks: Vec<Arc<dyn TrackLocal + Send + Sync>>) -> Self {
        Self {
            tracks,
            releaser: None,
        }
    }

    /// Runs `releaser` when the capture is given back.
    pub fn with_releaser(mut self, releaser: impl FnOnce() + Send + Sync + 'static) -> Self {
        self.releaser = Some(Box::new(releaser));
        self
    }

    pub fn tracks(&self) -> &[Arc<dyn TrackLocal + Send + Sync>] {
        &self.tracks
    }

    pub fn is_released(&self) -> bool {
        self.releaser.is_none()
    }

    pub fn release(&mut self) {
        self.tracks.clear();
        if let Some(releaser) = self.releaser.take() {
            debug!("Releasing local media");
            releaser();
        }
    }
}

impl Drop for LocalMedia {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for LocalMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalMedia")
            .field("tracks", &self.tracks.len())
            .field("released", &self.is_released())
            .finish()
    }
}

/// Capability that hands out local capture, or refuses with a permission/device error.
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn acquire(&self) -> Result<LocalMedia, MediaError>;
}
