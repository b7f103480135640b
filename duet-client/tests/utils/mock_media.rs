use async_trait::async_trait;
use duet_client::{LocalMedia, MediaError, MediaSource};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Media source with no tracks that counts acquisitions and releases.
#[derive(Clone, Default)]
pub struct MockMediaSource {
    acquired: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
    failure: Option<MediaError>,
}

impl MockMediaSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: MediaError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaSource for MockMediaSource {
    async fn acquire(&self) -> Result<LocalMedia, MediaError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.acquired.fetch_add(1, Ordering::SeqCst);
        let released = Arc::clone(&self.released);
        Ok(LocalMedia::new(vec![]).with_releaser(move || {
            released.fetch_add(1, Ordering::SeqCst);
        }))
    }
}
