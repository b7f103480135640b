mod local_media;
mod synthetic;

pub use local_media::{LocalMedia, MediaSource};
pub use synthetic::SyntheticMediaSource;
