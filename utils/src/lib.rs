pub mod audio;
pub mod clip;
pub mod device;
pub mod playback;

pub use clip::AudioClip;
pub use playback::PlaybackStream;
