use std::sync::Arc;
use std::time::Duration;

use watson_voice_utils::{AudioClip, PlaybackStream};

use crate::client::{SpeechService, SynthesisOptions};
use crate::error::{Error, Result};

/// A clip that is playing. Dropping it releases the output resource and may
/// block until the device has let go.
pub trait Playback: Send {}

impl Playback for PlaybackStream {}

/// Somewhere to play synthesized clips.
///
/// `play` may block while the device opens. The relay calls it from a
/// blocking thread.
pub trait AudioOutput: Send + Sync + 'static {
    fn play(&self, clip: &AudioClip) -> Result<Box<dyn Playback>>;
}

impl<T: AudioOutput + ?Sized> AudioOutput for Box<T> {
    fn play(&self, clip: &AudioClip) -> Result<Box<dyn Playback>> {
        (**self).play(clip)
    }
}

/// Plays clips on a `cpal` output device.
#[derive(Debug, Clone, Default)]
pub struct DeviceOutput {
    device_name: Option<String>,
}

impl DeviceOutput {
    pub fn new(device_name: Option<&str>) -> Self {
        Self {
            device_name: device_name.map(str::to_string),
        }
    }
}

impl AudioOutput for DeviceOutput {
    fn play(&self, clip: &AudioClip) -> Result<Box<dyn Playback>> {
        let stream = PlaybackStream::start(clip, self.device_name.as_deref())
            .map_err(|e| Error::Audio(format!("{e:#}")))?;
        Ok(Box::new(stream))
    }
}

/// Discards audio. Clips still take their full duration.
#[derive(Debug, Clone, Copy, Default)]
pub struct MutedOutput;

struct Silence;

impl Playback for Silence {}

impl AudioOutput for MutedOutput {
    fn play(&self, _clip: &AudioClip) -> Result<Box<dyn Playback>> {
        Ok(Box::new(Silence))
    }
}

/// Turns reply text into sound.
///
/// One clip at a time: `speak` returns only after the clip has finished and
/// its playback resource has been released.
pub struct SpeechRelay<S: SpeechService, O: AudioOutput> {
    speech: S,
    output: Arc<O>,
    options: SynthesisOptions,
    clips_played: u32,
}

impl<S: SpeechService, O: AudioOutput> SpeechRelay<S, O> {
    pub fn new(speech: S, output: O, options: SynthesisOptions) -> Self {
        Self {
            speech,
            output: Arc::new(output),
            options,
            clips_played: 0,
        }
    }

    /// Synthesizes and plays `text`. Failures are logged, never returned.
    pub async fn speak(&mut self, text: &str) {
        if text.trim().is_empty() {
            tracing::debug!("nothing to speak");
            return;
        }

        let clip = match self.speech.synthesize(text, &self.options).await {
            Ok(clip) => clip,
            Err(e) => {
                tracing::error!("failed to synthesize {:?}: {}", text, e);
                return;
            }
        };
        if clip.is_empty() {
            tracing::warn!("synthesis returned an empty clip for {:?}", text);
            return;
        }

        let duration = clip.duration();
        let output = Arc::clone(&self.output);
        let playback = match tokio::task::spawn_blocking(move || output.play(&clip)).await {
            Ok(Ok(playback)) => playback,
            Ok(Err(e)) => {
                tracing::error!("failed to play clip: {}", e);
                return;
            }
            Err(e) => {
                tracing::error!("playback start task failed: {}", e);
                return;
            }
        };
        tracing::debug!("playing {:.2}s clip", duration.as_secs_f32());
        hold_for(playback, duration).await;
        self.clips_played += 1;
    }

    pub fn clips_played(&self) -> u32 {
        self.clips_played
    }

    pub fn options(&self) -> &SynthesisOptions {
        &self.options
    }
}

/// Keeps `playback` alive for `duration`, then releases it off the runtime.
async fn hold_for(playback: Box<dyn Playback>, duration: Duration) {
    tokio::time::sleep(duration).await;
    match tokio::task::spawn_blocking(move || drop(playback)).await {
        Ok(()) => tracing::debug!("playback released"),
        Err(e) => tracing::error!("playback release task failed: {}", e),
    }
}
