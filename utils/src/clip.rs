use std::io::Cursor;
use std::time::Duration;

use anyhow::Context;

/// A decoded, mono audio clip ready for playback.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioClip {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// A clip of silence lasting `duration`.
    pub fn silence(duration: Duration, sample_rate: u32) -> Self {
        let frames = (duration.as_secs_f64() * sample_rate as f64).round() as usize;
        Self::new(vec![0.0; frames], sample_rate)
    }

    /// Decodes a RIFF/WAVE body into a mono clip.
    ///
    /// Multi-channel input is down-mixed by averaging each frame. Integer
    /// samples are normalised to `[-1.0, 1.0]`.
    pub fn from_wav(bytes: &[u8]) -> anyhow::Result<Self> {
        let reader = hound::WavReader::new(Cursor::new(bytes)).context("invalid WAV header")?;
        let spec = reader.spec();
        if spec.channels == 0 {
            anyhow::bail!("WAV declares zero channels");
        }

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<Result<_, _>>()
                .context("failed to read float samples")?,
            hound::SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|sample| sample.map(|v| (v as f32 / scale).clamp(-1.0, 1.0)))
                    .collect::<Result<_, _>>()
                    .context("failed to read integer samples")?
            }
        };

        let channels = spec.channels as usize;
        let samples = if channels == 1 {
            interleaved
        } else {
            interleaved
                .chunks_exact(channels)
                .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                .collect()
        };

        tracing::debug!(
            "decoded WAV: {}hz, {}ch, {} bits, {} frames",
            spec.sample_rate,
            spec.channels,
            spec.bits_per_sample,
            samples.len()
        );
        Ok(Self::new(samples, spec.sample_rate))
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }
}
