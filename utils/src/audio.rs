use ringbuf::HeapRb;
use rubato::{FastFixedIn, PolynomialDegree, Resampler};

use crate::clip::AudioClip;

/// Frames fed to the resampler per call.
pub const RESAMPLE_CHUNK_SIZE: usize = 1024;

/// Creates a mono resampler converting `in_sampling_rate` to `out_sampling_rate`.
pub fn create_resampler(
    in_sampling_rate: f64,
    out_sampling_rate: f64,
    chunk_size: usize,
) -> anyhow::Result<FastFixedIn<f32>> {
    let resampler = FastFixedIn::<f32>::new(
        out_sampling_rate / in_sampling_rate,
        1.0,
        PolynomialDegree::Cubic,
        chunk_size,
        1,
    )?;
    Ok(resampler)
}

/// Splits samples into fixed-size chunks, zero-padding the last one.
pub fn split_for_chunks(samples: &[f32], chunk_size: usize) -> Vec<Vec<f32>> {
    samples
        .chunks(chunk_size)
        .map(|chunk| {
            let mut chunk = chunk.to_vec();
            chunk.resize(chunk_size, 0.0);
            chunk
        })
        .collect()
}

pub fn shared_buffer(size: usize) -> HeapRb<f32> {
    HeapRb::new(size)
}

/// Converts a clip to `out_sample_rate`. Clips already at that rate are copied as-is.
pub fn resample_clip(clip: &AudioClip, out_sample_rate: u32) -> anyhow::Result<Vec<f32>> {
    if clip.sample_rate() == out_sample_rate || clip.is_empty() {
        return Ok(clip.samples().to_vec());
    }

    let mut resampler = create_resampler(
        clip.sample_rate() as f64,
        out_sample_rate as f64,
        RESAMPLE_CHUNK_SIZE,
    )?;
    let chunk_size = resampler.input_frames_next();
    let expected = (clip.samples().len() as f64 * out_sample_rate as f64
        / clip.sample_rate() as f64)
        .ceil() as usize;

    let mut out = Vec::with_capacity(expected + chunk_size);
    for samples in split_for_chunks(clip.samples(), chunk_size) {
        let resamples = resampler.process(&[samples.as_slice()], None)?;
        if let Some(resamples) = resamples.first() {
            out.extend_from_slice(resamples);
        }
    }
    // Drop the tail produced by zero padding.
    out.truncate(expected);
    Ok(out)
}
