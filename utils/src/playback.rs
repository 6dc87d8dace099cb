use std::sync::mpsc;
use std::thread::JoinHandle;

use anyhow::Context;
use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::StreamConfig;
use ringbuf::traits::{Consumer, Producer, Split};

use crate::audio;
use crate::clip::AudioClip;
use crate::device;

/// A clip playing on an output device.
///
/// `cpal::Stream` is not `Send`, so the stream is built and owned by a
/// dedicated thread. Dropping the handle stops the stream and joins that
/// thread.
pub struct PlaybackStream {
    stop_tx: Option<mpsc::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl PlaybackStream {
    /// Starts playing `clip` on the named output device, or the default one.
    ///
    /// Returns once the stream is running.
    pub fn start(clip: &AudioClip, device_name: Option<&str>) -> anyhow::Result<Self> {
        let clip = clip.clone();
        let device_name = device_name.map(str::to_string);
        let (ready_tx, ready_rx) = mpsc::channel::<anyhow::Result<()>>();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let thread = std::thread::Builder::new()
            .name("audio-playback".to_string())
            .spawn(move || {
                let stream = match open_stream(&clip, device_name.as_deref()) {
                    Ok(stream) => stream,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));
                // Blocks until the handle sends or is dropped.
                let _ = stop_rx.recv();
                drop(stream);
                tracing::debug!("playback stream released");
            })
            .context("failed to spawn playback thread")?;

        let mut playback = Self {
            stop_tx: Some(stop_tx),
            thread: Some(thread),
        };
        match ready_rx.recv() {
            Ok(Ok(())) => Ok(playback),
            Ok(Err(e)) => {
                playback.stop();
                Err(e)
            }
            Err(_) => {
                playback.stop();
                Err(anyhow::anyhow!("playback thread exited before the stream started"))
            }
        }
    }

    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("playback thread panicked");
            }
        }
    }
}

impl Drop for PlaybackStream {
    fn drop(&mut self) {
        self.stop();
    }
}

fn open_stream(clip: &AudioClip, device_name: Option<&str>) -> anyhow::Result<cpal::Stream> {
    let output = device::get_or_default_output(device_name)?;
    let output_config = output
        .default_output_config()
        .context("failed to get default output config")?;
    let output_config = StreamConfig {
        channels: output_config.channels(),
        sample_rate: output_config.sample_rate(),
        buffer_size: cpal::BufferSize::Default,
    };
    let output_channel_count = output_config.channels as usize;
    let output_sample_rate = output_config.sample_rate.0;
    tracing::debug!(
        "output: device={:?}, config={:?}",
        output.name().unwrap_or_default(),
        &output_config
    );

    let samples = audio::resample_clip(clip, output_sample_rate)?;
    let (mut audio_out_tx, mut audio_out_rx) = audio::shared_buffer(samples.len().max(1)).split();
    let pushed = audio_out_tx.push_slice(&samples);
    if pushed < samples.len() {
        tracing::warn!("dropped {} samples that did not fit the buffer", samples.len() - pushed);
    }

    let output_data_fn = move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
        let mut sample_index = 0;
        while sample_index < data.len() {
            let sample = audio_out_rx.try_pop().unwrap_or(0.0);

            // L channel (ch:0)
            data[sample_index] = sample;
            sample_index += 1;
            // R channel (ch:1)
            if output_channel_count > 1 && sample_index < data.len() {
                data[sample_index] = sample;
                sample_index += 1;
            }
            // silence other channels
            for _ in 2..output_channel_count {
                if sample_index < data.len() {
                    data[sample_index] = 0.0;
                    sample_index += 1;
                }
            }
        }
    };
    let output_stream = output
        .build_output_stream(
            &output_config,
            output_data_fn,
            move |err| tracing::error!("an error occurred on output stream: {}", err),
            None,
        )
        .context("failed to build output stream")?;
    output_stream.play().context("failed to play output stream")?;
    Ok(output_stream)
}
