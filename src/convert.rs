//! Sample-rate and channel-layout conversion for loaded segments.
//!
//! Channel policy is deliberately narrow: identity, downmix-to-mono by
//! equal-weight average, or upmix-from-mono by duplication. Anything else
//! (e.g. 5.1 -> stereo) is rejected rather than guessed at.
//!
//! Resampling feeds rubato's `SincFixedIn` whole fixed-size blocks, padding
//! the tail with zeros and truncating the output to the expected frame count.

use anyhow::{Context, anyhow};
use rubato::{Resampler, SincFixedIn, WindowFunction};

use crate::error::{Error, Result};
use crate::reader::Samples;

/// Convert `samples` to the target sample rate and channel count.
///
/// Channels are remixed first (cheaper to resample fewer channels when
/// downmixing), then the rate conversion runs over every remaining channel.
pub fn convert_audio(samples: Samples, target_rate: u32, target_channels: usize) -> Result<Samples> {
    let src_rate = samples.sample_rate;
    let remixed = remix_channels(samples, target_channels)?;

    if src_rate == target_rate {
        return Ok(remixed);
    }

    resample(remixed, target_rate)
}

/// Remix interleaved samples to `target_channels`.
fn remix_channels(samples: Samples, target_channels: usize) -> Result<Samples> {
    let src_channels = samples.channels;

    if src_channels == target_channels {
        return Ok(samples);
    }

    if target_channels == 1 {
        // Equal-weight average across channels (simple, predictable).
        let frames = samples.frames();
        let mut mono = Vec::with_capacity(frames);
        for frame in samples.data.chunks_exact(src_channels) {
            mono.push(frame.iter().sum::<f32>() / src_channels as f32);
        }
        return Ok(Samples::new(mono, samples.sample_rate, 1));
    }

    if src_channels == 1 {
        let mut out = Vec::with_capacity(samples.data.len() * target_channels);
        for &s in &samples.data {
            out.extend(std::iter::repeat_n(s, target_channels));
        }
        return Ok(Samples::new(out, samples.sample_rate, target_channels));
    }

    Err(Error::UnsupportedConversion {
        from: src_channels,
        to: target_channels,
    })
}

/// Resample every channel to `target_rate` with a sinc resampler.
fn resample(samples: Samples, target_rate: u32) -> Result<Samples> {
    let src_rate = samples.sample_rate;
    let channels = samples.channels;
    let src_frames = samples.frames();
    let want_frames = (src_frames as f64 * target_rate as f64 / src_rate as f64).round() as usize;

    if src_frames == 0 {
        return Ok(Samples::new(Vec::new(), target_rate, channels));
    }

    // How many source frames we feed rubato per `process()` call.
    let in_chunk_src_frames = 1024;

    let mut rs = SincFixedIn::<f32>::new(
        target_rate as f64 / src_rate as f64,
        2.0,
        rubato::SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: rubato::SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        },
        in_chunk_src_frames,
        channels,
    )
    .map_err(|e| anyhow!(e))
    .context("failed to init resampler")?;

    // Deinterleave into per-channel buffers, padded out to whole rubato blocks.
    let in_max = rs.input_frames_max();
    let padded_frames = src_frames.div_ceil(in_max) * in_max;
    let mut planar: Vec<Vec<f32>> = vec![vec![0.0; padded_frames]; channels];
    for (frame, chunk) in samples.data.chunks_exact(channels).enumerate() {
        for (ch, &s) in chunk.iter().enumerate() {
            planar[ch][frame] = s;
        }
    }

    let mut out_planar: Vec<Vec<f32>> = vec![Vec::new(); channels];
    for block_start in (0..padded_frames).step_by(in_max) {
        let block: Vec<Vec<f32>> = planar
            .iter()
            .map(|ch| ch[block_start..block_start + in_max].to_vec())
            .collect();

        let out = rs
            .process(&block, None)
            .map_err(|e| anyhow!(e))
            .context("resampler process failed")?;

        for (ch, chunk) in out.into_iter().enumerate() {
            out_planar[ch].extend(chunk);
        }
    }

    for ch in &mut out_planar {
        // The zero padding makes the output land on or just past `want_frames`;
        // trim, or top up the odd frame lost to per-block rounding.
        ch.resize(want_frames, 0.0);
    }

    // Reinterleave.
    let mut data = Vec::with_capacity(want_frames * channels);
    for frame in 0..want_frames {
        for ch in &out_planar {
            data.push(ch[frame]);
        }
    }

    Ok(Samples::new(data, target_rate, channels))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_remix_is_untouched() -> anyhow::Result<()> {
        let s = Samples::new(vec![0.1, 0.2], 8_000, 1);
        let out = convert_audio(s.clone(), 8_000, 1)?;
        assert_eq!(out, s);
        Ok(())
    }

    #[test]
    fn downmix_averages_channels() -> anyhow::Result<()> {
        // Two stereo frames: (1, 3) and (-1, 1) => mono 2, 0.
        let s = Samples::new(vec![1.0, 3.0, -1.0, 1.0], 8_000, 2);
        let out = convert_audio(s, 8_000, 1)?;
        assert_eq!(out.data, vec![2.0, 0.0]);
        assert_eq!(out.channels, 1);
        Ok(())
    }

    #[test]
    fn upmix_duplicates_mono() -> anyhow::Result<()> {
        let s = Samples::new(vec![0.5, -0.5], 8_000, 1);
        let out = convert_audio(s, 8_000, 2)?;
        assert_eq!(out.data, vec![0.5, 0.5, -0.5, -0.5]);
        assert_eq!(out.channels, 2);
        Ok(())
    }

    #[test]
    fn arbitrary_channel_maps_are_rejected() {
        let s = Samples::new(vec![0.0; 6], 8_000, 2);
        let err = convert_audio(s, 8_000, 3).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedConversion { from: 2, to: 3 }
        ));
    }

    #[test]
    fn resample_produces_expected_frame_count() -> anyhow::Result<()> {
        let s = Samples::new(vec![0.25; 100], 8_000, 1);
        let out = convert_audio(s, 16_000, 1)?;
        assert_eq!(out.frames(), 200);
        assert_eq!(out.sample_rate, 16_000);
        Ok(())
    }

    #[test]
    fn downsample_produces_expected_frame_count() -> anyhow::Result<()> {
        // 320 interleaved samples = 160 stereo frames.
        let s = Samples::new(vec![0.0; 320], 16_000, 2);
        let out = convert_audio(s, 5_000, 2)?;
        assert_eq!(out.frames(), 50);
        assert_eq!(out.channels, 2);
        Ok(())
    }

    #[test]
    fn remix_and_resample_compose() -> anyhow::Result<()> {
        let s = Samples::new(vec![0.5; 200], 8_000, 2);
        let out = convert_audio(s, 16_000, 1)?;
        assert_eq!(out.channels, 1);
        assert_eq!(out.frames(), 200);
        Ok(())
    }

    #[test]
    fn empty_input_resamples_to_empty() -> anyhow::Result<()> {
        let s = Samples::new(Vec::new(), 8_000, 1);
        let out = convert_audio(s, 16_000, 1)?;
        assert_eq!(out.frames(), 0);
        assert_eq!(out.sample_rate, 16_000);
        Ok(())
    }
}
