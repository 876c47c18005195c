//! Container-format segment reading via Symphonia.
//!
//! This covers everything Symphonia can probe (wav, flac, ogg, mp3, ...).
//! Compressed codecs have no random access at frame granularity, so `offset`
//! is implemented by decoding from the start and discarding frames until the
//! window begins; decoding stops as soon as the window is filled.
//!
//! Error handling policy:
//! - `DecodeError` -> skip the bad frame (common with some codecs)
//! - `IoError`     -> treat as end-of-stream
//! - other errors  -> bubble up with context

use std::fs::File;
use std::path::Path;

use anyhow::{Context, anyhow};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, Packet, Track};
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::Result;
use crate::reader::{Samples, SegmentReader};

/// Reads segments from any container/codec Symphonia supports.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaReader;

impl SegmentReader for SymphoniaReader {
    fn read_segment(
        &self,
        path: &Path,
        offset: usize,
        num_frames: Option<usize>,
    ) -> Result<Samples> {
        let (mut format, track) = probe_file(path)?;
        let track_id = track.id;

        let decoder_opts: DecoderOptions = Default::default();
        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &decoder_opts)
            .map_err(|e| anyhow!(e))
            .with_context(|| format!("failed to create decoder for '{}'", path.display()))?;

        // Window bounds in frames from the start of the stream.
        let end = num_frames.map(|n| offset.saturating_add(n));

        let mut sample_buf: Option<SampleBuffer<f32>> = None;
        let mut data = Vec::new();
        let mut sample_rate = 0u32;
        let mut channels = 0usize;
        let mut frames_seen = 0usize;

        while let Some(packet) = next_packet(&mut format)? {
            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decode_packet(&mut decoder, &packet)? {
                Some(decoded) => decoded,
                None => continue,
            };

            let spec = *decoded.spec();
            sample_rate = spec.rate;
            channels = spec.channels.count();
            if channels == 0 {
                return Err(anyhow!("'{}' decoded to zero channels", path.display()).into());
            }

            // Copy decoded PCM into an interleaved f32 scratch buffer.
            if sample_buf.is_none() {
                sample_buf = Some(SampleBuffer::<f32>::new(decoded.capacity() as u64, spec));
            }
            let buf = sample_buf
                .as_mut()
                .ok_or_else(|| anyhow!("sample buffer not initialized"))?;
            buf.copy_interleaved_ref(decoded);

            let interleaved = buf.samples();
            let buf_frames = interleaved.len() / channels;

            // Intersect this buffer's frame span with the requested window.
            let lo = offset.max(frames_seen);
            let hi = end
                .unwrap_or(usize::MAX)
                .min(frames_seen + buf_frames);
            if lo < hi {
                data.extend_from_slice(&interleaved[(lo - frames_seen) * channels..(hi - frames_seen) * channels]);
            }

            frames_seen += buf_frames;
            if end.is_some_and(|end| frames_seen >= end) {
                break;
            }
        }

        if channels == 0 {
            // Nothing decodable at all (empty stream). Fall back to the
            // track's declared parameters so the caller still gets a usable
            // (empty) buffer.
            sample_rate = track.codec_params.sample_rate.unwrap_or(0);
            channels = track
                .codec_params
                .channels
                .map(|c| c.count())
                .unwrap_or(1)
                .max(1);
        }

        Ok(Samples::new(data, sample_rate, channels))
    }
}

/// Probe the container and pick a default audio track.
///
/// Track selection policy: the first track that looks decodable
/// (codec != NULL) and has a known sample rate.
fn probe_file(path: &Path) -> Result<(Box<dyn FormatReader>, Track)> {
    let file =
        File::open(path).with_context(|| format!("failed to open '{}'", path.display()))?;

    let mss_opts = MediaSourceStreamOptions {
        // Symphonia expects a power-of-two buffer > 32KiB for good probing behavior.
        buffer_len: 256 * 1024,
    };
    let mss = MediaSourceStream::new(Box::new(file), mss_opts);

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let format_opts: FormatOptions = Default::default();
    let metadata_opts: MetadataOptions = Default::default();

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &format_opts, &metadata_opts)
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("failed to probe '{}'", path.display()))?;

    let format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL && t.codec_params.sample_rate.is_some())
        .cloned()
        .ok_or_else(|| anyhow!("no audio track found in '{}'", path.display()))?;

    Ok((format, track))
}

/// Read the next packet, treating IO errors as "end of stream".
fn next_packet(format: &mut Box<dyn FormatReader>) -> Result<Option<Packet>> {
    match format.next_packet() {
        Ok(p) => Ok(Some(p)),
        Err(SymphoniaError::IoError(_)) => Ok(None),
        Err(e) => Err(crate::Error::from(
            anyhow!(e).context("failed reading packet"),
        )),
    }
}

/// Decode one packet, skipping recoverable failures.
fn decode_packet<'a>(
    decoder: &'a mut Box<dyn Decoder>,
    packet: &Packet,
) -> Result<Option<symphonia::core::audio::AudioBufferRef<'a>>> {
    match decoder.decode(packet) {
        Ok(buf) => Ok(Some(buf)),

        // Recoverable: corrupted frame, but decoding can continue.
        Err(SymphoniaError::DecodeError(_)) => Ok(None),

        // Treat IO errors as graceful end-of-stream.
        Err(SymphoniaError::IoError(_)) => Ok(None),

        // Anything else is considered fatal.
        Err(e) => Err(crate::Error::from(anyhow!(e).context("decoder failure"))),
    }
}
