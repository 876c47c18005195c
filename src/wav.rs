use std::path::Path;

use anyhow::Context;
use hound::{SampleFormat, WavReader};

use crate::error::Result;
use crate::reader::{Samples, SegmentReader};

/// Reads segments out of WAV files via hound.
///
/// What we return:
/// - interleaved `f32` samples normalized to `[-1.0, 1.0]`
/// - the file's own sample rate and channel count (rate/channel policy is the
///   collection's job, not the reader's)
///
/// WAV holds fixed-size frames, so `offset` is an in-file seek rather than a
/// decode-and-discard pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavSegmentReader;

impl SegmentReader for WavSegmentReader {
    fn read_segment(
        &self,
        path: &Path,
        offset: usize,
        num_frames: Option<usize>,
    ) -> Result<Samples> {
        let mut reader = WavReader::open(path)
            .with_context(|| format!("failed to read WAV data from '{}'", path.display()))?;
        let spec = reader.spec();
        let channels = spec.channels as usize;

        // Seeking past the end yields an empty (padded later) segment.
        let total_frames = reader.duration() as usize;
        if offset >= total_frames {
            return Ok(Samples::new(Vec::new(), spec.sample_rate, channels));
        }

        reader
            .seek(offset as u32)
            .with_context(|| format!("failed to seek in '{}'", path.display()))?;

        let want_samples = num_frames
            .map(|frames| frames * channels)
            .unwrap_or(usize::MAX);

        // Normalize PCM to f32 in [-1.0, 1.0]; most ML pipelines expect audio
        // in this floating-point format.
        let mut data = Vec::new();
        match spec.sample_format {
            SampleFormat::Float => {
                for sample in reader.samples::<f32>().take(want_samples) {
                    data.push(sample?);
                }
            }
            SampleFormat::Int => {
                let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                for sample in reader.samples::<i32>().take(want_samples) {
                    data.push(sample? as f32 / full_scale);
                }
            }
        }

        data.truncate(data.len() - data.len() % channels);
        Ok(Samples::new(data, spec.sample_rate, channels))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use hound::{WavSpec, WavWriter};

    use super::*;

    fn write_wav_i16(dir: &Path, name: &str, samples: &[i16]) -> anyhow::Result<PathBuf> {
        let path = dir.join(name);
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut w = WavWriter::create(&path, spec)?;
        for &s in samples {
            w.write_sample(s)?;
        }
        w.finalize()?;
        Ok(path)
    }

    #[test]
    fn reads_a_window_with_seek() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let samples: Vec<i16> = (0..20).map(|i| i * 100).collect();
        let path = write_wav_i16(dir.path(), "a.wav", &samples)?;

        let seg = WavSegmentReader.read_segment(&path, 5, Some(3))?;
        assert_eq!(seg.sample_rate, 8_000);
        assert_eq!(seg.channels, 1);
        assert_eq!(seg.frames(), 3);

        let expected = 500.0 / 32_768.0;
        assert!((seg.data[0] - expected).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn offset_past_the_end_is_an_empty_segment() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_wav_i16(dir.path(), "a.wav", &[1, 2, 3])?;

        let seg = WavSegmentReader.read_segment(&path, 10, Some(4))?;
        assert_eq!(seg.frames(), 0);
        Ok(())
    }

    #[test]
    fn whole_file_read_when_num_frames_unset() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_wav_i16(dir.path(), "a.wav", &[0; 12])?;

        let seg = WavSegmentReader.read_segment(&path, 0, None)?;
        assert_eq!(seg.frames(), 12);
        Ok(())
    }
}
