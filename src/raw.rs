//! Headerless raw PCM reading.
//!
//! `.raw` dataset files carry no header, so the format is part of the reader's
//! configuration: little-endian `f32` samples at a nominal rate and channel
//! count. The defaults (5 kHz mono) match the capture format of the datasets
//! this crate was written for.
//!
//! Because the layout is fixed, seeking is byte arithmetic and the true frame
//! count of a file is just its size — see [`RawPcmReader::file_frames`], which
//! is how callers should replace the nominal index length with a measured one.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use anyhow::Context;

use crate::error::Result;
use crate::reader::{Samples, SegmentReader};

const BYTES_PER_SAMPLE: usize = size_of::<f32>();

/// Reads headerless little-endian `f32` PCM files.
#[derive(Debug, Clone)]
pub struct RawPcmReader {
    /// Nominal sample rate of the raw data (Hz).
    pub sample_rate: u32,
    /// Interleaved channel count of the raw data.
    pub channels: usize,
}

impl Default for RawPcmReader {
    fn default() -> Self {
        Self {
            sample_rate: 5_000,
            channels: 1,
        }
    }
}

impl RawPcmReader {
    pub fn new(sample_rate: u32, channels: usize) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// True frame count of a raw file, derived from its size on disk.
    pub fn file_frames(&self, path: &Path) -> Result<usize> {
        let bytes = std::fs::metadata(path)
            .with_context(|| format!("failed to stat '{}'", path.display()))?
            .len() as usize;
        Ok(bytes / (BYTES_PER_SAMPLE * self.channels))
    }
}

impl SegmentReader for RawPcmReader {
    fn read_segment(
        &self,
        path: &Path,
        offset: usize,
        num_frames: Option<usize>,
    ) -> Result<Samples> {
        let mut file =
            File::open(path).with_context(|| format!("failed to open '{}'", path.display()))?;

        let frame_bytes = BYTES_PER_SAMPLE * self.channels;
        file.seek(SeekFrom::Start((offset * frame_bytes) as u64))
            .with_context(|| format!("failed to seek in '{}'", path.display()))?;

        let mut raw = Vec::new();
        match num_frames {
            Some(frames) => {
                // Tail windows may read fewer bytes than requested; the caller
                // zero-pads, so a short read here is fine.
                raw.resize(frames * frame_bytes, 0);
                let mut filled = 0;
                loop {
                    let n = file
                        .read(&mut raw[filled..])
                        .with_context(|| format!("failed to read '{}'", path.display()))?;
                    if n == 0 {
                        break;
                    }
                    filled += n;
                    if filled == raw.len() {
                        break;
                    }
                }
                raw.truncate(filled - filled % frame_bytes);
            }
            None => {
                file.read_to_end(&mut raw)
                    .with_context(|| format!("failed to read '{}'", path.display()))?;
                raw.truncate(raw.len() - raw.len() % frame_bytes);
            }
        }

        let data = raw
            .chunks_exact(BYTES_PER_SAMPLE)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        Ok(Samples::new(data, self.sample_rate, self.channels))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_raw(dir: &Path, name: &str, samples: &[f32]) -> anyhow::Result<std::path::PathBuf> {
        let path = dir.join(name);
        let mut f = File::create(&path)?;
        for s in samples {
            f.write_all(&s.to_le_bytes())?;
        }
        Ok(path)
    }

    #[test]
    fn reads_a_window_at_an_offset() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let samples: Vec<f32> = (0..20).map(|i| i as f32).collect();
        let path = write_raw(dir.path(), "a.raw", &samples)?;

        let reader = RawPcmReader::default();
        let seg = reader.read_segment(&path, 5, Some(4))?;

        assert_eq!(seg.data, vec![5.0, 6.0, 7.0, 8.0]);
        assert_eq!(seg.sample_rate, 5_000);
        assert_eq!(seg.channels, 1);
        Ok(())
    }

    #[test]
    fn short_tail_read_returns_what_is_there() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let samples: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let path = write_raw(dir.path(), "a.raw", &samples)?;

        let reader = RawPcmReader::default();
        let seg = reader.read_segment(&path, 8, Some(5))?;
        assert_eq!(seg.data, vec![8.0, 9.0]);
        Ok(())
    }

    #[test]
    fn whole_file_read_when_num_frames_unset() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let samples: Vec<f32> = (0..7).map(|i| i as f32).collect();
        let path = write_raw(dir.path(), "a.raw", &samples)?;

        let reader = RawPcmReader::default();
        let seg = reader.read_segment(&path, 0, None)?;
        assert_eq!(seg.frames(), 7);
        Ok(())
    }

    #[test]
    fn file_frames_measures_true_length() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let samples: Vec<f32> = vec![0.0; 42];
        let path = write_raw(dir.path(), "a.raw", &samples)?;

        assert_eq!(RawPcmReader::default().file_frames(&path)?, 42);
        assert_eq!(RawPcmReader::new(5_000, 2).file_frames(&path)?, 21);
        Ok(())
    }
}
