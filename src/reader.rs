use std::path::Path;

use crate::error::Result;

/// Decoded PCM returned by a [`SegmentReader`].
///
/// Samples are interleaved `f32` in `[-1.0, 1.0]`; `data.len()` is always a
/// multiple of `channels`.
#[derive(Debug, Clone, PartialEq)]
pub struct Samples {
    pub data: Vec<f32>,
    pub sample_rate: u32,
    pub channels: usize,
}

impl Samples {
    pub fn new(data: Vec<f32>, sample_rate: u32, channels: usize) -> Self {
        debug_assert!(channels > 0);
        debug_assert_eq!(data.len() % channels, 0);
        Self {
            data,
            sample_rate,
            channels,
        }
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.data.len() / self.channels
    }

    /// Zero-extend to exactly `frames` frames.
    ///
    /// A buffer that is already long enough is left untouched; padding never
    /// truncates.
    pub fn pad_to_frames(&mut self, frames: usize) {
        let want = frames * self.channels;
        if self.data.len() < want {
            self.data.resize(want, 0.0);
        }
    }
}

/// Pluggable segment loader used by [`crate::audioset::Audioset`].
///
/// A reader is responsible for turning `(path, offset, num_frames)` into
/// decoded PCM. `offset` is in frames from the start of the file;
/// `num_frames: None` means "read the whole file".
///
/// Readers report the *source* rate and channel count; rate/channel policy
/// (strict check vs. conversion) is applied by the collection, not here.
///
/// A short read near the end of a file is not an error — the collection
/// zero-pads tail windows itself.
pub trait SegmentReader {
    fn read_segment(&self, path: &Path, offset: usize, num_frames: Option<usize>)
    -> Result<Samples>;
}
