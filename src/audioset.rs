//! The segmented audio collection.
//!
//! `Audioset` wraps an ordered list of `(path, length)` entries and exposes a
//! flat, globally-indexable view over every fixed-length window those files
//! yield under the configured window length, stride, and padding policy.
//!
//! The per-file window counts are computed once in the constructor; after that
//! the collection is read-only. Each `get` performs one blocking file read and
//! shares no mutable state with other calls, so callers may fan out `get`s
//! across threads without coordination.

use std::path::PathBuf;

use tracing::trace;

use crate::discover::FileEntry;
use crate::error::{Error, Result};
use crate::opts::SegmentOpts;
use crate::raw::RawPcmReader;
use crate::reader::{Samples, SegmentReader};

/// One retrieved example: the decoded (and possibly padded) samples, plus the
/// source path when [`SegmentOpts::with_path`] is set.
#[derive(Debug, Clone)]
pub struct Example {
    pub samples: Samples,
    pub path: Option<PathBuf>,
}

/// A randomly-indexable collection of fixed-length audio segments spread
/// across many files.
///
/// The reader is pluggable in the same way transcription backends usually are:
/// the collection owns the index arithmetic, the reader owns the decoding.
/// The default reader handles the headerless `.raw` layout.
pub struct Audioset<R: SegmentReader = RawPcmReader> {
    files: Vec<FileEntry>,
    num_examples: Vec<usize>,
    opts: SegmentOpts,
    reader: R,
}

impl Audioset<RawPcmReader> {
    /// Build a collection over raw PCM files with the default reader.
    pub fn new(files: Vec<FileEntry>, opts: SegmentOpts) -> Self {
        Self::with_reader(files, opts, RawPcmReader::default())
    }
}

impl<R: SegmentReader> Audioset<R> {
    /// Build a collection with a custom segment reader.
    ///
    /// The per-file example counts are derived eagerly from each entry's
    /// declared `length`:
    ///
    /// - no window length configured: one example per file
    /// - file shorter than the window: one example if padding, else zero
    /// - padding: `ceil((file_length - length) / stride) + 1` (the tail is
    ///   covered by a final window that is zero-padded at read time)
    /// - no padding: `floor((file_length - length) / stride) + 1` (any
    ///   incomplete tail is dropped)
    ///
    /// Lengths are taken at face value; see the discovery module for why a
    /// nominal length makes these counts nominal too.
    pub fn with_reader(files: Vec<FileEntry>, opts: SegmentOpts, reader: R) -> Self {
        let num_examples = files
            .iter()
            .map(|f| examples_for(f.length, &opts))
            .collect();

        Self {
            files,
            num_examples,
            opts,
            reader,
        }
    }

    /// Total number of addressable segments across the whole collection.
    pub fn len(&self) -> usize {
        self.num_examples.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The indexed files, in collection order.
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    /// The configured options.
    pub fn opts(&self) -> &SegmentOpts {
        &self.opts
    }

    /// Load the segment at a global index.
    ///
    /// The index is resolved to an owning file and intra-file window by
    /// walking the per-file counts in order. That scan is O(files) per call;
    /// fine at dataset-index scale, and a prefix-sum + binary search drop-in
    /// would not change observable behavior if it ever matters.
    pub fn get(&self, index: usize) -> Result<Example> {
        let (entry, local) = self.locate(index)?;

        let (offset, num_frames) = match self.opts.length {
            Some(length) => (self.opts.effective_stride() * local, Some(length)),
            None => (0, None),
        };

        trace!(
            index,
            path = %entry.path.display(),
            offset,
            ?num_frames,
            "loading segment"
        );

        let decoded = self.reader.read_segment(&entry.path, offset, num_frames)?;

        let target_rate = self.opts.sample_rate.unwrap_or(decoded.sample_rate);
        let target_channels = self.opts.channels.unwrap_or(decoded.channels);

        let mut samples = if self.opts.convert {
            crate::convert::convert_audio(decoded, target_rate, target_channels)?
        } else {
            if decoded.sample_rate != target_rate || decoded.channels != target_channels {
                return Err(Error::FormatMismatch {
                    path: entry.path.clone(),
                    expected_rate: target_rate,
                    actual_rate: decoded.sample_rate,
                    expected_channels: target_channels,
                    actual_channels: decoded.channels,
                });
            }
            decoded
        };

        if let Some(length) = self.opts.length {
            samples.pad_to_frames(length);
        }

        Ok(Example {
            samples,
            path: self.opts.with_path.then(|| entry.path.clone()),
        })
    }

    /// Resolve a global index to `(owning file, intra-file window index)`.
    fn locate(&self, index: usize) -> Result<(&FileEntry, usize)> {
        let mut remaining = index;
        for (entry, &examples) in self.files.iter().zip(&self.num_examples) {
            if remaining < examples {
                return Ok((entry, remaining));
            }
            remaining -= examples;
        }

        Err(Error::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }
}

/// Sliding-window count for one file under the configured policy.
fn examples_for(file_length: usize, opts: &SegmentOpts) -> usize {
    let Some(length) = opts.length else {
        return 1;
    };

    if file_length < length {
        return if opts.pad { 1 } else { 0 };
    }

    let stride = opts.effective_stride();
    if opts.pad {
        (file_length - length).div_ceil(stride) + 1
    } else {
        (file_length - length) / stride + 1
    }
}
