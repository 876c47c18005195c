/// Options that control how a collection slices and loads its files.
///
/// This struct represents *library-level configuration*, not CLI flags directly.
/// It is attached to an [`crate::audioset::Audioset`] at construction time and
/// never mutated afterwards, so readers can treat the collection as immutable.
#[derive(Debug, Clone)]
pub struct SegmentOpts {
    /// Window length in frames for each example.
    ///
    /// When `None`, every file yields exactly one example spanning the whole
    /// file.
    pub length: Option<usize>,

    /// Distance in frames between consecutive window start offsets.
    ///
    /// Defaults to `length` when unset (non-overlapping windows).
    pub stride: Option<usize>,

    /// Whether to keep incomplete tail windows (and undersized files),
    /// zero-padding them to `length` at read time. When `false`, anything
    /// shorter than a full window is dropped from the index.
    pub pad: bool,

    /// Whether retrieved examples carry the source file path.
    pub with_path: bool,

    /// Target sample rate for loaded audio.
    ///
    /// When `None`, the source file's own rate is accepted as-is.
    pub sample_rate: Option<u32>,

    /// Target channel count for loaded audio.
    ///
    /// When `None`, the source file's own channel count is accepted as-is.
    pub channels: Option<usize>,

    /// Whether to resample / remix decoded audio to the target spec.
    ///
    /// When `false`, a rate or channel mismatch is a fatal
    /// [`crate::Error::FormatMismatch`].
    pub convert: bool,
}

impl Default for SegmentOpts {
    fn default() -> Self {
        Self {
            length: None,
            stride: None,
            pad: true,
            with_path: false,
            sample_rate: None,
            channels: None,
            convert: false,
        }
    }
}

impl SegmentOpts {
    /// Effective stride: the configured stride, falling back to `length`.
    ///
    /// Only meaningful when `length` is set; callers must not use the result
    /// for whole-file examples.
    pub(crate) fn effective_stride(&self) -> usize {
        self.stride.or(self.length).unwrap_or(0)
    }
}
