//! File discovery for building dataset indexes.
//!
//! We walk a directory tree (following symlinked directories), keep files whose
//! extension matches a case-insensitive allow-list, and return them sorted by
//! resolved path so an index built twice is byte-identical.
//!
//! The `length` recorded for each file is [`NOMINAL_LENGTH`], a placeholder —
//! discovery never opens the files it lists. Callers that need real sample
//! counts must measure them separately (for headerless raw PCM, see
//! [`crate::raw::RawPcmReader::file_frames`]) and build entries with
//! [`FileEntry::with_length`].

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::{Deserializer, Error as DeError};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::Result;

/// Placeholder length (in frames) assigned to every discovered file.
pub const NOMINAL_LENGTH: usize = 10_000;

/// One indexed audio file: a resolved path plus an assumed length in frames.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FileEntry {
    pub path: PathBuf,
    pub length: usize,
}

impl FileEntry {
    pub fn new(path: impl Into<PathBuf>, length: usize) -> Self {
        Self {
            path: path.into(),
            length,
        }
    }

    /// Replace the (possibly nominal) length with a measured one.
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }
}

impl fmt::Display for FileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} frames)", self.path.display(), self.length)
    }
}

// On the wire an entry is a `[path, length]` pair, matching the manifest
// format consumed by downstream training tooling.
impl Serialize for FileEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        (&self.path, self.length).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FileEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (path, length) = <(PathBuf, usize)>::deserialize(deserializer)
            .map_err(|e| D::Error::custom(format!("expected [path, length] pair: {e}")))?;
        Ok(Self { path, length })
    }
}

/// Recursively discover audio files under `root`.
///
/// Matching policy:
/// - symlinked directories are followed
/// - a file is kept when its extension (with leading dot, lowercased) is a
///   member of `exts`, e.g. `[".raw"]`
/// - kept paths are canonicalized (absolute, symlinks resolved)
///
/// The result is sorted lexicographically by path for deterministic ordering
/// across runs and platforms.
///
/// Failure semantics are deliberately blunt: unreadable directories or
/// permission failures abort the walk with an error. There is no partial
/// result.
pub fn find_audio_files<S: AsRef<str>>(root: impl AsRef<Path>, exts: &[S]) -> Result<Vec<FileEntry>> {
    let root = root.as_ref();
    let mut meta = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !has_matching_extension(entry.path(), exts) {
            continue;
        }

        let resolved = entry.path().canonicalize()?;
        meta.push(FileEntry::new(resolved, NOMINAL_LENGTH));
    }

    meta.sort();
    debug!(
        root = %root.display(),
        files = meta.len(),
        "discovered audio files"
    );
    Ok(meta)
}

/// Case-insensitive membership test of `path`'s extension in `exts`.
///
/// `exts` entries carry a leading dot (".raw"); files without an extension
/// never match.
fn has_matching_extension<S: AsRef<str>>(path: &Path, exts: &[S]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };

    let dotted = format!(".{}", ext.to_ascii_lowercase());
    exts.iter()
        .any(|e| e.as_ref().eq_ignore_ascii_case(&dotted))
}
