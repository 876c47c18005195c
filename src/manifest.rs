//! Dataset manifest serialization.
//!
//! A manifest is a single JSON array of `[path, length]` pairs, pretty-printed
//! with 4-space indentation. Downstream training tooling consumes the same
//! format, so both the layout and the indentation are part of the contract.

use std::io::{Read, Write};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::discover::FileEntry;
use crate::error::Result;

/// Write `entries` to `w` as a pretty-printed JSON array.
pub fn write_manifest<W: Write>(mut w: W, entries: &[FileEntry]) -> Result<()> {
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut w, formatter);
    entries.serialize(&mut ser)?;

    // Flush so streaming consumers (stdout, pipes) see output promptly.
    w.flush()?;
    Ok(())
}

/// Parse a manifest previously produced by [`write_manifest`] (or any JSON
/// array of `[path, length]` pairs).
pub fn read_manifest<R: Read>(r: R) -> Result<Vec<FileEntry>> {
    Ok(serde_json::from_reader(r)?)
}
