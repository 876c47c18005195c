//! `audioset` — a small, focused dataset indexing and retrieval library for audio files.
//!
//! This crate provides:
//! - Recursive discovery of audio files by extension
//! - A flat, randomly-indexable view over fixed-length segments across many files
//! - On-demand segment loading with optional rate/channel conversion
//! - A JSON manifest format for saving and reloading indexes
//!
//! The library is designed to feed training pipelines: build the collection once,
//! then hand out independent, read-only segment loads to as many workers as you like.

// High-level API (most consumers should start here).
pub mod audioset;
pub mod opts;

// Index construction: directory walking and manifest I/O.
pub mod discover;
pub mod manifest;

// Segment loading: the reader seam and its implementations.
pub mod decode;
pub mod raw;
pub mod reader;
pub mod wav;

// Rate and channel conversion for loaded segments.
pub mod convert;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

mod error;

pub use crate::audioset::{Audioset, Example};
pub use crate::discover::{FileEntry, NOMINAL_LENGTH, find_audio_files};
pub use crate::error::{Error, Result};
pub use crate::opts::SegmentOpts;
pub use crate::reader::{Samples, SegmentReader};
