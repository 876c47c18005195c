use anyhow::Result;
use clap::Parser;

use std::io::{self, BufWriter};
use std::path::PathBuf;

use audioset::discover::find_audio_files;
use audioset::manifest::write_manifest;
use audioset::raw::RawPcmReader;

fn main() -> Result<()> {
    audioset::logging::init();
    let params = get_params()?;

    let mut meta = Vec::new();
    for root in &params.roots {
        meta.extend(find_audio_files(root, &params.exts)?);
    }

    if params.measure {
        let reader = RawPcmReader::default();
        meta = meta
            .into_iter()
            .map(|entry| {
                let frames = reader.file_frames(&entry.path)?;
                Ok(entry.with_length(frames))
            })
            .collect::<Result<Vec<_>, audioset::Error>>()?;
    }

    let stdout = io::stdout();
    let writer = BufWriter::new(stdout.lock());
    write_manifest(writer, &meta)?;
    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "audioset-index")]
#[command(about = "Index audio files under directory trees into a JSON manifest")]
struct Params {
    /// Root directories to scan.
    #[arg(required = true)]
    pub roots: Vec<PathBuf>,

    /// File extensions to include (with leading dot), case-insensitive.
    #[arg(short = 'e', long = "ext", default_values_t = [String::from(".raw")])]
    pub exts: Vec<String>,

    /// Replace the nominal length with the true frame count measured from each
    /// file's size (headerless f32 raw PCM layout).
    #[arg(long = "measure", default_value_t = false)]
    pub measure: bool,
}

fn get_params() -> Result<Params> {
    Ok(Params::parse())
}
