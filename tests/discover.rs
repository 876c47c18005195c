use std::fs::{self, File};
use std::path::Path;

use audioset::discover::{NOMINAL_LENGTH, find_audio_files};

fn touch(path: &Path) -> anyhow::Result<()> {
    File::create(path)?;
    Ok(())
}

#[test]
fn discovery_filters_by_extension_case_insensitively() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    touch(&dir.path().join("a.raw"))?;
    touch(&dir.path().join("b.RAW"))?;
    touch(&dir.path().join("c.wav"))?;

    let entries = find_audio_files(dir.path(), &[".raw"])?;

    let names: Vec<_> = entries
        .iter()
        .map(|e| e.path.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.raw", "b.RAW"]);
    Ok(())
}

#[test]
fn discovery_recurses_and_sorts_by_resolved_path() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    fs::create_dir(dir.path().join("sub"))?;
    touch(&dir.path().join("sub/b.raw"))?;
    touch(&dir.path().join("a.raw"))?;

    let entries = find_audio_files(dir.path(), &[".raw"])?;

    assert_eq!(entries.len(), 2);
    assert!(entries[0].path.ends_with("a.raw"));
    assert!(entries[1].path.ends_with("sub/b.raw"));
    assert!(entries.windows(2).all(|w| w[0].path <= w[1].path));
    Ok(())
}

#[test]
fn discovered_entries_carry_the_nominal_length() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    touch(&dir.path().join("a.raw"))?;

    let entries = find_audio_files(dir.path(), &[".raw"])?;
    assert_eq!(entries[0].length, NOMINAL_LENGTH);
    assert!(entries[0].path.is_absolute());
    Ok(())
}

#[test]
fn multiple_extensions_are_accepted() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    touch(&dir.path().join("a.raw"))?;
    touch(&dir.path().join("c.wav"))?;
    touch(&dir.path().join("d.txt"))?;

    let entries = find_audio_files(dir.path(), &[".raw", ".wav"])?;
    assert_eq!(entries.len(), 2);
    Ok(())
}

#[cfg(unix)]
#[test]
fn symlinked_directories_are_followed() -> anyhow::Result<()> {
    let data = tempfile::tempdir()?;
    fs::create_dir(data.path().join("real"))?;
    touch(&data.path().join("real/d.raw"))?;

    let root = tempfile::tempdir()?;
    std::os::unix::fs::symlink(data.path().join("real"), root.path().join("link"))?;

    let entries = find_audio_files(root.path(), &[".raw"])?;
    assert_eq!(entries.len(), 1);
    // The recorded path is fully resolved, not the symlinked walk path.
    assert!(entries[0].path.ends_with("real/d.raw"));
    Ok(())
}

#[test]
fn missing_root_propagates_an_error() {
    let res = find_audio_files("/definitely/not/a/real/root", &[".raw"]);
    assert!(res.is_err());
}
