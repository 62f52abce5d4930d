//! Deck archiver
//!
//! Packs a finished deck into `<deck-dir-name>.zip` next to the deck root.
//! Entry names are relative to the deck root with `/` separators; directories
//! get their own entries so empty collections survive extraction. The
//! uncompressed deck is left in place.

use crate::error::{DeckError, DeckResult};
use crate::models::audio_file::base_name;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Archive file extension
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Archive path for a deck root: sibling file named after the deck directory
pub fn archive_path(deck_root: &Path) -> PathBuf {
    let name = format!("{}.{}", base_name(deck_root), ARCHIVE_EXTENSION);
    deck_root.with_file_name(name)
}

/// Write the deck archive and return its path
///
/// Any failure is reported as [`DeckError::ArchiveFailure`]; a partially
/// written archive file is removed.
pub fn archive(deck_root: &Path) -> DeckResult<PathBuf> {
    let target = archive_path(deck_root);
    match write_archive(deck_root, &target) {
        Ok(entries) => {
            tracing::info!(
                archive = %target.display(),
                entries,
                "Deck archived"
            );
            Ok(target)
        }
        Err(reason) => {
            if target.exists() {
                let _ = fs::remove_file(&target);
            }
            Err(DeckError::ArchiveFailure(target, reason))
        }
    }
}

fn write_archive(deck_root: &Path, target: &Path) -> Result<usize, String> {
    if !deck_root.is_dir() {
        return Err(format!("deck root is not a directory: {}", deck_root.display()));
    }

    let file = File::create(target).map_err(|e| e.to_string())?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = 0;
    let walker = WalkDir::new(deck_root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| e.to_string())?;
        let name = entry_name(deck_root, entry.path())?;

        if entry.file_type().is_dir() {
            writer
                .add_directory(format!("{}/", name), options)
                .map_err(|e| e.to_string())?;
        } else {
            writer
                .start_file(name, options)
                .map_err(|e| e.to_string())?;
            let mut source = File::open(entry.path()).map_err(|e| e.to_string())?;
            io::copy(&mut source, &mut writer).map_err(|e| e.to_string())?;
        }
        entries += 1;
    }

    writer.finish().map_err(|e| e.to_string())?;
    Ok(entries)
}

/// Path relative to the deck root, `/`-separated
fn entry_name(deck_root: &Path, path: &Path) -> Result<String, String> {
    let relative = path
        .strip_prefix(deck_root)
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}
