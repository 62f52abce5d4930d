//! Source-side entities: takes and the directories that hold them
//!
//! Both exist only while a run walks the source tree; nothing here is persisted.

use crate::services::order_key::{OrderPolicy, PaddedKey, SortKey};
use std::path::{Path, PathBuf};

/// One audio take found in the source tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    /// Absolute or caller-relative path to the take
    pub source_path: PathBuf,
    /// File name as found on disk
    pub raw_name: String,
}

impl AudioFile {
    pub fn new(source_path: PathBuf) -> Self {
        let raw_name = source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            source_path,
            raw_name,
        }
    }

    /// Order key under `policy`, derived on demand
    pub fn order_key(&self, policy: OrderPolicy) -> SortKey {
        policy.sort_key(&self.raw_name)
    }

    /// Lowercased extension without the dot (empty when absent)
    pub fn extension(&self) -> String {
        self.source_path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }
}

/// A directory of takes
#[derive(Debug, Clone)]
pub struct SourceDirectory {
    pub path: PathBuf,
    pub name: String,
    pub children: Vec<AudioFile>,
}

impl SourceDirectory {
    pub fn new(path: &Path, children: Vec<AudioFile>) -> Self {
        Self {
            path: path.to_path_buf(),
            name: base_name(path),
            children,
        }
    }

    /// Directory-level natural-order key, ranks siblings
    pub fn order_key(&self) -> PaddedKey {
        PaddedKey::for_dir(&self.name)
    }
}

/// Final path component as a string ("" for roots like `/`)
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_file_name_and_extension() {
        let file = AudioFile::new(PathBuf::from("/session/Scene 1/Recording (2).M4A"));
        assert_eq!(file.raw_name, "Recording (2).M4A");
        assert_eq!(file.extension(), "m4a");
    }

    #[test]
    fn test_audio_file_order_key() {
        let first = AudioFile::new(PathBuf::from("A/Recording.m4a"));
        let second = AudioFile::new(PathBuf::from("A/Recording (2).m4a"));
        assert!(first.order_key(OrderPolicy::DualNumber) < second.order_key(OrderPolicy::DualNumber));
    }

    #[test]
    fn test_source_directory_name() {
        let dir = SourceDirectory::new(Path::new("/session/Scene 2"), Vec::new());
        assert_eq!(dir.name, "Scene 2");
        assert_eq!(dir.order_key(), PaddedKey::for_dir("Scene 2"));
    }

    #[test]
    fn test_base_name_of_root() {
        assert_eq!(base_name(Path::new("/")), "");
        assert_eq!(base_name(Path::new("data/twice")), "twice");
    }
}
