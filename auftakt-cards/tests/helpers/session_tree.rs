//! Fake recording sessions on disk
//!
//! Every take's content is its relative path, so copies can be traced back to
//! their source without real audio.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// A session folder inside its own temporary directory
pub struct SessionTree {
    temp: TempDir,
    root: PathBuf,
}

impl SessionTree {
    /// Empty session `<tmp>/<name>`
    pub fn new(name: &str) -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join(name);
        fs::create_dir_all(&root).unwrap();
        Self { temp, root }
    }

    /// Session with the given takes (paths relative to the session root)
    pub fn with_takes(name: &str, takes: &[&str]) -> Self {
        let tree = Self::new(name);
        for take in takes {
            tree.take(take);
        }
        tree
    }

    pub fn take(&self, rel: &str) -> PathBuf {
        let path = self.root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, rel.as_bytes()).unwrap();
        path
    }

    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.root.join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sibling folder of the session (for outputs)
    pub fn sibling(&self, name: &str) -> PathBuf {
        self.temp.path().join(name)
    }
}

/// Relative `/`-separated path -> file content (`None` for directories)
pub fn snapshot(root: &Path) -> BTreeMap<String, Option<Vec<u8>>> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|e| e.unwrap())
        .map(|e| {
            let rel = e
                .path()
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            let content = e.file_type().is_file().then(|| fs::read(e.path()).unwrap());
            (rel, content)
        })
        .collect()
}
