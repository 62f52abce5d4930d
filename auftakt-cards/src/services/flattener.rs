//! Session tree flattener
//!
//! Copies every leaf file of a nested session tree into one directory, named
//! `<normalized parent dir>_<normalized file name>`.
//!
//! **Algorithm:**
//! 1. Reject a missing/non-directory source before touching the destination
//! 2. Walk depth-first pre-order; at every level files come first, then
//!    subdirectories, each group in padded natural order (never in native
//!    listing order)
//! 3. Copy each file into the destination under its composite name
//!
//! Two sources mapping to the same destination name are not deduplicated: the
//! later copy overwrites the earlier one. Each overwrite is logged and listed in
//! [`FlattenReport::collisions`]. Source files are never modified.

use crate::error::{DeckError, DeckResult, PipelineWarning};
use crate::models::audio_file::base_name;
use crate::services::order_key::{
    exceeds_padding_limit, normalize_dir_name, normalize_file_name, PaddedKey,
};
use auftakt_common::AuftaktConfig;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Suffix appended to the source root name for the default destination
pub const FLAT_SUFFIX: &str = "-flat";

/// One copied file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Outcome of a flatten run
#[derive(Debug)]
pub struct FlattenReport {
    pub destination: PathBuf,
    /// Copies in emission order
    pub files: Vec<FlattenedFile>,
    /// Destination paths written more than once (last write wins)
    pub collisions: Vec<PathBuf>,
    pub warnings: Vec<PipelineWarning>,
}

/// Session tree flattener
pub struct Flattener {
    config: AuftaktConfig,
}

impl Flattener {
    /// Create flattener with the default ignore patterns
    pub fn new() -> Self {
        Self::from_config(&AuftaktConfig::default())
    }

    pub fn from_config(config: &AuftaktConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// `<source_root>-flat`, next to the source root
    pub fn default_destination(source_root: &Path) -> PathBuf {
        let name = format!("{}{}", base_name(source_root), FLAT_SUFFIX);
        source_root.with_file_name(name)
    }

    /// Flatten into the default destination
    pub fn flatten(&self, source_root: &Path) -> DeckResult<FlattenReport> {
        let source_root = canonical_source(source_root)?;
        let destination = Self::default_destination(&source_root);
        self.flatten_into(&source_root, &destination)
    }

    /// Flatten into an explicit destination (created if absent)
    pub fn flatten_into(&self, source_root: &Path, destination: &Path) -> DeckResult<FlattenReport> {
        let source_root = canonical_source(source_root)?;
        let skip = destination
            .canonicalize()
            .unwrap_or_else(|_| destination.to_path_buf());
        let (plan, mut warnings) = self.plan(&source_root, &skip);

        fs::create_dir_all(destination)?;

        let mut files = Vec::with_capacity(plan.len());
        let mut collisions = Vec::new();
        let mut written: HashSet<PathBuf> = HashSet::new();

        for (source, name) in plan {
            let target = destination.join(&name);
            if !written.insert(target.clone()) {
                tracing::warn!(
                    source = %source.display(),
                    target = %target.display(),
                    "Flattened name collision, overwriting earlier copy"
                );
                collisions.push(target.clone());
            }

            match fs::copy(&source, &target) {
                Ok(_) => {
                    tracing::debug!("Copied: {} -> {}", source.display(), target.display());
                    files.push(FlattenedFile {
                        source,
                        destination: target,
                    });
                }
                Err(e) => warnings.push(PipelineWarning::record(DeckError::CopyFailure {
                    from: source,
                    to: target,
                    reason: e.to_string(),
                })),
            }
        }

        tracing::info!(
            copied = files.len(),
            collisions = collisions.len(),
            warnings = warnings.len(),
            "Flattened {} into {}",
            source_root.display(),
            destination.display()
        );

        Ok(FlattenReport {
            destination: destination.to_path_buf(),
            files,
            collisions,
            warnings,
        })
    }

    /// Ordered `(source file, destination name)` pairs without copying anything
    ///
    /// `skip` is excluded from the walk so a destination nested inside the
    /// source is never read back.
    pub fn plan(
        &self,
        source_root: &Path,
        skip: &Path,
    ) -> (Vec<(PathBuf, String)>, Vec<PipelineWarning>) {
        let mut plan = Vec::new();
        let mut warnings = Vec::new();

        let walker = WalkDir::new(source_root)
            .follow_links(false)
            .sort_by(natural_entry_order)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || self.should_process_entry(e, skip));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(source_root).to_path_buf();
                    warnings.push(PipelineWarning::record(DeckError::UnreadableSubtree(
                        path,
                        e.to_string(),
                    )));
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy();
            if exceeds_padding_limit(&name) {
                tracing::warn!(
                    path = %entry.path().display(),
                    "Name holds a number of 5+ digits; natural order is not guaranteed"
                );
            }

            if !entry.file_type().is_file() {
                continue;
            }

            let parent = entry
                .path()
                .parent()
                .map(base_name)
                .unwrap_or_default();
            let flat_name = format!(
                "{}_{}",
                normalize_dir_name(&parent),
                normalize_file_name(&name)
            );
            plan.push((entry.path().to_path_buf(), flat_name));
        }

        (plan, warnings)
    }

    fn should_process_entry(&self, entry: &DirEntry, skip: &Path) -> bool {
        !self.config.is_ignored(&entry.file_name().to_string_lossy()) && entry.path() != skip
    }
}

impl Default for Flattener {
    fn default() -> Self {
        Self::new()
    }
}

/// Files before directories, each by padded natural order
fn natural_entry_order(a: &DirEntry, b: &DirEntry) -> Ordering {
    let a_dir = a.file_type().is_dir();
    let b_dir = b.file_type().is_dir();
    a_dir.cmp(&b_dir).then_with(|| {
        let a_name = a.file_name().to_string_lossy();
        let b_name = b.file_name().to_string_lossy();
        if a_dir {
            PaddedKey::for_dir(&a_name).cmp(&PaddedKey::for_dir(&b_name))
        } else {
            PaddedKey::for_file(&a_name).cmp(&PaddedKey::for_file(&b_name))
        }
    })
}

/// Existence check, then canonical form (so `.` still has a base name)
pub(crate) fn canonical_source(source_root: &Path) -> DeckResult<PathBuf> {
    if !source_root.exists() {
        return Err(DeckError::MissingSource(source_root.to_path_buf()));
    }
    if !source_root.is_dir() {
        return Err(DeckError::NotADirectory(source_root.to_path_buf()));
    }
    Ok(source_root.canonicalize()?)
}
