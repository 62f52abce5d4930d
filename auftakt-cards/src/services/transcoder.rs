//! Session format conversion
//!
//! Copies a session tree to a new destination and converts every audio take
//! in the copy to MP3. An original is deleted only after its conversion
//! succeeded, so a failed take stays playable in its source format. A take
//! whose `.mp3` sibling already exists is left alone; that file is never
//! overwritten or removed.

use crate::error::{DeckError, DeckResult, PipelineWarning};
use crate::services::flattener::canonical_source;
use auftakt_common::AuftaktConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

/// Extension written by the converter
pub const TARGET_EXTENSION: &str = "mp3";

/// Converts one audio file into another format
pub trait Transcoder {
    /// Write `output` from `input`; `output` does not exist yet
    fn transcode(&self, input: &Path, output: &Path) -> DeckResult<()>;
}

/// Transcoder backed by the `ffmpeg` executable
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    program: String,
}

impl FfmpegTranscoder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn from_config(config: &AuftaktConfig) -> Self {
        Self::new(config.ffmpeg_path.clone())
    }
}

impl Transcoder for FfmpegTranscoder {
    fn transcode(&self, input: &Path, output: &Path) -> DeckResult<()> {
        let existed = output.exists();
        let result = Command::new(&self.program)
            .args(["-hide_banner", "-loglevel", "error", "-nostdin", "-n", "-i"])
            .arg(input)
            .arg(output)
            .output()
            .map_err(|e| DeckError::Collaborator {
                tool: self.program.clone(),
                path: input.to_path_buf(),
                reason: format!("failed to start: {}", e),
            })?;

        if !result.status.success() {
            // Only clean up a partial file this call created
            if !existed {
                let _ = fs::remove_file(output);
            }
            return Err(DeckError::Collaborator {
                tool: self.program.clone(),
                path: input.to_path_buf(),
                reason: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Outcome of a conversion run
#[derive(Debug)]
pub struct ConvertReport {
    pub destination: PathBuf,
    /// Files copied into the destination tree
    pub copied: usize,
    /// Converted files (new paths)
    pub converted: Vec<PathBuf>,
    pub warnings: Vec<PipelineWarning>,
}

/// Copy-then-convert driver
pub struct AudioConverter<T: Transcoder> {
    config: AuftaktConfig,
    transcoder: T,
}

impl<T: Transcoder> AudioConverter<T> {
    pub fn new(config: AuftaktConfig, transcoder: T) -> Self {
        Self { config, transcoder }
    }

    /// Copy `source_root` to `destination` and convert the copy in place
    pub fn convert(&self, source_root: &Path, destination: &Path) -> DeckResult<ConvertReport> {
        let source_root = canonical_source(source_root)?;
        if destination.exists() {
            return Err(DeckError::DestinationExists(destination.to_path_buf()));
        }

        let mut warnings = Vec::new();
        let copied = self.copy_tree(&source_root, destination, &mut warnings)?;
        tracing::info!(
            copied,
            "Copied {} to {}",
            source_root.display(),
            destination.display()
        );

        let mut converted = Vec::new();
        for input in self.pending_takes(destination) {
            let output = input.with_extension(TARGET_EXTENSION);
            if output.exists() {
                warnings.push(PipelineWarning::record(DeckError::DestinationExists(output)));
                continue;
            }
            match self.transcoder.transcode(&input, &output) {
                Ok(()) => {
                    tracing::debug!("Converted {} -> {}", input.display(), output.display());
                    if let Err(e) = fs::remove_file(&input) {
                        warnings.push(PipelineWarning::record(e.into()));
                    }
                    converted.push(output);
                }
                Err(e) => warnings.push(PipelineWarning::record(e)),
            }
        }

        tracing::info!(
            converted = converted.len(),
            warnings = warnings.len(),
            "Conversion finished"
        );

        Ok(ConvertReport {
            destination: destination.to_path_buf(),
            copied,
            converted,
            warnings,
        })
    }

    fn copy_tree(
        &self,
        source_root: &Path,
        destination: &Path,
        warnings: &mut Vec<PipelineWarning>,
    ) -> DeckResult<usize> {
        fs::create_dir_all(destination)?;
        let skip = destination.canonicalize()?;

        let mut copied = 0;
        let walker = WalkDir::new(source_root)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| {
                e.path() != skip && !self.config.is_ignored(&e.file_name().to_string_lossy())
            });

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

            let relative = entry
                .path()
                .strip_prefix(source_root)
                .map_err(|e| auftakt_common::Error::Internal(e.to_string()))?;
            let target = destination.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else if entry.file_type().is_file() {
                match fs::copy(entry.path(), &target) {
                    Ok(_) => copied += 1,
                    Err(e) => warnings.push(PipelineWarning::record(DeckError::CopyFailure {
                        from: entry.path().to_path_buf(),
                        to: target,
                        reason: e.to_string(),
                    })),
                }
            }
        }

        Ok(copied)
    }

    /// Audio takes in the copied tree not yet in the target format
    fn pending_takes(&self, root: &Path) -> Vec<PathBuf> {
        let mut takes: Vec<PathBuf> = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| self.config.is_audio_file(p))
            .filter(|p| {
                !p.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(TARGET_EXTENSION))
            })
            .collect();
        takes.sort();
        takes
    }
}
