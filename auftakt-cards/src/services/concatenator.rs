//! Session concatenation
//!
//! Renders a whole session into one audio track in playback order: immediate
//! subdirectories by padded natural order, takes inside each by their
//! parenthetical number. Top-level files are not part of the track.

use crate::error::{DeckError, DeckResult, PipelineWarning};
use crate::models::audio_file::base_name;
use crate::models::AudioFile;
use crate::services::flattener::canonical_source;
use crate::services::order_key::{OrderPolicy, PaddedKey};
use auftakt_common::AuftaktConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

/// Output file name when none is given
pub const DEFAULT_OUTPUT: &str = "final_audio.m4a";

/// Ordered segments of the final track
#[derive(Debug, Default)]
pub struct ConcatPlan {
    pub segments: Vec<PathBuf>,
    pub warnings: Vec<PipelineWarning>,
}

/// Joins audio segments into a single exported track
pub trait TrackRenderer {
    fn render(&self, segments: &[PathBuf], output: &Path) -> DeckResult<()>;
}

/// Renderer using ffmpeg's concat demuxer, re-encoding to AAC
#[derive(Debug, Clone)]
pub struct FfmpegTrackRenderer {
    program: String,
}

impl FfmpegTrackRenderer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn from_config(config: &AuftaktConfig) -> Self {
        Self::new(config.ffmpeg_path.clone())
    }
}

impl TrackRenderer for FfmpegTrackRenderer {
    fn render(&self, segments: &[PathBuf], output: &Path) -> DeckResult<()> {
        let list = output.with_extension("concat.txt");
        fs::write(&list, concat_list(segments))?;

        let result = Command::new(&self.program)
            .args(["-hide_banner", "-loglevel", "error", "-nostdin", "-y"])
            .args(["-f", "concat", "-safe", "0", "-i"])
            .arg(&list)
            .args(["-c:a", "aac", "-f", "mp4"])
            .arg(output)
            .output();
        let _ = fs::remove_file(&list);

        let result = result.map_err(|e| DeckError::Collaborator {
            tool: self.program.clone(),
            path: output.to_path_buf(),
            reason: format!("failed to start: {}", e),
        })?;
        if !result.status.success() {
            return Err(DeckError::Collaborator {
                tool: self.program.clone(),
                path: output.to_path_buf(),
                reason: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Concat demuxer input: one `file '<path>'` line per segment
pub fn concat_list(segments: &[PathBuf]) -> String {
    segments
        .iter()
        .map(|p| format!("file '{}'\n", p.to_string_lossy().replace('\'', "'\\''")))
        .collect()
}

/// Segments in playback order
pub fn plan(source_root: &Path, config: &AuftaktConfig) -> DeckResult<ConcatPlan> {
    let source_root = canonical_source(source_root)?;
    let mut plan = ConcatPlan::default();

    let mut subdirs = Vec::new();
    for entry in WalkDir::new(&source_root).min_depth(1).max_depth(1) {
        let entry =
            entry.map_err(|e| DeckError::UnreadableSubtree(source_root.clone(), e.to_string()))?;
        if entry.file_type().is_dir() && !config.is_ignored(&entry.file_name().to_string_lossy())
        {
            subdirs.push(entry.into_path());
        }
    }
    subdirs.sort_by_cached_key(|dir| PaddedKey::for_dir(&base_name(dir)));

    for dir in subdirs {
        match list_takes(&dir, config) {
            Ok(mut takes) => {
                takes.sort_by_cached_key(|t| t.order_key(OrderPolicy::Parenthetical));
                tracing::debug!(dir = %dir.display(), takes = takes.len(), "Planned directory");
                plan.segments.extend(takes.into_iter().map(|t| t.source_path));
            }
            Err(e) => plan.warnings.push(PipelineWarning::record(e)),
        }
    }

    Ok(plan)
}

fn list_takes(dir: &Path, config: &AuftaktConfig) -> DeckResult<Vec<AudioFile>> {
    let mut takes = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry =
            entry.map_err(|e| DeckError::UnreadableSubtree(dir.to_path_buf(), e.to_string()))?;
        if entry.file_type().is_file() && config.is_audio_file(entry.path()) {
            takes.push(AudioFile::new(entry.into_path()));
        }
    }
    Ok(takes)
}

/// Outcome of a concatenation run
#[derive(Debug)]
pub struct ConcatReport {
    pub output: PathBuf,
    pub segments: usize,
    pub warnings: Vec<PipelineWarning>,
}

/// Plan the session and render it to `output`
pub fn concatenate<R: TrackRenderer>(
    source_root: &Path,
    output: &Path,
    config: &AuftaktConfig,
    renderer: &R,
) -> DeckResult<ConcatReport> {
    let plan = plan(source_root, config)?;
    if plan.segments.is_empty() {
        return Err(DeckError::NoAudio(source_root.to_path_buf()));
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    renderer.render(&plan.segments, output)?;
    tracing::info!(
        output = %output.display(),
        segments = plan.segments.len(),
        "Concatenated audio saved"
    );

    Ok(ConcatReport {
        output: output.to_path_buf(),
        segments: plan.segments.len(),
        warnings: plan.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingRenderer {
        calls: RefCell<Vec<Vec<PathBuf>>>,
    }

    impl TrackRenderer for RecordingRenderer {
        fn render(&self, segments: &[PathBuf], output: &Path) -> DeckResult<()> {
            self.calls.borrow_mut().push(segments.to_vec());
            fs::write(output, b"track")?;
            Ok(())
        }
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    fn names(plan: &ConcatPlan) -> Vec<String> {
        plan.segments
            .iter()
            .map(|p| {
                let dir = p.parent().map(base_name).unwrap_or_default();
                format!("{}/{}", dir, base_name(p))
            })
            .collect()
    }

    #[test]
    fn test_plan_order() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("session");
        touch(&source, "Scene 10/Recording.m4a");
        touch(&source, "Scene 2/Recording (3).m4a");
        touch(&source, "Scene 2/Recording (2).m4a");
        touch(&source, "Scene 2/Recording.m4a");
        touch(&source, "Scene 2/cover.jpg");
        touch(&source, "loose.m4a");

        let plan = plan(&source, &AuftaktConfig::default()).unwrap();
        assert_eq!(
            names(&plan),
            vec![
                "Scene 2/Recording.m4a",
                "Scene 2/Recording (2).m4a",
                "Scene 2/Recording (3).m4a",
                "Scene 10/Recording.m4a",
            ]
        );
    }

    #[test]
    fn test_concatenate_renders_plan() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("session");
        touch(&source, "A/take (2).m4a");
        touch(&source, "A/take (1).m4a");
        let output = temp.path().join("out/final_audio.m4a");

        let renderer = RecordingRenderer::default();
        let report = concatenate(&source, &output, &AuftaktConfig::default(), &renderer).unwrap();

        assert_eq!(report.segments, 2);
        assert!(output.exists());
        let calls = renderer.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(base_name(&calls[0][0]), "take (1).m4a");
    }

    #[test]
    fn test_empty_session_is_error() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("session/A")).unwrap();
        let renderer = RecordingRenderer::default();
        let result = concatenate(
            &temp.path().join("session"),
            &temp.path().join("out.m4a"),
            &AuftaktConfig::default(),
            &renderer,
        );
        assert!(matches!(result, Err(DeckError::NoAudio(_))));
        assert!(renderer.calls.borrow().is_empty());
    }

    #[test]
    fn test_concat_list_escapes_quotes() {
        let list = concat_list(&[PathBuf::from("/s/it's.m4a"), PathBuf::from("/s/b.m4a")]);
        assert_eq!(list, "file '/s/it'\\''s.m4a'\nfile '/s/b.m4a'\n");
    }
}
