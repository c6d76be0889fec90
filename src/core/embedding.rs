//! LRC embedding pipeline
//!
//! Processes candidates one at a time: find the sidecar, apply the skip
//! policy, write the lyrics through the tag backend, then delete or
//! quarantine the sidecar. A failure never leaves the file it happened on;
//! it becomes a `FileOutcome::Failed` and the run moves on.

use std::fs;
use std::path::Path;

use crate::audio::{lrc_path_for, quarantine_path_for, FileTagBackend, LyricsTag, TagBackend};
use crate::core::scanning::{find_audio_files, AudioCandidate};
use crate::core::settings::EmbedOptions;
use crate::error::{Error, Result};

/// What happened to a single audio file
#[derive(Debug)]
pub enum FileOutcome {
    /// No LRC file next to the audio file
    NoSidecar,
    /// Lyrics already embedded and skip-existing is on
    Skipped,
    /// Lyrics written; `reduced` if the LRC file was deleted afterwards
    Embedded { reduced: bool },
    /// Embed failed; the LRC file was quarantined if it still existed
    Failed(Error),
}

impl FileOutcome {
    /// Human-readable status for progress output
    pub fn status(&self, file_name: &str) -> String {
        match self {
            FileOutcome::NoSidecar => format!("no LRC: {}", file_name),
            FileOutcome::Skipped => "skipped".to_string(),
            FileOutcome::Embedded { reduced: false } => format!("embedded: {}", file_name),
            FileOutcome::Embedded { reduced: true } => {
                format!("embedded, LRC reduced: {}", file_name)
            }
            FileOutcome::Failed(_) => format!("error: {}", file_name),
        }
    }
}

/// Totals for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    /// Audio files found by discovery, with or without a sidecar
    pub total: usize,
    pub embedded: usize,
    pub skipped: usize,
    /// File names (not paths) in the order the failures happened
    pub failed: Vec<String>,
}

impl RunResult {
    /// Share of candidates that had lyrics embedded this run, 0 when empty
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.embedded as f64 / self.total as f64 * 100.0
        }
    }

    /// Summary printed at the end of a run
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Total audio files: {}", self.total),
            format!("Embedded lyrics in {} audio files.", self.embedded),
            format!(
                "Percentage of audio files with embedded lyrics: {:.2}%",
                self.percentage()
            ),
        ];

        if !self.failed.is_empty() {
            lines.push(String::new());
            lines.push("Failed to embed LRC for the following files:".to_string());
            lines.extend(self.failed.iter().cloned());
        }

        lines
    }
}

/// Receives a status update after every processed file
pub trait ProgressSink {
    /// `done` is 1-based; `total` is the candidate count
    fn on_file(&mut self, done: usize, total: usize, status: &str);
}

impl<F> ProgressSink for F
where
    F: FnMut(usize, usize, &str),
{
    fn on_file(&mut self, done: usize, total: usize, status: &str) {
        (*self)(done, total, status)
    }
}

/// Sink that discards progress
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_file(&mut self, _done: usize, _total: usize, _status: &str) {}
}

/// Embeds LRC sidecars into audio files
pub struct Embedder<B: TagBackend = FileTagBackend> {
    backend: B,
    options: EmbedOptions,
}

impl Embedder<FileTagBackend> {
    pub fn new(options: EmbedOptions) -> Self {
        Self::with_backend(FileTagBackend, options)
    }
}

impl<B: TagBackend> Embedder<B> {
    pub fn with_backend(backend: B, options: EmbedOptions) -> Self {
        Self { backend, options }
    }

    pub fn options(&self) -> &EmbedOptions {
        &self.options
    }

    /// Discover candidates under `root` and embed them all
    ///
    /// Only discovery can fail; per-file failures are reported in the result.
    pub fn run(&self, root: &Path, progress: &mut dyn ProgressSink) -> Result<RunResult> {
        let candidates = find_audio_files(root, &self.options)?;
        Ok(self.embed_all(&candidates, progress))
    }

    pub fn embed_all(
        &self,
        candidates: &[AudioCandidate],
        progress: &mut dyn ProgressSink,
    ) -> RunResult {
        let mut result = RunResult {
            total: candidates.len(),
            ..RunResult::default()
        };

        for (i, candidate) in candidates.iter().enumerate() {
            let file_name = candidate.file_name();
            let outcome = self.embed_file(candidate);

            match &outcome {
                FileOutcome::NoSidecar => {}
                FileOutcome::Skipped => result.skipped += 1,
                FileOutcome::Embedded { .. } => result.embedded += 1,
                FileOutcome::Failed(e) => {
                    log::debug!("{} added to failed list ({})", file_name, e);
                    result.failed.push(file_name.clone());
                }
            }

            progress.on_file(i + 1, candidates.len(), &outcome.status(&file_name));
        }

        log::info!(
            "Run finished: {} files, {} embedded, {} skipped, {} failed",
            result.total,
            result.embedded,
            result.skipped,
            result.failed.len()
        );
        result
    }

    /// Process a single audio file
    pub fn embed_file(&self, candidate: &AudioCandidate) -> FileOutcome {
        let lrc_path = lrc_path_for(&candidate.path);
        if !lrc_path.exists() {
            log::debug!("No LRC for {}", candidate.path.display());
            return FileOutcome::NoSidecar;
        }

        let mut tag = match self.backend.open(candidate.format, &candidate.path) {
            Ok(tag) => tag,
            Err(e) => return self.fail(candidate, &lrc_path, e),
        };

        if self.options.skip_existing && tag.has_lyrics() {
            log::debug!("{} already has lyrics, skipping", candidate.path.display());
            return FileOutcome::Skipped;
        }

        if let Err(e) = write_lyrics(&mut *tag, &lrc_path) {
            return self.fail(candidate, &lrc_path, e);
        }
        log::debug!(
            "Embedded {} into {} field of {}",
            lrc_path.display(),
            candidate.format.lyrics_field(),
            candidate.path.display()
        );

        if !self.options.reduce_lrc {
            return FileOutcome::Embedded { reduced: false };
        }

        match fs::remove_file(&lrc_path) {
            Ok(()) => FileOutcome::Embedded { reduced: true },
            Err(e) => {
                // Lyrics are already in the tag, so this is not a failed embed
                log::warn!("Could not delete {}: {}", lrc_path.display(), e);
                FileOutcome::Embedded { reduced: false }
            }
        }
    }

    /// Log the failure and move the sidecar out of the way
    fn fail(&self, candidate: &AudioCandidate, lrc_path: &Path, error: Error) -> FileOutcome {
        log::error!(
            "Error embedding LRC for {}: {}",
            candidate.file_name(),
            error
        );

        if lrc_path.exists() {
            let failed_path = quarantine_path_for(lrc_path);
            if let Err(e) = fs::rename(lrc_path, &failed_path) {
                log::warn!(
                    "Could not rename {} to {}: {}",
                    lrc_path.display(),
                    failed_path.display(),
                    e
                );
            }
        }

        FileOutcome::Failed(error)
    }
}

/// Read the sidecar as UTF-8, set it as the lyrics field and persist
fn write_lyrics(tag: &mut dyn LyricsTag, lrc_path: &Path) -> Result<()> {
    let bytes = fs::read(lrc_path).map_err(|source| Error::Io {
        path: lrc_path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|_| Error::Encoding {
        path: lrc_path.to_path_buf(),
    })?;

    tag.set_lyrics(&text)?;
    tag.save()
}
