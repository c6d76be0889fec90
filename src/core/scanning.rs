//! Audio file discovery
//!
//! Walks a root directory and collects the audio files that may have an LRC
//! sidecar. Only the extension is checked here; whether a file is a valid
//! container is left to the tag backend.

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::audio::AudioFormat;
use crate::core::settings::EmbedOptions;
use crate::error::{Error, Result};

/// An audio file selected for embedding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioCandidate {
    pub path: PathBuf,
    pub format: AudioFormat,
}

impl AudioCandidate {
    /// File name used in progress lines and the failed list
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Find all candidate audio files under `root`
///
/// Without `recursive` only the root's immediate entries are considered.
/// Entries are sorted by file name within each directory, so the order is
/// stable between runs.
pub fn find_audio_files(root: &Path, options: &EmbedOptions) -> Result<Vec<AudioCandidate>> {
    check_root(root)?;

    let max_depth = if options.recursive { usize::MAX } else { 1 };
    let mut candidates = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(format) = AudioFormat::from_path(entry.path()) else {
            continue;
        };
        if !options.is_enabled(format) {
            log::debug!("Ignoring {} ({} disabled)", entry.path().display(), format);
            continue;
        }

        candidates.push(AudioCandidate {
            path: entry.into_path(),
            format,
        });
    }

    log::info!(
        "Found {} audio files in {}",
        candidates.len(),
        root.display()
    );
    Ok(candidates)
}

/// The root must be an existing, readable directory
fn check_root(root: &Path) -> Result<()> {
    let access_error = |reason: String| Error::Access {
        path: root.to_path_buf(),
        reason,
    };

    let metadata = fs::metadata(root).map_err(|e| access_error(e.to_string()))?;
    if !metadata.is_dir() {
        return Err(access_error("not a directory".to_string()));
    }
    fs::read_dir(root).map_err(|e| access_error(e.to_string()))?;
    Ok(())
}
