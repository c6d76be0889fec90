use std::path::{Path, PathBuf};

/// Audio container formats that can carry embedded lyrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Flac,
    Mp3,
    M4a,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 3] = [AudioFormat::Flac, AudioFormat::Mp3, AudioFormat::M4a];

    /// Detect the format from a file extension.
    ///
    /// Matching is case-sensitive: `song.FLAC` is not a candidate.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "flac" => Some(AudioFormat::Flac),
            "mp3" => Some(AudioFormat::Mp3),
            "m4a" => Some(AudioFormat::M4a),
            _ => None,
        }
    }

    /// Name of the lyrics field in this format's tag container
    pub fn lyrics_field(self) -> &'static str {
        match self {
            AudioFormat::Flac => "LYRICS",
            AudioFormat::Mp3 => "USLT",
            AudioFormat::M4a => "\u{a9}lyr",
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AudioFormat::Flac => "FLAC",
            AudioFormat::Mp3 => "MP3",
            AudioFormat::M4a => "M4A",
        };
        f.write_str(name)
    }
}

/// Path of the LRC sidecar paired with an audio file (same directory, same stem)
pub fn lrc_path_for(audio_path: &Path) -> PathBuf {
    audio_path.with_extension("lrc")
}

/// Path a failed LRC file is moved to (`song.lrc` -> `song.lrc.failed`)
pub fn quarantine_path_for(lrc_path: &Path) -> PathBuf {
    let mut name = lrc_path.as_os_str().to_os_string();
    name.push(".failed");
    PathBuf::from(name)
}
