// Audio module - format detection and lyrics tag access

pub mod format;
pub mod lyrics_tag;

pub use format::{lrc_path_for, quarantine_path_for, AudioFormat};
pub use lyrics_tag::{FileTagBackend, LyricsTag, TagBackend};
