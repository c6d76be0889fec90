//! Lyrics access for audio tag containers
//!
//! Each `AudioFormat` has one strategy type implementing `LyricsTag`:
//! - FLAC: Vorbis comment `LYRICS` (via lofty)
//! - M4A: iTunes `©lyr` atom (via lofty)
//! - MP3: ID3 `USLT` frame (via id3, always saved as ID3v2.3)
//!
//! The embedder never talks to a codec directly; it goes through a
//! `TagBackend` so the pipeline can run against an in-memory store in tests.

use std::fmt::Display;
use std::fs::{self, File};
use std::io::BufReader;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use id3::frame::Lyrics;
use id3::{TagLike, Version};
use lofty::{FileType, ItemKey, ParseOptions, Probe, Tag, TagExt, TaggedFileExt};

use super::format::AudioFormat;
use crate::error::{Error, Result};

/// An opened tag container, held for the duration of one embed
pub trait LyricsTag {
    /// Current lyrics value, if the lyrics field is present
    fn lyrics(&self) -> Option<String>;

    fn has_lyrics(&self) -> bool {
        self.lyrics().is_some()
    }

    /// Replace the lyrics field with `text`
    fn set_lyrics(&mut self, text: &str) -> Result<()>;

    /// Persist the tag container back to the audio file
    fn save(&mut self) -> Result<()>;
}

/// Opens tag containers for audio files
pub trait TagBackend {
    fn open(&self, format: AudioFormat, path: &Path) -> Result<Box<dyn LyricsTag>>;
}

/// Backend that reads and writes real audio files on disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTagBackend;

impl TagBackend for FileTagBackend {
    fn open(&self, format: AudioFormat, path: &Path) -> Result<Box<dyn LyricsTag>> {
        format.open_tag(path)
    }
}

impl AudioFormat {
    /// Open this format's tag container at `path`
    pub fn open_tag(self, path: &Path) -> Result<Box<dyn LyricsTag>> {
        Ok(match self {
            AudioFormat::Flac => Box::new(FlacTag::open(path)?),
            AudioFormat::Mp3 => Box::new(Mp3Tag::open(path)?),
            AudioFormat::M4a => Box::new(M4aTag::open(path)?),
        })
    }
}

fn read_error(path: &Path, e: impl Display) -> Error {
    Error::TagRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

fn write_error(path: &Path, e: impl Display) -> Error {
    Error::TagWrite {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

/// Generic lofty tag, shared by the FLAC and M4A strategies
struct LoftyTag {
    path: PathBuf,
    file_type: FileType,
    tag: Tag,
}

impl LoftyTag {
    fn open(path: &Path, file_type: FileType) -> Result<Self> {
        // Audio properties are never needed, only the tag
        let tagged_file = Probe::open(path)
            .map_err(|e| read_error(path, e))?
            .options(ParseOptions::new().read_properties(false))
            .set_file_type(file_type)
            .read()
            .map_err(|e| read_error(path, e))?;

        // Files without a tag get a fresh one of the format's native type
        let tag = match tagged_file.primary_tag() {
            Some(tag) => tag.clone(),
            None => Tag::new(tagged_file.primary_tag_type()),
        };

        Ok(Self {
            path: path.to_path_buf(),
            file_type,
            tag,
        })
    }

    fn lyrics(&self) -> Option<String> {
        self.tag.get_string(&ItemKey::Lyrics).map(str::to_string)
    }

    fn set_lyrics(&mut self, text: &str) -> Result<()> {
        if self.tag.insert_text(ItemKey::Lyrics, text.to_string()) {
            Ok(())
        } else {
            Err(write_error(
                &self.path,
                format_args!("{:?} tag has no lyrics field", self.tag.tag_type()),
            ))
        }
    }

    fn save(&self) -> Result<()> {
        if self.file_type == FileType::Flac {
            pad_lone_stream_info(&self.path)?;
        }

        // A writer panic must fail this file, not the whole run
        let saved = panic::catch_unwind(AssertUnwindSafe(|| self.tag.save_to_path(&self.path)));
        match saved {
            Ok(result) => result.map_err(|e| write_error(&self.path, e)),
            Err(_) => {
                log::warn!("Tag writer panicked on {}", self.path.display());
                Err(write_error(&self.path, "tag writer panicked"))
            }
        }
    }
}

const FLAC_MARKER: &[u8; 4] = b"fLaC";
const FLAC_LAST_BLOCK: u8 = 0x80;
const FLAC_PADDING: u8 = 1;
const PADDING_LEN: usize = 16;

/// Give a FLAC stream whose only metadata block is STREAMINFO a trailing
/// PADDING block.
///
/// lofty 0.18 cannot rewrite the metadata of such a stream, since it expects
/// at least one block after STREAMINFO. Other layouts are left untouched.
fn pad_lone_stream_info(path: &Path) -> Result<()> {
    let bytes = fs::read(path).map_err(|e| write_error(path, e))?;
    if bytes.len() < 8 || &bytes[..4] != FLAC_MARKER || bytes[4] & FLAC_LAST_BLOCK == 0 {
        return Ok(());
    }

    let stream_info_len = u32::from_be_bytes([0, bytes[5], bytes[6], bytes[7]]) as usize;
    let stream_info_end = 8 + stream_info_len;
    if bytes.len() < stream_info_end {
        return Ok(());
    }

    let mut padded = Vec::with_capacity(bytes.len() + 4 + PADDING_LEN);
    padded.extend_from_slice(&bytes[..stream_info_end]);
    padded[4] &= !FLAC_LAST_BLOCK;
    padded.push(FLAC_LAST_BLOCK | FLAC_PADDING);
    padded.extend_from_slice(&(PADDING_LEN as u32).to_be_bytes()[1..]);
    padded.extend_from_slice(&[0; PADDING_LEN]);
    padded.extend_from_slice(&bytes[stream_info_end..]);

    log::debug!("Adding a padding block to {}", path.display());
    fs::write(path, padded).map_err(|e| write_error(path, e))
}

/// FLAC: `LYRICS` Vorbis comment
pub struct FlacTag(LoftyTag);

impl FlacTag {
    pub fn open(path: &Path) -> Result<Self> {
        LoftyTag::open(path, FileType::Flac).map(Self)
    }
}

impl LyricsTag for FlacTag {
    fn lyrics(&self) -> Option<String> {
        self.0.lyrics()
    }

    fn set_lyrics(&mut self, text: &str) -> Result<()> {
        self.0.set_lyrics(text)
    }

    fn save(&mut self) -> Result<()> {
        self.0.save()
    }
}

/// M4A: `©lyr` ilst atom
pub struct M4aTag(LoftyTag);

impl M4aTag {
    pub fn open(path: &Path) -> Result<Self> {
        LoftyTag::open(path, FileType::Mp4).map(Self)
    }
}

impl LyricsTag for M4aTag {
    fn lyrics(&self) -> Option<String> {
        self.0.lyrics()
    }

    fn set_lyrics(&mut self, text: &str) -> Result<()> {
        self.0.set_lyrics(text)
    }

    fn save(&mut self) -> Result<()> {
        self.0.save()
    }
}

/// MP3: ID3 `USLT` frame
pub struct Mp3Tag {
    path: PathBuf,
    tag: id3::Tag,
}

impl Mp3Tag {
    pub fn open(path: &Path) -> Result<Self> {
        ensure_mpeg_stream(path)?;

        // An MP3 without an ID3 tag is valid; start from an empty one
        let tag = match id3::Tag::read_from_path(path) {
            Ok(tag) => tag,
            Err(e) if matches!(e.kind, id3::ErrorKind::NoTag) => id3::Tag::new(),
            Err(e) => return Err(read_error(path, e)),
        };

        Ok(Self {
            path: path.to_path_buf(),
            tag,
        })
    }
}

/// Reject files whose content is not an MPEG audio stream.
///
/// The file type is guessed from the bytes alone (skipping any leading ID3v2
/// tag), never from the extension.
fn ensure_mpeg_stream(path: &Path) -> Result<()> {
    let file = File::open(path).map_err(|e| read_error(path, e))?;
    let detected = Probe::new(BufReader::new(file))
        .guess_file_type()
        .map_err(|e| read_error(path, e))?
        .file_type();

    match detected {
        Some(FileType::Mpeg) => Ok(()),
        Some(other) => Err(read_error(path, format_args!("{:?} stream, not MPEG audio", other))),
        None => Err(read_error(path, "not an MPEG audio stream")),
    }
}

impl LyricsTag for Mp3Tag {
    fn lyrics(&self) -> Option<String> {
        self.tag.lyrics().next().map(|l| l.text.clone())
    }

    fn set_lyrics(&mut self, text: &str) -> Result<()> {
        let _ = self.tag.remove("USLT");
        let _ = self.tag.add_frame(Lyrics {
            lang: "eng".to_string(),
            description: String::new(),
            text: text.to_string(),
        });
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        // v2.3 for compatibility with older players
        self.tag
            .write_to_path(&self.path, Version::Id3v23)
            .map_err(|e| write_error(&self.path, e))
    }
}
