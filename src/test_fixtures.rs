//! Test fixtures for tag and embedding tests
//!
//! Builds the smallest files the tag libraries accept, so tests don't depend
//! on an external encoder being installed.

#![cfg(test)]

use std::path::{Path, PathBuf};

/// `fLaC` marker followed by a STREAMINFO block:
/// 4096-sample blocks, 44.1kHz, stereo, 16-bit, unknown length, zero MD5
const FLAC_HEADER: [u8; 42] = [
    b'f', b'L', b'a', b'C', // stream marker
    0x00, 0x00, 0x00, 0x22, // STREAMINFO, length 34
    0x10, 0x00, 0x10, 0x00, // min/max block size
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // min/max frame size
    0x0A, 0xC4, 0x42, 0xF0, 0x00, 0x00, 0x00, 0x00, // rate, channels, bps, samples
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // MD5
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// A few bytes standing in for audio frames
const FLAC_FRAME: [u8; 6] = [0xFF, 0xF8, 0x69, 0x08, 0x00, 0x00];

/// One MPEG-1 Layer III frame header (128kbps, 44.1kHz) padded with silence
fn mp3_bytes() -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFB, 0x90, 0x64];
    bytes.resize(417, 0);
    bytes
}

/// MP4 box: 32-bit size, four-byte type, payload
fn mp4_box(kind: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut bytes = ((payload.len() + 8) as u32).to_be_bytes().to_vec();
    bytes.extend_from_slice(kind);
    bytes.extend_from_slice(payload);
    bytes
}

/// `ftyp` (M4A brand), a `moov` holding only `mvhd`, and a small `mdat`
fn m4a_bytes() -> Vec<u8> {
    let mut ftyp = b"M4A ".to_vec();
    ftyp.extend_from_slice(&[0; 4]); // minor version
    ftyp.extend_from_slice(b"M4A isom");

    // version 0 mvhd: flags, creation, modification, then the timescale
    let mut mvhd = vec![0; 100];
    mvhd[12..16].copy_from_slice(&44_100u32.to_be_bytes());

    let mut bytes = mp4_box(b"ftyp", &ftyp);
    bytes.extend(mp4_box(b"moov", &mp4_box(b"mvhd", &mvhd)));
    bytes.extend(mp4_box(b"mdat", &[0; 12]));
    bytes
}

/// Write a minimal, tagless FLAC file into `dir`.
///
/// STREAMINFO is followed by a last PADDING block, the usual encoder layout.
pub fn write_flac(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let mut bytes = FLAC_HEADER.to_vec();
    bytes.extend_from_slice(&[0x81, 0x00, 0x00, 0x10]); // last-block flag | PADDING, length 16
    bytes.extend_from_slice(&[0; 16]);
    bytes.extend_from_slice(&FLAC_FRAME);
    std::fs::write(&path, bytes).expect("Failed to write FLAC fixture");
    path
}

/// Write a FLAC file whose only metadata block is STREAMINFO
pub fn write_bare_flac(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let mut bytes = FLAC_HEADER.to_vec();
    bytes[4] |= 0x80; // STREAMINFO is the last block
    bytes.extend_from_slice(&FLAC_FRAME);
    std::fs::write(&path, bytes).expect("Failed to write FLAC fixture");
    path
}

/// Write a minimal, tagless M4A file into `dir`
pub fn write_m4a(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, m4a_bytes()).expect("Failed to write M4A fixture");
    path
}

/// Write a minimal MP3 file without an ID3 tag into `dir`
pub fn write_mp3(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, mp3_bytes()).expect("Failed to write MP3 fixture");
    path
}

/// Write a file that claims an audio extension but holds garbage
pub fn write_corrupt(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"this is not audio").expect("Failed to write corrupt fixture");
    path
}

/// Write an LRC sidecar next to `audio_path`, returning its path
pub fn write_lrc(audio_path: &Path, text: &str) -> PathBuf {
    let path = crate::audio::lrc_path_for(audio_path);
    std::fs::write(&path, text).expect("Failed to write LRC fixture");
    path
}
