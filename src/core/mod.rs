//! Core embedding logic
//!
//! This module contains:
//! - Settings and per-run options
//! - Audio file discovery
//! - The LRC embedding pipeline and run statistics

mod embedding;
mod scanning;
mod settings;

pub use embedding::{Embedder, NoProgress};
pub use settings::{EmbedOptions, Settings};
