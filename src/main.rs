//! lrcput - embed LRC lyric files into audio file tags
//!
//! Scans a directory for FLAC, MP3 and M4A files, embeds each file's
//! sibling `.lrc` into its lyrics tag, and prints a summary.

mod audio;
mod core;
mod error;
mod logging;
mod test_fixtures;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::core::{EmbedOptions, Embedder, NoProgress, Settings};

/// Command-line arguments for lrcput
#[derive(Parser, Debug)]
#[command(name = "lrcput")]
#[command(
    about = "Embed LRC files into audio files (FLAC, MP3, and M4A) and optionally reduce LRC files"
)]
#[command(version)]
struct Args {
    /// Directory containing audio and LRC files
    #[arg(short, long)]
    directory: PathBuf,

    /// Skip files that already have embedded lyrics
    #[arg(short, long)]
    skip: bool,

    /// Reduce (delete) LRC files after embedding
    #[arg(short, long, visible_alias = "delete")]
    reduce: bool,

    /// Recursively process subdirectories
    #[arg(short = 'R', long)]
    recursive: bool,

    /// Ignore .m4a files
    #[arg(long)]
    no_m4a: bool,

    /// Settings file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Don't print the banner or per-file progress
    #[arg(short, long)]
    quiet: bool,

    /// Show info-level log output on the terminal
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Layer the command-line flags over the loaded settings
    fn embed_options(&self, mut settings: Settings) -> EmbedOptions {
        settings.skip_existing |= self.skip;
        settings.reduce_lrc |= self.reduce;
        settings.recursive |= self.recursive;
        if self.no_m4a {
            settings.m4a_enabled = false;
        }
        settings.into()
    }
}

fn print_banner() {
    println!("lrcput {}", env!("CARGO_PKG_VERSION"));
    println!("Embed LRC lyrics into FLAC, MP3 and M4A tags");
    println!();
}

fn main() -> ExitCode {
    let args = Args::parse();
    let log_path = logging::init_logging(args.verbose);

    if !args.quiet {
        print_banner();
    }

    let settings = Settings::load(args.config.as_deref());
    let embedder = Embedder::new(args.embed_options(settings));
    log::info!(
        "Embedding into {} with {:?}",
        args.directory.display(),
        embedder.options()
    );

    let outcome = if args.quiet {
        embedder.run(&args.directory, &mut NoProgress)
    } else {
        let mut print_progress = |done: usize, total: usize, status: &str| {
            println!("[{}/{}] {}", done, total, status);
        };
        embedder.run(&args.directory, &mut print_progress)
    };

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            // Only discovery errors get here; nothing has been touched
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if !args.quiet {
        println!();
    }
    for line in result.summary_lines() {
        println!("{}", line);
    }

    if !result.failed.is_empty()
        && let Some(path) = log_path
    {
        println!();
        println!("Details in log file: {}", path.display());
    }

    ExitCode::SUCCESS
}
