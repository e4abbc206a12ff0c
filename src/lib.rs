//! # Thumbnail Benchmark
//!
//! Times two ways of making a thumbnail for a video and an image:
//! - asking a [`ThumbnailProvider`] (the seam for an OS thumbnail service) for a resized
//!   thumbnail and re-encoding it as PNG, written to `<source>.thumb1.png`;
//! - running FFmpeg as a subprocess to grab and scale one frame, written to
//!   `<source>.thumb2.png`.
//!
//! Thumbnail dimensions are the source dimensions divided by a fixed divisor (3 by default).
//! All operations are performed asynchronously using `tokio`, one after another.
//!
//! ## Requirements
//!
//! - **FFmpeg** and **FFprobe** executables, configured through [`BenchConfig`].
//!
//! ## Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use thumbnail_benchmark::{BenchConfig, NativeThumbnailProvider, run_benchmark};
//!
//! #[tokio::main]
//! async fn main() -> color_eyre::Result<()> {
//!     let mut config = BenchConfig::new(PathBuf::from("media"));
//!     config.ffmpeg_path = PathBuf::from("/usr/local/bin/ffmpeg");
//!     config.ffprobe_path = PathBuf::from("/usr/local/bin/ffprobe");
//!
//!     let provider = NativeThumbnailProvider::new(config.ffmpeg_path.clone());
//!     let report = run_benchmark(&config, &provider).await?;
//!     println!("{report}");
//!
//!     Ok(())
//! }
//! ```

// Runs the benchmark and renders the timing report.
mod benchmark;
// Command line arguments for the binary.
pub mod cli;
// Run configuration and its validation.
mod config;
// Spawning `ffmpeg` and other tools.
mod ffmpeg;
// Module for interacting with the `ffprobe` command-line tool.
mod ffprobe;
// The size calculator and both thumbnail strategies.
pub mod thumbnails;
// Path helpers, the console prompt and the file browser.
pub mod utils;

pub use benchmark::{BenchReport, Strategy, StrategyTiming, run_benchmark};
pub use config::{BenchConfig, ConfigError, ExitPolicy};
pub use ffmpeg::{PendingRun, ToolRun, spawn_tool};
pub use thumbnails::provider::{NativeThumbnailProvider, ThumbnailProvider};
pub use thumbnails::{MediaFile, MediaType, ThumbnailOutcome, ThumbnailSize};
