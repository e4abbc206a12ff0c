//! The two thumbnail strategies and the types they share.

pub mod ffmpeg_thumbnail;
pub mod platform_thumbnail;
pub mod provider;
pub mod size;

use crate::ffprobe::get_video_dimensions;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Duration;

pub use size::ThumbnailSize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    Video,
    Image,
}

/// A source file and the dimensions read from its metadata.
#[derive(Clone, Debug, Serialize)]
pub struct MediaFile {
    pub path: PathBuf,
    pub media_type: MediaType,
    pub width: u32,
    pub height: u32,
}

impl MediaFile {
    /// Reads the dimensions of `path`. Videos go through ffprobe, images only have their
    /// header decoded.
    pub async fn probe(path: &Path, media_type: MediaType, ffprobe: &Path) -> Result<Self> {
        let (width, height) = match media_type {
            MediaType::Video => get_video_dimensions(ffprobe, path).await?,
            MediaType::Image => {
                let image_path = path.to_path_buf();
                tokio::task::spawn_blocking(move || image::image_dimensions(image_path))
                    .await?
                    .wrap_err_with(|| format!("failed to read image header of {path:?}"))?
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            media_type,
            width,
            height,
        })
    }
}

/// A thumbnail that was written to disk and how long it took.
#[derive(Debug)]
pub struct ThumbnailOutcome {
    pub path: PathBuf,
    pub elapsed: Duration,
    /// Only set when an external tool produced the thumbnail.
    pub tool_status: Option<ExitStatus>,
}
