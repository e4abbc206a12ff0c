use crate::ffmpeg::spawn_tool;
use crate::thumbnails::{MediaFile, MediaType, ThumbnailOutcome, ThumbnailSize};
use crate::utils::{path_str, thumb_path};
use color_eyre::Result;
use std::path::Path;
use tracing::{debug, instrument, warn};

pub const FFMPEG_THUMB_SUFFIX: &str = ".thumb2.png";

/// Arguments for grabbing one frame of `input` scaled to `size`.
///
/// Videos seek `seek_seconds` in and drop audio first, images are taken as-is.
pub fn ffmpeg_thumbnail_args(
    input: &Path,
    media_type: MediaType,
    size: &ThumbnailSize,
    seek_seconds: f64,
    output: &Path,
) -> Vec<String> {
    let mut args = Vec::new();
    if media_type == MediaType::Video {
        args.extend(["-ss".to_string(), seek_seconds.to_string(), "-an".into()]);
    }
    args.extend([
        "-i".to_string(),
        path_str(input),
        "-vframes".into(),
        "1".into(),
        "-s".into(),
        format!("{}x{}", size.width, size.height),
        "-y".into(),
        path_str(output),
    ]);
    args
}

/// Launches ffmpeg to write `<source>.thumb2.png` and waits for it to exit.
///
/// The elapsed time runs from the spawn until the exit is seen. A failing exit code is
/// returned in the outcome, not as an error.
#[instrument(
    skip_all,
    fields(file = %media.path.display(), width = size.width, height = size.height)
)]
pub async fn create_thumbnail_with_ffmpeg(
    ffmpeg: &Path,
    media: &MediaFile,
    size: &ThumbnailSize,
    seek_seconds: f64,
) -> Result<ThumbnailOutcome> {
    let output = thumb_path(&media.path, FFMPEG_THUMB_SUFFIX);
    let args = ffmpeg_thumbnail_args(&media.path, media.media_type, size, seek_seconds, &output);
    debug!(?args, "running ffmpeg");

    let run = spawn_tool(ffmpeg, &args)?.wait().await?;
    debug!(elapsed = ?run.elapsed, status = %run.status, "ffmpeg exited");
    if !run.status.success() {
        warn!(status = %run.status, stderr = %run.stderr_tail(5), "ffmpeg reported a failure");
    }

    Ok(ThumbnailOutcome {
        path: output,
        elapsed: run.elapsed,
        tool_status: Some(run.status),
    })
}
