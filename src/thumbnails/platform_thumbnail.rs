use crate::thumbnails::provider::ThumbnailProvider;
use crate::thumbnails::{MediaFile, ThumbnailOutcome, ThumbnailSize};
use crate::utils::thumb_path;
use color_eyre::Result;
use image::ImageFormat;
use std::time::Instant;
use tracing::{debug, instrument};

pub const PLATFORM_THUMB_SUFFIX: &str = ".thumb1.png";

/// Asks `provider` for a thumbnail no larger than `size.max`, decodes it and stores it as
/// PNG at `<source>.thumb1.png`. An existing file at that path is replaced.
#[instrument(skip_all, fields(file = %media.path.display(), max = size.max))]
pub async fn create_thumbnail_with_provider<P: ThumbnailProvider>(
    provider: &P,
    media: &MediaFile,
    size: &ThumbnailSize,
) -> Result<ThumbnailOutcome> {
    let started = Instant::now();
    let output = thumb_path(&media.path, PLATFORM_THUMB_SUFFIX);

    let encoded = provider.thumbnail(media, size.max).await?;
    let out = output.clone();
    tokio::task::spawn_blocking(move || -> Result<()> {
        let bitmap = image::load_from_memory(&encoded)?;
        bitmap.save_with_format(&out, ImageFormat::Png)?;
        Ok(())
    })
    .await??;

    let elapsed = started.elapsed();
    debug!(?elapsed, output = %output.display(), "thumbnail written");
    Ok(ThumbnailOutcome {
        path: output,
        elapsed,
        tool_status: None,
    })
}
