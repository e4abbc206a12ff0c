use crate::ffmpeg::run_tool_output;
use crate::thumbnails::{MediaFile, MediaType};
use crate::utils::path_str;
use color_eyre::Result;
use color_eyre::eyre::{bail, eyre};
use fast_image_resize::images::Image;
use fast_image_resize::{PixelType, Resizer};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba, RgbaImage};
use std::future::Future;
use std::io::Cursor;
use std::path::PathBuf;
use tracing::debug;

#[cfg(test)]
pub use test_support::SolidColorProvider;

/// Something that can hand out a ready-made thumbnail for a media file.
///
/// This is the seam where an OS thumbnail service plugs in. The returned bytes are an
/// encoded image whose longest side is at most `max_dimension`.
pub trait ThumbnailProvider {
    fn thumbnail(
        &self,
        media: &MediaFile,
        max_dimension: u32,
    ) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Fits `width`x`height` inside a `max_dimension` square, keeping the aspect ratio.
/// Never upscales.
pub fn fit_within(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_dimension {
        return (width, height);
    }
    let scale = |side: u32| {
        let scaled = u64::from(side) * u64::from(max_dimension) / u64::from(longest);
        // scaled <= side, so it fits
        (scaled as u32).max(1)
    };
    (scale(width), scale(height))
}

/// Decodes the source in-process and resizes it with `fast_image_resize`.
///
/// Images are opened with the `image` crate. For videos ffmpeg's `thumbnail` filter picks a
/// representative frame which is piped back as PNG.
#[derive(Clone, Debug)]
pub struct NativeThumbnailProvider {
    ffmpeg: PathBuf,
}

impl NativeThumbnailProvider {
    pub fn new(ffmpeg: PathBuf) -> Self {
        Self { ffmpeg }
    }

    async fn decode_source(&self, media: &MediaFile) -> Result<DynamicImage> {
        match media.media_type {
            MediaType::Image => {
                let path = media.path.clone();
                Ok(tokio::task::spawn_blocking(move || image::open(path)).await??)
            }
            MediaType::Video => {
                let args = [
                    "-v".to_string(),
                    "error".into(),
                    "-i".into(),
                    path_str(&media.path),
                    "-vf".into(),
                    "thumbnail".into(),
                    "-frames:v".into(),
                    "1".into(),
                    "-f".into(),
                    "image2pipe".into(),
                    "-c:v".into(),
                    "png".into(),
                    "-".into(),
                ];
                let frame = run_tool_output(&self.ffmpeg, &args).await?;
                Ok(image::load_from_memory_with_format(&frame, ImageFormat::Png)?)
            }
        }
    }
}

impl ThumbnailProvider for NativeThumbnailProvider {
    async fn thumbnail(&self, media: &MediaFile, max_dimension: u32) -> Result<Vec<u8>> {
        // Sources under `divisor` pixels ask for size 0; hand out a single pixel instead.
        let max_dimension = max_dimension.max(1);
        let source = self.decode_source(media).await?;
        debug!(
            width = source.width(),
            height = source.height(),
            max_dimension,
            "decoded source"
        );

        tokio::task::spawn_blocking(move || {
            let resized = resize_to_fit(source, max_dimension)?;
            encode_png(&resized)
        })
        .await?
    }
}

fn resize_to_fit(source: DynamicImage, max_dimension: u32) -> Result<RgbaImage> {
    let src_rgba8 = source.to_rgba8();
    let (orig_w, orig_h) = src_rgba8.dimensions();
    if orig_w == 0 || orig_h == 0 {
        bail!("source image has no pixels");
    }
    let (target_w, target_h) = fit_within(orig_w, orig_h, max_dimension);
    if (target_w, target_h) == (orig_w, orig_h) {
        return Ok(src_rgba8);
    }

    let src_image = Image::from_vec_u8(orig_w, orig_h, src_rgba8.into_raw(), PixelType::U8x4)?;
    let mut dst_image = Image::new(target_w, target_h, PixelType::U8x4);
    Resizer::new().resize(&src_image, &mut dst_image, None)?;

    ImageBuffer::<Rgba<u8>, _>::from_raw(target_w, target_h, dst_image.into_vec())
        .ok_or_else(|| eyre!("failed to construct resized image from buffer"))
}

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::thumbnails::ThumbnailSize;
    use crate::thumbnails::platform_thumbnail::create_thumbnail_with_provider;
    use image::{Rgb, RgbImage};
    use std::num::NonZeroU32;
    use temp_dir::TempDir;

    #[test]
    fn test_fit_within() {
        assert_eq!(fit_within(1920, 1080, 640), (640, 360));
        assert_eq!(fit_within(1080, 1920, 640), (360, 640));
        assert_eq!(fit_within(300, 200, 640), (300, 200));
        assert_eq!(fit_within(4000, 10, 100), (100, 1));
    }

    #[tokio::test]
    async fn test_native_provider_resizes_image() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("Image.png");
        RgbImage::from_pixel(600, 300, Rgb([0, 128, 255])).save(&path)?;
        let media = MediaFile {
            path,
            media_type: MediaType::Image,
            width: 600,
            height: 300,
        };

        let provider = NativeThumbnailProvider::new(PathBuf::from("unused"));
        let bytes = provider.thumbnail(&media, 200).await?;
        let thumb = image::load_from_memory_with_format(&bytes, ImageFormat::Png)?;
        assert_eq!((thumb.width(), thumb.height()), (200, 100));
        Ok(())
    }

    #[tokio::test]
    async fn test_native_provider_tiny_image_gets_one_pixel() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("Image.png");
        RgbImage::from_pixel(2, 2, Rgb([9, 9, 9])).save(&path)?;
        let media = MediaFile {
            path,
            media_type: MediaType::Image,
            width: 2,
            height: 2,
        };
        let size = ThumbnailSize::new(2, 2, NonZeroU32::new(3).unwrap());
        assert_eq!(size.max, 0);

        let provider = NativeThumbnailProvider::new(PathBuf::from("unused"));
        let outcome = create_thumbnail_with_provider(&provider, &media, &size).await?;

        let thumb = image::open(&outcome.path)?;
        assert_eq!((thumb.width(), thumb.height()), (1, 1));
        Ok(())
    }
}
