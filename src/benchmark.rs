use crate::config::{BenchConfig, ExitPolicy};
use crate::thumbnails::ffmpeg_thumbnail::create_thumbnail_with_ffmpeg;
use crate::thumbnails::platform_thumbnail::create_thumbnail_with_provider;
use crate::thumbnails::provider::ThumbnailProvider;
use crate::thumbnails::{MediaFile, MediaType, ThumbnailOutcome, ThumbnailSize};
use color_eyre::Result;
use color_eyre::eyre::bail;
use serde::Serialize;
use std::fmt::{self, Display};
use std::path::PathBuf;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Strategy {
    Platform,
    FFmpeg,
}

impl Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Platform => f.write_str("Platform"),
            Self::FFmpeg => f.write_str("FFmpeg"),
        }
    }
}

/// One row of the report.
#[derive(Clone, Debug, Serialize)]
pub struct StrategyTiming {
    pub label: String,
    pub strategy: Strategy,
    pub milliseconds: u64,
    pub output: PathBuf,
    /// Exit code of the external tool, if one was involved.
    pub exit_code: Option<i32>,
}

impl StrategyTiming {
    fn new(label: &str, strategy: Strategy, outcome: &ThumbnailOutcome) -> Self {
        Self {
            label: label.to_string(),
            strategy,
            milliseconds: u64::try_from(outcome.elapsed.as_millis()).unwrap_or(u64::MAX),
            output: outcome.path.clone(),
            exit_code: outcome.tool_status.and_then(|s| s.code()),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct BenchReport {
    pub media_dir: PathBuf,
    pub timings: Vec<StrategyTiming>,
}

impl Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .timings
            .iter()
            .map(|t| format!("{} ({})", t.label, t.strategy))
            .collect();
        let width = names.iter().map(String::len).max().unwrap_or(0);

        writeln!(f, "======================")?;
        for (name, timing) in names.iter().zip(&self.timings) {
            write!(f, "{name:<width$}: {} ms", timing.milliseconds)?;
            match timing.exit_code {
                Some(code) if code != 0 => writeln!(f, " (exit code {code})")?,
                _ => writeln!(f)?,
            }
        }
        writeln!(f)?;
        writeln!(f, "======================")?;
        write!(f, "Thumbnails created in \"{}\".", self.media_dir.display())
    }
}

/// Runs both strategies on the video and then the image, strictly one after another.
///
/// The configuration is validated first; when that fails nothing is written. Any other error
/// aborts the whole run.
pub async fn run_benchmark<P: ThumbnailProvider>(
    config: &BenchConfig,
    provider: &P,
) -> Result<BenchReport> {
    config.validate()?;

    let mut report = BenchReport {
        media_dir: config.media_dir.clone(),
        timings: Vec::with_capacity(4),
    };
    let sources = [
        ("Video", config.video_path(), MediaType::Video),
        ("Image", config.image_path(), MediaType::Image),
    ];

    for (label, path, media_type) in sources {
        let media = MediaFile::probe(&path, media_type, &config.ffprobe_path).await?;
        let size = ThumbnailSize::new(media.width, media.height, config.size_divisor);
        info!(
            file = %path.display(),
            width = media.width,
            height = media.height,
            thumb_width = size.width,
            thumb_height = size.height,
            "generating thumbnails"
        );

        let platform = create_thumbnail_with_provider(provider, &media, &size).await?;
        report
            .timings
            .push(StrategyTiming::new(label, Strategy::Platform, &platform));

        let tool = create_thumbnail_with_ffmpeg(
            &config.ffmpeg_path,
            &media,
            &size,
            config.video_seek_seconds,
        )
        .await?;
        match tool.tool_status {
            Some(status) if !status.success() && config.exit_policy == ExitPolicy::Fail => {
                bail!("ffmpeg failed on {:?} with {status}", path)
            }
            _ => {}
        }
        report
            .timings
            .push(StrategyTiming::new(label, Strategy::FFmpeg, &tool));
    }

    Ok(report)
}
