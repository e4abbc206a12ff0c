use crate::config::{BenchConfig, ExitPolicy, sibling_ffprobe};
use crate::utils::default_media_dir;
use std::num::NonZeroU32;
use std::path::PathBuf;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Args {
    /// JSON file with a saved configuration. Other flags override its values
    #[clap(short, long)]
    pub config: Option<PathBuf>,
    /// Path of the ffmpeg executable
    #[clap(long)]
    pub ffmpeg: Option<PathBuf>,
    /// Path of the ffprobe executable [default: next to ffmpeg]
    #[clap(long)]
    pub ffprobe: Option<PathBuf>,
    /// Folder containing Video.wmv and Image.png [default: `media` next to this executable]
    #[clap(short, long)]
    pub media_dir: Option<PathBuf>,
    /// Thumbnails are the original size divided by this [default: 3]
    #[clap(short, long)]
    pub divisor: Option<NonZeroU32>,
    /// Seconds into the video at which ffmpeg grabs its frame [default: 5]
    #[clap(long)]
    pub seek: Option<f64>,
    /// Abort when ffmpeg exits with a failure code instead of only reporting it
    #[clap(long)]
    pub strict_exit: bool,
    /// Print the timings as JSON
    #[clap(long)]
    pub json: bool,
    /// Open the media folder afterwards without asking
    #[clap(short, long, conflicts_with = "no")]
    pub yes: bool,
    /// Never open the media folder afterwards
    #[clap(short, long)]
    pub no: bool,
}

impl Args {
    pub fn to_config(&self) -> color_eyre::Result<BenchConfig> {
        let mut config = match (&self.config, &self.media_dir) {
            (Some(file), _) => BenchConfig::load(file)?,
            (None, Some(dir)) => BenchConfig::new(dir.clone()),
            (None, None) => BenchConfig::new(default_media_dir()?),
        };
        if let Some(dir) = &self.media_dir {
            config.media_dir = dir.clone();
        }
        if let Some(ffmpeg) = &self.ffmpeg {
            config.ffprobe_path = sibling_ffprobe(ffmpeg);
            config.ffmpeg_path = ffmpeg.clone();
        }
        if let Some(ffprobe) = &self.ffprobe {
            config.ffprobe_path = ffprobe.clone();
        }
        if let Some(divisor) = self.divisor {
            config.size_divisor = divisor;
        }
        if let Some(seek) = self.seek {
            config.video_seek_seconds = seek;
        }
        if self.strict_exit {
            config.exit_policy = ExitPolicy::Fail;
        }
        Ok(config)
    }

    /// `Some` when the prompt is answered on the command line.
    pub fn open_folder(&self) -> Option<bool> {
        match (self.yes, self.no) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
