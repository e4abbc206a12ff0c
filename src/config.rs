use color_eyre::eyre::WrapErr;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::io::{self, Write};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

/// Thumbnails get 1/3 of the original size.
pub const DEFAULT_SIZE_DIVISOR: NonZeroU32 = NonZeroU32::new(3).unwrap();
/// How far into a video the ffmpeg strategy grabs its frame.
pub const DEFAULT_SEEK_SECONDS: f64 = 5.0;

pub fn default_ffmpeg_path() -> PathBuf {
    if cfg!(target_os = "windows") {
        PathBuf::from(r"C:\Program Files\FFmpeg\bin\ffmpeg.exe")
    } else {
        PathBuf::from("/usr/bin/ffmpeg")
    }
}

/// ffprobe usually lives right next to ffmpeg.
pub fn sibling_ffprobe(ffmpeg: &Path) -> PathBuf {
    let name = if cfg!(target_os = "windows") {
        "ffprobe.exe"
    } else {
        "ffprobe"
    };
    ffmpeg.with_file_name(name)
}

/// What to do when ffmpeg exits with a failure code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitPolicy {
    /// Log a warning and keep the timing in the report.
    #[default]
    Report,
    /// Abort the run.
    Fail,
}

/// Everything a benchmark run needs. Check it with [`BenchConfig::validate`] before use.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchConfig {
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
    /// Folder holding the source files. Thumbnails are written here too.
    pub media_dir: PathBuf,
    pub video_file_name: String,
    pub image_file_name: String,
    pub size_divisor: NonZeroU32,
    pub video_seek_seconds: f64,
    pub exit_policy: ExitPolicy,
}

impl BenchConfig {
    pub fn new(media_dir: PathBuf) -> Self {
        let ffmpeg_path = default_ffmpeg_path();
        Self {
            ffprobe_path: sibling_ffprobe(&ffmpeg_path),
            ffmpeg_path,
            media_dir,
            video_file_name: "Video.wmv".to_string(),
            image_file_name: "Image.png".to_string(),
            size_divisor: DEFAULT_SIZE_DIVISOR,
            video_seek_seconds: DEFAULT_SEEK_SECONDS,
            exit_policy: ExitPolicy::default(),
        }
    }

    /// Reads a config saved as JSON, e.g. with `--config bench.json`.
    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let json = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config {path:?}"))?;
        serde_json::from_str(&json).wrap_err_with(|| format!("invalid config {path:?}"))
    }

    pub fn video_path(&self) -> PathBuf {
        self.media_dir.join(&self.video_file_name)
    }

    pub fn image_path(&self) -> PathBuf {
        self.media_dir.join(&self.image_file_name)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.ffmpeg_path.is_file() {
            return Err(ConfigError::MissingTool {
                tool: "ffmpeg",
                flag: "--ffmpeg",
                path: self.ffmpeg_path.clone(),
            });
        }
        if !self.ffprobe_path.is_file() {
            return Err(ConfigError::MissingTool {
                tool: "ffprobe",
                flag: "--ffprobe",
                path: self.ffprobe_path.clone(),
            });
        }
        if !self.video_seek_seconds.is_finite() || self.video_seek_seconds < 0.0 {
            return Err(ConfigError::InvalidSeek(self.video_seek_seconds));
        }
        Ok(())
    }

    /// Validates and writes the instructions to `out` when that fails.
    /// Returns whether the run can go ahead.
    pub fn check(&self, out: &mut impl Write) -> io::Result<bool> {
        match self.validate() {
            Ok(()) => Ok(true),
            Err(e) => {
                writeln!(out, "{e}")?;
                Ok(false)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    MissingTool {
        tool: &'static str,
        flag: &'static str,
        path: PathBuf,
    },
    InvalidSeek(f64),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTool { tool, flag, path } => write!(
                f,
                "Please make sure that \"{flag}\" contains the location of \"{tool}\" on your system!\n\nCurrent value is \"{}\"",
                path.display()
            ),
            Self::InvalidSeek(seconds) => {
                write!(f, "Seek offset must be a non-negative number of seconds, got {seconds}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use temp_dir::TempDir;

    fn config_with_tools(dir: &TempDir) -> color_eyre::Result<BenchConfig> {
        let ffmpeg = dir.path().join("ffmpeg");
        let ffprobe = dir.path().join("ffprobe");
        fs::write(&ffmpeg, b"")?;
        fs::write(&ffprobe, b"")?;
        let mut config = BenchConfig::new(dir.path().to_path_buf());
        config.ffmpeg_path = ffmpeg;
        config.ffprobe_path = ffprobe;
        Ok(config)
    }

    #[test]
    fn test_defaults() {
        let config = BenchConfig::new(PathBuf::from("media"));
        assert_eq!(config.size_divisor.get(), 3);
        assert_eq!(config.video_seek_seconds, 5.0);
        assert_eq!(config.video_path(), Path::new("media").join("Video.wmv"));
        assert_eq!(config.image_path(), Path::new("media").join("Image.png"));
        assert_eq!(config.exit_policy, ExitPolicy::Report);
        assert_eq!(config.ffprobe_path.parent(), config.ffmpeg_path.parent());
    }

    #[test]
    fn test_validate_ok() -> color_eyre::Result<()> {
        let dir = TempDir::new()?;
        config_with_tools(&dir)?.validate()?;
        Ok(())
    }

    #[test]
    fn test_validate_missing_ffmpeg() -> color_eyre::Result<()> {
        let dir = TempDir::new()?;
        let mut config = config_with_tools(&dir)?;
        config.ffmpeg_path = dir.path().join("not-ffmpeg");

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingTool { tool: "ffmpeg", .. }));
        assert!(err.to_string().contains("not-ffmpeg"));
        Ok(())
    }

    #[test]
    fn test_validate_directory_is_not_a_tool() -> color_eyre::Result<()> {
        let dir = TempDir::new()?;
        let mut config = config_with_tools(&dir)?;
        config.ffprobe_path = dir.path().to_path_buf();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingTool { tool: "ffprobe", .. })
        ));
        Ok(())
    }

    #[test]
    fn test_validate_negative_seek() -> color_eyre::Result<()> {
        let dir = TempDir::new()?;
        let mut config = config_with_tools(&dir)?;
        config.video_seek_seconds = -1.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidSeek(-1.0)));
        Ok(())
    }

    #[test]
    fn test_check_prints_instructions() -> color_eyre::Result<()> {
        let dir = TempDir::new()?;
        let mut config = config_with_tools(&dir)?;
        config.ffmpeg_path = dir.path().join("not-ffmpeg");

        let mut out = Vec::new();
        assert!(!config.check(&mut out)?);
        let printed = String::from_utf8(out)?;
        assert!(printed.starts_with("Please make sure that \"--ffmpeg\""));
        assert!(printed.contains("not-ffmpeg"));
        Ok(())
    }

    #[test]
    fn test_check_is_quiet_when_valid() -> color_eyre::Result<()> {
        let dir = TempDir::new()?;
        let mut out = Vec::new();
        assert!(config_with_tools(&dir)?.check(&mut out)?);
        assert!(out.is_empty());
        Ok(())
    }

    fn bench_json(divisor: u32) -> String {
        format!(
            r#"{{
                "ffmpeg_path": "/opt/ffmpeg",
                "ffprobe_path": "/opt/ffprobe",
                "media_dir": "clips",
                "video_file_name": "Clip.mp4",
                "image_file_name": "Still.jpg",
                "size_divisor": {divisor},
                "video_seek_seconds": 1.5,
                "exit_policy": "Fail"
            }}"#
        )
    }

    #[test]
    fn test_load_from_json() -> color_eyre::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("bench.json");
        fs::write(&path, bench_json(4))?;

        let config = BenchConfig::load(&path)?;
        assert_eq!(config.video_path(), Path::new("clips").join("Clip.mp4"));
        assert_eq!(config.size_divisor.get(), 4);
        assert_eq!(config.video_seek_seconds, 1.5);
        assert_eq!(config.exit_policy, ExitPolicy::Fail);
        Ok(())
    }

    #[test]
    fn test_load_rejects_zero_divisor() -> color_eyre::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("bench.json");
        fs::write(&path, bench_json(0))?;

        assert!(BenchConfig::load(&path).is_err());
        Ok(())
    }
}
