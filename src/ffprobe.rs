use crate::ffmpeg::run_tool_output;
use crate::utils::path_str;
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
}

/// Width and height of the first video stream of `input`.
pub async fn get_video_dimensions(ffprobe: &Path, input: &Path) -> Result<(u32, u32)> {
    let args = [
        "-v".to_string(),
        "error".into(),
        "-select_streams".into(),
        "v:0".into(),
        "-show_entries".into(),
        "stream=width,height".into(),
        "-of".into(),
        "json".into(),
        path_str(input),
    ];
    let stdout = run_tool_output(ffprobe, &args).await?;
    parse_dimensions(&stdout).wrap_err_with(|| format!("unexpected ffprobe output for {input:?}"))
}

fn parse_dimensions(json: &[u8]) -> Result<(u32, u32)> {
    let probe: ProbeOutput = serde_json::from_slice(json)?;
    probe
        .streams
        .into_iter()
        .find_map(|s| Some((s.width?, s.height?)))
        .ok_or_else(|| eyre!("no video stream with dimensions found"))
}
