use clap::Parser;
use color_eyre::Result;
use thumbnail_benchmark::cli::Args;
use thumbnail_benchmark::utils::{confirm, open_in_file_browser};
use thumbnail_benchmark::{NativeThumbnailProvider, run_benchmark};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.to_config()?;
    if !config.check(&mut std::io::stdout())? {
        return Ok(());
    }

    let provider = NativeThumbnailProvider::new(config.ffmpeg_path.clone());
    let report = run_benchmark(&config, &provider).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        println!("{report}");
        println!();
    }

    let open = match args.open_folder() {
        Some(answer) => answer,
        None => confirm("Open folder (Y/N)? ")?,
    };
    if open {
        open_in_file_browser(&config.media_dir)?;
    }

    Ok(())
}
