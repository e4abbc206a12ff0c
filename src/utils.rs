use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use console::Term;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// `media/Video.wmv` + `.thumb2.png` -> `media/Video.wmv.thumb2.png`
pub fn thumb_path(source: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = source.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// The `media` folder next to the running executable.
pub fn default_media_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().wrap_err("could not locate the running executable")?;
    let exe_dir = exe
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .ok_or_else(|| eyre!("could not determine directory of the executable"))?;
    Ok(exe_dir.join("media"))
}

/// Prints `question` and waits for a single key press. Only `y` counts as yes.
pub fn confirm(question: &str) -> io::Result<bool> {
    let term = Term::stdout();
    term.write_str(question)?;
    let key = term.read_char()?;
    term.write_line(&key.to_string())?;
    Ok(is_yes(key))
}

fn is_yes(key: char) -> bool {
    matches!(key, 'y' | 'Y')
}

fn file_browser() -> &'static str {
    if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// Opens `dir` in the system file browser without waiting for it.
pub fn open_in_file_browser(dir: &Path) -> Result<()> {
    let browser = file_browser();
    Command::new(browser)
        .arg(dir)
        .spawn()
        .wrap_err_with(|| format!("failed to start {browser}"))?;
    Ok(())
}
