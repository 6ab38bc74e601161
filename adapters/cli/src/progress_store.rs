//! JSON persistence for player progress.

use std::{fs, io::ErrorKind, path::Path};

use anyhow::Context;
use gem_cascade_session::Progress;

/// Reads progress from `path`, starting fresh when the file does not exist.
pub(crate) fn load(path: &Path) -> anyhow::Result<Progress> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no saved progress, starting fresh");
            return Ok(Progress::default());
        }
        Err(error) => {
            return Err(error)
                .with_context(|| format!("failed to read progress file {}", path.display()))
        }
    };

    let progress: Progress = serde_json::from_str(&text)
        .with_context(|| format!("progress file {} is not valid JSON", path.display()))?;
    Ok(progress.normalized())
}

/// Writes progress to `path`, creating parent directories as needed.
pub(crate) fn save(path: &Path, progress: &Progress) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(progress).context("failed to serialise progress")?;
    fs::write(path, json)
        .with_context(|| format!("failed to write progress file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "progress saved");
    Ok(())
}
