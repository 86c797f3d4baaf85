//! Subcommands.

pub mod batch;
pub mod config;
pub mod extract;
pub mod summarize;

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use pdfsum_core::PdfsumConfig;

/// Default location of the config file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pdfsum")
        .join("config.json")
}

/// Load the config from `--config` or the default path; defaults if absent.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PdfsumConfig> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(PdfsumConfig::from_file(&path)?)
    } else {
        Ok(PdfsumConfig::default())
    }
}

/// Spinner shown while waiting on extraction or the server.
pub fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Base file name of a path, for display and export naming.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
