use anyhow::Context;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Install a plain-text subscriber writing to `path`.
///
/// The terminal is in raw alternate-screen mode while the app runs, so log
/// lines never go to stdout or stderr. Without a path nothing is installed and
/// events are dropped.
pub fn init(path: Option<&Path>, filter: &str) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;
    let filter = EnvFilter::try_new(filter)
        .with_context(|| format!("parse log filter {filter:?}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install log subscriber: {e}"))?;
    Ok(())
}
