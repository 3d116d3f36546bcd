use std::path::PathBuf;

use anyhow::Result;

mod app;
mod input;
mod view;

/// Runtime options for the interactive panel.
pub struct PanelOptions {
    pub store_dir: PathBuf,
    pub executor_url: String,
}

pub fn run(opts: PanelOptions) -> Result<()> {
    app::run(opts)
}
