//! CLI subcommands

pub mod check;
pub mod info;

use std::path::Path;

use callinfo_runtime::RuntimeOptions;

/// Load options from `--config`, or `./callinfo.toml` when present
pub fn load_options(config: Option<&Path>) -> anyhow::Result<RuntimeOptions> {
    let options = match config {
        Some(path) => RuntimeOptions::load(path)?,
        None => RuntimeOptions::load_default()?,
    };
    Ok(options)
}
