mod platform;

use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(platform::config::DEFAULT_CONFIG_PATH));
    platform::run_app(&config_path)
}
