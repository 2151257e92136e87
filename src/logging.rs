use std::fs::{self, OpenOptions};
use std::path::Path;

use crate::app_dirs::AppDirs;

/// Route `log` output to a file, and only when `RUST_LOG` asks for it: the
/// terminal belongs to the game's alternate screen.
pub fn init() {
    let Ok(filters) = std::env::var("RUST_LOG") else {
        return;
    };
    if let Some(path) = AppDirs::log_path() {
        if let Err(e) = init_with(&filters, &path) {
            eprintln!("logging disabled: {e}");
        }
    }
}

pub fn init_with(filters: &str, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    pretty_env_logger::formatted_timed_builder()
        .parse_filters(filters)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .write_style(env_logger::WriteStyle::Never)
        .try_init()?;
    Ok(())
}
