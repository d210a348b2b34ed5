//! sceneview - interactive 3D scene viewer
//!
//! Opens one window with a generated point cloud and the orbit, fly, sun,
//! environment-light and model controls. An optional JSON config path may be
//! given as the first argument.

use sceneview::app::{self, AppError};
use sceneview::config::{self, ViewerConfig};
use std::path::Path;
use std::process::ExitCode;

fn load_config() -> Result<ViewerConfig, AppError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading config from {}", path);
            Ok(config::load_config_from_file(Path::new(&path))?)
        }
        None => Ok(ViewerConfig::default()),
    }
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let result = load_config().and_then(app::run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
