use crate::geometry::AxisAlignedBoundingBox;
use crate::interaction::Controls;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Startup settings for the viewer binary. Every field is optional in the
/// JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub controls: Controls,
    pub field_of_view: f32,
    /// Bounds framed before the model has finished loading.
    pub initial_bounds: AxisAlignedBoundingBox,
    pub background_color: [f32; 3],
    /// Number of samples in the generated demo point cloud.
    pub point_count: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "sceneview".to_string(),
            width: 1280,
            height: 720,
            controls: Controls::RotateCamera,
            field_of_view: 60.0,
            initial_bounds: AxisAlignedBoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0)),
            background_color: [0.1, 0.1, 0.2],
            point_count: 20_000,
        }
    }
}

pub fn save_config_to_file(config: &ViewerConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_config_from_file(path: &Path) -> Result<ViewerConfig> {
    let json = std::fs::read_to_string(path)?;
    let config: ViewerConfig = serde_json::from_str(&json)?;
    Ok(config)
}
