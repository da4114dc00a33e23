use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::constants;

/// World-space extent covered by the background grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridExtent {
    pub xmin: i32,
    pub xmax: i32,
    pub ymin: i32,
    pub ymax: i32,
}

impl Default for GridExtent {
    fn default() -> Self {
        Self {
            xmin: constants::DEFAULT_XMIN,
            xmax: constants::DEFAULT_XMAX,
            ymin: constants::DEFAULT_YMIN,
            ymax: constants::DEFAULT_YMAX,
        }
    }
}

impl GridExtent {
    /// Extent that exactly frames a centered image of the given size
    pub fn for_frame(width: u32, height: u32) -> Self {
        let half_w = (width / 2) as i32;
        let half_h = (height / 2) as i32;
        Self {
            xmin: -half_w,
            xmax: half_w,
            ymin: -half_h,
            ymax: half_h,
        }
    }

    pub fn columns(&self) -> usize {
        (self.xmax - self.xmin + 1).max(0) as usize
    }

    pub fn rows(&self) -> usize {
        (self.ymax - self.ymin + 1).max(0) as usize
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }
}

/// Startup configuration. Fixed for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: u32,
    pub height: u32,
    pub base_path: String,
    pub fps: f64,
    pub start_frame: u32,
    pub grid: GridExtent,
    pub loop_playback: bool,
    /// Alternative frame base paths, cycled with Tab after `base_path`
    pub image_sets: Vec<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: constants::DEFAULT_FRAME_WIDTH,
            height: constants::DEFAULT_FRAME_HEIGHT,
            base_path: constants::DEFAULT_BASE_PATH.to_string(),
            fps: constants::DEFAULT_FPS,
            start_frame: constants::DEFAULT_START_FRAME,
            grid: GridExtent::default(),
            loop_playback: false,
            image_sets: Vec::new(),
        }
    }
}

/// Values given on the command line; `None` keeps the file/default value.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub base_path: Option<String>,
    pub fps: Option<f64>,
    pub start_frame: Option<u32>,
    pub loop_playback: bool,
}

impl PlayerConfig {
    /// Defaults, then the first config file found, then CLI overrides.
    pub fn resolve(explicit: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_locations().into_iter().find(|p| p.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply(overrides);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    fn default_locations() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(constants::CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join(constants::APP_NAME).join(constants::CONFIG_DIR_FILE));
        }
        paths
    }

    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        let size_changed = overrides.width.is_some() || overrides.height.is_some();
        if let Some(width) = overrides.width {
            self.width = width;
        }
        if let Some(height) = overrides.height {
            self.height = height;
        }
        if let Some(base_path) = &overrides.base_path {
            self.base_path = base_path.clone();
        }
        if let Some(fps) = overrides.fps {
            self.fps = fps;
        }
        if let Some(start) = overrides.start_frame {
            self.start_frame = start;
        }
        if overrides.loop_playback {
            self.loop_playback = true;
        }
        // A resized frame no longer fits the default grid
        if size_changed {
            self.grid = GridExtent::for_frame(self.width, self.height);
        }
    }

    /// Every problem with this configuration, empty when it is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.width == 0 || self.height == 0 {
            problems.push(format!(
                "frame size must be non-zero, got {}x{}",
                self.width, self.height
            ));
        }
        if !(self.fps.is_finite() && self.fps > 0.0) {
            problems.push(format!("fps must be a positive number, got {}", self.fps));
        }
        if self.start_frame == 0 {
            problems.push("start frame must be at least 1".to_string());
        }
        if self.base_path.trim().is_empty() {
            problems.push("base path is empty".to_string());
        } else if let Some(parent) = Path::new(&self.base_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                problems.push(format!("frame directory not found: {}", parent.display()));
            }
        }
        if let Some(empty) = self.image_sets.iter().position(|s| s.trim().is_empty()) {
            problems.push(format!("image set {} has an empty base path", empty + 1));
        }
        if self.grid.xmin > self.grid.xmax || self.grid.ymin > self.grid.ymax {
            problems.push(format!("grid extent is empty: {:?}", self.grid));
        }

        problems
    }
}
