use anyhow::{Context, Result};
use std::io::{self, IsTerminal};

use super::frame_source::FrameSource;
use super::point_generator::{Point, PointGenerator};
use crate::renderer::DisplayMode;
use crate::shared::PlayerConfig;
use crate::utils::logger;

/// Every reason playback cannot start. Empty means ready.
pub fn preflight(config: &PlayerConfig, needs_terminal: bool) -> Vec<String> {
    let mut problems = config.validate();

    if problems.is_empty() {
        let source = FrameSource::new(
            config.base_path.clone(),
            config.width,
            config.height,
            config.start_frame,
        );
        let first = source.frame_path(config.start_frame);
        if !first.is_file() {
            problems.push(format!("first frame not found: {}", first.display()));
        }
    }

    if needs_terminal && !io::stdout().is_terminal() {
        problems.push("stdout is not a terminal".to_string());
    }

    problems
}

/// Check the configuration once, report all problems together, then play.
pub fn run(config: PlayerConfig, mode: DisplayMode) -> Result<()> {
    let problems = preflight(&config, true);
    if !problems.is_empty() {
        for problem in &problems {
            logger::error(&format!("init: {}", problem));
        }
        anyhow::bail!(
            "cannot start playback:\n  - {}",
            problems.join("\n  - ")
        );
    }

    crate::ui::interactive::run_player(config, mode)
}

/// Point set of one frame, `index` defaulting to the start frame
pub fn frame_points(config: &PlayerConfig, index: Option<u32>) -> Result<Vec<Point>> {
    let problems = config.validate();
    if !problems.is_empty() {
        anyhow::bail!("invalid configuration:\n  - {}", problems.join("\n  - "));
    }

    let mut source = FrameSource::new(
        config.base_path.clone(),
        config.width,
        config.height,
        config.start_frame,
    );
    if let Some(index) = index {
        source.set_current_frame(index);
    }
    let requested = source.current_frame();
    source
        .load_next()
        .with_context(|| format!("cannot rasterize frame {}", requested))?;

    let generator = PointGenerator::new(config.width as usize, config.height as usize);
    Ok(generator.generate(source.buffer()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{create_dir_all, remove_dir_all, File};
    use std::io::Write;
    use std::path::PathBuf;

    fn fixture_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("bad_apple_grid_preflight_{}", std::process::id()))
            .join(name);
        let _ = remove_dir_all(&dir);
        create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_fixture_dir_starts_empty() {
        let dir = fixture_dir("leftover");
        File::create(dir.join("frame_3.bmp")).unwrap();
        let dir = fixture_dir("leftover");
        assert!(!dir.join("frame_3.bmp").exists());
    }

    #[test]
    fn test_preflight_requires_first_frame() {
        let dir = fixture_dir("first_frame");
        let config = PlayerConfig {
            base_path: dir.join("frame").to_string_lossy().to_string(),
            start_frame: 3,
            ..Default::default()
        };

        let problems = preflight(&config, false);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("frame_3.bmp"));

        File::create(dir.join("frame_3.bmp")).unwrap();
        assert!(preflight(&config, false).is_empty());
    }

    #[test]
    fn test_preflight_skips_file_check_for_invalid_config() {
        let config = PlayerConfig {
            fps: -1.0,
            ..Default::default()
        };
        let problems = preflight(&config, false);
        assert!(problems.iter().any(|p| p.contains("fps")));
        assert!(!problems.iter().any(|p| p.contains("first frame")));
    }

    #[test]
    fn test_frame_points_reads_requested_frame() {
        let dir = fixture_dir("points");
        let mut file = File::create(dir.join("frame_2.bmp")).unwrap();
        file.write_all(&[0u8; 54]).unwrap();
        file.write_all(&[0, 0, 0, 255, 255, 255]).unwrap();

        let config = PlayerConfig {
            width: 2,
            height: 1,
            base_path: dir.join("frame").to_string_lossy().to_string(),
            ..Default::default()
        };
        let points = frame_points(&config, Some(2)).unwrap();
        assert_eq!(points, vec![Point::new(-1, 0, 0)]);
        assert!(frame_points(&config, None).is_err());
    }

    #[test]
    fn test_frame_points_rejects_invalid_config() {
        let config = PlayerConfig {
            width: 0,
            ..Default::default()
        };
        let err = frame_points(&config, None).unwrap_err();
        assert!(err.to_string().contains("frame size"));
    }
}
