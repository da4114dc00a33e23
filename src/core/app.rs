use super::frame_source::{FrameError, FrameSource};
use super::grid::{self, Segment};
use super::playback::PlaybackState;
use super::point_generator::{Point, PointGenerator};
use crate::shared::PlayerConfig;
use crate::utils::logger;

/// Everything the playback loop mutates, owned in one place and passed by
/// reference into the loop body and input handlers.
pub struct App {
    config: PlayerConfig,
    pub playback: PlaybackState,
    pub source: FrameSource,
    generator: PointGenerator,
    points: Vec<Point>,
    grid: Vec<Segment>,
    viewport: (u16, u16),
    point_size: f32,
    cell_width: usize,
    rows_per_cell: usize,
    frames_shown: u64,
    frames_failed: u64,
    last_failed_index: Option<u32>,
    image_set: usize,
    should_quit: bool,
}

impl App {
    pub fn new(config: PlayerConfig, viewport: (u16, u16)) -> Self {
        let source = FrameSource::new(
            config.base_path.clone(),
            config.width,
            config.height,
            config.start_frame,
        );
        let generator = PointGenerator::new(config.width as usize, config.height as usize);
        let grid = grid::generate_grid_lines(&config.grid);

        let mut app = Self {
            playback: PlaybackState::new(config.fps),
            source,
            generator,
            points: Vec::new(),
            grid,
            viewport,
            point_size: 0.0,
            cell_width: 1,
            rows_per_cell: 1,
            frames_shown: 0,
            frames_failed: 0,
            last_failed_index: None,
            image_set: 0,
            should_quit: false,
            config,
        };
        app.resize(viewport.0, viewport.1);
        app
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn grid(&self) -> &[Segment] {
        &self.grid
    }

    pub fn viewport(&self) -> (u16, u16) {
        self.viewport
    }

    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    pub fn cell_width(&self) -> usize {
        self.cell_width
    }

    pub fn rows_per_cell(&self) -> usize {
        self.rows_per_cell
    }

    pub fn frames_shown(&self) -> u64 {
        self.frames_shown
    }

    pub fn frames_failed(&self) -> u64 {
        self.frames_failed
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    /// Feed one loop iteration's wall-clock time into the frame timer
    pub fn tick(&mut self, elapsed_ms: f64) -> bool {
        self.playback.advance(elapsed_ms)
    }

    /// Prepare the state for a draw. Returns whether a draw is due; the point
    /// set is only rebuilt when the coordinates changed.
    pub fn update(&mut self) -> bool {
        if !self.playback.needs_update {
            return false;
        }
        if self.playback.coordinates_changed {
            self.refresh_points();
        }
        true
    }

    /// Load the next frame and rebuild the point set.
    ///
    /// A frame that cannot be loaded is skipped: the previous points stay on
    /// screen and the error is logged once per failing index. Returns whether
    /// the point set changed.
    pub fn refresh_points(&mut self) -> bool {
        let loaded = self.source.load_next().map(|_| ());
        match loaded {
            Ok(()) => {
                self.install_points();
                true
            }
            Err(e) => {
                let start = self.source.start_frame();
                if e.is_not_found() && self.config.loop_playback && e.index() != start {
                    logger::info(&format!("end of sequence at frame {}, looping", e.index()));
                    self.source.set_current_frame(start);
                    let reloaded = self.source.load_next().map(|_| ());
                    match reloaded {
                        Ok(()) => {
                            self.install_points();
                            return true;
                        }
                        Err(restart_err) => {
                            self.skip_frame(&restart_err);
                            return false;
                        }
                    }
                }

                self.skip_frame(&e);
                false
            }
        }
    }

    fn skip_frame(&mut self, e: &FrameError) {
        self.frames_failed += 1;
        if self.last_failed_index != Some(e.index()) {
            logger::warn(&format!("skipping frame: {}", e));
            self.last_failed_index = Some(e.index());
        }
    }

    fn install_points(&mut self) {
        self.points = self.generator.generate(self.source.buffer());
        self.frames_shown += 1;
        self.last_failed_index = None;
    }

    /// Jump back to the first frame (Enter key)
    pub fn restart(&mut self) {
        let start = self.source.start_frame();
        self.source.set_current_frame(start);
        self.playback.request_restart();
        logger::debug(&format!("restart at frame {}", start));
    }

    /// Switch to the next configured image set and restart it (Tab key).
    /// Returns false when only one set is configured.
    pub fn next_image_set(&mut self) -> bool {
        let extra = &self.config.image_sets;
        if extra.is_empty() {
            return false;
        }
        self.image_set = (self.image_set + 1) % (extra.len() + 1);
        let base_path = match self.image_set {
            0 => self.config.base_path.clone(),
            i => extra[i - 1].clone(),
        };
        self.source.set_base_path(base_path);
        self.last_failed_index = None;
        self.restart();
        true
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.viewport = (cols, rows);
        self.point_size = grid::point_size(self.viewport, &self.config.grid);
        self.cell_width = grid::cell_width(self.viewport, &self.config.grid);
        self.rows_per_cell = grid::rows_per_cell(self.viewport, &self.config.grid);
        if !grid::fits(self.viewport, &self.config.grid) {
            let (need_cols, need_rows) = grid::required_viewport(&self.config.grid, 1, 2);
            logger::warn(&format!(
                "terminal {}x{} is smaller than the grid, need at least {}x{}; edges are clipped",
                cols, rows, need_cols, need_rows
            ));
        }
        self.playback.request_redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{create_dir_all, remove_dir_all, File};
    use std::io::Write;
    use std::path::PathBuf;

    fn frames_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("bad_apple_grid_app_{}", std::process::id()))
            .join(name);
        let _ = remove_dir_all(&dir);
        create_dir_all(&dir).unwrap();
        dir
    }

    fn write_frame(dir: &PathBuf, index: u32, pixels: &[u8]) {
        let mut file = File::create(dir.join(format!("frame_{}.bmp", index))).unwrap();
        file.write_all(&[0u8; 54]).unwrap();
        file.write_all(pixels).unwrap();
    }

    fn config_for(dir: &PathBuf) -> PlayerConfig {
        PlayerConfig {
            width: 2,
            height: 2,
            base_path: dir.join("frame").to_string_lossy().to_string(),
            fps: 10.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_refresh_loads_and_rasterizes() {
        let dir = frames_dir("refresh");
        let mut pixels = vec![255u8; 12];
        pixels[0] = 0;
        write_frame(&dir, 1, &pixels);

        let mut app = App::new(config_for(&dir), (100, 40));
        assert!(app.points().is_empty());
        assert!(app.refresh_points());
        assert_eq!(app.points(), &[Point::new(-1, -1, 0)]);
        assert_eq!(app.source.current_frame(), 2);
        assert_eq!(app.frames_shown(), 1);
    }

    #[test]
    fn test_missing_frame_keeps_previous_points() {
        let dir = frames_dir("missing");
        write_frame(&dir, 1, &[0u8; 12]);

        let mut app = App::new(config_for(&dir), (100, 40));
        assert!(app.refresh_points());
        assert!(!app.refresh_points());
        assert_eq!(app.points().len(), 4);
        assert_eq!(app.source.current_frame(), 2);
        assert_eq!(app.frames_failed(), 1);
    }

    #[test]
    fn test_loop_playback_wraps_to_start() {
        let dir = frames_dir("looping");
        write_frame(&dir, 1, &[0u8; 12]);

        let mut config = config_for(&dir);
        config.loop_playback = true;
        let mut app = App::new(config, (100, 40));
        assert!(app.refresh_points());
        assert!(app.refresh_points());
        assert_eq!(app.frames_shown(), 2);
        assert_eq!(app.source.current_frame(), 2);
    }

    #[test]
    fn test_loop_playback_reports_missing_start_frame() {
        let dir = frames_dir("looping_no_start");
        write_frame(&dir, 2, &[0u8; 12]);

        let mut config = config_for(&dir);
        config.loop_playback = true;
        let mut app = App::new(config, (100, 40));
        app.source.set_current_frame(2);
        assert!(app.refresh_points());

        // Frame 3 is missing, the wrap to frame 1 fails as well
        assert!(!app.refresh_points());
        assert_eq!(app.source.current_frame(), 1);
        assert_eq!(app.last_failed_index, Some(1));
        assert_eq!(app.frames_failed(), 1);
        assert_eq!(app.points().len(), 4);
    }

    #[test]
    fn test_update_after_resize_keeps_frame() {
        let dir = frames_dir("update_resize");
        write_frame(&dir, 1, &[0u8; 12]);
        write_frame(&dir, 2, &[255u8; 12]);

        let mut app = App::new(config_for(&dir), (100, 40));
        assert!(app.update());
        app.playback.mark_drawn();
        let shown = app.points().to_vec();

        app.resize(80, 24);
        assert!(app.update());
        assert_eq!(app.source.current_frame(), 2);
        assert_eq!(app.points(), &shown[..]);
        assert_eq!(app.frames_shown(), 1);
    }

    #[test]
    fn test_update_after_advance_loads_next_frame() {
        let dir = frames_dir("update_advance");
        write_frame(&dir, 1, &[0u8; 12]);
        write_frame(&dir, 2, &[255u8; 12]);

        let mut app = App::new(config_for(&dir), (100, 40));
        app.update();
        app.playback.mark_drawn();
        assert!(!app.update());

        let interval = app.playback.frame_interval_ms();
        assert!(app.tick(interval));
        assert!(app.update());
        assert_eq!(app.source.current_frame(), 3);
        assert!(app.points().is_empty());
        assert_eq!(app.frames_shown(), 2);
    }

    #[test]
    fn test_restart_sets_flags_and_index() {
        let dir = frames_dir("restart");
        write_frame(&dir, 1, &[0u8; 12]);
        write_frame(&dir, 2, &[255u8; 12]);

        let mut app = App::new(config_for(&dir), (100, 40));
        app.refresh_points();
        app.refresh_points();
        app.playback.mark_drawn();

        app.restart();
        assert!(app.playback.coordinates_changed);
        assert!(app.playback.needs_update);
        assert_eq!(app.source.current_frame(), 1);
    }

    #[test]
    fn test_image_sets_cycle_back_to_base() {
        let base = frames_dir("set_a");
        let other = frames_dir("set_b");
        write_frame(&base, 1, &[255u8; 12]);
        write_frame(&other, 1, &[0u8; 12]);

        let mut config = config_for(&base);
        config.image_sets = vec![other.join("frame").to_string_lossy().to_string()];
        let mut app = App::new(config, (100, 40));
        app.refresh_points();
        assert!(app.points().is_empty());

        assert!(app.next_image_set());
        assert!(app.playback.coordinates_changed);
        app.refresh_points();
        assert_eq!(app.points().len(), 4);

        assert!(app.next_image_set());
        app.refresh_points();
        assert!(app.points().is_empty());
    }

    #[test]
    fn test_single_image_set_does_not_switch() {
        let mut app = App::new(PlayerConfig::default(), (100, 40));
        assert!(!app.next_image_set());
    }

    #[test]
    fn test_resize_requests_redraw_only() {
        let mut app = App::new(PlayerConfig::default(), (500, 500));
        app.playback.mark_drawn();

        app.resize(80, 24);
        assert_eq!(app.viewport(), (80, 24));
        assert_eq!(app.cell_width(), 1);
        assert_eq!(app.rows_per_cell(), 2);
        assert_eq!(app.point_size(), 24.0 / 51.0);
        assert!(app.playback.needs_update);
        assert!(!app.playback.coordinates_changed);
    }
}
