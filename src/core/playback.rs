/// Fixed-rate frame advance timer with redraw gating flags
///
/// `coordinates_changed` means the point data must be regenerated before the
/// next draw; `needs_update` means a draw is due. Both start set so the first
/// frame is shown immediately.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    fps: f64,
    accumulated_ms: f64,
    pub needs_update: bool,
    pub coordinates_changed: bool,
}

impl PlaybackState {
    pub fn new(fps: f64) -> Self {
        Self {
            fps,
            accumulated_ms: 0.0,
            needs_update: true,
            coordinates_changed: true,
        }
    }

    /// Milliseconds between frame advances
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.fps
    }

    pub fn accumulated_ms(&self) -> f64 {
        self.accumulated_ms
    }

    /// Add the wall-clock time of one loop iteration.
    ///
    /// Returns true when the frame advanced. At most one advance happens per
    /// call no matter how much time has piled up.
    pub fn advance(&mut self, elapsed_ms: f64) -> bool {
        self.accumulated_ms += elapsed_ms;
        if self.accumulated_ms >= self.frame_interval_ms() {
            self.coordinates_changed = true;
            self.needs_update = true;
            self.accumulated_ms = 0.0;
            true
        } else {
            false
        }
    }

    /// Input asked for fresh point data (restart, image set switch)
    pub fn request_restart(&mut self) {
        self.coordinates_changed = true;
        self.needs_update = true;
    }

    /// Input asked for a redraw of the current data (resize)
    pub fn request_redraw(&mut self) {
        self.needs_update = true;
    }

    pub fn mark_drawn(&mut self) {
        self.coordinates_changed = false;
        self.needs_update = false;
    }
}
