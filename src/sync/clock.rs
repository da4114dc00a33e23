use std::time::{Duration, Instant};

/// Monotonic clock measuring the wall-clock time of each loop iteration
pub struct LoopClock {
    start: Instant,
    last_tick: Instant,
    ticks: u64,
}

impl LoopClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            ticks: 0,
        }
    }

    /// Time since the previous tick (or since creation), restarting the measurement
    pub fn tick(&mut self) -> Duration {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> Duration {
        let delta = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        self.ticks += 1;
        delta
    }

    /// `tick` in fractional milliseconds
    pub fn tick_ms(&mut self) -> f64 {
        self.tick().as_secs_f64() * 1000.0
    }

    /// Total time since the clock was created
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Default for LoopClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_measures_since_previous_tick() {
        let mut clock = LoopClock::new();
        let base = clock.last_tick;

        assert_eq!(clock.tick_at(base + Duration::from_millis(30)), Duration::from_millis(30));
        assert_eq!(clock.tick_at(base + Duration::from_millis(45)), Duration::from_millis(15));
        assert_eq!(clock.ticks(), 2);
    }

    #[test]
    fn test_tick_never_goes_negative() {
        let mut clock = LoopClock::new();
        let base = clock.last_tick;
        clock.tick_at(base + Duration::from_millis(10));
        assert_eq!(clock.tick_at(base), Duration::ZERO);
    }
}
