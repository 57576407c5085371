/// Turns frame time into whole fixed-rate ticks.
#[derive(Clone, Debug)]
pub struct Ticker {
    interval_secs: f32,
    max_ticks_per_frame: u32,
    accumulator_secs: f32,
}

impl Ticker {
    pub fn new(ticks_per_second: f32, max_ticks_per_frame: u32) -> Self {
        Self {
            interval_secs: 1.0 / ticks_per_second.max(1.0),
            max_ticks_per_frame: max_ticks_per_frame.max(1),
            accumulator_secs: 0.0,
        }
    }

    /// Ticks owed for `elapsed_secs` of wall time. Time beyond the per-frame
    /// cap is dropped rather than replayed later.
    pub fn due(&mut self, elapsed_secs: f32) -> u32 {
        if !elapsed_secs.is_finite() || elapsed_secs <= 0.0 {
            return 0;
        }

        self.accumulator_secs += elapsed_secs;
        let owed = (self.accumulator_secs / self.interval_secs).floor();
        let ticks = (owed as u32).min(self.max_ticks_per_frame);
        if owed as u32 > self.max_ticks_per_frame {
            self.accumulator_secs = 0.0;
        } else {
            self.accumulator_secs -= ticks as f32 * self.interval_secs;
        }
        ticks
    }

    pub fn reset(&mut self) {
        self.accumulator_secs = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_partial_frames() {
        let mut ticker = Ticker::new(60.0, 4);
        assert_eq!(ticker.due(0.010), 0);
        assert_eq!(ticker.due(0.010), 1);
        assert_eq!(ticker.due(0.0334), 2);
    }

    #[test]
    fn long_frames_are_capped_and_not_replayed() {
        let mut ticker = Ticker::new(60.0, 4);
        assert_eq!(ticker.due(1.0), 4);
        assert_eq!(ticker.due(0.001), 0);
    }

    #[test]
    fn ignores_nonsense_elapsed_time() {
        let mut ticker = Ticker::new(60.0, 4);
        assert_eq!(ticker.due(-1.0), 0);
        assert_eq!(ticker.due(f32::NAN), 0);
    }
}
