//! Clocks: a fixed-timestep accumulator for game ticks and the calendar day
//! used for daily and weekly tasks.
//!
//! `draw_web()` fires at the display refresh rate with a variable delta;
//! `GameTime` turns that into whole ticks so the engine stays deterministic.

const MS_PER_DAY: f64 = 86_400_000.0;

/// Largest frame delta fed to the accumulator. A backgrounded tab resumes
/// without a burst of catch-up ticks.
const MAX_FRAME_MS: f64 = 500.0;

pub struct GameTime {
    ms_per_tick: f64,
    /// Milliseconds not yet consumed as ticks.
    accumulator: f64,
    pub total_ticks: u64,
    last_timestamp: Option<f64>,
}

impl GameTime {
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec.max(1) as f64,
            accumulator: 0.0,
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    /// Feed a `performance.now()` timestamp; returns the ticks to run this
    /// frame. The first call only primes the clock.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_FRAME_MS),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= ticks as f64 * self.ms_per_tick;
        self.total_ticks += ticks as u64;
        ticks
    }
}

/// Whole days since the Unix epoch for a `Date.now()` timestamp.
pub fn day_index(epoch_ms: f64) -> u64 {
    (epoch_ms.max(0.0) / MS_PER_DAY) as u64
}

/// Today's day index from the browser clock.
pub fn today() -> u64 {
    day_index(js_sys::Date::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_primes_clock() {
        let mut gt = GameTime::new(10);
        assert_eq!(gt.update(1234.0), 0);
        assert_eq!(gt.total_ticks, 0);
    }

    #[test]
    fn whole_ticks_with_remainder_carried() {
        let mut gt = GameTime::new(10);
        gt.update(0.0);
        assert_eq!(gt.update(350.0), 3);
        assert_eq!(gt.update(400.0), 1);
        assert_eq!(gt.total_ticks, 4);
    }

    #[test]
    fn small_frames_accumulate() {
        let mut gt = GameTime::new(10);
        gt.update(0.0);
        let mut ticks = 0;
        for i in 1..=7 {
            ticks += gt.update(i as f64 * 16.0);
        }
        assert_eq!(ticks, 1);
    }

    #[test]
    fn backgrounded_tab_is_clamped() {
        let mut gt = GameTime::new(10);
        gt.update(0.0);
        assert_eq!(gt.update(60_000.0), 5);
    }

    #[test]
    fn clock_going_backwards_yields_nothing() {
        let mut gt = GameTime::new(10);
        gt.update(1000.0);
        assert_eq!(gt.update(900.0), 0);
    }

    #[test]
    fn one_second_at_sixty_fps() {
        let mut gt = GameTime::new(10);
        gt.update(0.0);
        let total: u32 = (1..=60).map(|i| gt.update(i as f64 * 16.667)).sum();
        assert!((9..=11).contains(&total), "got {}", total);
    }

    #[test]
    fn day_index_boundaries() {
        assert_eq!(day_index(0.0), 0);
        assert_eq!(day_index(MS_PER_DAY - 1.0), 0);
        assert_eq!(day_index(MS_PER_DAY), 1);
        // 2024-01-01T00:00:00Z
        assert_eq!(day_index(1_704_067_200_000.0), 19_723);
        assert_eq!(day_index(-5.0), 0);
    }
}
