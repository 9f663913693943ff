use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicU32, AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::time::source::TimeSource;

/// EMA decay factor for the smoothed frame delta.
const DECAY_RATE: f32 = 0.95;
/// Fraction of the pending server desync corrected per tick.
const RESYNC_TIME_RATE: f64 = 0.1;
/// Longest logic step a single cycle may cover.
const MAX_UPDATE_CYCLE_LENGTH_MS: u64 = 1000;
/// Ceiling on the raw frame delta.
const UPDATE_CAP_MS: u64 = 1000;

/// Counters shared with reporting threads. Writers stay on the loop
/// thread; readers only need torn-value safety.
#[derive(Debug, Default)]
struct ClockShared {
    last_ms: AtomicU64,
    delta_ms: AtomicU64,
    game_time_ms: AtomicI64,
    /// f32 EMA of the frame delta, stored as bits.
    avg_delta_bits: AtomicU32,
}

/// Read-only handle over the clock counters, cloneable into a
/// monitoring or display thread.
#[derive(Clone)]
pub struct ClockStats {
    shared: Arc<ClockShared>,
}

impl ClockStats {
    pub fn fps(&self) -> f32 {
        1000.0 / f32::from_bits(self.shared.avg_delta_bits.load(Ordering::Relaxed))
    }

    pub fn delta_ms(&self) -> u64 {
        self.shared.delta_ms.load(Ordering::Relaxed)
    }

    pub fn game_time_ms(&self) -> i64 {
        self.shared.game_time_ms.load(Ordering::Relaxed)
    }

    pub fn game_time_secs(&self) -> f32 {
        self.game_time_ms() as f32 / 1000.0
    }
}

/// Converts wall-clock sampling into a capped, cycle-subdivided stream
/// of game-time deltas.
///
/// One `tick()` per outer loop iteration yields a [`TimeStepper`]; each
/// element drained from it advances game time by that cycle's delta.
/// Callers must fully drain each tick's stepper before ticking again.
pub struct GameClock {
    source: Box<dyn TimeSource>,
    shared: Arc<ClockShared>,
    desync_ms: i64,
    paused: bool,
}

impl GameClock {
    pub fn new(source: Box<dyn TimeSource>) -> Self {
        let shared = Arc::new(ClockShared::default());
        shared
            .last_ms
            .store(source.raw_time_ms(), Ordering::Relaxed);
        Self {
            source,
            shared,
            desync_ms: 0,
            paused: false,
        }
    }

    /// Sample the clock and produce this frame's update cycles.
    pub fn tick(&mut self) -> TimeStepper<'_> {
        let mut now = self.source.raw_time_ms();
        let mut raw_delta = now.saturating_sub(self.shared.last_ms.load(Ordering::Relaxed));
        if raw_delta == 0 {
            // Clock resolution too coarse; back off briefly and resample
            // once instead of busy-waiting.
            thread::sleep(Duration::from_micros(1));
            now = self.source.raw_time_ms();
            raw_delta = now.saturating_sub(self.shared.last_ms.load(Ordering::Relaxed));
        }
        if raw_delta >= UPDATE_CAP_MS {
            warn!(
                "delta too great ({}ms), capping to {}ms",
                raw_delta, UPDATE_CAP_MS
            );
            raw_delta = UPDATE_CAP_MS;
        }
        let cycles = (raw_delta.saturating_sub(1) / MAX_UPDATE_CYCLE_LENGTH_MS + 1) as u32;
        self.shared.last_ms.store(now, Ordering::Relaxed);

        let avg = f32::from_bits(self.shared.avg_delta_bits.load(Ordering::Relaxed));
        let avg = avg * DECAY_RATE + raw_delta as f32 * (1.0 - DECAY_RATE);
        self.shared.avg_delta_bits.store(avg.to_bits(), Ordering::Relaxed);

        // Work off pending server desync a fraction at a time instead of
        // snapping game time.
        if self.desync_ms != 0 {
            let mut diff = (self.desync_ms as f64 * RESYNC_TIME_RATE).ceil() as i64;
            if diff == 0 {
                diff = self.desync_ms.signum();
            }
            self.shared.game_time_ms.fetch_add(diff, Ordering::Relaxed);
            self.desync_ms -= diff;
        }

        if self.paused {
            self.shared.delta_ms.store(0, Ordering::Relaxed);
            TimeStepper::new(&self.shared, 1, 0)
        } else {
            let delta_per_cycle = raw_delta / cycles as u64;
            self.shared.delta_ms.store(delta_per_cycle, Ordering::Relaxed);
            TimeStepper::new(&self.shared, cycles, delta_per_cycle)
        }
    }

    /// Last tick's per-cycle delta in seconds.
    pub fn delta_secs(&self) -> f32 {
        self.delta_ms() as f32 / 1000.0
    }

    pub fn delta_ms(&self) -> u64 {
        self.shared.delta_ms.load(Ordering::Relaxed)
    }

    /// Smoothed frames per second.
    pub fn fps(&self) -> f32 {
        1000.0 / f32::from_bits(self.shared.avg_delta_bits.load(Ordering::Relaxed))
    }

    pub fn game_time_ms(&self) -> i64 {
        self.shared.game_time_ms.load(Ordering::Relaxed)
    }

    pub fn game_time_secs(&self) -> f32 {
        self.game_time_ms() as f32 / 1000.0
    }

    pub fn real_time_ms(&self) -> u64 {
        self.source.raw_time_ms()
    }

    /// Hard-set game time. Zeroes the reported delta; pending desync is
    /// untouched.
    pub fn set_game_time(&mut self, time_ms: i64) {
        self.shared.delta_ms.store(0, Ordering::Relaxed);
        self.shared.game_time_ms.store(time_ms, Ordering::Relaxed);
    }

    /// Request a gradual resync towards the server-authoritative game
    /// time. Consumed a fraction per tick, never as a hard jump.
    pub fn update_time_from_server(&mut self, target_time_ms: i64) {
        self.desync_ms = target_time_ms - self.game_time_ms();
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Cloneable read handle for reporting threads.
    pub fn stats(&self) -> ClockStats {
        ClockStats {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// Lazy, finite sequence of this frame's update cycles. Advancing it
/// accumulates each cycle's delta into game time, so it must be drained
/// exactly once per tick.
pub struct TimeStepper<'a> {
    shared: &'a ClockShared,
    cycles: u32,
    delta_per_cycle_ms: u64,
    current: u32,
}

impl<'a> TimeStepper<'a> {
    fn new(shared: &'a ClockShared, cycles: u32, delta_per_cycle_ms: u64) -> Self {
        Self {
            shared,
            cycles,
            delta_per_cycle_ms,
            current: 0,
        }
    }
}

impl Iterator for TimeStepper<'_> {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.current >= self.cycles {
            return None;
        }
        self.current += 1;
        self.shared
            .game_time_ms
            .fetch_add(self.delta_per_cycle_ms as i64, Ordering::Relaxed);
        Some(self.delta_per_cycle_ms as f32 / 1000.0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.cycles - self.current) as usize;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::source::MockTimeSource;

    fn clock() -> (MockTimeSource, GameClock) {
        let source = MockTimeSource::new();
        let clock = GameClock::new(Box::new(source.clone()));
        (source, clock)
    }

    #[test]
    fn test_single_cycle_advances_game_time() {
        let (source, mut clock) = clock();
        source.advance_ms(16);
        let deltas: Vec<f32> = clock.tick().collect();
        assert_eq!(deltas, vec![0.016]);
        assert_eq!(clock.game_time_ms(), 16);
        assert_eq!(clock.delta_ms(), 16);
    }

    #[test]
    fn test_capped_delta_covers_exactly_one_second() {
        let (source, mut clock) = clock();
        source.advance_ms(5_000);
        let deltas: Vec<f32> = clock.tick().collect();
        let total: f32 = deltas.iter().sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert_eq!(clock.game_time_ms(), 1_000);
    }

    #[test]
    fn test_game_time_advances_only_when_drained() {
        let (source, mut clock) = clock();
        source.advance_ms(20);
        {
            let _stepper = clock.tick();
            // Dropped without draining.
        }
        assert_eq!(clock.game_time_ms(), 0);
        source.advance_ms(20);
        let mut stepper = clock.tick();
        assert!(stepper.next().is_some());
        assert_eq!(clock.game_time_ms(), 20);
    }

    #[test]
    fn test_zero_delta_yields_zero_cycle() {
        let (_source, mut clock) = clock();
        let deltas: Vec<f32> = clock.tick().collect();
        assert_eq!(deltas, vec![0.0]);
        assert_eq!(clock.game_time_ms(), 0);
    }

    #[test]
    fn test_pause_freezes_game_time() {
        let (source, mut clock) = clock();
        clock.set_paused(true);
        for _ in 0..5 {
            source.advance_ms(100);
            let deltas: Vec<f32> = clock.tick().collect();
            assert_eq!(deltas, vec![0.0]);
        }
        assert_eq!(clock.game_time_ms(), 0);
        assert_eq!(clock.delta_ms(), 0);
        assert!(clock.is_paused());
    }

    #[test]
    fn test_resync_is_gradual() {
        let (source, mut clock) = clock();
        clock.update_time_from_server(100);

        source.advance_ms(10);
        let _ = clock.tick();
        // First nudge is ceil(100 * 0.1) = 10, not the full correction.
        assert_eq!(clock.game_time_ms(), 10);

        let mut ticks = 1;
        while clock.game_time_ms() < 100 {
            source.advance_ms(10);
            let _ = clock.tick();
            ticks += 1;
            assert!(ticks < 100, "resync never converged");
        }
        assert!(ticks > 5, "resync applied too fast ({} ticks)", ticks);
        assert_eq!(clock.game_time_ms(), 100);

        // Fully consumed: further ticks leave game time alone.
        source.advance_ms(10);
        let _ = clock.tick();
        assert_eq!(clock.game_time_ms(), 100);
    }

    #[test]
    fn test_negative_resync_steps_by_at_least_one() {
        let (source, mut clock) = clock();
        clock.set_game_time(5);
        clock.update_time_from_server(0);

        source.advance_ms(10);
        let _ = clock.tick();
        // ceil(-5 * 0.1) rounds to zero, so the minimum signed step
        // applies.
        assert_eq!(clock.game_time_ms(), 4);

        for _ in 0..4 {
            source.advance_ms(10);
            let _ = clock.tick();
        }
        assert_eq!(clock.game_time_ms(), 0);
    }

    #[test]
    fn test_resync_applies_while_paused() {
        let (source, mut clock) = clock();
        clock.set_paused(true);
        clock.update_time_from_server(100);
        source.advance_ms(10);
        let deltas: Vec<f32> = clock.tick().collect();
        assert_eq!(deltas, vec![0.0]);
        assert_eq!(clock.game_time_ms(), 10);
    }

    #[test]
    fn test_set_game_time_zeroes_delta() {
        let (source, mut clock) = clock();
        source.advance_ms(16);
        let _: Vec<f32> = clock.tick().collect();
        clock.set_game_time(42_000);
        assert_eq!(clock.game_time_ms(), 42_000);
        assert_eq!(clock.delta_ms(), 0);
    }

    #[test]
    fn test_fps_converges_on_steady_frames() {
        let (source, mut clock) = clock();
        for _ in 0..300 {
            source.advance_ms(20);
            let _: Vec<f32> = clock.tick().collect();
        }
        assert!((clock.fps() - 50.0).abs() < 1.0);
    }

    #[test]
    fn test_stats_handle_reads_same_counters() {
        let (source, mut clock) = clock();
        let stats = clock.stats();
        source.advance_ms(16);
        let _: Vec<f32> = clock.tick().collect();
        assert_eq!(stats.game_time_ms(), clock.game_time_ms());
        assert_eq!(stats.delta_ms(), 16);
    }
}
