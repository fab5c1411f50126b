//! Frame timing with an injectable clock.
//!
//! [`Time`] turns clock readings into the per-frame delta the simulation
//! integrates with. The delta is always passed through the stability guard,
//! so a stalled host never produces a step larger than
//! [`MAX_DELTA`](crate::guard::MAX_DELTA).
//!
//! # Example
//!
//! ```ignore
//! use barrier_sim::time::{ManualClock, Time};
//!
//! let mut time = Time::with_clock(ManualClock::new());
//! time.clock_mut().advance(1.0 / 60.0);
//! let (elapsed, delta) = time.update();
//! ```

use crate::guard;
use std::time::{Duration, Instant};

/// Source of monotonic time.
pub trait Clock {
    /// Time since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to. Used for deterministic runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `secs` seconds. Negative values are ignored.
    pub fn advance(&mut self, secs: f32) {
        if secs.is_finite() && secs > 0.0 {
            self.now += Duration::from_secs_f32(secs);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }
}

/// Time tracking for the simulation loop.
#[derive(Debug)]
pub struct Time<C: Clock = SystemClock> {
    clock: C,
    /// Clock reading at the last frame.
    last_frame: Duration,
    /// Simulated time in seconds (sum of clamped, scaled deltas).
    elapsed_secs: f32,
    /// Clamped delta of the last frame.
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Duration,
    fps_update_interval: Duration,
    paused: bool,
    /// Fixed delta time for deterministic updates (optional).
    fixed_delta: Option<f32>,
    /// Time scale multiplier (1.0 = normal speed).
    time_scale: f32,
}

impl Time<SystemClock> {
    /// Create a new time tracker on the wall clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Default for Time<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Time<C> {
    pub fn with_clock(clock: C) -> Self {
        let now = clock.now();
        Self {
            clock,
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
            fixed_delta: None,
            time_scale: 1.0,
        }
    }

    /// Update timing values. Call once per frame.
    ///
    /// Returns `(elapsed_time, delta_time)`; the delta is clamped.
    pub fn update(&mut self) -> (f32, f32) {
        let now = self.clock.now();
        let raw = now.saturating_sub(self.last_frame).as_secs_f32();
        self.last_frame = now;

        if self.paused {
            self.delta_secs = 0.0;
            return (self.elapsed_secs, self.delta_secs);
        }

        let raw = self.fixed_delta.unwrap_or(raw) * self.time_scale;
        self.delta_secs = guard::clamp_delta(raw);
        self.elapsed_secs += self.delta_secs;
        self.frame_count += 1;

        let fps_elapsed = now.saturating_sub(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        (self.elapsed_secs, self.delta_secs)
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// While paused, `delta()` returns 0 and `elapsed()` stops increasing.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.last_frame = self.clock.now();
            self.paused = false;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Use a fixed delta per frame instead of clock readings. `None` restores
    /// real frame timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Negative scales clamp to 0.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::MAX_DELTA;

    #[test]
    fn test_time_new() {
        let time = Time::with_clock(ManualClock::new());
        assert_eq!(time.frame(), 0);
        assert!(!time.is_paused());
        assert_eq!(time.time_scale(), 1.0);
    }

    #[test]
    fn test_manual_update() {
        let mut time = Time::with_clock(ManualClock::new());
        time.clock_mut().advance(0.02);
        let (elapsed, delta) = time.update();
        assert!((delta - 0.02).abs() < 1e-6);
        assert!((elapsed - 0.02).abs() < 1e-6);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut time = Time::with_clock(ManualClock::new());
        time.clock_mut().advance(5.0);
        let (_, delta) = time.update();
        assert_eq!(delta, MAX_DELTA);
    }

    #[test]
    fn test_time_pause() {
        let mut time = Time::with_clock(ManualClock::new());
        time.clock_mut().advance(0.01);
        time.update();

        time.pause();
        let elapsed_before = time.elapsed();
        time.clock_mut().advance(0.05);
        time.update();
        assert_eq!(time.elapsed(), elapsed_before);
        assert_eq!(time.delta(), 0.0);

        // Time spent paused is not replayed on resume
        time.resume();
        time.clock_mut().advance(0.01);
        let (_, delta) = time.update();
        assert!((delta - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_time_scale() {
        let mut time = Time::with_clock(ManualClock::new());
        time.set_time_scale(2.0);
        time.clock_mut().advance(0.01);
        let (_, delta) = time.update();
        assert!((delta - 0.02).abs() < 1e-6);

        time.set_time_scale(-1.0);
        assert_eq!(time.time_scale(), 0.0);
    }

    #[test]
    fn test_fixed_delta() {
        let mut time = Time::with_clock(ManualClock::new());
        time.set_fixed_delta(Some(1.0 / 60.0));
        time.clock_mut().advance(0.08);
        time.update();
        assert!((time.delta() - 1.0 / 60.0).abs() < 0.0001);
    }
}
