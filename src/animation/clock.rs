use std::time::Duration;

/// Shared timeline driving every layer of one effect.
///
/// Progress moves from 0 to 1 over `duration` as elapsed time is fed in. It only moves forward;
/// [`AnimationClock::reset`] is the only way back to 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationClock {
    duration: Duration,
    elapsed: Duration,
}

impl AnimationClock {
    /// Create a clock at progress 0. A zero `duration` completes on the first non-zero advance.
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
        }
    }

    /// Full length of the timeline.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Time fed in so far, capped at the duration.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Normalized progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return if self.elapsed.is_zero() { 0.0 } else { 1.0 };
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Move forward by `dt`, saturating at the full duration. Returns the new progress.
    pub fn advance(&mut self, dt: Duration) -> f64 {
        let next = self.elapsed.saturating_add(dt);
        self.elapsed = if self.duration.is_zero() {
            next.min(Duration::from_nanos(1))
        } else {
            next.min(self.duration)
        };
        self.progress()
    }

    /// Return `true` once progress has reached 1.
    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Rewind to progress 0.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/clock.rs"]
mod tests;
