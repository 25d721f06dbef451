//! Deterministic swipe planning.
//!
//! A swipe is one DOWN at the start point, zero or more MOVE events along the
//! straight line to the end point, and one UP at the end point.  The number of
//! MOVE events depends only on the duration:
//!
//! ```text
//! duration <= 0   -> steps = 0                      DOWN, UP
//! duration  > 0   -> steps = max(1, duration / 16)  DOWN, MOVE x (steps - 1), UP
//! step_duration   =  duration / steps
//! MOVE i (1 <= i < steps) at downTime + step_duration * i
//! ```
//!
//! 16 ms is roughly one display refresh, the smallest spacing worth emitting.
//! The planner only computes positions and time offsets; pacing and injection
//! are the caller's job.

/// Minimum spacing between two interpolated steps, in milliseconds.
pub const MIN_STEP_INTERVAL_MS: u32 = 16;

/// One interpolated MOVE event of a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipeStep {
    /// Step index, starting at 1.
    pub index: u32,
    pub x: i32,
    pub y: i32,
    /// Event time relative to the gesture's down time, in milliseconds.
    pub offset_ms: u64,
}

/// Precomputed shape and timing of a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipePlan {
    pub start: (i32, i32),
    pub end: (i32, i32),
    steps: u32,
    step_duration_ms: u32,
}

impl SwipePlan {
    /// Plans a swipe from `start` to `end` lasting `duration_ms`.
    ///
    /// Negative durations are treated as zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use touchbridge_core::SwipePlan;
    ///
    /// let plan = SwipePlan::new((0, 0), (100, 0), 160);
    /// assert_eq!(plan.steps(), 10);
    /// assert_eq!(plan.moves().count(), 9);
    /// ```
    pub fn new(start: (i32, i32), end: (i32, i32), duration_ms: i32) -> Self {
        let duration = duration_ms.max(0) as u32;
        let steps = if duration > 0 {
            (duration / MIN_STEP_INTERVAL_MS).max(1)
        } else {
            0
        };
        let step_duration_ms = if steps > 0 { duration / steps } else { 0 };

        Self { start, end, steps, step_duration_ms }
    }

    /// Number of interpolation steps (the final step is the UP event).
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Time between two consecutive steps, in milliseconds.
    pub fn step_duration_ms(&self) -> u32 {
        self.step_duration_ms
    }

    /// Number of MOVE events between DOWN and UP.
    pub fn move_count(&self) -> u32 {
        self.steps.saturating_sub(1)
    }

    /// The interpolated MOVE events, in order.
    pub fn moves(&self) -> impl Iterator<Item = SwipeStep> + '_ {
        (1..self.steps).map(move |index| self.step(index))
    }

    /// Builds step `index` (1-based).
    pub fn step(&self, index: u32) -> SwipeStep {
        let progress = index as f32 / self.steps.max(1) as f32;
        SwipeStep {
            index,
            x: interpolate(self.start.0, self.end.0, progress),
            y: interpolate(self.start.1, self.end.1, progress),
            offset_ms: u64::from(self.step_duration_ms) * u64::from(index),
        }
    }
}

/// `from + round((to - from) * progress)`, rounding halves up.
fn interpolate(from: i32, to: i32, progress: f32) -> i32 {
    let delta = (i64::from(to) - i64::from(from)) as f32 * progress;
    from.saturating_add((delta + 0.5).floor() as i32)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
