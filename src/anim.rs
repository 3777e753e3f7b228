use std::f64::consts::TAU;

/// Rest pose when motion is disabled: the cube turned 45 degrees about Y.
pub const REDUCED_MOTION_ANGLE: f32 = std::f32::consts::FRAC_PI_4;

/// Tracks wall-clock time between host ticks and decides which ticks render.
///
/// Rotation advances on every tick by `2π / rotation_period_ms × elapsed`.
/// With a frame cap, elapsed time accumulates into a budget; a tick renders
/// once the budget reaches one frame interval, and the leftover carries into
/// the next frame so long runs do not drift.
#[derive(Debug, Clone)]
pub struct AnimationClock {
    last_ms: Option<f64>,
    budget_ms: f64,
    frame_interval_ms: Option<f64>,
    angular_rate: f64,
    angle: f64,
    frozen: bool,
}

impl AnimationClock {
    pub fn new(rotation_period_ms: f64, target_fps: Option<u32>) -> Self {
        Self {
            last_ms: None,
            budget_ms: 0.0,
            frame_interval_ms: target_fps
                .filter(|fps| *fps > 0)
                .map(|fps| 1000.0 / fps as f64),
            angular_rate: TAU / rotation_period_ms,
            angle: 0.0,
            frozen: false,
        }
    }

    /// A clock whose angle stays at [`REDUCED_MOTION_ANGLE`].
    pub fn frozen(target_fps: Option<u32>) -> Self {
        let mut clock = Self::new(1.0, target_fps);
        clock.angular_rate = 0.0;
        clock.angle = REDUCED_MOTION_ANGLE as f64;
        clock.frozen = true;
        clock
    }

    /// Feeds one host tick. Returns `true` when this tick should render.
    pub fn advance(&mut self, now_ms: f64) -> bool {
        let Some(last) = self.last_ms.replace(now_ms) else {
            // first tick: start from rest and show something immediately
            return true;
        };
        let elapsed = (now_ms - last).max(0.0);

        if !self.frozen {
            self.angle = (self.angle + self.angular_rate * elapsed).rem_euclid(TAU);
        }

        let Some(interval) = self.frame_interval_ms else {
            return true;
        };
        self.budget_ms += elapsed;
        if self.budget_ms < interval {
            return false;
        }
        self.budget_ms -= interval;
        if self.budget_ms >= interval {
            // stalled for several intervals; no catch-up burst
            self.budget_ms %= interval;
        }
        true
    }

    /// Current rotation about the cube's Y axis, in `[0, 2π)`.
    pub fn angle(&self) -> f32 {
        self.angle as f32
    }

    pub fn frame_interval_ms(&self) -> Option<f64> {
        self.frame_interval_ms
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}
