//! Drag motion smoothing.
//!
//! Hand tracking callbacks arrive at an irregular rate and carry measurement
//! noise. Feeding raw deltas straight into rotation makes the model stutter
//! on slow moves and lag on fast ones. The smoother runs a three-layer
//! cascade on every drag delta:
//!
//! 1. **Time normalization:** scale the delta to a nominal 60 Hz frame so the
//!    same hand speed gives the same rotation regardless of callback jitter.
//! 2. **Speed estimate:** an EMA of delta magnitude, so the blend factor does
//!    not react to single-frame spikes.
//! 3. **Adaptive blend:** fast motion uses a low factor (responsive), slow
//!    motion a high one (stable), with a smoothstep in between. The factor in
//!    use eases toward that target instead of snapping to it.
//!
//! The emitted delta is an EMA of normalized deltas using that factor.

use serde::{Deserialize, Serialize};

/// Tuning for [`MotionSmoother`]. Distances are pixels, times milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmootherConfig {
    /// Nominal frame time deltas are normalized to.
    pub standard_frame_ms: f64,

    /// Shortest frame interval considered plausible for normalization.
    pub min_frame_ms: f64,

    /// Longest frame interval considered plausible; beyond it the frame is
    /// treated as a tracking gap.
    pub max_frame_ms: f64,

    /// Bounds on the normalization ratio.
    pub min_time_ratio: f64,
    pub max_time_ratio: f64,

    /// Per-axis cap on a single delta.
    pub max_delta_px: f64,

    /// EMA weight of the newest speed measurement.
    pub speed_blend: f64,

    /// At or below this smoothed speed the maximum blend factor applies.
    pub slow_speed_px: f64,

    /// At or above this smoothed speed the minimum blend factor applies.
    pub fast_speed_px: f64,

    /// Blend factor for fast motion.
    pub min_blend: f64,

    /// Blend factor for slow motion.
    pub max_blend: f64,

    /// Blend factor at the start of every drag.
    pub base_blend: f64,

    /// How quickly the blend factor in use approaches its target.
    pub blend_transition: f64,
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self {
            standard_frame_ms: 16.67,
            min_frame_ms: 8.0,
            max_frame_ms: 100.0,
            min_time_ratio: 0.5,
            max_time_ratio: 2.0,
            max_delta_px: 100.0,
            speed_blend: 0.3,
            slow_speed_px: 15.0,
            fast_speed_px: 40.0,
            min_blend: 0.4,
            max_blend: 0.8,
            base_blend: 0.6,
            blend_transition: 0.2,
        }
    }
}

/// Accumulated state of one drag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SmootherState {
    /// Previous emitted delta.
    pub last_delta_x: f64,
    pub last_delta_y: f64,
    /// EMA of delta magnitude.
    pub smoothed_speed: f64,
    /// Blend factor currently in use.
    pub blend: f64,
}

/// Stateful smoother keyed to a single drag. Call [`MotionSmoother::reset`]
/// whenever a new drag begins.
#[derive(Debug, Clone)]
pub struct MotionSmoother {
    config: SmootherConfig,
    state: SmootherState,
}

impl MotionSmoother {
    pub fn new(config: SmootherConfig) -> Self {
        Self {
            state: Self::neutral_state(&config),
            config,
        }
    }

    pub fn config(&self) -> &SmootherConfig {
        &self.config
    }

    pub fn state(&self) -> SmootherState {
        self.state
    }

    /// Forget everything learned from the previous drag.
    pub fn reset(&mut self) {
        self.state = Self::neutral_state(&self.config);
    }

    /// Whether the smoother holds no momentum from earlier deltas.
    pub fn is_neutral(&self) -> bool {
        self.state == Self::neutral_state(&self.config)
    }

    /// Smooth one raw pixel delta observed `dt_ms` after the previous one.
    ///
    /// `dt_ms <= 0` means the interval is unknown (first move of a drag); the
    /// delta is then only clamped.
    pub fn smooth(&mut self, raw_dx: f64, raw_dy: f64, dt_ms: f64) -> (f64, f64) {
        let (dx, dy) = self.normalize(raw_dx, raw_dy, dt_ms);

        let speed = dx.hypot(dy);
        let cfg = &self.config;
        let state = &mut self.state;

        state.smoothed_speed =
            state.smoothed_speed * (1.0 - cfg.speed_blend) + speed * cfg.speed_blend;

        let target_blend = blend_for_speed(cfg, state.smoothed_speed);
        state.blend =
            state.blend * (1.0 - cfg.blend_transition) + target_blend * cfg.blend_transition;

        let out_x = state.last_delta_x * (1.0 - state.blend) + dx * state.blend;
        let out_y = state.last_delta_y * (1.0 - state.blend) + dy * state.blend;
        state.last_delta_x = out_x;
        state.last_delta_y = out_y;

        tracing::trace!(
            raw_dx,
            raw_dy,
            dt_ms,
            dx,
            dy,
            speed = state.smoothed_speed,
            blend = state.blend,
            out_x,
            out_y,
            "Smoothed drag delta"
        );

        (out_x, out_y)
    }

    /// Layer 1: frame-rate normalization plus per-axis clamping.
    pub fn normalize(&self, raw_dx: f64, raw_dy: f64, dt_ms: f64) -> (f64, f64) {
        let cfg = &self.config;
        let (mut dx, mut dy) = (raw_dx, raw_dy);

        if dt_ms >= cfg.min_frame_ms && dt_ms <= cfg.max_frame_ms {
            let ratio =
                (cfg.standard_frame_ms / dt_ms).clamp(cfg.min_time_ratio, cfg.max_time_ratio);
            dx *= ratio;
            dy *= ratio;
        }
        // Outside the plausible range (a tracking gap or an unknown interval)
        // the raw delta passes through and only the clamp below applies.

        let limit = cfg.max_delta_px;
        (dx.clamp(-limit, limit), dy.clamp(-limit, limit))
    }

    fn neutral_state(config: &SmootherConfig) -> SmootherState {
        SmootherState {
            last_delta_x: 0.0,
            last_delta_y: 0.0,
            smoothed_speed: 0.0,
            blend: config.base_blend,
        }
    }
}

impl Default for MotionSmoother {
    fn default() -> Self {
        Self::new(SmootherConfig::default())
    }
}

/// Map a smoothed speed (px per nominal frame) to a target blend factor.
///
/// Monotonically non-increasing: slow motion gets `max_blend`, fast motion
/// `min_blend`, and speeds between the thresholds follow `3t² - 2t³`.
pub fn blend_for_speed(config: &SmootherConfig, speed: f64) -> f64 {
    if speed >= config.fast_speed_px {
        return config.min_blend;
    }
    if speed <= config.slow_speed_px {
        return config.max_blend;
    }
    let t = (speed - config.slow_speed_px) / (config.fast_speed_px - config.slow_speed_px);
    let eased = t * t * (3.0 - 2.0 * t);
    config.min_blend + (config.max_blend - config.min_blend) * (1.0 - eased)
}
