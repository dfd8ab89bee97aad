use std::time::Duration;

use crate::animation::animator::MotionParams;
use crate::animation::ease::Ease;
use crate::foundation::core::Vec2;
use crate::foundation::error::{SnapError, SnapResult};

/// Immutable settings of one snap effect.
///
/// Every field has a default, so a JSON document only needs the fields it overrides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Translation every layer drifts toward, in pixels.
    pub offset: Vec2,
    /// Total animation duration in milliseconds. Must be > 0.
    pub duration_ms: u64,
    /// Maximum extra random dislocation per layer, in pixels.
    pub random_dislocation_offset: Vec2,
    /// Number of layers the subject is split into. Must be >= 1.
    pub number_of_buckets: usize,
    /// Let a tap toggle the effect (snap, or reset once completed).
    pub snap_on_tap: bool,
    /// Time the layer stack is shown at rest before it starts moving, in milliseconds.
    pub grace_delay_ms: u64,
    /// Curve shaping each layer's local progress.
    pub ease: Ease,
    /// Also encode every layer to PNG in the background worker.
    pub encode_layers: bool,
    /// Seed for the effect's random source. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Size of the background worker pool. `None` uses rayon's default.
    pub worker_threads: Option<usize>,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            offset: Vec2::new(64.0, -32.0),
            duration_ms: 5000,
            random_dislocation_offset: Vec2::new(64.0, 32.0),
            number_of_buckets: 16,
            snap_on_tap: false,
            grace_delay_ms: 100,
            ease: Ease::Out,
            encode_layers: true,
            seed: None,
            worker_threads: None,
        }
    }
}

impl SnapConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json(json: &str) -> SnapResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| SnapError::config(format!("invalid config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings no effect can run with.
    pub fn validate(&self) -> SnapResult<()> {
        if self.number_of_buckets < 1 {
            return Err(SnapError::config("number_of_buckets must be >= 1"));
        }
        if self.duration_ms == 0 {
            return Err(SnapError::config("duration_ms must be > 0"));
        }
        if self.worker_threads == Some(0) {
            return Err(SnapError::config("worker_threads must be >= 1 when set"));
        }
        let vectors = [
            ("offset", self.offset),
            ("random_dislocation_offset", self.random_dislocation_offset),
        ];
        for (name, v) in vectors {
            if !v.is_finite() {
                return Err(SnapError::config(format!("{name} must be finite")));
            }
        }
        Ok(())
    }

    /// Animation duration.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Rest time before the layers start moving.
    pub fn grace_delay(&self) -> Duration {
        Duration::from_millis(self.grace_delay_ms)
    }

    /// Motion parameters for the animator.
    pub fn motion(&self) -> MotionParams {
        MotionParams {
            offset: self.offset,
            random_dislocation: self.random_dislocation_offset,
            ease: self.ease,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effect/config.rs"]
mod tests;
