use std::time::Duration;

use crate::animation::clock::AnimationClock;
use crate::animation::curves::{displacement, opacity, random_offset};
use crate::animation::ease::Ease;
use crate::animation::interval::LayerInterval;
use crate::decompose::layers::LayerSet;
use crate::foundation::core::Vec2;
use crate::foundation::error::{SnapError, SnapResult};

/// Callback fired once per cycle when the clock reaches the end of the timeline.
pub type CompletionCallback = Box<dyn FnMut() + Send>;

/// Lifecycle of a [`LayerAnimator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimatorState {
    /// No layers, clock at 0.
    Idle,
    /// Clock advancing from 0 toward 1.
    Running,
    /// Clock at 1. Stays here until reset.
    Completed,
}

/// Motion shared by every layer of an effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionParams {
    /// Translation every layer ends at, before dislocation.
    pub offset: Vec2,
    /// Maximum random dislocation, scaled per layer by its factor in `[-1, 1]`.
    pub random_dislocation: Vec2,
    /// Curve applied to each layer's local progress.
    pub ease: Ease,
}

/// Where and how opaque to draw one layer at the current instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerVisual {
    /// Layer index within its set.
    pub index: usize,
    /// Offset from the layer's rest position, in pixels.
    pub translation: Vec2,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

/// Visual state of layer `index` out of `count` at global progress `t`.
///
/// Opacity and translation share one eased local timeline.
pub fn layer_visual_at(
    motion: &MotionParams,
    index: usize,
    count: usize,
    dislocation: f64,
    t: f64,
) -> LayerVisual {
    let window = LayerInterval::for_layer(index, count);
    let p = motion.ease.apply(window.local_progress(t));
    let target = motion.offset + random_offset(motion.random_dislocation, dislocation);
    LayerVisual {
        index,
        translation: displacement(target, p),
        opacity: opacity(p),
    }
}

/// Drives N layers off one shared clock.
///
/// `Idle -> Running` on [`start`](Self::start), `Running -> Completed` when the clock reaches 1
/// (firing the completion callback exactly once), and back to `Idle` on [`reset`](Self::reset).
/// Stepping is synchronous; call [`advance`](Self::advance) once per frame tick.
pub struct LayerAnimator {
    motion: MotionParams,
    clock: AnimationClock,
    state: AnimatorState,
    layers: Option<LayerSet>,
    on_complete: CompletionCallback,
}

impl std::fmt::Debug for LayerAnimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerAnimator")
            .field("motion", &self.motion)
            .field("clock", &self.clock)
            .field("state", &self.state)
            .field("layers", &self.layers.as_ref().map(LayerSet::len))
            .finish_non_exhaustive()
    }
}

impl LayerAnimator {
    /// Create an idle animator. `on_complete` runs once per cycle when the clock reaches 1.
    pub fn new(
        duration: Duration,
        motion: MotionParams,
        on_complete: impl FnMut() + Send + 'static,
    ) -> Self {
        Self {
            motion,
            clock: AnimationClock::new(duration),
            state: AnimatorState::Idle,
            layers: None,
            on_complete: Box::new(on_complete),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AnimatorState {
        self.state
    }

    /// Motion shared by every layer.
    pub fn motion(&self) -> &MotionParams {
        &self.motion
    }

    /// Global progress `t` in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.clock.progress()
    }

    /// Layers of the current cycle, `None` while idle.
    pub fn layers(&self) -> Option<&LayerSet> {
        self.layers.as_ref()
    }

    /// Begin a cycle with `layers`.
    ///
    /// Only valid from `Idle`. A running or completed cycle is left untouched and
    /// [`SnapError::AlreadyInProgress`] is returned.
    pub fn start(&mut self, layers: LayerSet) -> SnapResult<()> {
        if self.state != AnimatorState::Idle {
            return Err(SnapError::AlreadyInProgress);
        }
        tracing::debug!(layers = layers.len(), "layer animation started");
        self.clock.reset();
        self.layers = Some(layers);
        self.state = AnimatorState::Running;
        Ok(())
    }

    /// Feed `dt` of elapsed time. Only moves the clock while running.
    pub fn advance(&mut self, dt: Duration) -> AnimatorState {
        if self.state != AnimatorState::Running {
            return self.state;
        }
        self.clock.advance(dt);
        if self.clock.is_finished() {
            self.state = AnimatorState::Completed;
            tracing::debug!("layer animation completed");
            (self.on_complete)();
        }
        self.state
    }

    /// Drop the current cycle and return to `Idle` without notifying completion.
    ///
    /// Returns `false` when already idle.
    pub fn reset(&mut self) -> bool {
        if self.state == AnimatorState::Idle {
            return false;
        }
        self.layers = None;
        self.clock.reset();
        self.state = AnimatorState::Idle;
        true
    }

    /// Visual state of layer `index`, `None` while idle or out of range.
    pub fn layer_visual(&self, index: usize) -> Option<LayerVisual> {
        let layers = self.layers.as_ref()?;
        let layer = layers.get(index)?;
        Some(layer_visual_at(
            &self.motion,
            index,
            layers.len(),
            layer.dislocation(),
            self.clock.progress(),
        ))
    }

    /// Visual state of every layer in index order; empty while idle.
    pub fn visuals(&self) -> Vec<LayerVisual> {
        let Some(layers) = self.layers.as_ref() else {
            return Vec::new();
        };
        let t = self.clock.progress();
        layers
            .iter()
            .map(|l| layer_visual_at(&self.motion, l.index(), layers.len(), l.dislocation(), t))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/animator.rs"]
mod tests;
