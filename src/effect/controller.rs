use std::sync::mpsc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::animation::animator::{AnimatorState, LayerAnimator, LayerVisual, layer_visual_at};
use crate::decompose::layers::{LayerSet, decompose};
use crate::effect::capture::Capture;
use crate::effect::config::SnapConfig;
use crate::encode::png::{EncodedLayer, encode_layers};
use crate::foundation::core::PixelBuffer;
use crate::foundation::error::{SnapError, SnapResult};

/// Externally visible phase of a [`SnapEffect`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapPhase {
    /// Showing the original subject.
    Idle,
    /// Layers are being decomposed and encoded in the background.
    Preparing,
    /// Layers are ready and shown at rest during the grace delay.
    Settling,
    /// Layers are drifting and fading.
    Running,
    /// Every layer has faded out. Stays here until reset.
    Completed,
}

/// Output of the background worker for one snap cycle.
#[derive(Clone, Debug)]
pub struct PreparedLayers {
    /// Decomposed layers.
    pub layers: LayerSet,
    /// PNG encodings in index order; empty when encoding is disabled or the capture had no area.
    pub encoded: Vec<EncodedLayer>,
}

/// What a renderer should draw this frame.
#[derive(Debug)]
pub enum FrameView<'a> {
    /// Draw the subject itself.
    Original,
    /// Draw the layer stack instead of the subject, each layer at its visual state.
    Layers {
        /// Layers of the current cycle.
        layers: &'a LayerSet,
        /// PNG encodings of `layers`; empty when encoding is off.
        encoded: &'a [EncodedLayer],
        /// Visual state of every layer, in index order.
        visuals: Vec<LayerVisual>,
    },
}

struct PrepareMsg {
    generation: u64,
    result: SnapResult<PreparedLayers>,
}

enum Stage {
    Idle,
    Preparing,
    Settling {
        prepared: PreparedLayers,
        remaining: Duration,
    },
    Animating,
}

/// Disintegration effect for one subject.
///
/// A snap captures the subject, hands decomposition and encoding to a worker pool, and once the
/// layers come back (plus a short grace delay) runs them through a [`LayerAnimator`]. The host
/// calls [`tick`](Self::tick) once per frame and draws whatever [`frame`](Self::frame) returns.
///
/// Every snap bumps a generation counter; a worker result carrying an older generation (for
/// example one that finishes after a [`reset`](Self::reset)) is dropped.
pub struct SnapEffect {
    config: SnapConfig,
    capture: Box<dyn Capture>,
    rng: StdRng,
    pool: rayon::ThreadPool,
    animator: LayerAnimator,
    encoded: Vec<EncodedLayer>,
    stage: Stage,
    generation: u64,
    tx: mpsc::Sender<PrepareMsg>,
    rx: mpsc::Receiver<PrepareMsg>,
}

impl std::fmt::Debug for SnapEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapEffect")
            .field("config", &self.config)
            .field("phase", &self.phase())
            .field("generation", &self.generation)
            .field("animator", &self.animator)
            .finish_non_exhaustive()
    }
}

impl SnapEffect {
    /// Build an effect. Fails fast on an invalid `config`.
    ///
    /// `on_snapped` runs once per cycle, synchronously inside the [`tick`](Self::tick) that
    /// completes the animation.
    pub fn new(
        config: SnapConfig,
        capture: impl Capture + 'static,
        on_snapped: impl FnMut() + Send + 'static,
    ) -> SnapResult<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let pool = build_worker_pool(config.worker_threads)?;
        let animator = LayerAnimator::new(config.duration(), config.motion(), on_snapped);
        let (tx, rx) = mpsc::channel();

        Ok(Self {
            config,
            capture: Box::new(capture),
            rng,
            pool,
            animator,
            encoded: Vec::new(),
            stage: Stage::Idle,
            generation: 0,
            tx,
            rx,
        })
    }

    /// Settings this effect was built with.
    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    /// Current phase.
    pub fn phase(&self) -> SnapPhase {
        match self.stage {
            Stage::Idle => SnapPhase::Idle,
            Stage::Preparing => SnapPhase::Preparing,
            Stage::Settling { .. } => SnapPhase::Settling,
            Stage::Animating => match self.animator.state() {
                AnimatorState::Idle => SnapPhase::Idle,
                AnimatorState::Running => SnapPhase::Running,
                AnimatorState::Completed => SnapPhase::Completed,
            },
        }
    }

    /// Global animation progress in `[0, 1]`; 0 until the layers start moving.
    pub fn progress(&self) -> f64 {
        self.animator.progress()
    }

    /// Capture the subject and start preparing its layers in the background.
    ///
    /// Only valid while idle; otherwise returns [`SnapError::AlreadyInProgress`]. A failed
    /// capture leaves the effect idle and returns the capture error (normally
    /// [`SnapError::NotReady`]).
    pub fn snap(&mut self) -> SnapResult<()> {
        if !matches!(self.stage, Stage::Idle) {
            return Err(SnapError::AlreadyInProgress);
        }

        let image = self.capture.capture()?;

        self.generation += 1;
        let generation = self.generation;
        let bucket_count = self.config.number_of_buckets;
        let encode = self.config.encode_layers;
        let seed = self.rng.next_u64();
        let tx = self.tx.clone();

        tracing::info!(
            generation,
            width = image.width(),
            height = image.height(),
            bucket_count,
            "snap requested"
        );
        self.pool.spawn(move || {
            let result = prepare_layers(&image, bucket_count, seed, encode);
            // A closed channel means the effect is gone; nothing left to notify.
            let _ = tx.send(PrepareMsg { generation, result });
        });
        self.stage = Stage::Preparing;
        Ok(())
    }

    /// Tap handler: resets a completed effect, otherwise snaps.
    ///
    /// Returns `Ok(false)` without doing anything when tap-to-snap is disabled.
    pub fn on_tap(&mut self) -> SnapResult<bool> {
        if !self.config.snap_on_tap {
            return Ok(false);
        }
        if self.phase() == SnapPhase::Completed {
            self.reset();
        } else {
            self.snap()?;
        }
        Ok(true)
    }

    /// Return to idle from any phase. Pending worker results are discarded when they arrive.
    pub fn reset(&mut self) {
        let was = self.phase();
        self.generation += 1;
        self.stage = Stage::Idle;
        self.encoded.clear();
        self.animator.reset();
        tracing::info!(?was, generation = self.generation, "snap effect reset");
    }

    /// Advance by one frame of `dt`.
    ///
    /// Picks up finished worker results, counts down the grace delay, then steps the animator.
    /// A worker failure returns the effect to idle and is reported here.
    pub fn tick(&mut self, dt: Duration) -> SnapResult<SnapPhase> {
        while let Ok(msg) = self.rx.try_recv() {
            self.accept(msg)?;
        }

        match &mut self.stage {
            Stage::Idle | Stage::Preparing => {}
            Stage::Settling { remaining, .. } => {
                *remaining = remaining.saturating_sub(dt);
                if remaining.is_zero() {
                    self.begin_animation()?;
                }
            }
            Stage::Animating => {
                self.animator.advance(dt);
            }
        }
        Ok(self.phase())
    }

    /// Block until the current preparation finishes or `timeout` elapses.
    ///
    /// For hosts without a responsiveness constraint (batch rendering, tests). Returns the phase
    /// afterwards, which is still `Preparing` on timeout.
    pub fn wait_ready(&mut self, timeout: Duration) -> SnapResult<SnapPhase> {
        let deadline = Instant::now() + timeout;
        while matches!(self.stage, Stage::Preparing) {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                break;
            }
            match self.rx.recv_timeout(left) {
                Ok(msg) => self.accept(msg)?,
                Err(_) => break,
            }
        }
        Ok(self.phase())
    }

    /// Visual state for the current frame.
    pub fn frame(&self) -> FrameView<'_> {
        match &self.stage {
            Stage::Idle | Stage::Preparing => FrameView::Original,
            Stage::Settling { prepared, .. } => {
                let motion = self.animator.motion();
                let count = prepared.layers.len();
                let visuals = prepared
                    .layers
                    .iter()
                    .map(|l| layer_visual_at(motion, l.index(), count, l.dislocation(), 0.0))
                    .collect();
                FrameView::Layers {
                    layers: &prepared.layers,
                    encoded: &prepared.encoded,
                    visuals,
                }
            }
            Stage::Animating => match self.animator.layers() {
                Some(layers) => FrameView::Layers {
                    layers,
                    encoded: &self.encoded,
                    visuals: self.animator.visuals(),
                },
                None => FrameView::Original,
            },
        }
    }

    fn accept(&mut self, msg: PrepareMsg) -> SnapResult<()> {
        if msg.generation != self.generation || !matches!(self.stage, Stage::Preparing) {
            tracing::debug!(
                stale = msg.generation,
                current = self.generation,
                "discarding stale layer preparation"
            );
            return Ok(());
        }

        match msg.result {
            Ok(prepared) => {
                tracing::info!(
                    generation = msg.generation,
                    layers = prepared.layers.len(),
                    encoded = prepared.encoded.len(),
                    "layers ready"
                );
                let grace = self.config.grace_delay();
                self.stage = Stage::Settling {
                    prepared,
                    remaining: grace,
                };
                if grace.is_zero() {
                    self.begin_animation()?;
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    generation = msg.generation,
                    error = %err,
                    "layer preparation failed"
                );
                self.stage = Stage::Idle;
                Err(err)
            }
        }
    }

    fn begin_animation(&mut self) -> SnapResult<()> {
        let stage = std::mem::replace(&mut self.stage, Stage::Animating);
        let Stage::Settling { prepared, .. } = stage else {
            return Err(SnapError::worker("animation started without prepared layers"));
        };
        self.encoded = prepared.encoded;
        self.animator.start(prepared.layers)
    }
}

/// Decompose `image` and optionally encode the layers. Runs on the worker pool.
pub fn prepare_layers(
    image: &PixelBuffer,
    bucket_count: usize,
    seed: u64,
    encode: bool,
) -> SnapResult<PreparedLayers> {
    let mut rng = StdRng::seed_from_u64(seed);
    let layers = decompose(image, bucket_count, &mut rng)?;
    let encoded = if encode {
        encode_layers(&layers)?
    } else {
        Vec::new()
    };
    Ok(PreparedLayers { layers, encoded })
}

fn build_worker_pool(threads: Option<usize>) -> SnapResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(SnapError::config("worker_threads must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("snapfx-worker-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| SnapError::worker(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/effect/controller.rs"]
mod tests;
