//! snapfx turns a rendered subject into dust.
//!
//! The subject is captured as an RGBA raster, split into N sparse layers (each pixel goes to
//! exactly one layer, drawn with a row-dependent Gaussian weight), and every layer then drifts
//! away and fades on its own staggered slice of one shared timeline.
//!
//! - [`decompose`] performs the split.
//! - [`LayerAnimator`] is the start/advance/reset state machine over a [`LayerSet`].
//! - [`SnapEffect`] ties capture, background preparation, grace delay and animation together and
//!   exposes a pull-based [`FrameView`] for any renderer.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod decompose;
mod effect;
mod encode;
mod foundation;
mod render;

pub use crate::animation::animator::{
    AnimatorState, CompletionCallback, LayerAnimator, LayerVisual, MotionParams, layer_visual_at,
};
pub use crate::animation::clock::AnimationClock;
pub use crate::animation::curves::{displacement, opacity, random_offset};
pub use crate::animation::ease::Ease;
pub use crate::animation::interval::{LAYER_WINDOW, LayerInterval};
pub use crate::decompose::layers::{Layer, LayerSet, decompose};
pub use crate::decompose::pick::pick_bucket;
pub use crate::decompose::weights::{WEIGHT_SCALE, WEIGHT_SPREAD, bucket_weight, row_weights};
pub use crate::effect::capture::{Capture, PendingCapture, StillCapture};
pub use crate::effect::config::SnapConfig;
pub use crate::effect::controller::{
    FrameView, PreparedLayers, SnapEffect, SnapPhase, prepare_layers,
};
pub use crate::encode::png::{EncodedLayer, decode_png, encode_layers, encode_png};
pub use crate::foundation::core::{Canvas, PixelBuffer, Rgba8, TRANSPARENT, Vec2};
pub use crate::foundation::error::{SnapError, SnapResult};
pub use crate::render::composite::{
    CompositeOpts, FrameRGBA, PremulRgba8, over, premultiply, render_view, unpremultiply,
};
