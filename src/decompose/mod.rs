//! Pixel-to-layer decomposition.

pub(crate) mod layers;
pub(crate) mod pick;
pub(crate) mod weights;
