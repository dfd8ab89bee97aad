use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;

use crate::decompose::pick::pick_bucket;
use crate::decompose::weights::row_weights;
use crate::foundation::core::PixelBuffer;
use crate::foundation::error::{SnapError, SnapResult};
use crate::foundation::math::row_seed;

/// One partial image of a decomposition.
#[derive(Clone, Debug)]
pub struct Layer {
    index: usize,
    dislocation: f64,
    image: PixelBuffer,
}

impl Layer {
    /// Position of this layer in its set; also selects its animation window.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Random displacement factor in `[-1, 1]`, fixed for the cycle.
    pub fn dislocation(&self) -> f64 {
        self.dislocation
    }

    /// Pixels assigned to this layer; every other position is transparent.
    pub fn image(&self) -> &PixelBuffer {
        &self.image
    }
}

/// Ordered layers produced by one snap cycle.
///
/// All layers share the source dimensions and their indices are dense, `0..len()`.
#[derive(Clone, Debug)]
pub struct LayerSet {
    width: u32,
    height: u32,
    layers: Vec<Layer>,
}

impl LayerSet {
    /// Assemble a set from ready-made images and displacement factors.
    ///
    /// Every image must match `width x height` and every factor must lie in `[-1, 1]`.
    pub fn from_parts(
        width: u32,
        height: u32,
        parts: impl IntoIterator<Item = (PixelBuffer, f64)>,
    ) -> SnapResult<Self> {
        let mut layers = Vec::new();
        for (index, (image, dislocation)) in parts.into_iter().enumerate() {
            if image.width() != width || image.height() != height {
                return Err(SnapError::config(format!(
                    "layer {index} is {}x{}, expected {width}x{height}",
                    image.width(),
                    image.height()
                )));
            }
            if !dislocation.is_finite() || dislocation.abs() > 1.0 {
                return Err(SnapError::config(format!(
                    "layer {index} dislocation {dislocation} is outside [-1, 1]"
                )));
            }
            layers.push(Layer {
                index,
                dislocation,
                image,
            });
        }
        if layers.is_empty() {
            return Err(SnapError::config("a layer set needs at least one layer"));
        }
        Ok(Self {
            width,
            height,
            layers,
        })
    }

    /// Width shared by every layer.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height shared by every layer.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Return `true` when the set holds no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layer at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// Iterate layers in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Layer> {
        self.layers.iter()
    }
}

impl<'a> IntoIterator for &'a LayerSet {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

/// Split `image` into `bucket_count` sparse layers.
///
/// Each pixel lands in exactly one layer, drawn per pixel with weights from
/// [`row_weights`](crate::decompose::weights::row_weights): rows near the top favor low
/// layer indices and rows near the bottom favor high ones. Rows are scanned in parallel; each
/// row draws from its own generator seeded by one value taken from `rng`, so the result depends
/// only on `rng`'s state, not on the thread count.
///
/// A zero-area image yields `bucket_count` empty layers.
#[tracing::instrument(skip(image, rng), fields(width = image.width(), height = image.height()))]
pub fn decompose<R: Rng + ?Sized>(
    image: &PixelBuffer,
    bucket_count: usize,
    rng: &mut R,
) -> SnapResult<LayerSet> {
    if bucket_count < 1 {
        return Err(SnapError::config("bucket count must be >= 1"));
    }

    let (width, height) = (image.width(), image.height());
    let mut buffers = (0..bucket_count)
        .map(|_| PixelBuffer::transparent(width, height))
        .collect::<SnapResult<Vec<_>>>()?;

    let cycle_seed = rng.next_u64();
    if !image.is_empty() {
        let assignment: Vec<Vec<usize>> = (0..height)
            .into_par_iter()
            .map(|y| assign_row(y, width, height, bucket_count, cycle_seed))
            .collect();

        for (y, row) in (0..height).zip(assignment.iter()) {
            let src = image.row(y);
            for (x, &bucket) in row.iter().enumerate() {
                let px = &src[x * 4..x * 4 + 4];
                buffers[bucket].row_mut(y)[x * 4..x * 4 + 4].copy_from_slice(px);
            }
        }
    }

    let layers = buffers
        .into_iter()
        .enumerate()
        .map(|(index, image)| Layer {
            index,
            dislocation: rng.gen_range(-1.0..=1.0),
            image,
        })
        .collect::<Vec<_>>();

    tracing::debug!(layers = layers.len(), "decomposed source image");
    Ok(LayerSet {
        width,
        height,
        layers,
    })
}

fn assign_row(y: u32, width: u32, height: u32, bucket_count: usize, cycle_seed: u64) -> Vec<usize> {
    let mut weights = Vec::with_capacity(bucket_count);
    let sum = row_weights(y, height, bucket_count, &mut weights);
    let mut rng = StdRng::seed_from_u64(row_seed(cycle_seed, y));
    (0..width)
        .map(|_| pick_bucket(&weights, sum, &mut rng))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/decompose/layers.rs"]
mod tests;
