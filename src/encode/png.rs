use std::io::Cursor;
use std::sync::Arc;

use anyhow::Context;
use rayon::prelude::*;

use crate::decompose::layers::LayerSet;
use crate::foundation::core::PixelBuffer;
use crate::foundation::error::{SnapError, SnapResult};

/// PNG bytes of one layer, ready for a host that wants a compressed image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedLayer {
    /// Index of the encoded layer.
    pub index: usize,
    /// PNG file bytes.
    pub png: Arc<[u8]>,
}

/// Encode a straight-alpha RGBA8 buffer as PNG.
///
/// Zero-area buffers have no PNG representation and are rejected.
pub fn encode_png(buf: &PixelBuffer) -> SnapResult<Vec<u8>> {
    if buf.is_empty() {
        return Err(SnapError::encode("cannot encode a zero-area image as PNG"));
    }
    let img: image::RgbaImage = buf.clone().into();
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(out)
}

/// Decode any image format the `image` crate understands into straight-alpha RGBA8.
pub fn decode_png(bytes: &[u8]) -> SnapResult<PixelBuffer> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(PixelBuffer::from(dyn_img.to_rgba8()))
}

/// Encode every layer in parallel. Zero-area sets encode to nothing.
pub fn encode_layers(layers: &LayerSet) -> SnapResult<Vec<EncodedLayer>> {
    if layers.width() == 0 || layers.height() == 0 {
        return Ok(Vec::new());
    }
    layers
        .iter()
        .collect::<Vec<_>>()
        .par_iter()
        .map(|layer| -> SnapResult<EncodedLayer> {
            Ok(EncodedLayer {
                index: layer.index(),
                png: encode_png(layer.image())?.into(),
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
