use crate::effect::controller::FrameView;
use crate::foundation::core::{Canvas, PixelBuffer, Rgba8};
use crate::foundation::error::{SnapError, SnapResult};
use crate::foundation::math::mul_div255_u8;

/// Premultiplied-alpha RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// A composited frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Convert to a straight-alpha buffer, unpremultiplying when needed.
    pub fn into_pixel_buffer(mut self) -> SnapResult<PixelBuffer> {
        if self.premultiplied {
            for px in self.data.chunks_exact_mut(4) {
                let straight = unpremultiply([px[0], px[1], px[2], px[3]]);
                px.copy_from_slice(&straight);
            }
        }
        PixelBuffer::new(self.width, self.height, self.data)
    }
}

/// Where the subject sits on the output canvas and what sits behind it.
#[derive(Clone, Copy, Debug)]
pub struct CompositeOpts {
    /// Output canvas size.
    pub canvas: Canvas,
    /// Top-left of the subject (and of every untranslated layer) on the canvas.
    pub origin: (i64, i64),
    /// Background color, straight alpha. `None` leaves the canvas transparent.
    pub clear_rgba: Option<Rgba8>,
}

/// Software reference renderer for a [`FrameView`].
///
/// Draws `original` while the view is [`FrameView::Original`], else every layer in index order
/// at `origin + round(translation)` with its opacity. Output is premultiplied.
pub fn render_view(
    view: &FrameView<'_>,
    original: &PixelBuffer,
    opts: &CompositeOpts,
) -> SnapResult<FrameRGBA> {
    let len = (opts.canvas.width as usize)
        .checked_mul(opts.canvas.height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| SnapError::input("canvas size overflow"))?;

    let mut frame = FrameRGBA {
        width: opts.canvas.width,
        height: opts.canvas.height,
        data: vec![0; len],
        premultiplied: true,
    };
    if let Some(clear) = opts.clear_rgba {
        let clear = premultiply(clear);
        for px in frame.data.chunks_exact_mut(4) {
            px.copy_from_slice(&clear);
        }
    }

    let (ox, oy) = opts.origin;
    match view {
        FrameView::Original => draw_image(&mut frame, original, ox, oy, 1.0),
        FrameView::Layers {
            layers, visuals, ..
        } => {
            for v in visuals {
                let Some(layer) = layers.get(v.index) else {
                    continue;
                };
                let dx = ox + v.translation.x.round() as i64;
                let dy = oy + v.translation.y.round() as i64;
                draw_image(&mut frame, layer.image(), dx, dy, v.opacity as f32);
            }
        }
    }
    Ok(frame)
}

fn draw_image(dst: &mut FrameRGBA, img: &PixelBuffer, dx: i64, dy: i64, opacity: f32) {
    if opacity <= 0.0 || img.is_empty() {
        return;
    }
    let (dw, dh) = (i64::from(dst.width), i64::from(dst.height));
    for y in 0..img.height() {
        let ty = dy + i64::from(y);
        if ty < 0 || ty >= dh {
            continue;
        }
        let src_row = img.row(y);
        for x in 0..img.width() {
            let tx = dx + i64::from(x);
            if tx < 0 || tx >= dw {
                continue;
            }
            let s = &src_row[x as usize * 4..x as usize * 4 + 4];
            if s[3] == 0 {
                continue;
            }
            let i = ((ty * dw + tx) * 4) as usize;
            let d = &mut dst.data[i..i + 4];
            let out = over(
                [d[0], d[1], d[2], d[3]],
                premultiply([s[0], s[1], s[2], s[3]]),
                opacity,
            );
            d.copy_from_slice(&out);
        }
    }
}

/// Source-over of premultiplied `src` scaled by `opacity` onto premultiplied `dst`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Convert a straight-alpha pixel to premultiplied alpha.
pub fn premultiply(px: Rgba8) -> PremulRgba8 {
    let a = u16::from(px[3]);
    [
        mul_div255_u8(u16::from(px[0]), a),
        mul_div255_u8(u16::from(px[1]), a),
        mul_div255_u8(u16::from(px[2]), a),
        px[3],
    ]
}

/// Convert a premultiplied pixel back to straight alpha. Fully transparent maps to zero.
pub fn unpremultiply(px: PremulRgba8) -> Rgba8 {
    let a = u32::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let un = |c: u8| ((u32::from(c) * 255 + a / 2) / a).min(255) as u8;
    [un(px[0]), un(px[1]), un(px[2]), px[3]]
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
