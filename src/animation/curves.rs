use std::f64::consts::FRAC_PI_2;

use crate::foundation::core::Vec2;

/// Opacity of a layer at eased local progress `p`: `cos(p * pi/2)`.
///
/// 1 at `p = 0`, 0 at `p = 1`, fading slowly at first and quickly near the end.
pub fn opacity(p: f64) -> f64 {
    let p = p.clamp(0.0, 1.0);
    if p >= 1.0 {
        return 0.0;
    }
    (p * FRAC_PI_2).cos().clamp(0.0, 1.0)
}

/// Per-layer random dislocation: the configured range scaled by the layer's factor on both axes.
pub fn random_offset(range: Vec2, factor: f64) -> Vec2 {
    Vec2::new(range.x * factor, range.y * factor)
}

/// Translation of a layer at eased local progress `p`: `lerp(0, target, p)`.
pub fn displacement(target: Vec2, p: f64) -> Vec2 {
    target * p.clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/curves.rs"]
mod tests;
