/// Fraction of the whole timeline taken by a single layer's animation.
pub const LAYER_WINDOW: f64 = 0.6;

/// Half-open window `[start, end)` of global progress owned by one layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerInterval {
    /// Global progress at which the layer starts moving.
    pub start: f64,
    /// Global progress at which the layer is fully faded.
    pub end: f64,
}

impl LayerInterval {
    /// Window of layer `index` out of `count`.
    ///
    /// `start = (index / count) * (1 - 0.6)`, `end = start + 0.6`. Layers are staggered so the
    /// first starts at 0 and the last ends at `1 - 0.4 / count`. A zero `count` is treated
    /// as one layer.
    pub fn for_layer(index: usize, count: usize) -> Self {
        let count = count.max(1) as f64;
        let start = (index as f64 / count) * (1.0 - LAYER_WINDOW);
        Self {
            start,
            end: start + LAYER_WINDOW,
        }
    }

    /// Local progress of global progress `t` inside this window, clamped to `[0, 1]`.
    pub fn local_progress(self, t: f64) -> f64 {
        let span = self.end - self.start;
        if span <= 0.0 {
            return if t >= self.end { 1.0 } else { 0.0 };
        }
        ((t - self.start) / span).clamp(0.0, 1.0)
    }

    /// Return `true` when `t` falls inside `[start, end)`.
    pub fn contains(self, t: f64) -> bool {
        self.start <= t && t < self.end
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interval.rs"]
mod tests;
