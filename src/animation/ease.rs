/// Easing functions used to map normalized animation progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// CSS `ease-out`, the cubic bezier `(0, 0, 0.58, 1)`.
    #[default]
    Out,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Quadratic ease-in/out.
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in/out.
    InOutCubic,
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Out => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }
}

const BEZIER_EPSILON: f64 = 1e-7;

// Control points (0,0) and (1,1) are implied.
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, t: f64) -> f64 {
    fn eval(a: f64, b: f64, m: f64) -> f64 {
        3.0 * a * (1.0 - m) * (1.0 - m) * m + 3.0 * b * (1.0 - m) * m * m + m * m * m
    }

    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    // x(m) is monotonic for x1, x2 in [0, 1]; bisect for the parameter.
    let mut lo = 0.0;
    let mut hi = 1.0;
    let mut mid = 0.5;
    for _ in 0..64 {
        mid = (lo + hi) / 2.0;
        let x = eval(x1, x2, mid);
        if (t - x).abs() < BEZIER_EPSILON {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    eval(y1, y2, mid)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
