/// Peak weight of a bucket sitting exactly on a row's preferred position.
pub const WEIGHT_SCALE: f64 = 1000.0;

/// Spread of the row-to-bucket Gaussian. Smaller values give more banded layers.
pub const WEIGHT_SPREAD: f64 = 0.14;

/// Discretized Gaussian weight of `bucket` for pixel row `row`.
///
/// `w = round(1000 * exp(-(bucket/bucket_count - row/height)^2 / 0.14))`. A zero `height` or
/// `bucket_count` has no rows or buckets to weigh and returns 0.
pub fn bucket_weight(row: u32, height: u32, bucket: usize, bucket_count: usize) -> u32 {
    if height == 0 || bucket_count == 0 {
        return 0;
    }
    let center = f64::from(row) / f64::from(height);
    let value = bucket as f64 / bucket_count as f64;
    let d = value - center;
    (WEIGHT_SCALE * (-(d * d) / WEIGHT_SPREAD).exp()).round() as u32
}

/// Fill `out` with the weights of every bucket for `row` and return their sum.
pub fn row_weights(row: u32, height: u32, bucket_count: usize, out: &mut Vec<u32>) -> u64 {
    out.clear();
    for b in 0..bucket_count {
        out.push(bucket_weight(row, height, b, bucket_count));
    }
    out.iter().map(|&w| u64::from(w)).sum()
}

#[cfg(test)]
#[path = "../../tests/unit/decompose/weights.rs"]
mod tests;
