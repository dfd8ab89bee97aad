use rand::Rng;

/// Sample a bucket index proportionally to `weights`.
///
/// Draws `rnd` uniformly from `[0, sum_of_weights)` and walks the buckets in index order,
/// subtracting each weight until `rnd` falls inside one. A zero sum (or no buckets) picks
/// bucket 0. If the walk runs off the end because `sum_of_weights` overstates the real total,
/// the last bucket wins.
pub fn pick_bucket<R: Rng + ?Sized>(weights: &[u32], sum_of_weights: u64, rng: &mut R) -> usize {
    if sum_of_weights == 0 || weights.is_empty() {
        return 0;
    }

    let mut rnd = rng.gen_range(0..sum_of_weights);
    for (idx, &w) in weights.iter().enumerate() {
        let w = u64::from(w);
        if rnd < w {
            return idx;
        }
        rnd -= w;
    }
    weights.len() - 1
}

#[cfg(test)]
#[path = "../../tests/unit/decompose/pick.rs"]
mod tests;
