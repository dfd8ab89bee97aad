use super::*;

#[test]
fn weight_peaks_at_1000_on_matching_fraction() {
    // Row 0 of any image prefers bucket 0.
    assert_eq!(bucket_weight(0, 100, 0, 16), 1000);
    // Row 50 of 100 sits exactly on bucket 8 of 16.
    assert_eq!(bucket_weight(50, 100, 8, 16), 1000);
}

#[test]
fn weight_matches_formula_off_center() {
    // d = 0.25 => exp(-0.0625 / 0.14) * 1000 = 639.86...
    assert_eq!(bucket_weight(0, 4, 1, 4), 640);
    // d = 0.75 => exp(-0.5625 / 0.14) * 1000 = 17.99...
    assert_eq!(bucket_weight(0, 4, 3, 4), 18);
}

#[test]
fn weight_is_maximal_at_closest_bucket_and_non_increasing_with_distance() {
    let height = 37;
    let n = 16;
    for row in 0..height {
        let center = f64::from(row) / f64::from(height);
        let mut by_distance: Vec<(f64, u32)> = (0..n)
            .map(|b| {
                let d = (b as f64 / n as f64 - center).abs();
                (d, bucket_weight(row, height, b, n))
            })
            .collect();
        by_distance.sort_by(|a, b| a.0.total_cmp(&b.0));

        let max = by_distance.iter().map(|&(_, w)| w).max().unwrap();
        assert_eq!(by_distance[0].1, max, "row {row}: closest bucket must be max");
        for pair in by_distance.windows(2) {
            assert!(
                pair[0].1 >= pair[1].1,
                "row {row}: weight increased with distance"
            );
            if pair[1].0 - pair[0].0 > 0.05 && pair[0].1 > 50 {
                assert!(pair[0].1 > pair[1].1, "row {row}: expected strict decrease");
            }
        }
    }
}

#[test]
fn row_weights_sum_matches_entries() {
    let mut out = Vec::new();
    let sum = row_weights(3, 10, 5, &mut out);
    assert_eq!(out.len(), 5);
    assert_eq!(sum, out.iter().map(|&w| u64::from(w)).sum::<u64>());
    assert!(sum > 0);
}

#[test]
fn degenerate_inputs_weigh_zero() {
    assert_eq!(bucket_weight(0, 0, 0, 4), 0);
    let mut out = vec![7];
    assert_eq!(row_weights(0, 10, 0, &mut out), 0);
    assert!(out.is_empty());
}
