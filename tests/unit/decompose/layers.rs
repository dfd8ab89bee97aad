use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

fn gradient(width: u32, height: u32) -> PixelBuffer {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[(x * 7) as u8, (y * 5) as u8, ((x + y) * 3) as u8, 255]);
        }
    }
    PixelBuffer::new(width, height, data).unwrap()
}

fn assert_partition(src: &PixelBuffer, set: &LayerSet) {
    for y in 0..src.height() {
        for x in 0..src.width() {
            let owners: Vec<&Layer> = set
                .iter()
                .filter(|l| l.image().pixel(x, y).unwrap()[3] != 0)
                .collect();
            assert_eq!(owners.len(), 1, "pixel ({x},{y}) owned by {}", owners.len());
            assert_eq!(owners[0].image().pixel(x, y), src.pixel(x, y));
        }
    }
}

#[test]
fn every_pixel_lands_in_exactly_one_layer() {
    let src = gradient(23, 17);
    for n in [1, 2, 5, 16] {
        let mut rng = StdRng::seed_from_u64(n as u64);
        let set = decompose(&src, n, &mut rng).unwrap();
        assert_eq!(set.len(), n);
        assert_partition(&src, &set);
    }
}

#[test]
fn overlaying_layers_reproduces_source() {
    let src = gradient(12, 9);
    let mut rng = StdRng::seed_from_u64(5);
    let set = decompose(&src, 4, &mut rng).unwrap();

    let mut sum = vec![0u16; src.as_bytes().len()];
    for layer in &set {
        for (acc, &b) in sum.iter_mut().zip(layer.image().as_bytes()) {
            *acc += u16::from(b);
        }
    }
    let sum: Vec<u8> = sum.into_iter().map(|v| v as u8).collect();
    assert_eq!(sum.as_slice(), src.as_bytes());
}

#[test]
fn layers_share_dimensions_and_dense_indices() {
    let src = gradient(8, 8);
    let mut rng = StdRng::seed_from_u64(2);
    let set = decompose(&src, 6, &mut rng).unwrap();
    assert_eq!((set.width(), set.height()), (8, 8));
    for (i, layer) in set.iter().enumerate() {
        assert_eq!(layer.index(), i);
        assert_eq!(layer.image().width(), 8);
        assert_eq!(layer.image().height(), 8);
        assert!(layer.dislocation().abs() <= 1.0);
    }
}

#[test]
fn decomposition_is_reproducible_for_a_seed() {
    let src = gradient(16, 16);
    let a = decompose(&src, 8, &mut StdRng::seed_from_u64(77)).unwrap();
    let b = decompose(&src, 8, &mut StdRng::seed_from_u64(77)).unwrap();
    for (la, lb) in a.iter().zip(b.iter()) {
        assert_eq!(la.image(), lb.image());
        assert_eq!(la.dislocation(), lb.dislocation());
    }
}

#[test]
fn top_rows_favor_low_layers_and_bottom_rows_favor_high_layers() {
    let src = PixelBuffer::solid(64, 64, [200, 100, 50, 255]).unwrap();
    let mut rng = StdRng::seed_from_u64(19);
    let set = decompose(&src, 4, &mut rng).unwrap();

    let count_rows = |layer: &Layer, rows: std::ops::Range<u32>| -> usize {
        rows.map(|y| {
            layer
                .image()
                .row(y)
                .chunks_exact(4)
                .filter(|px| px[3] != 0)
                .count()
        })
        .sum()
    };

    let first = set.get(0).unwrap();
    let last = set.get(3).unwrap();
    assert!(count_rows(first, 0..8) > count_rows(last, 0..8));
    assert!(count_rows(last, 48..64) > count_rows(first, 48..64));
}

#[test]
fn source_is_not_mutated() {
    let src = gradient(5, 5);
    let before = src.clone();
    let _ = decompose(&src, 3, &mut StdRng::seed_from_u64(0)).unwrap();
    assert_eq!(src, before);
}

#[test]
fn zero_area_image_yields_empty_layers() {
    let src = PixelBuffer::transparent(0, 10).unwrap();
    let set = decompose(&src, 4, &mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(set.len(), 4);
    assert!(set.iter().all(|l| l.image().is_empty()));
}

#[test]
fn zero_buckets_is_a_config_error() {
    let src = gradient(2, 2);
    let err = decompose(&src, 0, &mut StdRng::seed_from_u64(1)).unwrap_err();
    assert!(matches!(err, SnapError::Config(_)));
}

#[test]
fn from_parts_validates_shapes_and_factors() {
    let img = PixelBuffer::solid(2, 2, [1, 1, 1, 255]).unwrap();
    assert!(LayerSet::from_parts(2, 2, [(img.clone(), 0.5)]).is_ok());
    assert!(LayerSet::from_parts(3, 2, [(img.clone(), 0.5)]).is_err());
    assert!(LayerSet::from_parts(2, 2, [(img.clone(), 1.5)]).is_err());
    assert!(LayerSet::from_parts(2, 2, [(img, f64::NAN)]).is_err());
    assert!(LayerSet::from_parts(2, 2, std::iter::empty()).is_err());
}
