use super::*;

fn filled(height: usize, width: usize, depth: usize) -> Tensor {
    let mut t = Tensor::new(height, width, depth);
    let mut v = 0.0f32;
    for y in 0..height {
        for x in 0..width {
            for z in 0..depth {
                *t.at_mut(y, x, z) = v;
                v += 1.0;
            }
        }
    }
    t
}

#[test]
fn pad_unpad_roundtrip() {
    let t = filled(5, 10, 3);
    for &(top, right, bottom, left) in &[
        (0, 0, 0, 0),
        (1, 0, 0, 0),
        (0, 1, 0, 0),
        (0, 0, 1, 0),
        (0, 0, 0, 1),
        (1, 1, 1, 1),
        (1, 2, 3, 4),
    ] {
        let padded = t.pad(top, right, bottom, left);
        assert_eq!(
            padded.shape(),
            (5 + top + bottom, 10 + left + right, 3)
        );
        let unpadded = padded.unpad(top, right, bottom, left).unwrap();
        assert_eq!(unpadded, t);
    }
}

#[test]
fn unpad_too_large_is_a_shape_error() {
    let t = Tensor::new(4, 4, 1);
    assert!(t.unpad(3, 0, 3, 0).is_err());
    assert!(t.unpad(0, 5, 0, 0).is_err());
}

#[test]
fn add_scalar_and_scale() {
    let t = filled(2, 2, 1);
    let added = t.add_scalar(100.0);
    assert_eq!(added.at(0, 0, 0), 100.0);
    assert_eq!(added.at(1, 1, 0), 103.0);

    let scaled = t.scale(2.0);
    assert_eq!(scaled.at(1, 1, 0), 6.0);
}

#[test]
fn add_mismatched_shapes_fails() {
    let a = Tensor::new(2, 2, 3);
    let b = Tensor::new(2, 2, 4);
    assert!(a.add(&b).is_err());
}

#[test]
fn add_matching_shapes_sums_elementwise() {
    let a = filled(2, 2, 2);
    let b = filled(2, 2, 2);
    let sum = a.add(&b).unwrap();
    for y in 0..2 {
        for x in 0..2 {
            for z in 0..2 {
                assert_eq!(sum.at(y, x, z), a.at(y, x, z) * 2.0);
            }
        }
    }
}

#[test]
fn pad_unpad_roundtrip_fuzz() {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    for _ in 0..50 {
        let height = rng.gen_range(1..8);
        let width = rng.gen_range(1..8);
        let depth = rng.gen_range(1..4);
        let t = filled(height, width, depth);
        let top = rng.gen_range(0..4);
        let right = rng.gen_range(0..4);
        let bottom = rng.gen_range(0..4);
        let left = rng.gen_range(0..4);
        let roundtripped = t.pad(top, right, bottom, left).unpad(top, right, bottom, left).unwrap();
        assert_eq!(roundtripped, t);
    }
}

#[test]
fn offset_convention_matches_spec() {
    // element (y, x, z) lives at offset z + depth*(x + width*y)
    let t = filled(3, 4, 2);
    let slice = t.as_slice().unwrap();
    for y in 0..3 {
        for x in 0..4 {
            for z in 0..2 {
                let offset = z + 2 * (x + 4 * y);
                assert_eq!(slice[offset], t.at(y, x, z));
            }
        }
    }
}
