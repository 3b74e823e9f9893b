use crate::config::Number;
use wide::f32x8;

/// Euclidean (L2) distance between two vectors using SIMD operations.
/// Returns `None` when the lengths differ.
pub fn euclidean_distance_simd(a: &[Number], b: &[Number]) -> Option<Number> {
    if a.len() != b.len() {
        tracing::debug!("Vector length mismatch: {} vs {}", a.len(), b.len());
        return None;
    }

    let mut sum_sq = f32x8::splat(0.0);

    let chunks_a = a.chunks_exact(8);
    let chunks_b = b.chunks_exact(8);
    let rest_a = chunks_a.remainder();
    let rest_b = chunks_b.remainder();

    // SIMD loop
    for (ca, cb) in chunks_a.zip(chunks_b) {
        let va = f32x8::new([ca[0], ca[1], ca[2], ca[3], ca[4], ca[5], ca[6], ca[7]]);
        let vb = f32x8::new([cb[0], cb[1], cb[2], cb[3], cb[4], cb[5], cb[6], cb[7]]);
        let diff = va - vb;
        sum_sq += diff * diff;
    }

    let mut scalar_sum_sq = sum_sq.reduce_add();

    // Handle remaining elements
    for (&x, &y) in rest_a.iter().zip(rest_b) {
        let diff = x - y;
        scalar_sum_sq += diff * diff;
    }

    Some(scalar_sum_sq.sqrt())
}

/// Adds `vector` into `acc` element by element.
pub fn add_assign(acc: &mut [Number], vector: &[Number]) {
    for (a, &v) in acc.iter_mut().zip(vector) {
        *a += v;
    }
}

/// Divides every element by `count`. A zero count leaves the vector untouched.
pub fn divide_in_place(vector: &mut [Number], count: usize) {
    if count == 0 {
        return;
    }
    let count = count as Number;
    for x in vector.iter_mut() {
        *x /= count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_3_4_5() {
        let d = euclidean_distance_simd(&[0.0, 0.0, 0.0], &[3.0, 4.0, 0.0]).unwrap();
        assert!((d - 5.0).abs() < 1e-6, "expected 5.0, got {d}");
    }

    #[test]
    fn test_euclidean_spans_simd_and_tail() {
        let a: Vec<Number> = (0..11).map(|i| i as Number).collect();
        let b: Vec<Number> = (0..11).map(|i| i as Number + 1.0).collect();
        let d = euclidean_distance_simd(&a, &b).unwrap();
        assert!((d - (11.0 as Number).sqrt()).abs() < 1e-5, "got {d}");
    }

    #[test]
    fn test_euclidean_symmetric_and_zero_on_self() {
        let a: Vec<Number> = (0..20).map(|i| (i as Number * 0.37).sin()).collect();
        let b: Vec<Number> = (0..20).map(|i| (i as Number * 1.13).cos()).collect();
        assert_eq!(
            euclidean_distance_simd(&a, &b),
            euclidean_distance_simd(&b, &a)
        );
        assert_eq!(euclidean_distance_simd(&a, &a), Some(0.0));
    }

    #[test]
    fn test_length_mismatch() {
        assert!(euclidean_distance_simd(&[1.0, 2.0], &[1.0]).is_none());
    }

    #[test]
    fn test_mean_helpers() {
        let mut acc = vec![0.0; 3];
        add_assign(&mut acc, &[1.0, 2.0, 3.0]);
        add_assign(&mut acc, &[3.0, 2.0, 1.0]);
        divide_in_place(&mut acc, 2);
        assert_eq!(acc, vec![2.0, 2.0, 2.0]);

        divide_in_place(&mut acc, 0);
        assert_eq!(acc, vec![2.0, 2.0, 2.0]);
    }
}
