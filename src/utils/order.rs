use std::cmp::Ordering;

use num::Float;

/// Descending order for scores, NaN last
#[inline]
pub fn desc_nan_last<N: Float>(a: N, b: N) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desc_nan_last() {
        let mut v = vec![0.5, f64::NAN, 0.9, -1.0];
        v.sort_by(|a, b| desc_nan_last(*a, *b));
        assert_eq!(&v[..3], &[0.9, 0.5, -1.0]);
        assert!(v[3].is_nan());
    }
}
