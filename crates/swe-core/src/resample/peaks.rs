use ndarray::ArrayView1;

/// Local maxima of `x`, counting flat tops on both their rising and falling edge.
///
/// A sample is a peak when it is reached by a rise and followed by a
/// non-rise, or reached by a non-fall and followed by a fall. The first and
/// last samples are never peaks. NaN samples, and their neighbours, are
/// excluded. Returned indices are unique and sorted.
pub fn detect_peaks(x: ArrayView1<f64>) -> Vec<usize> {
    let n = x.len();
    if n < 3 {
        return Vec::new();
    }

    // dx[i] = x[i + 1] - x[i]; padded with 0 on either side.
    let dx: Vec<f64> = x
        .windows(2)
        .into_iter()
        .map(|w| w[1] - w[0])
        .collect();
    let before = |i: usize| if i == 0 { 0.0 } else { dx[i - 1] };
    let after = |i: usize| if i == n - 1 { 0.0 } else { dx[i] };

    let is_nan = |i: usize| x[i].is_nan();

    (1..n - 1)
        .filter(|&i| {
            let (b, a) = (before(i), after(i));
            let rising = a <= 0.0 && b > 0.0;
            let falling = a < 0.0 && b >= 0.0;
            rising || falling
        })
        .filter(|&i| !(is_nan(i) || is_nan(i - 1) || is_nan(i + 1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_single_peak() {
        let x = array![0.0, 1.0, 3.0, 1.0, 0.0];
        assert_eq!(detect_peaks(x.view()), vec![2]);
    }

    #[test]
    fn test_plateau_both_edges() {
        let x = array![0.0, 2.0, 2.0, 2.0, 0.0];
        assert_eq!(detect_peaks(x.view()), vec![1, 3]);
    }

    #[test]
    fn test_edges_are_not_peaks() {
        let x = array![5.0, 1.0, 0.0, 1.0, 5.0];
        assert!(detect_peaks(x.view()).is_empty());
    }
}
