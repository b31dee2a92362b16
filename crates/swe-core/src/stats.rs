use ndarray::{Array1, ArrayBase, ArrayView1, Axis, Data, Ix2};

/// NaN-ignoring reducers. An all-NaN (or empty) input yields NaN.
fn finite_values<'a>(values: impl IntoIterator<Item = &'a f64>) -> Vec<f64> {
    values.into_iter().copied().filter(|v| !v.is_nan()).collect()
}

pub fn nan_mean<'a>(values: impl IntoIterator<Item = &'a f64>) -> f64 {
    let v = finite_values(values);
    if v.is_empty() {
        return f64::NAN;
    }
    v.iter().sum::<f64>() / v.len() as f64
}

/// Population standard deviation (ddof = 0).
pub fn nan_std<'a>(values: impl IntoIterator<Item = &'a f64>) -> f64 {
    let v = finite_values(values);
    if v.is_empty() {
        return f64::NAN;
    }
    let mean = v.iter().sum::<f64>() / v.len() as f64;
    let var = v.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / v.len() as f64;
    var.sqrt()
}

pub fn nan_median<'a>(values: impl IntoIterator<Item = &'a f64>) -> f64 {
    let mut v = finite_values(values);
    let n = v.len();
    if n == 0 {
        return f64::NAN;
    }
    let mid = n / 2;
    v.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
    let upper = v[mid];
    if n % 2 == 1 {
        upper
    } else {
        let lower = v[..mid]
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        (lower + upper) / 2.0
    }
}

/// Apply `reduce` to each row of a (frames, pixels) array.
pub fn per_frame<S>(values: &ArrayBase<S, Ix2>, reduce: fn(ArrayView1<f64>) -> f64) -> Array1<f64>
where
    S: Data<Elem = f64>,
{
    values.axis_iter(Axis(0)).map(reduce).collect()
}

pub fn frame_median(row: ArrayView1<f64>) -> f64 {
    nan_median(row.iter())
}

pub fn frame_mean(row: ArrayView1<f64>) -> f64 {
    nan_mean(row.iter())
}

pub fn frame_std(row: ArrayView1<f64>) -> f64 {
    nan_std(row.iter())
}

/// Mean of the `window` consecutive values with the lowest standard deviation.
///
/// Shorter inputs use the whole series. NaN entries are skipped inside each
/// window. Returns the mean and a mask of the selected positions, or `None`
/// for an empty series.
pub fn steadiest_window(series: ArrayView1<f64>, window: usize) -> Option<(f64, Vec<bool>)> {
    let n = series.len();
    if n == 0 || window == 0 {
        return None;
    }
    let window = window.min(n);

    let mut best: Option<(usize, f64)> = None;
    for start in 0..=(n - window) {
        let slice = series.slice(ndarray::s![start..start + window]);
        let sd = nan_std(slice.iter());
        let better = match best {
            None => true,
            Some((_, best_sd)) => sd < best_sd || (best_sd.is_nan() && !sd.is_nan()),
        };
        if better {
            best = Some((start, sd));
        }
    }

    let (start, _) = best?;
    let mut mask = vec![false; n];
    mask[start..start + window].iter_mut().for_each(|m| *m = true);
    let mean = nan_mean(series.slice(ndarray::s![start..start + window]).iter());
    Some((mean, mask))
}
