/// Centered moving mean with reflected edges, used to detrend the
/// compressor-frequency channel before the cycling check.
///
/// The window must be odd and is incremented when it is not. Edge
/// windows are filled by mirroring the series around its first and
/// last sample, so the output has the same length as the input and no
/// start-up transient.
pub fn moving_mean(values: &[f64], window: usize) -> Vec<f64> {
    let len = values.len();
    if len < 2 || window <= 1 {
        return values.to_vec();
    }

    let window = if window % 2 == 0 { window + 1 } else { window };
    let half = ((window - 1) / 2).min(len - 1);
    let n = 2 * half + 1;

    // Reflect padding: [a2 a1 | a0 a1 .. | a(len-2) a(len-3)].
    let mut padded = Vec::with_capacity(len + 2 * half);
    for i in (1..=half).rev() {
        padded.push(values[i]);
    }
    padded.extend_from_slice(values);
    for i in 0..half {
        padded.push(values[len - 2 - i]);
    }

    let mut cumsum = Vec::with_capacity(padded.len() + 1);
    cumsum.push(0.0);
    let mut acc = 0.0;
    for v in &padded {
        acc += v;
        cumsum.push(acc);
    }

    (0..len)
        .map(|i| (cumsum[i + n] - cumsum[i]) / n as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_series_is_unchanged() {
        let out = moving_mean(&[5.0; 10], 5);
        assert_eq!(out.len(), 10);
        for v in out {
            assert!((v - 5.0).abs() < 1e-12);
        }
    }

    #[test]
    fn mirrored_edges_match_hand_computation() {
        // padded: [2 | 1 2 3 | 2], window 3.
        let out = moving_mean(&[1.0, 2.0, 3.0], 3);
        assert!((out[0] - 5.0 / 3.0).abs() < 1e-12);
        assert!((out[1] - 2.0).abs() < 1e-12);
        assert!((out[2] - 7.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn even_window_is_incremented() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(moving_mean(&values, 2), moving_mean(&values, 3));
    }

    #[test]
    fn window_one_copies_the_input() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(moving_mean(&values, 1), values.to_vec());
    }

    #[test]
    fn smoothing_attenuates_alternating_noise() {
        let values: Vec<f64> = (0..40)
            .map(|i| 50.0 + if i % 2 == 0 { 5.0 } else { -5.0 })
            .collect();
        let smooth = moving_mean(&values, 9);
        for v in &smooth[5..35] {
            assert!((v - 50.0).abs() < 1.1, "residual ripple too large: {v}");
        }
    }
}
