//! Interpolation over tabulated design charts.
//!
//! Chart data lives in `const` arrays next to the code that reads it; these
//! functions only borrow the tables.

/// Piecewise-linear interpolation clamped to the end values.
///
/// `xs` must be strictly increasing and the same length as `ys`.
///
/// # Examples
/// ```
/// use gearx::interpolation::linear;
///
/// let xs = [0.0, 1.0, 2.0];
/// let ys = [0.0, 10.0, 40.0];
/// assert_eq!(linear(&xs, &ys, 1.5), 25.0);
/// assert_eq!(linear(&xs, &ys, 5.0), 40.0);
/// ```
#[must_use]
pub fn linear(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    let last = xs.len() - 1;
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[last] {
        return ys[last];
    }
    let k = segment(xs, x);
    let t = (x - xs[k]) / (xs[k + 1] - xs[k]);
    ys[k] + t * (ys[k + 1] - ys[k])
}

/// Returns `true` when `x` lies outside the tabulated range.
#[must_use]
pub fn out_of_range(xs: &[f64], x: f64) -> bool {
    x < xs[0] || x > xs[xs.len() - 1]
}

/// Index of the segment `[xs[k], xs[k + 1]]` containing `x`, clamped to the ends.
fn segment(xs: &[f64], x: f64) -> usize {
    let upper = xs.partition_point(|&value| value <= x);
    upper.clamp(1, xs.len() - 1) - 1
}

/// Modified Akima (makima) interpolation with linear extrapolation beyond the ends.
///
/// Falls back to linear interpolation for two-point tables.
#[must_use]
pub fn makima(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    if n == 1 {
        return ys[0];
    }
    if x < xs[0] {
        let slope = (ys[1] - ys[0]) / (xs[1] - xs[0]);
        return ys[0] + slope * (x - xs[0]);
    }
    if x > xs[n - 1] {
        let slope = (ys[n - 1] - ys[n - 2]) / (xs[n - 1] - xs[n - 2]);
        return ys[n - 1] + slope * (x - xs[n - 1]);
    }
    if n == 2 {
        return linear(xs, ys, x);
    }

    let slopes = extended_slopes(xs, ys);
    let k = segment(xs, x);
    let h = xs[k + 1] - xs[k];
    let t0 = node_derivative(&slopes, k);
    let t1 = node_derivative(&slopes, k + 1);
    let m = slopes[k + 2];
    let c2 = (3.0 * m - 2.0 * t0 - t1) / h;
    let c3 = (t0 + t1 - 2.0 * m) / (h * h);
    let dx = x - xs[k];
    ys[k] + dx * (t0 + dx * (c2 + dx * c3))
}

/// Segment slopes padded with two extrapolated slopes on each side.
///
/// `slopes[i + 2]` is the slope of segment `i`.
fn extended_slopes(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let inner: Vec<f64> = xs
        .windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| (y[1] - y[0]) / (x[1] - x[0]))
        .collect();
    let count = inner.len();
    let mut slopes = Vec::with_capacity(count + 4);
    let (first, second) = (inner[0], inner[1.min(count - 1)]);
    slopes.push(3.0 * first - 2.0 * second);
    slopes.push(2.0 * first - second);
    slopes.extend_from_slice(&inner);
    let (last, before) = (inner[count - 1], inner[count.saturating_sub(2)]);
    slopes.push(2.0 * last - before);
    slopes.push(3.0 * last - 2.0 * before);
    slopes
}

/// Makima derivative at node `i` from the padded slope list.
fn node_derivative(slopes: &[f64], i: usize) -> f64 {
    let (m_2, m_1, m0, m1) = (slopes[i], slopes[i + 1], slopes[i + 2], slopes[i + 3]);
    let w1 = (m1 - m0).abs() + (m1 + m0).abs() / 2.0;
    let w2 = (m_1 - m_2).abs() + (m_1 + m_2).abs() / 2.0;
    if w1 + w2 == 0.0 {
        (m_1 + m0) / 2.0
    } else {
        (w1 * m_1 + w2 * m0) / (w1 + w2)
    }
}

/// Two dimensional makima interpolation over a rectangular chart.
///
/// `grid[j][i]` is the chart value at `(xs[i], ys[j])`. Each row is interpolated
/// along `x` first, then the column of intermediate values along `y`.
#[must_use]
pub fn makima_2d<R: AsRef<[f64]>>(xs: &[f64], ys: &[f64], grid: &[R], x: f64, y: f64) -> f64 {
    debug_assert_eq!(grid.len(), ys.len());
    let column: Vec<f64> = grid.iter().map(|row| makima(xs, row.as_ref(), x)).collect();
    makima(ys, &column, y)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn linear_clamps_at_ends() {
        let xs = [1.0, 2.0, 4.0];
        let ys = [10.0, 20.0, 0.0];
        assert_eq!(linear(&xs, &ys, 0.0), 10.0);
        assert_eq!(linear(&xs, &ys, 3.0), 10.0);
        assert_eq!(linear(&xs, &ys, 4.0), 0.0);
        assert!(out_of_range(&xs, 4.5));
        assert!(!out_of_range(&xs, 2.5));
    }

    #[test]
    fn makima_reproduces_nodes_and_lines() {
        let xs = [0.0, 1.0, 2.0, 3.0, 5.0];
        let ys = [1.0, 3.0, 2.0, 4.0, 0.0];
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert_relative_eq!(makima(&xs, &ys, *x), *y, epsilon = 1.0e-12);
        }

        let line: Vec<f64> = xs.iter().map(|x| 2.0 * x - 1.0).collect();
        assert_relative_eq!(makima(&xs, &line, 2.7), 4.4, epsilon = 1.0e-12);
    }

    #[test]
    fn makima_extrapolates_linearly() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [0.0, 2.0, 3.0];
        assert_relative_eq!(makima(&xs, &ys, -1.0), -2.0, epsilon = 1.0e-12);
        assert_relative_eq!(makima(&xs, &ys, 4.0), 5.0, epsilon = 1.0e-12);
    }

    #[test]
    fn makima_does_not_overshoot_flat_steps() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        for step in 0..=50 {
            let x = f64::from(step) * 0.1;
            let value = makima(&xs, &ys, x);
            assert!((-1.0e-12..=1.0 + 1.0e-12).contains(&value), "{value} at {x}");
        }
    }

    #[test]
    fn bilinear_surface_is_exact() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [0.0, 10.0, 20.0];
        let grid: Vec<Vec<f64>> = ys
            .iter()
            .map(|y| xs.iter().map(|x| x + y).collect())
            .collect();
        assert_relative_eq!(makima_2d(&xs, &ys, &grid, 1.5, 15.0), 16.5, epsilon = 1.0e-12);
    }
}
