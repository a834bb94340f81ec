//! Window statistics shared by the band indicators.

use crate::Price;

/// The shared value of a window whose prices are all equal.
#[inline]
fn flat_level(window: &[Price]) -> Option<Price> {
    let (&first, rest) = window.split_first()?;
    rest.iter().all(|&price| price == first).then_some(first)
}

/// Arithmetic mean of a non-empty window.
///
/// A flat window returns its value unchanged; `sum / len` would round
/// levels such as 0.7.
#[inline]
pub(crate) fn mean(window: &[Price]) -> Price {
    if let Some(level) = flat_level(window) {
        return level;
    }

    #[allow(clippy::cast_precision_loss)]
    let len = window.len() as f64;

    window.iter().sum::<Price>() / len
}

/// Population standard deviation of `window` around `mean`.
///
/// Divides by the window length, not `len - 1`. Exactly zero for a flat
/// window.
#[inline]
pub(crate) fn population_std_dev(window: &[Price], mean: Price) -> f64 {
    if flat_level(window).is_some() {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let len = window.len() as f64;

    let sum_of_squares: f64 = window
        .iter()
        .map(|price| {
            let diff = price - mean;
            diff * diff
        })
        .sum();

    (sum_of_squares / len).sqrt()
}

/// Ordinary least squares fit of `window` against `x = 0..len`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Fits a line through a non-empty window.
    ///
    /// A flat window (including a single point) fits the horizontal line
    /// through its value.
    pub(crate) fn of(window: &[Price]) -> Self {
        if let Some(level) = flat_level(window) {
            return Self {
                slope: 0.0,
                intercept: level,
            };
        }

        #[allow(clippy::cast_precision_loss)]
        let n = window.len() as f64;

        let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
        for (i, &y) in window.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let x = i as f64;
            sum_x += x;
            sum_y += y;
            sum_xy += x * y;
            sum_x2 += x * x;
        }

        let denominator = n.mul_add(sum_x2, -(sum_x * sum_x));
        if denominator == 0.0 {
            return Self {
                slope: 0.0,
                intercept: sum_y / n,
            };
        }

        let slope = n.mul_add(sum_xy, -(sum_x * sum_y)) / denominator;
        let intercept = slope.mul_add(-sum_x, sum_y) / n;

        Self { slope, intercept }
    }

    #[inline]
    pub(crate) fn at(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }

    /// Population standard deviation of the residuals `y - fit(x)`.
    pub(crate) fn residual_std_dev(&self, window: &[Price]) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let n = window.len() as f64;

        let sum_of_squares: f64 = window
            .iter()
            .enumerate()
            .map(|(i, &y)| {
                #[allow(clippy::cast_precision_loss)]
                let residual = y - self.at(i as f64);
                residual * residual
            })
            .sum();

        (sum_of_squares / n).sqrt()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_window() {
        assert_eq!(mean(&[10.0, 11.0, 12.0, 13.0, 14.0]), 12.0);
    }

    #[test]
    fn std_dev_is_population() {
        // mean 5, squared diffs sum to 32 over 8 values → σ = 2
        let window = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(population_std_dev(&window, mean(&window)), 2.0);
    }

    #[test]
    fn std_dev_of_constant_window_is_zero() {
        let window = [100.0; 5];
        assert_eq!(population_std_dev(&window, mean(&window)), 0.0);
    }

    #[test]
    fn flat_non_integer_levels_are_exact() {
        for level in [0.7, 0.6, 1.1, 3.3, 4.35] {
            for len in [14, 20] {
                let window = vec![level; len];
                assert_eq!(mean(&window), level, "mean of {len} × {level}");
                assert_eq!(population_std_dev(&window, mean(&window)), 0.0);

                let fit = LinearFit::of(&window);
                assert_eq!(fit.slope, 0.0);
                assert_eq!(fit.residual_std_dev(&window), 0.0);
            }
        }
    }

    mod linear_fit {
        use super::*;

        #[test]
        fn exact_line_has_no_residual() {
            // y = 3 + 2x
            let fit = LinearFit::of(&[3.0, 5.0, 7.0, 9.0]);
            assert!((fit.slope - 2.0).abs() < 1e-12);
            assert!((fit.intercept - 3.0).abs() < 1e-12);
            assert!(fit.residual_std_dev(&[3.0, 5.0, 7.0, 9.0]) < 1e-12);
        }

        #[test]
        fn single_point_is_flat_through_mean() {
            let fit = LinearFit::of(&[42.0]);
            assert_eq!(fit.slope, 0.0);
            assert_eq!(fit.intercept, 42.0);
            assert_eq!(fit.residual_std_dev(&[42.0]), 0.0);
        }

        #[test]
        fn zigzag_residuals() {
            // y = 0, 2, 0, 2: fit slope 0.4, intercept 0.4
            let window = [0.0, 2.0, 0.0, 2.0];
            let fit = LinearFit::of(&window);
            assert!((fit.slope - 0.4).abs() < 1e-12);
            assert!((fit.intercept - 0.4).abs() < 1e-12);
            // residuals: -0.4, 1.2, -1.2, 0.4 → mean square 0.8
            assert!((fit.residual_std_dev(&window) - 0.8_f64.sqrt()).abs() < 1e-12);
        }
    }
}
