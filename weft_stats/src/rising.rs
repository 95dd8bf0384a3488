//! The log rising factorial, log Γ(x+n)/Γ(x).
//!
//! This is the log-marginal-likelihood kernel of a Dirichlet-multinomial
//! observation block: a count of `n` against a pseudocount base of `x`.
use special::Gamma as SGamma;

// Largest block size for which the direct product is both exact enough and
// faster than `ln_gamma`
const DIRECT_PRODUCT_MAX_N: usize = 13;
// The direct product overflows f64 above this base
const DIRECT_PRODUCT_MAX_X: f64 = 1.0e22;
// `ln_gamma(x + n) - ln_gamma(x)` loses the `n` entirely above this base
const LN_GAMMA_MAX_X: f64 = 1.0e15;

/// `log(Γ(x+n)/Γ(x)) = log(x · (x+1) · … · (x+n−1))` for `x > 0`.
///
/// Three regimes, tried in order: a direct product for short blocks, an
/// `ln_gamma` difference for moderate bases, and a sum of logs otherwise.
/// The sum is unconditionally stable but the slowest of the three. The branch
/// order is part of the function's observable behavior and must not be
/// rearranged.
pub fn ln_rising_factorial(x: f64, n: usize) -> f64 {
    if n <= DIRECT_PRODUCT_MAX_N {
        if x < DIRECT_PRODUCT_MAX_X {
            let total = (0..n).fold(1.0, |prod, i| prod * (x + i as f64));
            return total.ln();
        }
    } else if x < LN_GAMMA_MAX_X {
        return (x + n as f64).ln_gamma().0 - x.ln_gamma().0;
    }

    (0..n).map(|i| (x + i as f64).ln()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_length_block_is_zero() {
        assert_eq!(ln_rising_factorial(0.1, 0), 0.0);
        assert_eq!(ln_rising_factorial(1.0, 0), 0.0);
        assert_eq!(ln_rising_factorial(1.0e16, 0), 0.0);
    }

    #[test]
    fn single_step_is_ln_x() {
        assert_relative_eq!(
            ln_rising_factorial(0.1, 1),
            0.1_f64.ln(),
            max_relative = 1E-12
        );
    }

    #[test]
    fn unit_base_is_ln_factorial() {
        // 1 * 2 * 3 * 4 * 5 = 120
        assert_relative_eq!(
            ln_rising_factorial(1.0, 5),
            120.0_f64.ln(),
            max_relative = 1E-12
        );
    }

    #[test]
    fn huge_base_falls_back_to_summed_logs() {
        // x = 1e16 with n = 14 lands in the log-sum branch, where each factor
        // is within rounding of x itself
        assert_relative_eq!(
            ln_rising_factorial(1.0e16, 14),
            14.0 * 1.0e16_f64.ln(),
            max_relative = 1E-9
        );
    }

    #[test]
    fn recurrence_holds_within_each_branch() {
        // logRF(x, n+1) = logRF(x, n) + log(x + n)
        for &x in &[0.1, 1.0, 7.5, 300.0] {
            for n in 0..12 {
                assert_relative_eq!(
                    ln_rising_factorial(x, n + 1),
                    ln_rising_factorial(x, n) + (x + n as f64).ln(),
                    max_relative = 1E-12
                );
            }
        }
    }

    #[test]
    fn recurrence_holds_across_the_product_to_ln_gamma_boundary() {
        // n = 13 -> 14 crosses from the direct product into ln_gamma
        for &x in &[0.5, 2.0, 1000.0] {
            assert_relative_eq!(
                ln_rising_factorial(x, 14),
                ln_rising_factorial(x, 13) + (x + 13.0).ln(),
                max_relative = 1E-12
            );
        }
    }

    #[test]
    fn recurrence_holds_across_the_ln_gamma_to_sum_boundary() {
        // x = 1e16 exceeds the ln_gamma cutoff; both n = 13 (product) and
        // n = 14 (summed logs) must still satisfy the recurrence
        let x = 1.0e16;
        assert_relative_eq!(
            ln_rising_factorial(x, 14),
            ln_rising_factorial(x, 13) + (x + 13.0).ln(),
            max_relative = 1E-12
        );
    }

    #[test]
    fn agrees_with_ln_gamma_for_long_blocks() {
        let x = 12.3;
        let n = 40;
        let direct: f64 = (0..n).map(|i| (x + i as f64).ln()).sum();
        assert_relative_eq!(
            ln_rising_factorial(x, n),
            direct,
            max_relative = 1E-12
        );
    }
}
