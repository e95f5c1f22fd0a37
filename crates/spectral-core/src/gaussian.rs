//! Gaussian quadrature nodes and weights for the Legendre polynomial `P_nlat`.
//!
//! Roots are found by Newton-Raphson from the standard asymptotic seed,
//! evaluating `P_nlat` and its derivative via the three-term recurrence.
//! Ported in spirit from the classical Gauss-Legendre construction used
//! throughout spectral-transform libraries; the seed and convergence
//! criterion follow the textbook recipe (e.g. Numerical Recipes' `gauleg`).

use crate::error::{Result, SphereError};
use std::f64::consts::PI;

/// Maximum Newton-Raphson iterations per root before giving up.
const MAX_ITERS: usize = 100;

/// Evaluate `P_n(mu)` and `P_{n-1}(mu)` via the three-term recurrence
/// `P_{k+1}(mu) = ((2k+1) mu P_k(mu) - k P_{k-1}(mu)) / (k+1)`.
fn legendre_pair(n: usize, mu: f64) -> (f64, f64) {
    let mut p_prev = 1.0_f64; // P_0
    let mut p_curr = mu; // P_1
    if n == 0 {
        return (p_prev, 0.0);
    }
    for k in 1..n {
        let kf = k as f64;
        let p_next = ((2.0 * kf + 1.0) * mu * p_curr - kf * p_prev) / (kf + 1.0);
        p_prev = p_curr;
        p_curr = p_next;
    }
    (p_curr, p_prev)
}

/// Derivative `P'_n(mu)` from `P_n(mu)` and `P_{n-1}(mu)`.
fn legendre_deriv(n: usize, mu: f64, p_n: f64, p_nm1: f64) -> f64 {
    let nf = n as f64;
    nf * (p_nm1 - mu * p_n) / (1.0 - mu * mu)
}

/// Compute the `nlat` Gaussian latitudes (sines, descending: north pole
/// first) and quadrature weights of `P_nlat`.
///
/// Returns `(mu, weights)`, both of length `nlat`. `weights` sums to `2`
/// within `O(nlat * f64::EPSILON)`.
pub fn gauss_legendre_nodes(nlat: usize) -> Result<(Vec<f64>, Vec<f64>)> {
    let n = nlat;
    let nf = n as f64;
    let eps = f64::EPSILON;
    let tol = 10.0 * eps;

    let mut mu = vec![0.0_f64; n];
    let mut w = vec![0.0_f64; n];

    for j in 0..n {
        // Asymptotic seed, 1-based j in the classical formula.
        let jf = (j + 1) as f64;
        let mut x = ((PI * (jf - 0.25)) / (nf + 0.5)).cos();

        let mut converged = false;
        for _ in 0..MAX_ITERS {
            let (p_n, p_nm1) = legendre_pair(n, x);
            let dp = legendre_deriv(n, x, p_n, p_nm1);
            let dx = p_n / dp;
            x -= dx;
            if dx.abs() < tol {
                converged = true;
                break;
            }
        }
        if !converged {
            return Err(SphereError::ConvergenceFailure { nlat, index: j });
        }

        let (p_n, p_nm1) = legendre_pair(n, x);
        let dp = legendre_deriv(n, x, p_n, p_nm1);
        mu[j] = x;
        w[j] = 2.0 / ((1.0 - x * x) * dp * dp);
    }

    let sum: f64 = w.iter().sum();
    if (sum - 2.0).abs() > 1e-8 {
        log::warn!(
            "Gaussian weights for nlat={} sum to {} (expected 2)",
            nlat,
            sum
        );
    }

    Ok((mu, w))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_two() {
        for &nlat in &[4usize, 5, 8, 16, 33, 64] {
            let (_, w) = gauss_legendre_nodes(nlat).unwrap();
            let sum: f64 = w.iter().sum();
            assert!((sum - 2.0).abs() < 1e-12, "nlat={} sum={}", nlat, sum);
        }
    }

    #[test]
    fn nodes_are_descending_and_symmetric() {
        let (mu, _) = gauss_legendre_nodes(8).unwrap();
        for pair in mu.windows(2) {
            assert!(pair[0] > pair[1]);
        }
        // Symmetric about the equator for even nlat.
        let n = mu.len();
        for i in 0..n / 2 {
            assert!((mu[i] + mu[n - 1 - i]).abs() < 1e-12);
        }
    }

    #[test]
    fn moment_test() {
        // Sum w_j * mu_j^k = 2/(k+1) for k up to 2*nlat-1.
        let nlat = 10;
        let (mu, w) = gauss_legendre_nodes(nlat).unwrap();
        for k in 0..2 * nlat {
            let lhs: f64 = mu
                .iter()
                .zip(w.iter())
                .map(|(&m, &wt)| wt * m.powi(k as i32))
                .sum();
            let rhs = if k % 2 == 1 { 0.0 } else { 2.0 / (k as f64 + 1.0) };
            assert!(
                (lhs - rhs).abs() < 1e-9,
                "k={} lhs={} rhs={}",
                k,
                lhs,
                rhs
            );
        }
    }
}
