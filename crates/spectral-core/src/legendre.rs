//! Normalized associated Legendre functions and the canonical spectral
//! coefficient ordering.
//!
//! Uses the 4π-normalized real form and the stable three-term recurrence
//! climbing in `n` for fixed `m`, seeded by the sectoral term `P̃_{m,m}`
//! computed in log-space to avoid overflow at large `m`.
//!
//! The seed carries an extra overall factor of `1/sqrt(2)` beyond the bare
//! `sqrt((2n+1)(n-m)!/(n+m)!)` weighting given by the un-normalized
//! recurrence. Gaussian quadrature weights here sum to 2 (not 1), so the
//! bare weighting makes `sum_j w_j P_tilde_{n,m}(mu_j)^2 == 2` for every
//! `(n, m)` rather than `1`: the extra `1/sqrt(2)` is what makes the
//! Legendre transform exactly self-orthonormal and the scalar transform's
//! analysis/synthesis pair exact inverses of one another (the round-trip
//! invariant the rest of this crate depends on). It is a single global
//! scalar applied at the sectoral seed, so it propagates unchanged through
//! the homogeneous linear recurrence in `n`.

/// Index of the `(n, m)` spectral coefficient in the canonical ordering:
/// outer loop `m = 0..=ntrunc`, inner loop `n = m..=ntrunc`.
///
/// This ordering is a public contract consumed by every transform and
/// operator in this crate.
pub fn spectral_index(n: usize, m: usize, ntrunc: usize) -> usize {
    debug_assert!(m <= n && n <= ntrunc);
    m * (ntrunc + 1) - m * (m.saturating_sub(1)) / 2 + (n - m)
}

/// Total number of spectral coefficients for a given truncation.
pub fn nmdim(ntrunc: usize) -> usize {
    (ntrunc + 1) * (ntrunc + 2) / 2
}

/// Precomputed tables of normalized associated Legendre functions and their
/// latitudinal derivatives, plus the `(n, m)` index maps, at every Gaussian
/// node.
///
/// Storage is `[k * nlat + j]`: values for a fixed spectral index `k` are
/// contiguous across latitude, which keeps the Legendre-analysis inner sum
/// (over `j`, for fixed `k`) cache-friendly.
pub struct LegendreTables {
    pub ntrunc: usize,
    pub nlat: usize,
    pub nmdim: usize,
    /// `P̃_{n,m}(mu_j)`, indexed `[k * nlat + j]`.
    pub p: Vec<f64>,
    /// `(1 - mu^2) dP̃_{n,m}/dmu` at `mu_j`, indexed `[k * nlat + j]`.
    pub dp: Vec<f64>,
    pub index_n: Vec<usize>,
    pub index_m: Vec<usize>,
}

impl LegendreTables {
    pub fn p_row(&self, k: usize) -> &[f64] {
        let base = k * self.nlat;
        &self.p[base..base + self.nlat]
    }

    pub fn dp_row(&self, k: usize) -> &[f64] {
        let base = k * self.nlat;
        &self.dp[base..base + self.nlat]
    }

    /// Build the tables for every Gaussian node `mu[j]`, `j = 0..nlat`.
    pub fn build(ntrunc: usize, mu: &[f64]) -> Self {
        let nlat = mu.len();
        let dim = nmdim(ntrunc);
        let mut p = vec![0.0_f64; dim * nlat];
        let mut dp = vec![0.0_f64; dim * nlat];
        let mut index_n = vec![0usize; dim];
        let mut index_m = vec![0usize; dim];

        for j in 0..nlat {
            let muj = mu[j];
            let one_minus_mu2 = 1.0 - muj * muj;

            // Column of P̃_{n,m} for this j, indexed [m][n-m], built bottom-up.
            // We only need the previous two n-values per m at a time, but we
            // store the whole column to also compute derivatives which need
            // P̃_{n-1,m}.
            let mut col = vec![0.0_f64; dim];

            for m in 0..=ntrunc {
                // Sectoral seed P̃_{m,m} = sqrt((2m+1)!!/(2m)!!) * (1-mu^2)^(m/2),
                // built in log-space: sum of ln((2i+1)/(2i)) for i=1..=m, halved
                // contribution from the square root of the double-factorial ratio.
                let mut log_seed = 0.0_f64;
                for i in 1..=m {
                    log_seed += ((2 * i + 1) as f64).ln() - ((2 * i) as f64).ln();
                }
                // sqrt of the double factorial ratio, times (1-mu^2)^(m/2),
                // scaled by 1/sqrt(2) for exact self-orthonormality (see
                // module docs).
                let mut p_mm = (0.5 * log_seed).exp() / std::f64::consts::SQRT_2;
                if m > 0 {
                    p_mm *= one_minus_mu2.powf(m as f64 / 2.0);
                }

                let k_mm = spectral_index(m, m, ntrunc);
                col[k_mm] = p_mm;

                if m == ntrunc {
                    continue;
                }

                // P̃_{m+1,m} = mu * sqrt(2m+3) * P̃_{m,m}
                let k_m1 = spectral_index(m + 1, m, ntrunc);
                let p_m1 = muj * (2.0 * m as f64 + 3.0).sqrt() * p_mm;
                col[k_m1] = p_m1;

                // Climb n = m+2 .. ntrunc
                let mut p_nm2 = p_mm;
                let mut p_nm1 = p_m1;
                for n in (m + 2)..=ntrunc {
                    let nf = n as f64;
                    let mf = m as f64;
                    let a_nm = (((2.0 * nf + 1.0) * (2.0 * nf - 1.0))
                        / ((nf - mf) * (nf + mf)))
                        .sqrt();
                    let b_nm = (((nf - 1.0 - mf) * (nf - 1.0 + mf))
                        / ((2.0 * nf - 3.0) * (2.0 * nf - 1.0)))
                        .sqrt();
                    let p_n = a_nm * (muj * p_nm1 - b_nm * p_nm2);
                    let k_n = spectral_index(n, m, ntrunc);
                    col[k_n] = p_n;
                    p_nm2 = p_nm1;
                    p_nm1 = p_n;
                }
            }

            // Derivatives: (1-mu^2) dP̃_{n,m}/dmu = -n mu P̃_{n,m} + c_{n,m} P̃_{n-1,m}
            for m in 0..=ntrunc {
                for n in m..=ntrunc {
                    let k = spectral_index(n, m, ntrunc);
                    let p_nm = col[k];
                    let nf = n as f64;
                    let mf = m as f64;
                    let p_nm1_val = if n > m {
                        col[spectral_index(n - 1, m, ntrunc)]
                    } else {
                        0.0
                    };
                    let c_nm = if n == m {
                        0.0
                    } else {
                        (((nf * nf - mf * mf) * (2.0 * nf + 1.0)) / (2.0 * nf - 1.0)).sqrt()
                    };
                    dp[k * nlat + j] = -nf * muj * p_nm + c_nm * p_nm1_val;
                }
            }

            for (k, &val) in col.iter().enumerate() {
                p[k * nlat + j] = val;
            }
        }

        for m in 0..=ntrunc {
            for n in m..=ntrunc {
                let k = spectral_index(n, m, ntrunc);
                index_n[k] = n;
                index_m[k] = m;
            }
        }

        LegendreTables {
            ntrunc,
            nlat,
            nmdim: dim,
            p,
            dp,
            index_n,
            index_m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gaussian::gauss_legendre_nodes;

    #[test]
    fn index_round_trip() {
        let ntrunc = 5;
        let dim = nmdim(ntrunc);
        let mut seen = vec![false; dim];
        for m in 0..=ntrunc {
            for n in m..=ntrunc {
                let k = spectral_index(n, m, ntrunc);
                assert!(k < dim);
                assert!(!seen[k], "duplicate index at n={} m={}", n, m);
                seen[k] = true;
            }
        }
        assert!(seen.iter().all(|&b| b));
    }

    #[test]
    fn orthonormality() {
        // sum_j w_j P_tilde_{n1,m}(mu_j) P_tilde_{n2,m}(mu_j) == delta_{n1,n2}.
        let ntrunc = 8;
        let nlat = 12;
        let (mu, w) = gauss_legendre_nodes(nlat).unwrap();
        let tables = LegendreTables::build(ntrunc, &mu);

        for m in 0..=ntrunc {
            for n1 in m..=ntrunc {
                for n2 in m..=ntrunc {
                    let k1 = spectral_index(n1, m, ntrunc);
                    let k2 = spectral_index(n2, m, ntrunc);
                    let p1 = tables.p_row(k1);
                    let p2 = tables.p_row(k2);
                    let sum: f64 = w
                        .iter()
                        .zip(p1.iter().zip(p2.iter()))
                        .map(|(&wj, (&a, &b))| wj * a * b)
                        .sum();
                    let expected = if n1 == n2 { 1.0 } else { 0.0 };
                    assert!(
                        (sum - expected).abs() < 1e-8,
                        "n1={} n2={} m={} sum={}",
                        n1,
                        n2,
                        m,
                        sum
                    );
                }
            }
        }
    }

    #[test]
    fn p00_is_constant_one_over_sqrt_two() {
        let ntrunc = 2;
        let (mu, _) = gauss_legendre_nodes(6).unwrap();
        let tables = LegendreTables::build(ntrunc, &mu);
        let k00 = spectral_index(0, 0, ntrunc);
        let expected = 1.0 / std::f64::consts::SQRT_2;
        for &v in tables.p_row(k00) {
            assert!((v - expected).abs() < 1e-12);
        }
    }
}
