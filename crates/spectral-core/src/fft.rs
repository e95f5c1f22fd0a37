//! Real FFT along longitude via a half-length complex FFT.
//!
//! A real row of length `N` is packed into a complex sequence of length
//! `M = N/2` (`z_k = g_2k + i g_2k+1`), transformed with an iterative
//! radix-2 Cooley-Tukey complex FFT, then un-shuffled into the `M+1`
//! independent Fourier modes of the real signal (`m = 0..=M`, the Nyquist
//! mode included). This is the classical "two real sequences in one
//! complex FFT" packing; see e.g. Numerical Recipes §12.3.
//!
//! The radix-2 kernel requires `M` to be a power of two; `RealFft::new`
//! is the sole place that enforces it.

use num_complex::Complex64;
use std::f64::consts::PI;

/// Precomputed tables for the real FFT of rows of length `n` (`n` even,
/// `n/2` a power of two).
pub struct RealFft {
    /// Full row length.
    n: usize,
    /// Half length, `n/2`; the complex-FFT working size.
    m: usize,
    log2_m: u32,
    bit_rev: Vec<usize>,
    /// `e^{-2*pi*i*k/m}` for `k = 0..m/2`, the radix-2 stage twiddles.
    fft_twiddles: Vec<Complex64>,
    /// `e^{-2*pi*i*k/n}` for `k = 0..=m`, the real/complex packing twiddles.
    pack_twiddles: Vec<Complex64>,
}

/// `true` iff `x` is a power of two (and nonzero).
fn is_pow2(x: usize) -> bool {
    x != 0 && (x & (x - 1)) == 0
}

impl RealFft {
    /// `n` must be even with `n/2` a power of two and at least 2.
    pub fn new(n: usize) -> Option<Self> {
        if n == 0 || n % 2 != 0 {
            return None;
        }
        let m = n / 2;
        if !is_pow2(m) {
            return None;
        }
        let log2_m = m.trailing_zeros();

        let mut bit_rev = vec![0usize; m];
        for i in 0..m {
            bit_rev[i] = i.reverse_bits() >> (usize::BITS - log2_m);
        }

        let half_m = (m / 2).max(1);
        let fft_twiddles: Vec<Complex64> = (0..half_m)
            .map(|k| {
                let theta = -2.0 * PI * k as f64 / m as f64;
                Complex64::new(theta.cos(), theta.sin())
            })
            .collect();

        let pack_twiddles: Vec<Complex64> = (0..=m)
            .map(|k| {
                let theta = -2.0 * PI * k as f64 / n as f64;
                Complex64::new(theta.cos(), theta.sin())
            })
            .collect();

        Some(RealFft {
            n,
            m,
            log2_m,
            bit_rev,
            fft_twiddles,
            pack_twiddles,
        })
    }

    pub fn row_len(&self) -> usize {
        self.n
    }

    /// Number of independent real Fourier modes, `n/2 + 1` (Nyquist included).
    pub fn half_spectrum_len(&self) -> usize {
        self.m + 1
    }

    /// In-place iterative radix-2 Cooley-Tukey complex FFT.
    ///
    /// `buf.len()` must equal `self.m`. `inverse` selects the conjugated
    /// twiddles; the transform is always unnormalized (no `1/m` factor),
    /// matching the textbook convention for both directions.
    fn complex_fft(&self, buf: &mut [Complex64], inverse: bool) {
        let m = self.m;
        debug_assert_eq!(buf.len(), m);

        for i in 0..m {
            let j = self.bit_rev[i];
            if j > i {
                buf.swap(i, j);
            }
        }

        let mut size = 2usize;
        while size <= m {
            let half = size / 2;
            let stride = m / size;
            for start in (0..m).step_by(size) {
                for j in 0..half {
                    let tw_idx = j * stride;
                    let tw = self.fft_twiddles[tw_idx];
                    let tw = if inverse { tw.conj() } else { tw };
                    let odd = buf[start + j + half] * tw;
                    let even = buf[start + j];
                    buf[start + j] = even + odd;
                    buf[start + j + half] = even - odd;
                }
            }
            size <<= 1;
        }
        let _ = self.log2_m;
    }

    /// Forward real FFT of one row: `g[0..n]` real, returns the `m+1`
    /// complex Fourier modes (`m = n/2`), normalized by `1/n`.
    pub fn forward(&self, g: &[f64]) -> Vec<Complex64> {
        let m = self.m;
        debug_assert_eq!(g.len(), self.n);

        let mut z: Vec<Complex64> = (0..m)
            .map(|k| Complex64::new(g[2 * k], g[2 * k + 1]))
            .collect();
        self.complex_fft(&mut z, false);

        let inv_n = 1.0 / self.n as f64;
        let mut out = vec![Complex64::new(0.0, 0.0); m + 1];
        for (idx, slot) in out.iter_mut().enumerate() {
            let mp = (m - idx % m) % m;
            let a = z[idx % m];
            let b = z[mp].conj();
            let t = self.pack_twiddles[idx];
            let g_m = 0.5 * ((a + b) - Complex64::new(0.0, 1.0) * t * (a - b));
            *slot = g_m * inv_n;
        }
        out
    }

    /// Inverse real FFT: `f[0..=m]` complex Fourier modes, returns the `n`
    /// real samples, unnormalized (no `1/n` factor), per the forward/
    /// inverse normalization convention above.
    pub fn inverse(&self, f: &[Complex64]) -> Vec<f64> {
        let m = self.m;
        debug_assert_eq!(f.len(), m + 1);

        let mut z = vec![Complex64::new(0.0, 0.0); m];

        // DC and Nyquist together pin down Zhat[0] (both real by construction).
        let g0 = f[0];
        let gm = f[m];
        z[0] = Complex64::new(0.5 * (g0.re + gm.re), 0.5 * (g0.re - gm.re));

        if m % 2 == 0 && m >= 2 {
            z[m / 2] = f[m / 2].conj();
        }

        let half = m / 2;
        for k in 1..half {
            let kp = m - k;
            let gk = f[k];
            let gkp = f[kp];
            let s = gk + gkp.conj();
            let tw = self.pack_twiddles[k].conj(); // conj(t_k) = e^{+2*pi*i*k/n}
            let d = Complex64::new(0.0, 1.0) * tw * (gk - gkp.conj());
            let a = 0.5 * (s + d);
            let b_conj = 0.5 * (s - d);
            z[k] = a;
            z[kp] = b_conj.conj();
        }

        // The packing above recovers each Z_p scaled by 1/n (forward's own
        // normalization), while the unnormalized inverse butterfly network
        // below multiplies through by m = n/2. Rescale by n/m = 2 so the two
        // cancel and the round trip reproduces the input exactly, matching
        // the forward/inverse normalization convention in the module docs.
        for v in z.iter_mut() {
            *v *= 2.0;
        }

        self.complex_fft(&mut z, true);

        let mut g = vec![0.0_f64; self.n];
        for k in 0..m {
            g[2 * k] = z[k].re;
            g[2 * k + 1] = z[k].im;
        }
        g
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_random_row() {
        let n = 32;
        let rf = RealFft::new(n).unwrap();
        let g: Vec<f64> = (0..n)
            .map(|i| ((i as f64) * 0.37).sin() + 0.5 * ((i as f64) * 1.9).cos())
            .collect();
        let spectrum = rf.forward(&g);
        let back = rf.inverse(&spectrum);
        for (a, b) in g.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-10, "{} vs {}", a, b);
        }
    }

    #[test]
    fn pure_zonal_wave() {
        // G[i] = cos(2*pi*mw*i/n) should produce F[mw] = 0.5, all else ~0.
        let n = 16;
        let mw = 3usize;
        let rf = RealFft::new(n).unwrap();
        let g: Vec<f64> = (0..n)
            .map(|i| (2.0 * PI * mw as f64 * i as f64 / n as f64).cos())
            .collect();
        let spectrum = rf.forward(&g);
        for (m, &val) in spectrum.iter().enumerate() {
            if m == mw {
                assert!((val.re - 0.5).abs() < 1e-12, "re={}", val.re);
                assert!(val.im.abs() < 1e-12, "im={}", val.im);
            } else {
                assert!(val.norm() < 1e-12, "m={} val={:?}", m, val);
            }
        }
    }

    #[test]
    fn constant_row_is_dc_only() {
        let n = 16;
        let rf = RealFft::new(n).unwrap();
        let g = vec![1.0_f64; n];
        let spectrum = rf.forward(&g);
        assert!((spectrum[0].re - 1.0).abs() < 1e-12);
        assert!(spectrum[0].im.abs() < 1e-12);
        for &val in &spectrum[1..] {
            assert!(val.norm() < 1e-12);
        }
    }

    #[test]
    fn rejects_non_power_of_two_half_length() {
        assert!(RealFft::new(12).is_none()); // n/2 = 6, not a power of two
        assert!(RealFft::new(6).is_none()); // n/2 = 3
        assert!(RealFft::new(3).is_none()); // odd
        assert!(RealFft::new(32).is_some()); // n/2 = 16
    }
}
