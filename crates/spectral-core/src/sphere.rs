//! `SpectralSphere`: the stateful, immutable-after-construction object that
//! precomputes every grid-dependent table and exposes the scalar transform
//! and real-FFT façade operations.

use num_complex::Complex64;

use crate::error::{Result, SphereError};
use crate::fft::RealFft;
use crate::gaussian::gauss_legendre_nodes;
use crate::legendre::{nmdim, spectral_index, LegendreTables};

/// A real longitude x Gaussian-latitude grid field, longitude-major:
/// `grid[j * nlon + i]` is sample `i` (longitude) at latitude `j`.
pub type GridField = Vec<f64>;

/// A per-latitude Fourier field retaining zonal wavenumbers `0..=ntrunc`:
/// `fourier[m * nlat + j]`.
pub type FourierField = Vec<Complex64>;

/// A spectral coefficient vector in the canonical `(n, m)` ordering of
/// [`crate::legendre::spectral_index`].
pub type SpectralField = Vec<Complex64>;

/// Precomputed Gaussian-grid spectral transform engine.
///
/// Built once via [`SpectralSphere::new`]; every other method is a
/// read-only operation on the tables computed at construction. Freely
/// shareable across threads (`Sync`, since nothing is ever mutated after
/// construction).
pub struct SpectralSphere {
    nlon: usize,
    nlat: usize,
    ntrunc: usize,
    a: f64,
    nmdim: usize,
    gaussian_latitudes: Vec<f64>,
    gaussian_weights: Vec<f64>,
    legendre: LegendreTables,
    laplacian: Vec<f64>,
    inv_laplacian: Vec<f64>,
    fft: RealFft,
}

impl SpectralSphere {
    /// Construct a new sphere for `(nlon, nlat, ntrunc, a)`.
    ///
    /// `nlon` must be even and `>= 4` with `nlon/2` a power of two (the
    /// radix-2 real-FFT kernel's requirement; see `fft.rs`). `nlat` must be
    /// `>= ntrunc + 1`, and `ntrunc` must not exceed the number of zonal
    /// wavenumbers the longitude grid can resolve (`ntrunc <= nlon/2`). `a`
    /// must be strictly positive.
    pub fn new(nlon: usize, nlat: usize, ntrunc: usize, a: f64) -> Result<Self> {
        if nlon < 4 || nlon % 2 != 0 {
            return Err(SphereError::InvalidGeometry(format!(
                "nlon must be even and >= 4, got {}",
                nlon
            )));
        }
        if nlat < ntrunc + 1 {
            return Err(SphereError::InvalidGeometry(format!(
                "nlat ({}) must be >= ntrunc+1 ({})",
                nlat,
                ntrunc + 1
            )));
        }
        if ntrunc > nlon / 2 {
            return Err(SphereError::InvalidGeometry(format!(
                "ntrunc ({}) exceeds the number of zonal wavenumbers nlon/2 ({}) resolves",
                ntrunc,
                nlon / 2
            )));
        }
        if !(a > 0.0) {
            return Err(SphereError::InvalidGeometry(format!(
                "planetary radius a must be positive, got {}",
                a
            )));
        }
        let fft = RealFft::new(nlon).ok_or_else(|| {
            SphereError::InvalidGeometry(format!(
                "nlon/2 ({}) must be a power of two for the radix-2 real FFT",
                nlon / 2
            ))
        })?;

        log::debug!(
            "constructing SpectralSphere(nlon={}, nlat={}, ntrunc={}, a={})",
            nlon,
            nlat,
            ntrunc,
            a
        );

        let (gaussian_latitudes, gaussian_weights) = gauss_legendre_nodes(nlat)?;
        let legendre = LegendreTables::build(ntrunc, &gaussian_latitudes);
        let dim = nmdim(ntrunc);

        let mut laplacian = vec![0.0_f64; dim];
        let mut inv_laplacian = vec![0.0_f64; dim];
        for k in 0..dim {
            let n = legendre.index_n[k] as f64;
            let eig = -n * (n + 1.0) / (a * a);
            laplacian[k] = eig;
            inv_laplacian[k] = if legendre.index_n[k] == 0 { 0.0 } else { 1.0 / eig };
        }

        Ok(SpectralSphere {
            nlon,
            nlat,
            ntrunc,
            a,
            nmdim: dim,
            gaussian_latitudes,
            gaussian_weights,
            legendre,
            laplacian,
            inv_laplacian,
            fft,
        })
    }

    // ─── Read-only accessors ────────────────────────────────────────────

    pub fn nlon(&self) -> usize {
        self.nlon
    }
    pub fn nlat(&self) -> usize {
        self.nlat
    }
    pub fn ntrunc(&self) -> usize {
        self.ntrunc
    }
    pub fn a(&self) -> f64 {
        self.a
    }
    pub fn nmdim(&self) -> usize {
        self.nmdim
    }
    pub fn gaussian_latitudes(&self) -> &[f64] {
        &self.gaussian_latitudes
    }
    pub fn gaussian_weights(&self) -> &[f64] {
        &self.gaussian_weights
    }
    pub fn laplacian(&self) -> &[f64] {
        &self.laplacian
    }
    pub fn inv_laplacian(&self) -> &[f64] {
        &self.inv_laplacian
    }
    pub fn index_n(&self) -> &[usize] {
        &self.legendre.index_n
    }
    pub fn index_m(&self) -> &[usize] {
        &self.legendre.index_m
    }

    pub(crate) fn legendre_tables(&self) -> &LegendreTables {
        &self.legendre
    }

    fn check_grid(&self, g: &[f64]) -> Result<()> {
        let expected = self.nlon * self.nlat;
        if g.len() != expected {
            return Err(SphereError::ShapeMismatch {
                expected: format!("grid[{}]", expected),
                got: format!("grid[{}]", g.len()),
            });
        }
        Ok(())
    }

    pub(crate) fn check_fourier(&self, f: &[Complex64]) -> Result<()> {
        let expected = (self.ntrunc + 1) * self.nlat;
        if f.len() != expected {
            return Err(SphereError::ShapeMismatch {
                expected: format!("fourier[{}]", expected),
                got: format!("fourier[{}]", f.len()),
            });
        }
        Ok(())
    }

    pub(crate) fn check_spectral(&self, x: &[Complex64]) -> Result<()> {
        if x.len() != self.nmdim {
            return Err(SphereError::ShapeMismatch {
                expected: format!("spectral[{}]", self.nmdim),
                got: format!("spectral[{}]", x.len()),
            });
        }
        Ok(())
    }

    // ─── Real FFT along longitude ───────────────────────────────────────

    /// Forward real FFT of every latitude row, retaining zonal wavenumbers
    /// `0..=ntrunc` and discarding the rest.
    pub fn real_fft_forward(&self, grid: &GridField) -> Result<FourierField> {
        self.check_grid(grid)?;
        let mut out = vec![Complex64::new(0.0, 0.0); (self.ntrunc + 1) * self.nlat];
        for j in 0..self.nlat {
            let row = &grid[j * self.nlon..(j + 1) * self.nlon];
            let full = self.fft.forward(row);
            for m in 0..=self.ntrunc {
                out[m * self.nlat + j] = full[m];
            }
        }
        Ok(out)
    }

    /// Inverse real FFT: zero-pads zonal wavenumbers beyond `ntrunc` and
    /// reconstructs every latitude row.
    pub fn real_fft_inverse(&self, fourier: &FourierField) -> Result<GridField> {
        self.check_fourier(fourier)?;
        let half_len = self.fft.half_spectrum_len();
        let mut out = vec![0.0_f64; self.nlon * self.nlat];
        let mut full = vec![Complex64::new(0.0, 0.0); half_len];
        for j in 0..self.nlat {
            full.iter_mut().for_each(|v| *v = Complex64::new(0.0, 0.0));
            for m in 0..=self.ntrunc {
                full[m] = fourier[m * self.nlat + j];
            }
            let row = self.fft.inverse(&full);
            out[j * self.nlon..(j + 1) * self.nlon].copy_from_slice(&row);
        }
        Ok(out)
    }

    // ─── Scalar transform (FFT + Legendre analysis/synthesis) ──────────

    /// Forward scalar transform: real FFT then Legendre analysis.
    pub fn scalar_analysis(&self, grid: &GridField) -> Result<SpectralField> {
        let fourier = self.real_fft_forward(grid)?;
        Ok(self.legendre_analysis(&fourier))
    }

    /// Inverse scalar transform: Legendre synthesis then inverse real FFT.
    pub fn scalar_synthesis(&self, spectral: &SpectralField) -> Result<GridField> {
        self.check_spectral(spectral)?;
        let fourier = self.legendre_synthesis(spectral);
        self.real_fft_inverse(&fourier)
    }

    /// `X[k(n,m)] = sum_j w_j P_tilde_{n,m}(mu_j) F[m,j]`.
    pub(crate) fn legendre_analysis(&self, fourier: &FourierField) -> SpectralField {
        let mut x = vec![Complex64::new(0.0, 0.0); self.nmdim];
        for k in 0..self.nmdim {
            let m = self.legendre.index_m[k];
            let prow = self.legendre.p_row(k);
            let frow = &fourier[m * self.nlat..(m + 1) * self.nlat];
            let mut acc = Complex64::new(0.0, 0.0);
            for j in 0..self.nlat {
                acc += self.gaussian_weights[j] * prow[j] * frow[j];
            }
            x[k] = acc;
        }
        x
    }

    /// `F[m,j] = sum_{n=m}^{ntrunc} P_tilde_{n,m}(mu_j) X[k(n,m)]`.
    pub(crate) fn legendre_synthesis(&self, spectral: &SpectralField) -> FourierField {
        let mut f = vec![Complex64::new(0.0, 0.0); (self.ntrunc + 1) * self.nlat];
        for k in 0..self.nmdim {
            let m = self.legendre.index_m[k];
            let coeff = spectral[k];
            let prow = self.legendre.p_row(k);
            let frow = &mut f[m * self.nlat..(m + 1) * self.nlat];
            for j in 0..self.nlat {
                frow[j] += prow[j] * coeff;
            }
        }
        f
    }
}
