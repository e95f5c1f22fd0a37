//! Spectral vector operators for vorticity/divergence <-> velocity
//! conversions, the numerical core a shallow-water solver builds its
//! tendency evaluation on.
//!
//! Streamfunction and velocity potential are obtained from vorticity and
//! divergence by the diagonal inverse-Laplacian (`psi = -inv_laplacian * zeta`,
//! `chi = -inv_laplacian * D`, with the `n = 0` mode forced to zero since the
//! Laplacian has no inverse there). Velocity synthesis then combines the
//! zonal derivative (multiply by `i*m` in Fourier space) with the meridional
//! derivative carried by the `d_legendre` table built alongside `P_tilde` in
//! [`crate::legendre`].
//!
//! [`combine_fourier_to_spectral`] is the single kernel both directions of
//! the velocity <-> vorticity/divergence conversion are built from; it is
//! also the building block the shallow-water tendency evaluation reuses
//! directly, per the contract in the module's source specification.

use num_complex::Complex64;

use crate::error::Result;
use crate::sphere::{FourierField, GridField, SpectralField, SpectralSphere};

const I: Complex64 = Complex64::new(0.0, 1.0);

impl SpectralSphere {
    /// `X[k(n,m)] = sum_j w_j * (sign_a * d_legendre_k(mu_j) * A[m,j]
    ///   + sign_b * i*m * P_tilde_k(mu_j) * B[m,j]) / (a * (1 - mu_j^2))`.
    ///
    /// The shared kernel underlying both vector-operator directions below;
    /// `A` and `B` are per-latitude Fourier fields of the same shape as
    /// [`crate::sphere::FourierField`] (`[m * nlat + j]`, zonal wavenumbers
    /// `0..=ntrunc`).
    pub fn combine_fourier_to_spectral(
        &self,
        a_field: &FourierField,
        b_field: &FourierField,
        sign_a: f64,
        sign_b: f64,
    ) -> Result<SpectralField> {
        self.check_fourier(a_field)?;
        self.check_fourier(b_field)?;

        let nlat = self.nlat();
        let weights = self.gaussian_weights();
        let mu = self.gaussian_latitudes();
        let tables = self.legendre_tables();
        let radius = self.a();

        let mut x = vec![Complex64::new(0.0, 0.0); self.nmdim()];
        for k in 0..self.nmdim() {
            let m = tables.index_m[k];
            let mf = m as f64;
            let prow = tables.p_row(k);
            let dprow = tables.dp_row(k);
            let arow = &a_field[m * nlat..(m + 1) * nlat];
            let brow = &b_field[m * nlat..(m + 1) * nlat];

            let mut acc = Complex64::new(0.0, 0.0);
            for j in 0..nlat {
                let denom = radius * (1.0 - mu[j] * mu[j]);
                let term = sign_a * dprow[j] * arow[j] + sign_b * mf * I * prow[j] * brow[j];
                acc += weights[j] * term / denom;
            }
            x[k] = acc;
        }
        Ok(x)
    }

    /// `psi_k = -inv_laplacian[k] * zeta_k`, `chi_k = -inv_laplacian[k] * D_k`,
    /// with the `n = 0` coefficient forced to zero (already guaranteed by
    /// `inv_laplacian[k(0,0)] == 0`).
    fn streamfunction_velocity_potential(
        &self,
        vorticity: &SpectralField,
        divergence: &SpectralField,
    ) -> (SpectralField, SpectralField) {
        let inv_lap = self.inv_laplacian();
        let psi: SpectralField = vorticity
            .iter()
            .zip(inv_lap.iter())
            .map(|(&z, &il)| -il * z)
            .collect();
        let chi: SpectralField = divergence
            .iter()
            .zip(inv_lap.iter())
            .map(|(&d, &il)| -il * d)
            .collect();
        (psi, chi)
    }

    /// Synthesize `u*cos(phi)` and `v*cos(phi)` per-latitude Fourier fields
    /// from streamfunction/velocity-potential spectral coefficients:
    /// `U[m,j] = sum_n (i*m*P_tilde_k(mu_j)*chi_k - d_legendre_k(mu_j)*psi_k)`,
    /// `V[m,j] = sum_n (i*m*P_tilde_k(mu_j)*psi_k + d_legendre_k(mu_j)*chi_k)`.
    fn synthesize_velocity_fourier(
        &self,
        psi: &SpectralField,
        chi: &SpectralField,
    ) -> (FourierField, FourierField) {
        let nlat = self.nlat();
        let ntrunc = self.ntrunc();
        let tables = self.legendre_tables();
        let mut u = vec![Complex64::new(0.0, 0.0); (ntrunc + 1) * nlat];
        let mut v = vec![Complex64::new(0.0, 0.0); (ntrunc + 1) * nlat];

        for k in 0..self.nmdim() {
            let m = tables.index_m[k];
            let mf = m as f64;
            let prow = tables.p_row(k);
            let dprow = tables.dp_row(k);
            let psi_k = psi[k];
            let chi_k = chi[k];
            let urow = &mut u[m * nlat..(m + 1) * nlat];
            let vrow = &mut v[m * nlat..(m + 1) * nlat];
            for j in 0..nlat {
                urow[j] += mf * I * prow[j] * chi_k - dprow[j] * psi_k;
                vrow[j] += mf * I * prow[j] * psi_k + dprow[j] * chi_k;
            }
        }
        (u, v)
    }

    /// Vorticity/divergence -> `(u*cos(phi), v*cos(phi))` grid fields.
    ///
    /// Computes `psi`, `chi` from `zeta`, `D`, synthesizes the velocity
    /// Fourier fields with the zonal/meridional derivative operators above,
    /// then inverse-FFTs each row.
    pub fn velocities_from_vorticity_divergence(
        &self,
        vorticity: &SpectralField,
        divergence: &SpectralField,
    ) -> Result<(GridField, GridField)> {
        self.check_spectral(vorticity)?;
        self.check_spectral(divergence)?;
        let (psi, chi) = self.streamfunction_velocity_potential(vorticity, divergence);
        let (u_fourier, v_fourier) = self.synthesize_velocity_fourier(&psi, &chi);
        let u_grid = self.real_fft_inverse(&u_fourier)?;
        let v_grid = self.real_fft_inverse(&v_fourier)?;
        Ok((u_grid, v_grid))
    }

    /// `(u*cos(phi), v*cos(phi))` grid fields -> vorticity/divergence
    /// spectral coefficients, the inverse of
    /// [`SpectralSphere::velocities_from_vorticity_divergence`].
    ///
    /// Forward-FFTs both rows, then applies
    /// [`SpectralSphere::combine_fourier_to_spectral`] directly (no
    /// intermediate streamfunction/velocity-potential pass): `zeta =
    /// combine(U, V, -1, -1)`, `D = combine(V, U, +1, -1)`.
    pub fn vorticity_divergence_from_velocities(
        &self,
        u_cos_phi: &GridField,
        v_cos_phi: &GridField,
    ) -> Result<(SpectralField, SpectralField)> {
        let u_fourier = self.real_fft_forward(u_cos_phi)?;
        let v_fourier = self.real_fft_forward(v_cos_phi)?;
        let vorticity = self.combine_fourier_to_spectral(&u_fourier, &v_fourier, -1.0, -1.0)?;
        let divergence = self.combine_fourier_to_spectral(&v_fourier, &u_fourier, 1.0, -1.0)?;
        Ok((vorticity, divergence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make(nlon: usize, nlat: usize, ntrunc: usize, a: f64) -> SpectralSphere {
        SpectralSphere::new(nlon, nlat, ntrunc, a).unwrap()
    }

    #[test]
    fn vector_round_trip_band_limited() {
        let sphere = make(16, 10, 6, 1.0);
        let mut zeta = vec![Complex64::new(0.0, 0.0); sphere.nmdim()];
        let mut div = vec![Complex64::new(0.0, 0.0); sphere.nmdim()];
        for (i, k) in [1usize, 3, 5, 9].iter().enumerate() {
            zeta[*k] = Complex64::new(0.8 + i as f64 * 0.1, 0.2 - i as f64 * 0.05);
            div[*k] = Complex64::new(0.3 - i as f64 * 0.2, 0.1 + i as f64 * 0.15);
        }
        // m=0 coefficients of a real grid field's u,v must be real; the
        // n=0 mode carries no vector information regardless (Laplacian has
        // no inverse there), so leave it zero.
        for k in 0..zeta.len() {
            if sphere.index_m()[k] == 0 {
                zeta[k].im = 0.0;
                div[k].im = 0.0;
            }
        }

        let (u, v) = sphere
            .velocities_from_vorticity_divergence(&zeta, &div)
            .unwrap();
        let (zeta2, div2) = sphere.vorticity_divergence_from_velocities(&u, &v).unwrap();

        for k in 0..zeta.len() {
            if sphere.index_n()[k] == 0 {
                continue; // undefined at n=0, per the spec's round-trip scope.
            }
            assert!(
                (zeta[k] - zeta2[k]).norm() < 1e-8,
                "zeta k={} {:?} vs {:?}",
                k,
                zeta[k],
                zeta2[k]
            );
            assert!(
                (div[k] - div2[k]).norm() < 1e-8,
                "div k={} {:?} vs {:?}",
                k,
                div[k],
                div2[k]
            );
        }
    }

    #[test]
    fn solid_body_rotation_is_pure_vorticity() {
        // S3-style scenario: a solid-body zonal flow u*cos(phi) = U0*cos(phi)^2,
        // v*cos(phi) = 0, projects onto a single (n=1, m=0) vorticity mode
        // with zero divergence, matching the classical Legendre-1 vorticity
        // pattern for rigid rotation about the polar axis.
        let sphere = make(16, 10, 4, 1.0);
        let nlon = sphere.nlon();
        let nlat = sphere.nlat();
        let mu = sphere.gaussian_latitudes().to_vec();
        let u0 = 10.0;
        let mut u = vec![0.0_f64; nlon * nlat];
        let v = vec![0.0_f64; nlon * nlat];
        for j in 0..nlat {
            let cos2 = 1.0 - mu[j] * mu[j];
            for i in 0..nlon {
                u[j * nlon + i] = u0 * cos2;
            }
        }
        let (zeta, div) = sphere.vorticity_divergence_from_velocities(&u, &v).unwrap();
        for k in 0..div.len() {
            assert!(div[k].norm() < 1e-8, "k={} div={:?}", k, div[k]);
        }
        let k10 = crate::legendre::spectral_index(1, 0, sphere.ntrunc());
        assert!(zeta[k10].norm() > 1e-3);
        for k in 0..zeta.len() {
            if k != k10 {
                assert!(zeta[k].norm() < 1e-8, "k={} zeta={:?}", k, zeta[k]);
            }
        }
    }
}
