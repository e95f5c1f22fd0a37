//! Spectral transform engine on a Gaussian grid of the sphere.
//!
//! Gaussian quadrature, normalized associated Legendre functions, a real
//! FFT built from a half-length complex FFT, and the Legendre
//! analysis/synthesis pair combine into [`sphere::SpectralSphere`], the
//! scalar and vector transform façade a shallow-water-equations solver's
//! numerical core runs on.
//!
//! This crate has no process surface: it is a pure computational library,
//! built once per grid via [`sphere::SpectralSphere::new`] and then used
//! read-only from as many threads as the caller likes.

pub mod error;
pub mod fft;
pub mod gaussian;
pub mod legendre;
pub mod ops;
pub mod sphere;

pub use error::{Result, SphereError};
pub use fft::RealFft;
pub use gaussian::gauss_legendre_nodes;
pub use legendre::{nmdim, spectral_index, LegendreTables};
pub use sphere::{FourierField, GridField, SpectralField, SpectralSphere};
