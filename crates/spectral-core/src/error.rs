//! Error types for spectral-sphere construction and transforms.

use thiserror::Error;

/// Errors raised by [`crate::sphere::SpectralSphere`] construction and transforms.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SphereError {
    /// Construction-time: an illegal `(nlon, nlat, ntrunc, a)` combination.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Operation-time: a buffer's dimensions disagree with the sphere's declared sizes.
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },

    /// Gaussian root-finding failed to converge within the iteration budget.
    #[error("Gaussian quadrature failed to converge for nlat={nlat} at root index {index}")]
    ConvergenceFailure { nlat: usize, index: usize },
}

pub type Result<T> = std::result::Result<T, SphereError>;
