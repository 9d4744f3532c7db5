//! Default accuracy controls

/// Relative tolerance of the adaptive quadrature
pub const DEFAULT_TOLERANCE: f64 = 1.0e-4;
/// Maximum number of integrand evaluations per source point
pub const DEFAULT_MAX_EVALS: usize = 100_000;
/// Absolute error target, as a fraction of the relative tolerance times the
/// peak amplitude of the beam. Stops refinement where the amplitude vanishes.
pub const ABSOLUTE_ERROR_FLOOR: f64 = 1.0e-2;
