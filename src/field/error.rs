//! Errors in the beam configuration

use std::fmt;
use std::error::Error;

/// Rejected configuration of a [`BeamSource`](super::BeamSource)
#[derive(Copy, Clone, PartialEq)]
pub enum BeamError {
    Wavenumber(f64),
    Waist(f64),
    VortexCharge(i32),
    Offset(f64),
    Tolerance(f64),
    Budget(usize),
    Polarization,
}

impl fmt::Display for BeamError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BeamError::Wavenumber(k) => write!(f, "wavenumber must be positive and finite, but is {}", k),
            BeamError::Waist(w) => write!(f, "beam waist must be positive and finite, but is {}", w),
            BeamError::VortexCharge(m) => write!(f, "vortex charge {} has no representable magnitude", m),
            BeamError::Offset(x) => write!(f, "distance between source and waist must be finite, but is {}", x),
            BeamError::Tolerance(t) => write!(f, "relative tolerance must be positive and finite, but is {}", t),
            BeamError::Budget(n) => write!(f, "evaluation budget of {} is smaller than the minimum of {}", n, crate::quadrature::MIN_EVAL_BUDGET),
            BeamError::Polarization => write!(f, "polarization has neither an s nor a p component"),
        }
    }
}

impl fmt::Debug for BeamError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Error for BeamError {}
