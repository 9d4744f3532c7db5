//! Propagation directions and polarization states

mod direction;
pub use direction::*;

mod polarization;
pub use polarization::*;
