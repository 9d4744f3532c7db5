//! Synthesis of the source amplitude that reproduces a focused
//! (optionally vortex-carrying) beam after free propagation

mod error;
mod spectrum;
mod integrand;
mod synthesis;

pub use self::error::*;
pub use self::spectrum::*;
pub use self::integrand::*;
pub use self::synthesis::*;
