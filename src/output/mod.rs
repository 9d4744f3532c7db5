//! Samples the source amplitude over the source plane
//! and writes it out as a table

mod error;
mod profile;

pub use error::*;
pub use profile::*;
