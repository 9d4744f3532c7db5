//! Custom implementations of special functions not
//! provided by the standard lib.

mod bessel;

pub use bessel::*;
