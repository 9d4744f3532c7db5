//! Adaptive quadrature of complex-valued integrands, in one and
//! two dimensions, using embedded Clenshaw-Curtis rules

mod adaptive;

pub use adaptive::*;
