//! Source amplitudes for focused Gaussian and Laguerre-Gauss (vortex) beams,
//! for use as the current source of a field solver whose source plane is
//! displaced from the beam waist.
//!
//! The amplitude at each point of the source plane is the superposition of
//! the beam's plane-wave components, integrated adaptively over the directions
//! of propagation. See [`field::BeamSource`].

pub mod constants;
pub mod field;
pub mod geometry;
pub mod input;
pub mod output;
pub mod quadrature;
pub mod setup;
pub mod special_functions;
