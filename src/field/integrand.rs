//! The plane-wave superposition that gives the source amplitude at a point

use std::f64::consts;
use num_complex::Complex64;

use crate::geometry::Direction;
use crate::special_functions::BesselJ0;
use super::SpectralDistribution;

/// Position at which the beam is reconstructed, relative to its waist:
/// `x` is along the direction of propagation, `y` and `z` are transverse.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Target {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Target {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {x, y, z}
    }

    /// Distance from the propagation axis
    pub fn rho(&self) -> f64 {
        self.y.hypot(self.z)
    }
}

/// The contribution of a single plane wave, with weight given by the
/// spectrum `S`, to the field at a fixed target point. The integrand
/// is available in three parameterizations, all of which give the
/// same amplitude once integrated over their natural domains.
pub struct PhaseIntegrand<'a, S: SpectralDistribution> {
    spectrum: &'a S,
    k: f64,
    target: Target,
}

impl<'a, S: SpectralDistribution> PhaseIntegrand<'a, S> {
    pub fn new(spectrum: &'a S, wavenumber: f64, target: Target) -> Self {
        Self {
            spectrum,
            k: wavenumber,
            target,
        }
    }

    /// Returns the phase accumulated by the plane wave (theta, phi)
    /// between the waist and the target:
    /// ```text
    ///   k [sin(theta) (y sin(phi) - z cos(phi)) + x cos(theta)]
    /// ```
    fn phase(&self, sin_theta: f64, cos_theta: f64, phi: f64) -> f64 {
        let (sin_phi, cos_phi) = phi.sin_cos();
        let t = &self.target;
        self.k * (sin_theta * (t.y * sin_phi - t.z * cos_phi) + cos_theta * t.x)
    }

    /// Integrand over the forward hemisphere, theta in [0, pi/2] and
    /// phi in [0, 2 pi], including the Jacobian sin(theta) cos(theta).
    /// The integral must be multiplied by k^2.
    pub fn spherical(&self, theta: f64, phi: f64) -> Complex64 {
        let (sin_theta, cos_theta) = theta.sin_cos();
        let weight = self.spectrum.weight(sin_theta, theta, phi);
        let phase = self.phase(sin_theta, cos_theta, phi);
        sin_theta * cos_theta * weight * Complex64::from_polar(1.0, phase)
    }

    /// Integrand over the transverse wavevector (k_y, k_z). The direction
    /// of each component is recovered from the wavevector, evanescent
    /// components being projected onto theta = pi/2.
    /// There is no Jacobian factor.
    pub fn cartesian(&self, k_y: f64, k_z: f64) -> Complex64 {
        let direction = Direction::from_spectral(self.k, k_y, k_z);
        let theta = direction.theta();
        let phi = direction.phi();
        let (sin_theta, cos_theta) = theta.sin_cos();
        let weight = self.spectrum.weight(sin_theta, theta, phi);
        let phase = self.phase(sin_theta, cos_theta, phi);
        weight * Complex64::from_polar(1.0, phase)
    }

    /// Integrand over theta alone, valid only if the spectrum is axisymmetric.
    /// The azimuthal integral is done analytically:
    /// ```text
    ///   int_0^{2 pi} dphi exp[i k rho sin(theta) sin(phi - alpha)] = 2 pi J0(k rho sin(theta))
    /// ```
    /// The integral must be multiplied by k^2.
    pub fn radial(&self, theta: f64) -> Complex64 {
        let (sin_theta, cos_theta) = theta.sin_cos();
        let weight = self.spectrum.weight(sin_theta, theta, 0.0);
        let bessel = (self.k * self.target.rho() * sin_theta).j0();
        let phase = self.k * self.target.x * cos_theta;
        2.0 * consts::PI * sin_theta * cos_theta * bessel * weight * Complex64::from_polar(1.0, phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Gaussian, LaguerreGauss};

    #[test]
    fn radial_is_azimuthal_average() {
        let k = 10.0 * consts::PI;
        let gauss = Gaussian::new(k, 0.8 / k);
        let target = Target::new(-2.15, 0.2, -0.1);
        let integrand = PhaseIntegrand::new(&gauss, k, target);

        // trapezoidal rule is spectrally accurate for periodic integrands
        let n = 64;
        let dphi = 2.0 * consts::PI / (n as f64);
        for theta in [0.05, 0.3, 0.8, 1.2, 1.5].iter() {
            let target: Complex64 = (0..n)
                .map(|i| integrand.spherical(*theta, (i as f64) * dphi))
                .sum::<Complex64>() * dphi;
            let value = integrand.radial(*theta);
            let error = (value - target).norm() / target.norm();
            println!("theta = {}: radial = {:.6e}, azimuthal sum = {:.6e}, error = {:.3e}", theta, value, target, error);
            assert!(error < 1.0e-9);
        }
    }

    #[test]
    fn cartesian_matches_spherical() {
        // on the propagating disk, the integrands differ only by the Jacobian
        // d k_y d k_z = k^2 sin(theta) cos(theta) d theta d phi
        let k = 10.0 * consts::PI;
        let lg = LaguerreGauss::new(k, 8.0 / k, 2);
        let target = Target::new(-1.0, 0.1, 0.3);
        let integrand = PhaseIntegrand::new(&lg, k, target);

        for &(theta, phi) in [(0.1, 0.4), (0.7, -2.0), (1.3, 3.0)].iter() {
            let (k_y, k_z) = Direction::new(theta, phi).spectral_components(k);
            let a = integrand.cartesian(k_y, k_z);
            let b = integrand.spherical(theta, phi) / (theta.sin() * theta.cos());
            let error = (a - b).norm() / b.norm();
            println!("({}, {}): cartesian = {:.6e}, spherical = {:.6e}, error = {:.3e}", theta, phi, a, b, error);
            assert!(error < 1.0e-9);
        }
    }

    #[test]
    fn on_axis_at_waist() {
        let k = 10.0 * consts::PI;
        let gauss = Gaussian::new(k, 0.8 / k);
        let integrand = PhaseIntegrand::new(&gauss, k, Target::new(0.0, 0.0, 0.0));
        let theta = 0.6;
        let value = integrand.radial(theta);
        let target = 2.0 * consts::PI * theta.sin() * theta.cos() * gauss.envelope(theta.sin());
        assert!(value.im == 0.0);
        assert!((value.re - target).abs() < 1.0e-15 * target);
    }
}
