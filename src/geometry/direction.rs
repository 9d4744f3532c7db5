//! Conversion between the transverse components of a wavevector,
//! (k_y, k_z), and the direction of propagation (theta, phi)
//! relative to the x axis.

use num_complex::Complex64;

/// A direction of propagation, specified by the polar angle `theta`
/// from the x axis and the azimuthal angle `phi` around it.
/// The transverse components of a wavevector of magnitude k are
/// ```text
///   k_y =  k sin(theta) sin(phi)
///   k_z = -k sin(theta) cos(phi)
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Direction {
    theta: f64,
    phi: f64,
}

impl Direction {
    pub fn new(theta: f64, phi: f64) -> Self {
        Self {theta, phi}
    }

    /// Returns the direction of the plane-wave component with transverse
    /// wavevector `(k_y, k_z)`, in a medium with wavenumber `k`.
    ///
    /// Evanescent components, for which k_y^2 + k_z^2 > k^2, are assigned
    /// theta = pi/2 rather than a complex angle.
    pub fn from_spectral(k: f64, k_y: f64, k_z: f64) -> Self {
        Self {
            theta: polar_angle(k, k_y, k_z),
            phi: azimuth(k_y, k_z),
        }
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn phi(&self) -> f64 {
        self.phi
    }

    /// Transverse wavevector components (k_y, k_z) of a plane wave
    /// propagating along this direction with wavenumber `k`
    pub fn spectral_components(&self, k: f64) -> (f64, f64) {
        let (sin_theta, _) = self.theta.sin_cos();
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        (k * sin_theta * sin_phi, -k * sin_theta * cos_phi)
    }
}

/// Azimuthal angle of the transverse wavevector (k_y, k_z), in (-pi, pi]
pub fn azimuth(k_y: f64, k_z: f64) -> f64 {
    k_y.atan2(-k_z)
}

/// Polar angle, in [0, pi/2], of the wavevector with transverse components
/// (k_y, k_z). Only the real part of k_x = sqrt(k^2 - k_y^2 - k_z^2) is
/// kept, so evanescent components lie at theta = pi/2.
pub fn polar_angle(k: f64, k_y: f64, k_z: f64) -> f64 {
    let k_x = Complex64::new(k * k - k_y * k_y - k_z * k_z, 0.0).sqrt();
    (k_x.re / k).min(1.0).acos()
}
