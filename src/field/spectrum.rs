//! Angular spectra: the complex weight of each plane-wave component
//! of the beam, as a function of its direction of propagation

use std::f64::consts;
use enum_dispatch::enum_dispatch;
use num_complex::Complex64;

/// Represents the angular spectrum of a beam
#[enum_dispatch]
pub trait SpectralDistribution {
    /// Returns the weight of the plane wave that propagates at polar angle
    /// `theta` (with sine `sin_theta`) and azimuth `phi`.
    fn weight(&self, sin_theta: f64, theta: f64, phi: f64) -> Complex64;

    /// Is the weight independent of the azimuth?
    fn is_axisymmetric(&self) -> bool;
}

/// Spectrum of a Gaussian beam with waist `w`, i.e. a field
/// profile exp(-r^2 / w^2) in the focal plane
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Gaussian {
    kw: f64,
}

impl Gaussian {
    pub fn new(wavenumber: f64, waist: f64) -> Self {
        Self {
            kw: wavenumber * waist,
        }
    }

    /// exp[-(k w sin(theta) / 2)^2]
    pub fn envelope(&self, sin_theta: f64) -> f64 {
        (-(0.5 * self.kw * sin_theta).powi(2)).exp()
    }

    /// The integral of the envelope over all propagating components,
    /// k_y^2 + k_z^2 < k^2, in units of k^2:
    /// ```text
    ///   int_0^{2 pi} dphi int_0^1 ds s exp[-(k w s / 2)^2] = pi (1 - exp(-a)) / a
    /// ```
    /// where a = (k w / 2)^2. This is the on-axis amplitude at the waist.
    pub fn total_weight(&self) -> f64 {
        let a = (0.5 * self.kw).powi(2);
        -consts::PI * (-a).exp_m1() / a
    }
}

impl SpectralDistribution for Gaussian {
    fn weight(&self, sin_theta: f64, _theta: f64, _phi: f64) -> Complex64 {
        Complex64::new(self.envelope(sin_theta), 0.0)
    }

    fn is_axisymmetric(&self) -> bool {
        true
    }
}

/// Spectrum of a Laguerre-Gauss beam carrying orbital angular momentum:
/// the Gaussian envelope multiplied by theta^|m| exp(i m phi)
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LaguerreGauss {
    envelope: Gaussian,
    charge: i32,
}

impl LaguerreGauss {
    pub fn new(wavenumber: f64, waist: f64, charge: i32) -> Self {
        Self {
            envelope: Gaussian::new(wavenumber, waist),
            charge,
        }
    }
}

impl SpectralDistribution for LaguerreGauss {
    fn weight(&self, sin_theta: f64, theta: f64, phi: f64) -> Complex64 {
        let magnitude = self.envelope.envelope(sin_theta) * theta.powi(self.charge.saturating_abs());
        Complex64::from_polar(magnitude, (self.charge as f64) * phi)
    }

    fn is_axisymmetric(&self) -> bool {
        self.charge == 0
    }
}

/// The angular spectra supported by the source
#[enum_dispatch(SpectralDistribution)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Spectrum {
    Gaussian,
    LaguerreGauss,
}

impl Spectrum {
    /// Selects the plain Gaussian if the vortex charge is zero,
    /// and the Laguerre-Gauss spectrum otherwise.
    pub fn for_charge(wavenumber: f64, waist: f64, vortex_charge: i32) -> Self {
        if vortex_charge == 0 {
            Gaussian::new(wavenumber, waist).into()
        } else {
            LaguerreGauss::new(wavenumber, waist, vortex_charge).into()
        }
    }
}
