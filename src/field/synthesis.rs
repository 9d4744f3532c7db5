//! Reconstructs the amplitude of a focused beam on a plane displaced
//! from its waist, by summing its plane-wave components

use std::f64::consts;
use num_complex::Complex64;

use crate::constants::ABSOLUTE_ERROR_FLOOR;
use crate::geometry::{Component, JonesVector, Mirror};
use crate::quadrature::{self, Accuracy, Integral, MIN_EVAL_BUDGET};
use super::{BeamError, Gaussian, PhaseIntegrand, SpectralDistribution, Spectrum, Target};

/// Parameterization of the plane-wave components
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Parameterization {
    /// By polar and azimuthal angle, (theta, phi), over the forward hemisphere
    Spherical,
    /// By transverse wavevector, (k_y, k_z), over the square [-k, k]^2.
    /// Less accurate, because the integrand has a square-root singularity
    /// at the edge of the propagating disk.
    Cartesian,
}

impl Default for Parameterization {
    fn default() -> Self {
        Parameterization::Spherical
    }
}

/// Physical parameters of the beam, in the length units of the host solver
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BeamParameters {
    /// Wavenumber in the medium of incidence
    pub wavenumber: f64,
    /// Beam waist
    pub waist: f64,
    /// Topological charge of the vortex, zero for a plain Gaussian beam
    pub vortex_charge: i32,
    /// Position of the source plane along the direction of propagation,
    /// relative to the waist. Negative if the source is before the focus.
    pub offset: f64,
}

/// A source that launches a focused beam, with its waist at a given
/// distance from the source plane. The amplitude at each point of the
/// plane is the angular-spectrum integral of the beam, normalized so that
/// a Gaussian beam has unit amplitude at the center of its waist.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BeamSource {
    params: BeamParameters,
    spectrum: Spectrum,
    accuracy: Accuracy,
    parameterization: Parameterization,
    polarization: JonesVector,
    norm: f64,
}

impl BeamSource {
    /// Creates a new source, checking the beam parameters and the
    /// accuracy controls. The source is s-polarized and uses the
    /// spherical parameterization unless otherwise specified.
    pub fn new(params: BeamParameters, accuracy: Accuracy) -> Result<Self, BeamError> {
        let k = params.wavenumber;
        if !k.is_finite() || k <= 0.0 {
            return Err(BeamError::Wavenumber(k));
        }

        if !params.waist.is_finite() || params.waist <= 0.0 {
            return Err(BeamError::Waist(params.waist));
        }

        if params.vortex_charge.checked_abs().is_none() {
            return Err(BeamError::VortexCharge(params.vortex_charge));
        }

        if !params.offset.is_finite() {
            return Err(BeamError::Offset(params.offset));
        }

        if !accuracy.tolerance().is_finite() || accuracy.tolerance() <= 0.0 {
            return Err(BeamError::Tolerance(accuracy.tolerance()));
        }

        if accuracy.max_evals() < MIN_EVAL_BUDGET {
            return Err(BeamError::Budget(accuracy.max_evals()));
        }

        let norm = k * k * Gaussian::new(k, params.waist).total_weight();

        Ok(Self {
            params,
            spectrum: Spectrum::for_charge(k, params.waist, params.vortex_charge),
            accuracy,
            parameterization: Parameterization::default(),
            polarization: JonesVector::default(),
            norm,
        })
    }

    /// Selects how the plane-wave components are parameterized.
    pub fn with_parameterization(self, parameterization: Parameterization) -> Self {
        Self {
            parameterization,
            ..self
        }
    }

    /// Sets the polarization of the beam, which is normalized to unity.
    pub fn with_polarization(self, polarization: JonesVector) -> Result<Self, BeamError> {
        let polarization = polarization.normalize().ok_or(BeamError::Polarization)?;
        Ok(Self {
            polarization,
            ..self
        })
    }

    pub fn parameters(&self) -> &BeamParameters {
        &self.params
    }

    pub fn accuracy(&self) -> &Accuracy {
        &self.accuracy
    }

    pub fn parameterization(&self) -> Parameterization {
        self.parameterization
    }

    pub fn polarization(&self) -> JonesVector {
        self.polarization
    }

    /// Returns the normalized amplitude of the beam at transverse position
    /// (y, z) of the source plane, together with its error estimate, the
    /// number of integrand evaluations and whether it converged.
    pub fn evaluate(&self, y: f64, z: f64) -> Integral {
        let target = Target::new(self.params.offset, y, z);
        match (self.parameterization, &self.spectrum) {
            (Parameterization::Spherical, Spectrum::Gaussian(gauss)) => self.integrate_radial(gauss, target),
            (Parameterization::Spherical, Spectrum::LaguerreGauss(lg)) => self.integrate_spherical(lg, target),
            (Parameterization::Cartesian, spectrum) => self.integrate_cartesian(spectrum, target),
        }
    }

    /// The normalized amplitude at (y, z)
    pub fn amplitude(&self, y: f64, z: f64) -> Complex64 {
        self.evaluate(y, z).value
    }

    /// The amplitude of the given polarization component at (y, z)
    pub fn component_amplitude(&self, component: Component, y: f64, z: f64) -> Complex64 {
        let coeff = self.polarization.coefficient(component);
        if coeff == Complex64::new(0.0, 0.0) {
            coeff
        } else {
            coeff * self.amplitude(y, z)
        }
    }

    /// Returns the amplitude of `component` as a function of transverse
    /// position, suitable for handing to the host solver.
    pub fn amplitude_function(&self, component: Component) -> impl Fn(f64, f64) -> Complex64 + '_ {
        move |y, z| self.component_amplitude(component, y, z)
    }

    /// The polarization components that need a source
    pub fn active_components(&self) -> Vec<Component> {
        self.polarization.active_components()
    }

    /// The mirror symmetry of the beam, if any
    pub fn symmetry(&self) -> Option<Mirror> {
        self.polarization.mirror_symmetry(self.params.vortex_charge)
    }

    /// Accuracy for an integral that is scaled by `factor` after integration,
    /// with an absolute floor set relative to the peak amplitude of the beam.
    fn accuracy_for(&self, factor: f64) -> Accuracy {
        let floor = self.accuracy.tolerance() * ABSOLUTE_ERROR_FLOOR / factor;
        self.accuracy.with_absolute_tolerance(floor.max(self.accuracy.abs_tolerance()))
    }

    /// Integrates over theta only, the azimuthal integral being done analytically.
    fn integrate_radial<S: SpectralDistribution>(&self, spectrum: &S, target: Target) -> Integral {
        let k = self.params.wavenumber;
        let integrand = PhaseIntegrand::new(spectrum, k, target);
        let factor = k * k / self.norm;
        quadrature::integrate_1d(
            |theta| integrand.radial(theta),
            0.0, consts::FRAC_PI_2,
            &self.accuracy_for(factor),
        ).scaled_by(factor)
    }

    /// Integrates over the forward hemisphere.
    fn integrate_spherical<S: SpectralDistribution>(&self, spectrum: &S, target: Target) -> Integral {
        let k = self.params.wavenumber;
        let integrand = PhaseIntegrand::new(spectrum, k, target);
        let factor = k * k / self.norm;
        quadrature::integrate_2d(
            |theta, phi| integrand.spherical(theta, phi),
            0.0, consts::FRAC_PI_2,
            0.0, 2.0 * consts::PI,
            |_, _| true,
            &self.accuracy_for(factor),
        ).scaled_by(factor)
    }

    /// Integrates over the transverse wavevector, excluding evanescent components.
    fn integrate_cartesian<S: SpectralDistribution>(&self, spectrum: &S, target: Target) -> Integral {
        let k = self.params.wavenumber;
        let integrand = PhaseIntegrand::new(spectrum, k, target);
        let factor = 1.0 / self.norm;
        quadrature::integrate_2d(
            |k_y, k_z| integrand.cartesian(k_y, k_z),
            -k, k,
            -k, k,
            |k_y, k_z| k_y * k_y + k_z * k_z <= k * k,
            &self.accuracy_for(factor),
        ).scaled_by(factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::LaguerreGauss;
    use crate::geometry::Axis;

    const K: f64 = 10.0 * consts::PI;

    fn source(offset: f64, vortex_charge: i32, tolerance: f64, max_evals: usize) -> BeamSource {
        let params = BeamParameters {
            wavenumber: K,
            waist: 0.8 / K,
            vortex_charge,
            offset,
        };
        BeamSource::new(params, Accuracy::new(tolerance, max_evals)).unwrap()
    }

    #[test]
    fn unit_amplitude_at_waist() {
        let src = source(0.0, 0, 1.0e-4, 10_000);
        let result = src.evaluate(0.0, 0.0);
        println!("psi(0, 0) = {:.12e} [{} evals, converged = {}]", result.value, result.evals, result.converged);
        assert!(result.converged);
        assert!((result.value.re - 1.0).abs() < 1.0e-6);
        assert!(result.value.im.abs() < 1.0e-12);
    }

    #[test]
    fn displaced_waist() {
        let src = source(-2.15, 0, 1.0e-4, 10_000);
        let target = Complex64::new(-0.03243888432104695, 0.0006260251819249563);
        let result = src.evaluate(0.0, 0.0);
        let error = (result.value - target).norm();
        println!("psi = {:.9e}, expected {:.9e}, error = {:.3e} [{} evals]", result.value, target, error, result.evals);
        assert!(result.converged);
        assert!(result.evals <= 10_000);
        assert!(error < 1.0e-6);
        assert!(result.value.norm() < 1.0);
    }

    #[test]
    fn axisymmetric_shortcut() {
        // the same Gaussian beam, integrated over both angles
        let src = source(-2.15, 0, 1.0e-4, 100_000);
        let target = Target::new(-2.15, 0.3, 0.0);
        let lg = LaguerreGauss::new(K, 0.8 / K, 0);
        let fast = src.evaluate(0.3, 0.0);
        let full = src.integrate_spherical(&lg, target);
        let error = (fast.value - full.value).norm();
        println!("fast = {:.9e} [{} evals], full = {:.9e} [{} evals], diff = {:.3e}", fast.value, fast.evals, full.value, full.evals, error);
        assert!(fast.evals < full.evals);
        assert!(error < 1.0e-6);
        let expected = Complex64::new(-0.02441806788044639, 0.019543084445891444);
        assert!((fast.value - expected).norm() < 1.0e-6);
    }

    #[test]
    fn larger_budget_is_more_accurate() {
        let target = Complex64::new(-0.03243888432104695, 0.0006260251819249563);
        let lg = LaguerreGauss::new(K, 0.8 / K, 0);
        let mut last = f64::INFINITY;
        for &max_evals in [3_000, 10_000, 30_000, 100_000].iter() {
            let src = source(-2.15, 0, 1.0e-4, max_evals);
            let result = src.integrate_spherical(&lg, Target::new(-2.15, 0.0, 0.0));
            let error = (result.value - target).norm();
            println!("max_evals = {}: psi = {:.9e}, error = {:.3e} [{} evals, converged = {}]", max_evals, result.value, error, result.evals, result.converged);
            assert!(result.evals <= max_evals);
            assert!(error <= last);
            last = error;
        }
        assert!(last < 1.0e-6);
    }

    #[test]
    fn vortex_has_null_on_axis() {
        let src = source(-2.15, 2, 1.0e-4, 100_000);
        let on_axis = src.evaluate(0.0, 0.0);
        println!("|psi(0)| = {:.3e} [{} evals]", on_axis.value.norm(), on_axis.evals);
        assert!(on_axis.value.norm() < 1.0e-8);

        let ring: Vec<f64> = [0.05, 0.1, 0.2].iter()
            .map(|&rho| {
                let result = src.evaluate(rho, 0.0);
                println!("|psi({})| = {:.6e} [{} evals, converged = {}]", rho, result.value.norm(), result.evals, result.converged);
                result.value.norm()
            })
            .collect();

        assert!(ring[0] > 1.0e-5);
        assert!(ring[0] < ring[1] && ring[1] < ring[2]);
        assert!((ring[2] - 5.49e-4).abs() < 1.0e-5);
    }

    #[test]
    fn vortex_phase_winds_with_charge() {
        // psi(rho, alpha) ~ exp(i m alpha)
        let src = source(-2.15, 1, 1.0e-4, 100_000);
        let a = src.amplitude(0.1, 0.0);
        let b = src.amplitude(0.0, 0.1);
        let ratio = b / a;
        println!("psi(0.1, 0) = {:.6e}, psi(0, 0.1) = {:.6e}, ratio = {:.6e}", a, b, ratio);
        assert!((ratio.norm() - 1.0).abs() < 1.0e-3);
        assert!((ratio.arg().abs() - consts::FRAC_PI_2).abs() < 1.0e-3);
    }

    #[test]
    fn gaussian_is_axisymmetric() {
        let src = source(-2.15, 0, 1.0e-4, 10_000);
        let a = src.amplitude(0.2, 0.1);
        let b = src.amplitude(-0.2, 0.1);
        let c = src.amplitude(0.2, -0.1);
        let d = src.amplitude(0.1, 0.2);
        println!("psi = {:.9e}, {:.9e}, {:.9e}, {:.9e}", a, b, c, d);
        assert!((a - b).norm() < 1.0e-12);
        assert!((a - c).norm() < 1.0e-12);
        assert!((a - d).norm() < 1.0e-10);
    }

    #[test]
    fn tighter_tolerance_is_consistent() {
        let tol = 1.0e-4;
        let coarse = source(-2.15, 0, tol, 10_000).evaluate(0.2, 0.1);
        let fine = source(-2.15, 0, 0.5 * tol, 10_000).evaluate(0.2, 0.1);
        let diff = (coarse.value - fine.value).norm();
        println!("coarse = {:.9e}, fine = {:.9e}, diff = {:.3e}", coarse.value, fine.value, diff);
        assert!(coarse.converged && fine.converged);
        assert!(diff <= tol * fine.value.norm());
    }

    #[test]
    fn paraxial_limit() {
        // for k w >> 1, |psi| = 1 / sqrt(1 + (x / z_R)^2), z_R = k w^2 / 2
        let k = 2.0 * consts::PI;
        let w = 8.0 / k;
        let z_r = 0.5 * k * w * w;
        for &x in [-0.5, -1.0, -2.15].iter() {
            let params = BeamParameters {
                wavenumber: k,
                waist: w,
                vortex_charge: 0,
                offset: x,
            };
            let src = BeamSource::new(params, Accuracy::new(1.0e-6, 10_000)).unwrap();
            let value = src.amplitude(0.0, 0.0).norm();
            let target = 1.0 / (1.0 + (x / z_r).powi(2)).sqrt();
            let error = (value - target).abs() / target;
            println!("x = {}: |psi| = {:.6}, paraxial = {:.6}, error = {:.3e}", x, value, target, error);
            assert!(error < 0.03);
        }
    }

    #[test]
    fn cartesian_parameterization() {
        let src = source(0.0, 0, 1.0e-4, 10_000)
            .with_parameterization(Parameterization::Cartesian);
        let result = src.evaluate(0.0, 0.0);
        println!("psi(0, 0) = {:.6e} [{} evals]", result.value, result.evals);
        assert!(result.evals <= 10_000);
        assert!((result.value - 1.0).norm() < 0.05);
    }

    #[test]
    fn budget_is_respected() {
        let src = source(-2.15, 3, 1.0e-10, 1_000);
        let result = src.evaluate(0.1, 0.1);
        println!("psi = {:.6e} [{} evals, converged = {}]", result.value, result.evals, result.converged);
        assert!(result.evals <= 1_000);
        assert!(!result.converged);
        assert!(result.value.re.is_finite() && result.value.im.is_finite());
    }

    #[test]
    fn rejects_bad_configuration() {
        let params = BeamParameters {
            wavenumber: K,
            waist: 0.8 / K,
            vortex_charge: 0,
            offset: -2.15,
        };
        let accuracy = Accuracy::new(1.0e-4, 10_000);

        let bad = BeamParameters { waist: 0.0, ..params };
        assert_eq!(BeamSource::new(bad, accuracy).unwrap_err(), BeamError::Waist(0.0));

        let bad = BeamParameters { wavenumber: -1.0, ..params };
        assert_eq!(BeamSource::new(bad, accuracy).unwrap_err(), BeamError::Wavenumber(-1.0));

        let bad = BeamParameters { vortex_charge: i32::MIN, ..params };
        let err = BeamSource::new(bad, accuracy).unwrap_err();
        println!("{}", err);
        assert_eq!(err, BeamError::VortexCharge(i32::MIN));

        let extreme = BeamParameters { vortex_charge: -i32::MAX, ..params };
        assert!(BeamSource::new(extreme, accuracy).is_ok());

        let bad = BeamParameters { offset: f64::INFINITY, ..params };
        assert!(BeamSource::new(bad, accuracy).is_err());

        let err = BeamSource::new(params, Accuracy::new(0.0, 10_000)).unwrap_err();
        assert_eq!(err, BeamError::Tolerance(0.0));

        let err = BeamSource::new(params, Accuracy::new(1.0e-4, 10)).unwrap_err();
        assert_eq!(err, BeamError::Budget(10));

        let err = BeamSource::new(params, accuracy).unwrap()
            .with_polarization(JonesVector::from_amplitudes(0.0, 0.0, 0.0))
            .unwrap_err();
        assert_eq!(err, BeamError::Polarization);
        println!("{}", err);
    }

    #[test]
    fn polarization_components() {
        let src = source(-2.15, 0, 1.0e-4, 10_000);
        assert_eq!(src.active_components(), vec![Component::S]);
        assert_eq!(src.symmetry(), Some(Mirror {normal: Axis::Z, phase: -1.0}));
        assert_eq!(src.component_amplitude(Component::P, 0.1, 0.0), Complex64::new(0.0, 0.0));

        let src = src
            .with_polarization(JonesVector::from_amplitudes(1.0, 1.0, consts::FRAC_PI_2))
            .unwrap();
        assert_eq!(src.active_components(), vec![Component::S, Component::P]);
        assert_eq!(src.symmetry(), None);

        let psi = src.amplitude(0.1, 0.0);
        let s = src.amplitude_function(Component::S)(0.1, 0.0);
        let p = src.amplitude_function(Component::P)(0.1, 0.0);
        let norm = consts::FRAC_1_SQRT_2;
        println!("psi = {:.6e}, s = {:.6e}, p = {:.6e}", psi, s, p);
        assert!((s - norm * psi).norm() < 1.0e-12);
        assert!((p - Complex64::new(0.0, norm) * psi).norm() < 1.0e-12);

        let vortex = source(-2.15, 1, 1.0e-4, 10_000);
        assert_eq!(vortex.symmetry(), None);
    }
}
