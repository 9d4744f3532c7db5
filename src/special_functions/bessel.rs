//! Evaluates the Bessel function of the first kind, J_0(x), for real x.

use std::f64::consts;

pub trait BesselJ0 {
    /// Evaluates the Bessel J function of order zero
    fn j0(&self) -> Self;
}

impl BesselJ0 for f64 {
    fn j0(&self) -> Self {
        j0(self.abs())
    }
}

/// Number of panels used by the trapezoidal rule over a quarter period
const QUARTER_PANELS: usize = 16;

fn j0(x: f64) -> f64 {
    if x < 0.1 {
        // Fractional error < 1.0e-9
        1.0 - x * x / 4.0 + x * x * x * x / 64.0
    } else if x < 25.0 {
        // J_0(x) = (2/pi) int_0^{pi/2} cos(x sin t) dt. The integrand is
        // smooth and periodic, so the trapezoidal rule converges
        // exponentially once the number of nodes exceeds ~x
        let h = consts::FRAC_PI_2 / (QUARTER_PANELS as f64);
        let interior: f64 = (1..QUARTER_PANELS)
            .map(|j| (x * (h * j as f64).sin()).cos())
            .sum();
        (0.5 * (1.0 + x.cos()) + interior) / (QUARTER_PANELS as f64)
    } else if x < 60.0 {
        // Asymptotic expansion
        let prefactor = (2.0 / (consts::PI * x)).sqrt();
        let phase = consts::FRAC_PI_4 - x;
        prefactor * (
            (1.0 - 9.0 / (128.0 * x * x) + 3675.0 / (32768.0 * x * x * x * x) - 0.5725014209747314 * x.powi(-6)) * phase.cos()
            - (1.0 / (8.0 * x) - 75.0 / (1024.0 * x * x * x) + 0.2271080017089844 * x.powi(-5)) * phase.sin()
        )
    } else {
        // Asymptotic expansion
        let prefactor = (2.0 / (consts::PI * x)).sqrt();
        let phase = consts::FRAC_PI_4 - x;
        prefactor * (
            (1.0 - 9.0 / (128.0 * x * x) + 3675.0 / (32768.0 * x * x * x * x)) * phase.cos()
            - (1.0 / (8.0 * x) - 75.0 / (1024.0 * x * x * x)) * phase.sin()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    static MAX_ERROR: f64 = 1.0e-8;

    #[test]
    fn j0_0_05() {
        let target = 0.999375097649471;
        let value = 0.05f64.j0();
        let error = (target - value).abs() / target;
        println!("J(0, {}) = {:.6e}, expected {:.6e}, error {:.3e}", 0.05, value, target, error);
        assert!(error < MAX_ERROR);
    }

    #[test]
    fn j0_1_2() {
        let target = 0.6711327442643626735;
        let value = 1.2f64.j0();
        let error = (target - value).abs() / target;
        println!("J(0, {}) = {:.6e}, expected {:.6e}, error {:.3e}", 1.2, value, target, error);
        assert!(error < MAX_ERROR);
    }

    #[test]
    fn j0_12() {
        let target = 0.047689310796833536624;
        let value = 12.0f64.j0();
        let error = (target - value).abs() / target;
        println!("J(0, {}) = {:.6e}, expected {:.6e}, error {:.3e}", 12.0, value, target, error);
        assert!(error < MAX_ERROR);
    }

    #[test]
    fn j0_24_9() {
        let target = 0.08324596835301531;
        let value = 24.9f64.j0();
        let error = (target - value).abs() / target;
        println!("J(0, {}) = {:.6e}, expected {:.6e}, error {:.3e}", 24.9, value, target, error);
        assert!(error < MAX_ERROR);
    }

    #[test]
    fn j0_30() {
        let target = -0.08636798358104016;
        let value = 30.0f64.j0();
        let error = (target - value).abs() / target.abs();
        println!("J(0, {}) = {:.6e}, expected {:.6e}, error {:.3e}", 30.0, value, target, error);
        assert!(error < MAX_ERROR);
    }

    #[test]
    fn j0_120() {
        let target = 0.0718234158291561276;
        let value = 120.0f64.j0();
        let error = (target - value).abs() / target;
        println!("J(0, {}) = {:.6e}, expected {:.6e}, error {:.3e}", 120.0, value, target, error);
        assert!(error < MAX_ERROR);
    }

    #[test]
    fn trapezoid_matches_series() {
        // sum_k (-1)^k (x/2)^2k / (k!)^2, fine in f64 for x < 8
        let series = |x: f64| -> f64 {
            let mut term = 1.0;
            let mut sum = 1.0;
            for k in 1..60 {
                term *= -0.25 * x * x / ((k * k) as f64);
                sum += term;
            }
            sum
        };

        let max_error = (1..80)
            .map(|i| 0.1 * (i as f64))
            .map(|x| (x.j0() - series(x)).abs())
            .fold(0.0, f64::max);
        println!("max |J0 - series| on [0.1, 7.9] = {:.3e}", max_error);
        assert!(max_error < 1.0e-12);
    }

    #[test]
    fn even() {
        let x = 7.3f64;
        assert_eq!(x.j0(), (-x).j0());
    }
}
