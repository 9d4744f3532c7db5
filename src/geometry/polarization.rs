//! Defines a polarization state

use std::fmt;
use num_complex::Complex64;

/// One of the two scalar source components. The beam propagates along
/// x in the x-y plane of incidence: the s component is the electric
/// field along z, the p component the electric field along y.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Component {
    S,
    P,
}

impl Component {
    /// Name of the electric field component driven by this source
    pub fn field_component(&self) -> &'static str {
        match self {
            Component::S => "Ez",
            Component::P => "Ey",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Component::S => write!(f, "s"),
            Component::P => write!(f, "p"),
        }
    }
}

/// A coordinate axis transverse to the direction of propagation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Y,
    Z,
}

/// A mirror symmetry of the source: reflection through the plane
/// normal to `normal` maps the electric field onto `phase` times itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mirror {
    pub normal: Axis,
    pub phase: f64,
}

/// A Jones vector, giving the complex amplitudes of the s- and p-polarized
/// parts of the beam
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JonesVector {
    s: Complex64,
    p: Complex64,
}

impl JonesVector {
    /// Creates a new Jones vector with the specified components.
    pub fn new(s: Complex64, p: Complex64) -> Self {
        Self {s, p}
    }

    /// Pure s polarization
    pub fn s_polarized() -> Self {
        Self::new(Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0))
    }

    /// Pure p polarization
    pub fn p_polarized() -> Self {
        Self::new(Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0))
    }

    /// Real amplitudes of the s and p parts, with the p part lagging by `phase`
    pub fn from_amplitudes(s: f64, p: f64, phase: f64) -> Self {
        Self::new(Complex64::new(s, 0.0), Complex64::from_polar(p, phase))
    }

    pub fn norm(&self) -> f64 {
        self.s.norm().hypot(self.p.norm())
    }

    /// Returns the Jones vector scaled to unit norm, or `None`
    /// if neither component is present.
    pub fn normalize(&self) -> Option<Self> {
        let norm = self.norm();
        if norm > 0.0 && norm.is_finite() {
            Some(Self::new(self.s / norm, self.p / norm))
        } else {
            None
        }
    }

    /// The complex amplitude of the given component
    pub fn coefficient(&self, component: Component) -> Complex64 {
        match component {
            Component::S => self.s,
            Component::P => self.p,
        }
    }

    /// The components that carry a non-zero amplitude, at most two,
    /// each of which needs its own source.
    pub fn active_components(&self) -> Vec<Component> {
        [Component::S, Component::P].iter()
            .filter(|&&c| self.coefficient(c) != Complex64::new(0.0, 0.0))
            .copied()
            .collect()
    }

    /// Returns the mirror symmetry of a beam with the given polarization
    /// and vortex charge, if there is one. A beam without vortex charge
    /// and a single polarization component is symmetric under z -> -z:
    /// the s component (normal to the mirror plane) is odd, the p
    /// component (parallel to it) even.
    pub fn mirror_symmetry(&self, vortex_charge: i32) -> Option<Mirror> {
        if vortex_charge != 0 {
            return None;
        }

        match self.active_components().as_slice() {
            [Component::S] => Some(Mirror {normal: Axis::Z, phase: -1.0}),
            [Component::P] => Some(Mirror {normal: Axis::Z, phase: 1.0}),
            _ => None,
        }
    }
}

impl Default for JonesVector {
    fn default() -> Self {
        Self::s_polarized()
    }
}
