//! Derives the beam and source parameters from the physical inputs
//! given in the configuration file

use std::f64::consts;
use std::fmt;
use std::str::FromStr;

use crate::constants::*;
use crate::field::{BeamError, BeamParameters, BeamSource, Parameterization};
use crate::geometry::JonesVector;
use crate::input::{Config, InputError, InputErrorKind};
use crate::output::SourceGrid;
use crate::quadrature::Accuracy;

/// The medium whose wavenumber defines the dimensionless
/// beam width `kw_0` and waist distance `kr_w`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReferenceMedium {
    Vacuum,
    Incident,
    Refracted,
}

impl FromStr for ReferenceMedium {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vacuum" | "0" => Ok(ReferenceMedium::Vacuum),
            "incident" | "1" => Ok(ReferenceMedium::Incident),
            "refracted" | "2" => Ok(ReferenceMedium::Refracted),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ReferenceMedium {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReferenceMedium::Vacuum => write!(f, "vacuum"),
            ReferenceMedium::Incident => write!(f, "incident medium"),
            ReferenceMedium::Refracted => write!(f, "refracted medium"),
        }
    }
}

/// Everything needed to build and sample the source
#[derive(Clone, Debug)]
pub struct Setup {
    /// Vacuum frequency, in units of c / length
    pub frequency: f64,
    pub n1: f64,
    pub n2: f64,
    pub reference: ReferenceMedium,
    pub kw_0: f64,
    pub kr_w: f64,
    pub vortex_charge: i32,
    pub polarization: JonesVector,
    /// Position of the source plane relative to the point of impact
    pub position: f64,
    pub grid: SourceGrid,
    pub accuracy: Accuracy,
    pub parameterization: Parameterization,
    pub output: String,
    pub probe: Option<(f64, f64)>,
}

impl Setup {
    /// Reads the beam, source, integration and output sections of `config`.
    /// Optional keys take their default values if absent.
    pub fn from_config(config: &Config) -> Result<Self, InputError> {
        let frequency: f64 = config.read("beam:frequency")?;
        let n1: f64 = config.read_or("beam:n1", 1.0)?;
        let n2: f64 = config.read_or("beam:n2", 1.0)?;

        let reference: ReferenceMedium = config
            .read_or("beam:reference_medium", "vacuum".to_owned())?
            .parse()
            .map_err(|_| InputError::conversion("beam:reference_medium", "reference_medium"))?;

        let kw_0: f64 = config.read("beam:kw_0")?;
        let kr_w: f64 = config.read_or("beam:kr_w", 0.0)?;
        let vortex_charge: i32 = config.read_or("beam:vortex_charge", 0)?;
        let polarization = Self::read_polarization(config)?;

        let position: f64 = config.read("source:position")?;
        let extent: Vec<f64> = config.read_or("source:extent", vec![2.0, 0.0])?;
        let points: Vec<usize> = config
            .read_or("source:points", vec![101.0, 1.0])?
            .iter()
            .map(|&n: &f64| if n >= 0.0 && n.fract() == 0.0 { Some(n as usize) } else { None })
            .collect::<Option<Vec<usize>>>()
            .ok_or_else(|| InputError::conversion("source:points", "points"))?;

        let grid = match (extent.as_slice(), points.as_slice()) {
            ([ly, lz], [ny, nz]) => SourceGrid::new([*ly, *lz], [*ny, *nz])
                .map_err(|_| InputError::conversion("source", "points"))?,
            ([_, _], _) => return Err(InputError::conversion("source:points", "points")),
            _ => return Err(InputError::conversion("source:extent", "extent")),
        };

        let tolerance: f64 = config.read_or("integration:tolerance", DEFAULT_TOLERANCE)?;
        let max_evals: usize = config.read_or("integration:max_evals", DEFAULT_MAX_EVALS)?;
        let accuracy = Accuracy::new(tolerance, max_evals);

        let parameterization = match config.read_or("integration:parameterization", "spherical".to_owned())?.as_str() {
            "spherical" => Parameterization::Spherical,
            "cartesian" => Parameterization::Cartesian,
            _ => return Err(InputError::conversion("integration:parameterization", "parameterization")),
        };

        let output: String = config.read_or("output:file", "source.dat".to_owned())?;

        let probe = match config.read::<Vec<f64>, _>("output:probe") {
            Ok(v) if v.len() == 2 => Some((v[0], v[1])),
            Ok(_) => return Err(InputError::conversion("output:probe", "probe")),
            Err(e) if e.kind() == InputErrorKind::Location => None,
            Err(e) => return Err(e),
        };

        Ok(Setup {
            frequency,
            n1,
            n2,
            reference,
            kw_0,
            kr_w,
            vortex_charge,
            polarization,
            position,
            grid,
            accuracy,
            parameterization,
            output,
            probe,
        })
    }

    /// Polarization is either 's', 'p', or a pair of real amplitudes [s, p],
    /// with an optional relative phase of the p part.
    fn read_polarization(config: &Config) -> Result<JonesVector, InputError> {
        let phase: f64 = config.read_or("beam:polarization_phase", 0.0)?;

        match config.read::<String, _>("beam:polarization").as_deref() {
            Ok("s") => return Ok(JonesVector::s_polarized()),
            Ok("p") => return Ok(JonesVector::p_polarized()),
            Err(e) if e.kind() == InputErrorKind::Location => return Ok(JonesVector::default()),
            _ => {},
        }

        let amplitudes: Vec<f64> = config.read("beam:polarization")?;
        match amplitudes.as_slice() {
            [s, p] => Ok(JonesVector::from_amplitudes(*s, *p, phase)),
            _ => Err(InputError::conversion("beam:polarization", "polarization")),
        }
    }

    /// k_vac = 2 pi f
    pub fn vacuum_wavenumber(&self) -> f64 {
        2.0 * consts::PI * self.frequency
    }

    /// Refractive index of the reference medium
    pub fn reference_index(&self) -> f64 {
        match self.reference {
            ReferenceMedium::Vacuum => 1.0,
            ReferenceMedium::Incident => self.n1,
            ReferenceMedium::Refracted => self.n2,
        }
    }

    /// Wavenumber in the incident medium, where the source sits
    pub fn wavenumber(&self) -> f64 {
        self.n1 * self.vacuum_wavenumber()
    }

    pub fn waist(&self) -> f64 {
        self.kw_0 / (self.reference_index() * self.vacuum_wavenumber())
    }

    /// Distance from the waist to the interface
    pub fn waist_distance(&self) -> f64 {
        self.kr_w / (self.reference_index() * self.vacuum_wavenumber())
    }

    /// Position of the source plane relative to the waist
    pub fn offset(&self) -> f64 {
        self.position + self.waist_distance()
    }

    /// Critical angle of total internal reflection in degrees,
    /// which only exists if n1 > n2.
    pub fn critical_angle(&self) -> Option<f64> {
        if self.n1 > self.n2 {
            Some((self.n2 / self.n1).asin().to_degrees())
        } else {
            None
        }
    }

    /// Brewster angle in degrees
    pub fn brewster_angle(&self) -> f64 {
        (self.n2 / self.n1).atan().to_degrees()
    }

    pub fn beam_parameters(&self) -> BeamParameters {
        BeamParameters {
            wavenumber: self.wavenumber(),
            waist: self.waist(),
            vortex_charge: self.vortex_charge,
            offset: self.offset(),
        }
    }

    /// Constructs the source described by this setup.
    pub fn build(&self) -> Result<BeamSource, BeamError> {
        BeamSource::new(self.beam_parameters(), self.accuracy)?
            .with_parameterization(self.parameterization)
            .with_polarization(self.polarization)
    }
}
