use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use num_complex::Complex64;
use rayon::prelude::*;

use crate::field::BeamSource;
use crate::geometry::Component;
use super::OutputError;

/// A rectangular grid of points on the source plane, centred on the
/// propagation axis. An axis with a single point is collapsed onto zero.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SourceGrid {
    extent: [f64; 2],
    points: [usize; 2],
}

impl SourceGrid {
    /// Creates a grid of `points[0] * points[1]` points, spread
    /// over the side lengths `extent` in y and z respectively.
    pub fn new(extent: [f64; 2], points: [usize; 2]) -> Result<Self, OutputError> {
        let spec = format!("{:?} x {:?}", extent, points);

        if points.iter().any(|&n| n == 0) {
            return Err(OutputError::grid_explained(&spec, "there must be at least one point along each axis"));
        }

        if extent.iter().any(|&l| !l.is_finite() || l < 0.0) {
            return Err(OutputError::grid_explained(&spec, "side lengths must be finite and non-negative"));
        }

        Ok(Self {extent, points})
    }

    /// A single point, on axis
    pub fn point() -> Self {
        Self {
            extent: [0.0; 2],
            points: [1; 2],
        }
    }

    pub fn len(&self) -> usize {
        self.points[0] * self.points[1]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn extent(&self) -> [f64; 2] {
        self.extent
    }

    pub fn points(&self) -> [usize; 2] {
        self.points
    }

    fn axis(length: f64, n: usize) -> Vec<f64> {
        if n == 1 {
            return vec![0.0];
        }

        let step = length / ((n - 1) as f64);
        (0..n)
            .map(|i| -0.5 * length + (i as f64) * step)
            .collect()
    }

    /// The (y, z) coordinates of every grid point, y varying fastest
    pub fn positions(&self) -> Vec<(f64, f64)> {
        let y = Self::axis(self.extent[0], self.points[0]);
        let z = Self::axis(self.extent[1], self.points[1]);
        z.iter()
            .flat_map(|&z| y.iter().map(move |&y| (y, z)))
            .collect()
    }
}

/// The source amplitude at a single grid point
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SamplePoint {
    pub y: f64,
    pub z: f64,
    pub s: Complex64,
    pub p: Complex64,
    pub error: f64,
    pub evals: usize,
    pub converged: bool,
}

impl SamplePoint {
    /// |s|^2 + |p|^2
    pub fn intensity(&self) -> f64 {
        self.s.norm_sqr() + self.p.norm_sqr()
    }
}

/// The source amplitude, for both polarization components,
/// tabulated over a grid on the source plane
#[derive(Clone, Debug)]
pub struct SourceProfile {
    samples: Vec<SamplePoint>,
}

impl SourceProfile {
    /// Evaluates `source` at every point of `grid`, in parallel.
    /// If `progress` is true, a progress bar is shown on stderr.
    pub fn tabulate(source: &BeamSource, grid: &SourceGrid, progress: bool) -> Self {
        let positions = grid.positions();

        let bar = if progress {
            let bar = ProgressBar::new(positions.len() as u64);
            match ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} points (eta {eta})") {
                Ok(style) => bar.with_style(style),
                Err(_) => bar,
            }
        } else {
            ProgressBar::hidden()
        };

        let s_coeff = source.polarization().coefficient(Component::S);
        let p_coeff = source.polarization().coefficient(Component::P);

        let samples: Vec<SamplePoint> = positions.par_iter()
            .progress_with(bar)
            .map(|&(y, z)| {
                let result = source.evaluate(y, z);
                SamplePoint {
                    y,
                    z,
                    s: s_coeff * result.value,
                    p: p_coeff * result.value,
                    error: result.error,
                    evals: result.evals,
                    converged: result.converged,
                }
            })
            .collect();

        Self {samples}
    }

    pub fn samples(&self) -> &[SamplePoint] {
        &self.samples
    }

    /// Number of points where the evaluation budget ran out
    /// before the tolerance was met
    pub fn unconverged(&self) -> usize {
        self.samples.iter().filter(|pt| !pt.converged).count()
    }

    /// Total number of integrand evaluations
    pub fn evals(&self) -> usize {
        self.samples.iter().map(|pt| pt.evals).sum()
    }

    /// Largest amplitude on the grid
    pub fn peak(&self) -> f64 {
        self.samples.iter()
            .map(|pt| pt.intensity().sqrt())
            .fold(0.0, f64::max)
    }

    /// Writes the profile as a whitespace-separated table, one line per
    /// grid point, preceded by a header naming the columns.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "# y z re(s) im(s) re(p) im(p) |psi|^2 converged")?;
        for pt in self.samples.iter() {
            writeln!(
                writer,
                "{:.6e} {:.6e} {:.9e} {:.9e} {:.9e} {:.9e} {:.9e} {}",
                pt.y, pt.z, pt.s.re, pt.s.im, pt.p.re, pt.p.im, pt.intensity(), pt.converged as u8,
            )?;
        }
        Ok(())
    }

    /// Writes the profile to the file at `path`, replacing it if it exists.
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<(), OutputError> {
        let name = path.as_ref().display().to_string();
        let file = File::create(path.as_ref()).map_err(|_| OutputError::Write(name.clone()))?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)
            .and_then(|_| writer.flush())
            .map_err(|_| OutputError::Write(name))
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts;
    use crate::field::BeamParameters;
    use crate::geometry::JonesVector;
    use crate::quadrature::Accuracy;
    use super::*;

    fn source(vortex_charge: i32) -> BeamSource {
        let k = 10.0 * consts::PI;
        let params = BeamParameters {
            wavenumber: k,
            waist: 0.8 / k,
            vortex_charge,
            offset: -2.15,
        };
        BeamSource::new(params, Accuracy::new(1.0e-4, 10_000)).unwrap()
    }

    #[test]
    fn grid_layout() {
        let grid = SourceGrid::new([2.0, 0.0], [5, 1]).unwrap();
        let pos = grid.positions();
        assert_eq!(grid.len(), 5);
        assert_eq!(pos, vec![(-1.0, 0.0), (-0.5, 0.0), (0.0, 0.0), (0.5, 0.0), (1.0, 0.0)]);

        let grid = SourceGrid::new([1.0, 2.0], [2, 3]).unwrap();
        let pos = grid.positions();
        assert_eq!(pos.len(), 6);
        assert_eq!(pos[0], (-0.5, -1.0));
        assert_eq!(pos[1], (0.5, -1.0));
        assert_eq!(pos[5], (0.5, 1.0));

        assert_eq!(SourceGrid::point().positions(), vec![(0.0, 0.0)]);
    }

    #[test]
    fn invalid_grids() {
        assert!(SourceGrid::new([2.0, 0.0], [0, 1]).is_err());
        let err = SourceGrid::new([-1.0, 0.0], [3, 1]).unwrap_err();
        println!("{}", err);
        assert!(SourceGrid::new([f64::NAN, 0.0], [3, 1]).is_err());
    }

    #[test]
    fn line_source() {
        let src = source(0);
        let grid = SourceGrid::new([0.4, 0.0], [5, 1]).unwrap();
        let profile = SourceProfile::tabulate(&src, &grid, false);

        assert_eq!(profile.samples().len(), 5);
        assert_eq!(profile.unconverged(), 0);
        assert!(profile.evals() > 0);

        // s polarized by default
        for pt in profile.samples() {
            assert_eq!(pt.p, Complex64::new(0.0, 0.0));
            assert_eq!(pt.s, src.amplitude(pt.y, pt.z));
        }

        // symmetric about the axis
        let samples = profile.samples();
        let diff = (samples[0].s - samples[4].s).norm();
        println!("psi(-0.2) = {:.6e}, psi(0.2) = {:.6e}", samples[0].s, samples[4].s);
        assert!(diff < 1.0e-9);

        let target = Complex64::new(-0.03243888432104695, 0.0006260251819249563);
        assert!((samples[2].s - target).norm() < 1.0e-6);
        assert!((profile.peak() - samples.iter().map(|pt| pt.s.norm()).fold(0.0, f64::max)).abs() < 1.0e-15);
    }

    #[test]
    fn table_format() {
        let src = source(0)
            .with_polarization(JonesVector::from_amplitudes(1.0, 1.0, 0.0))
            .unwrap();
        let grid = SourceGrid::new([0.2, 0.0], [3, 1]).unwrap();
        let profile = SourceProfile::tabulate(&src, &grid, false);

        let mut buffer: Vec<u8> = Vec::new();
        profile.write_to(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        println!("{}", text);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "# y z re(s) im(s) re(p) im(p) |psi|^2 converged");

        for (line, pt) in lines[1..].iter().zip(profile.samples()) {
            let columns: Vec<f64> = line.split_whitespace()
                .map(|s| s.parse::<f64>().unwrap())
                .collect();
            assert_eq!(columns.len(), 8);
            assert!((columns[0] - pt.y).abs() < 1.0e-6);
            // equal s and p amplitudes
            assert_eq!(columns[2], columns[4]);
            assert_eq!(columns[3], columns[5]);
            assert!((columns[6] - pt.intensity()).abs() <= 1.0e-8 * pt.intensity());
            assert_eq!(columns[7], 1.0);
        }
    }
}
