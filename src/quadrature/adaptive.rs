use std::cmp::Ordering;
use num_complex::Complex64;

/// Nodes, 5-point and embedded 3-point Clenshaw-Curtis weights on [0, 1]
const CLENSHAW_CURTIS_DATA: [(f64, f64, f64); 5] = [
    (0.0,                1.0 / 30.0, 1.0 / 6.0),
    (0.1464466094067262, 4.0 / 15.0, 0.0),
    (0.5,                2.0 / 5.0,  2.0 / 3.0),
    (0.8535533905932738, 4.0 / 15.0, 0.0),
    (1.0,                1.0 / 30.0, 1.0 / 6.0),
];

/// Nodes, 9-point and embedded 5-point Clenshaw-Curtis weights on [0, 1]
const CLENSHAW_CURTIS_9_DATA: [(f64, f64, f64); 9] = [
    (0.0000000000000000, 0.0079365079365079, 1.0 / 30.0),
    (0.0380602337443566, 0.0731093246080091, 0.0),
    (0.1464466094067262, 0.1396825396825397, 4.0 / 15.0),
    (0.3086582838174551, 0.1808589293602449, 0.0),
    (0.5000000000000000, 0.1968253968253968, 2.0 / 5.0),
    (0.6913417161825449, 0.1808589293602449, 0.0),
    (0.8535533905932738, 0.1396825396825397, 4.0 / 15.0),
    (0.9619397662556434, 0.0731093246080091, 0.0),
    (1.0000000000000000, 0.0079365079365079, 1.0 / 30.0),
];

/// The 9-point nodes of two adjacent halves, scaled to [0, 2]
const CLENSHAW_CURTIS_9_EXTENDED_NODES: [f64; 17] = [
    0.0000000000000000,
    0.0380602337443566,
    0.1464466094067262,
    0.3086582838174551,
    0.5000000000000000,
    0.6913417161825449,
    0.8535533905932738,
    0.9619397662556434,
    1.0000000000000000,
    1.0380602337443566,
    1.1464466094067262,
    1.3086582838174551,
    1.5000000000000000,
    1.6913417161825449,
    1.8535533905932738,
    1.9619397662556434,
    2.0000000000000000,
];

/// Smallest evaluation budget that covers the initial rule of
/// either integrator.
pub const MIN_EVAL_BUDGET: usize = 25;

/// Accuracy controls for the adaptive integrators: a relative
/// tolerance, an optional absolute tolerance, and a hard cap on
/// the number of integrand evaluations.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Accuracy {
    tolerance: f64,
    abs_tolerance: f64,
    max_evals: usize,
}

impl Accuracy {
    pub fn new(tolerance: f64, max_evals: usize) -> Self {
        Self {
            tolerance,
            abs_tolerance: 0.0,
            max_evals,
        }
    }

    /// Also accept the result once the estimated error falls below
    /// `abs_tolerance`, which matters for integrals that vanish.
    pub fn with_absolute_tolerance(self, abs_tolerance: f64) -> Self {
        Self {
            abs_tolerance,
            ..self
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn abs_tolerance(&self) -> f64 {
        self.abs_tolerance
    }

    pub fn max_evals(&self) -> usize {
        self.max_evals
    }

    fn is_met(&self, integral: Complex64, error: Complex64) -> bool {
        let error = error.norm();
        error <= self.tolerance * integral.norm() || error <= self.abs_tolerance
    }
}

/// Best estimate of an integral, together with the estimated
/// absolute error, the number of integrand evaluations used and
/// whether the requested accuracy was met before the budget ran out.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Integral {
    pub value: Complex64,
    pub error: f64,
    pub evals: usize,
    pub converged: bool,
}

impl Integral {
    /// Multiplies the estimate, and its error, by a constant
    pub fn scaled_by(self, factor: f64) -> Self {
        Self {
            value: factor * self.value,
            error: factor.abs() * self.error,
            ..self
        }
    }

    /// Result of an integration whose budget cannot cover a single rule
    fn exhausted() -> Self {
        Self {
            value: Complex64::new(0.0, 0.0),
            error: f64::INFINITY,
            evals: 0,
            converged: false,
        }
    }
}

fn by_error(a: &Complex64, b: &Complex64) -> Ordering {
    a.norm().partial_cmp(&b.norm()).unwrap_or(Ordering::Equal)
}

struct Segment {
    integral: Complex64,
    error: Complex64,
    x: [f64; 2],
    cache: [Complex64; 3],
}

impl Segment {
    const INITIAL_EVALS: usize = 5;
    const PARTITION_EVALS: usize = 14;

    fn new<F>(f: &mut F, x0: f64, x1: f64) -> (Self, usize)
    where F: FnMut(f64) -> Complex64 {
        let mut result = Complex64::new(0.0, 0.0);
        let mut error = Complex64::new(0.0, 0.0);
        let mut cache: [Complex64; 3] = Default::default();

        for (i, (t, w, e)) in CLENSHAW_CURTIS_DATA.iter().enumerate() {
            let z = f(x0 + t * (x1 - x0));
            result += w * (x1 - x0) * z;
            error += e * (x1 - x0) * z;
            // ends and midpoint are reused by the bisection
            if i % 2 == 0 {
                cache[i/2] = z;
            }
        }

        (Self {
            integral: result,
            error: result - error,
            x: [x0, x1],
            cache,
        }, CLENSHAW_CURTIS_DATA.len())
    }

    fn bisect<F>(&self, f: &mut F) -> (Self, Self, usize)
    where F: FnMut(f64) -> Complex64 {
        let mut evals = 0;
        let [x0, x1] = self.x;
        let x_mid = 0.5 * (x0 + x1);
        let mut z: [Complex64; 17] = Default::default();

        // 17 - 3 = 14 evals
        for (i, t) in CLENSHAW_CURTIS_9_EXTENDED_NODES.iter().enumerate() {
            z[i] = if i % 8 == 0 {
                self.cache[i/8]
            } else {
                evals += 1;
                f(x0 + 0.5 * t * (x1 - x0))
            };
        }

        let mut result = [Complex64::new(0.0, 0.0); 2];
        let mut error = [Complex64::new(0.0, 0.0); 2];
        let dx = 0.5 * (x1 - x0);

        for c in 0..2 {
            for (i, (_, w, e)) in CLENSHAW_CURTIS_9_DATA.iter().enumerate() {
                let val = z[i+8*c];
                result[c] += w * dx * val;
                error[c] += e * dx * val;
            }
        }

        let left = Segment {
            integral: result[0],
            error: result[0] - error[0],
            x: [x0, x_mid],
            cache: [z[0], z[4], z[8]],
        };

        let right = Segment {
            integral: result[1],
            error: result[1] - error[1],
            x: [x_mid, x1],
            cache: [z[8], z[12], z[16]],
        };

        (left, right, evals)
    }
}

struct Region {
    integral: Complex64,
    error: Complex64,
    x: [f64; 2],
    y: [f64; 2],
    cache: [[Complex64; 3]; 3],
}

impl Region {
    const INITIAL_EVALS: usize = 25;
    const PARTITION_EVALS: usize = 17 * 17 - 9;

    fn partition<F, R>(&self, f: &mut F, region_function: &mut R) -> (Self, Self, Self, Self, usize)
    where F: FnMut(f64, f64) -> Complex64, R: FnMut(f64, f64) -> bool {
        let mut evals = 0;
        let [x0, x1] = self.x;
        let [y0, y1] = self.y;
        let x_mid = 0.5 * (x0 + x1);
        let y_mid = 0.5 * (y0 + y1);
        let mut z: [[Complex64; 17]; 17] = Default::default();

        // build 17x17 array of function values, corners and midpoints are cached
        for (i, ty) in CLENSHAW_CURTIS_9_EXTENDED_NODES.iter().enumerate() {
            let y = y0 + 0.5 * ty * (y1 - y0);
            for (j, tx) in CLENSHAW_CURTIS_9_EXTENDED_NODES.iter().enumerate() {
                let x = x0 + 0.5 * tx * (x1 - x0);
                z[i][j] = if i % 8 == 0 && j % 8 == 0 {
                    self.cache[i/8][j/8]
                } else if region_function(x, y) {
                    evals += 1;
                    f(x, y)
                } else {
                    Complex64::new(0.0, 0.0)
                };
            }
        }

        let mut result = [Complex64::new(0.0, 0.0); 4];
        let mut error = [Complex64::new(0.0, 0.0); 4];
        let dy = 0.5 * (y1 - y0);
        let dx = 0.5 * (x1 - x0);

        for r in 0..2 {
            for c in 0..2 {
                for (i, (_, wy, ey)) in CLENSHAW_CURTIS_9_DATA.iter().enumerate() {
                    for (j, (_, wx, ex)) in CLENSHAW_CURTIS_9_DATA.iter().enumerate() {
                        let val = z[i+8*r][j+8*c];
                        result[2*r+c] += wx * wy * dx * dy * val;
                        error[2*r+c] += ex * ey * dx * dy * val;
                    }
                }
            }
        }

        let child = |r: usize, c: usize| -> Region {
            let (xa, xb) = if c < 1 { (x0, x_mid) } else { (x_mid, x1) };
            let (ya, yb) = if r < 1 { (y0, y_mid) } else { (y_mid, y1) };
            let mut cache: [[Complex64; 3]; 3] = Default::default();
            for (p, row) in cache.iter_mut().enumerate() {
                for (q, val) in row.iter_mut().enumerate() {
                    *val = z[8*r + 4*p][8*c + 4*q];
                }
            }
            Region {
                integral: result[2*r+c],
                error: result[2*r+c] - error[2*r+c],
                x: [xa, xb],
                y: [ya, yb],
                cache,
            }
        };

        (child(0, 0), child(0, 1), child(1, 0), child(1, 1), evals)
    }

    fn new<F, R>(f: &mut F, region_function: &mut R, x0: f64, x1: f64, y0: f64, y1: f64) -> (Self, usize)
    where F: FnMut(f64, f64) -> Complex64, R: FnMut(f64, f64) -> bool {
        let mut evals = 0;
        let mut result = Complex64::new(0.0, 0.0);
        let mut error = Complex64::new(0.0, 0.0);
        let mut cache: [[Complex64; 3]; 3] = Default::default();

        // need to evaluate f(x, y) 5x5 = 25 times, of which 9 can be reused later

        for (i, (t1, w1, e1)) in CLENSHAW_CURTIS_DATA.iter().enumerate() {
            let y = y0 + t1 * (y1 - y0);
            for (j, (t2, w2, e2)) in CLENSHAW_CURTIS_DATA.iter().enumerate() {
                let x = x0 + t2 * (x1 - x0);
                let z = if region_function(x, y) { evals += 1; f(x, y) } else { Complex64::new(0.0, 0.0) };
                result += w1 * w2 * (y1 - y0) * (x1 - x0) * z;
                error += e1 * e2 * (y1 - y0) * (x1 - x0) * z;

                // store function for future use
                if i % 2 == 0 && j % 2 == 0 {
                    cache[i/2][j/2] = z;
                }
            }
        }

        (Self {
            integral: result,
            error: result - error,
            x: [x0, x1],
            y: [y0, y1],
            cache,
        }, evals)
    }
}

/// Integrates a complex function of one variable `f(x)` over `x0 < x < x1`.
///
/// The interval with the largest error estimate is bisected until either
/// the accuracy target is met or a further bisection would exceed the
/// evaluation budget, in which case the best estimate so far is returned
/// with `converged == false`.
pub fn integrate_1d<F>(mut f: F, x0: f64, x1: f64, accuracy: &Accuracy) -> Integral
where F: FnMut(f64) -> Complex64 {
    if accuracy.max_evals < Segment::INITIAL_EVALS {
        return Integral::exhausted();
    }

    let (segment, mut count) = Segment::new(&mut f, x0, x1);
    let mut segments: Vec<Segment> = Vec::with_capacity(16);
    segments.push(segment);

    loop {
        let (integral, error) = segments.iter().fold(
            (Complex64::new(0.0, 0.0), Complex64::new(0.0, 0.0)),
            |acc, s| (acc.0 + s.integral, acc.1 + s.error)
        );

        let converged = accuracy.is_met(integral, error);
        if converged || count + Segment::PARTITION_EVALS > accuracy.max_evals {
            return Integral {
                value: integral,
                error: error.norm(),
                evals: count,
                converged,
            };
        }

        // largest error is always last
        if let Some(segment) = segments.pop() {
            let (left, right, evals) = segment.bisect(&mut f);
            count += evals;
            segments.push(left);
            segments.push(right);
        }

        segments.sort_by(|a, b| by_error(&a.error, &b.error));
    }
}

/// Integrates a complex function of two variables `f(x, y)` over a rectangular domain
/// `x0 < x < x1` and `y0 < y < y1`, returning an answer that should be accurate to
/// within the relative tolerance of `accuracy`.
///
/// Points where `region_function(x, y)` is false are not evaluated and contribute
/// zero. The adaptive integrator stops when either the tolerance condition is met or
/// another subdivision would exceed the evaluation budget.
pub fn integrate_2d<F, R>(mut f: F, x0: f64, x1: f64, y0: f64, y1: f64, mut region_function: R, accuracy: &Accuracy) -> Integral
where F: FnMut(f64, f64) -> Complex64, R: FnMut(f64, f64) -> bool {
    if accuracy.max_evals < Region::INITIAL_EVALS {
        return Integral::exhausted();
    }

    let (region, mut count) = Region::new(&mut f, &mut region_function, x0, x1, y0, y1);
    let mut regions: Vec<Region> = Vec::with_capacity(16);
    regions.push(region);

    loop {
        let (integral, error) = regions.iter().fold(
            (Complex64::new(0.0, 0.0), Complex64::new(0.0, 0.0)),
            |acc, e| (acc.0 + e.integral, acc.1 + e.error)
        );

        let converged = accuracy.is_met(integral, error);
        if converged || count + Region::PARTITION_EVALS > accuracy.max_evals {
            return Integral {
                value: integral,
                error: error.norm(),
                evals: count,
                converged,
            };
        }

        // grab the region with the largest error
        if let Some(region) = regions.pop() {
            // partition into four sub regions
            let (bl, br, tl, tr, evals) = region.partition(&mut f, &mut region_function);
            count += evals;
            regions.push(bl);
            regions.push(br);
            regions.push(tl);
            regions.push(tr);
        }

        // prep for next partition
        regions.sort_by(|a, b| by_error(&a.error, &b.error));
    }
}
