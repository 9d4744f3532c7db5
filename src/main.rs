use std::error::Error;
use std::path::Path;

use colored::Colorize;

use vortex_source::field::Parameterization;
use vortex_source::geometry::Axis;
use vortex_source::input::Config;
use vortex_source::output::SourceProfile;
use vortex_source::setup::Setup;

pub enum Diagnostic {
    Warning,
    Error,
}

macro_rules! report {
    ($diag:expr, $condition:expr, $($arg:tt)*) => {
        if $condition {
            match $diag {
                Diagnostic::Warning => eprintln!("{} {}", "Warning:".bold().yellow(), format!($($arg)*)),
                Diagnostic::Error => eprintln!("{} {}", "Error:".bold().red(), format!($($arg)*)),
            }
        }
    };
}

fn run(path: &str) -> Result<(), Box<dyn Error>> {
    let mut input = Config::from_file(Path::new(path))?;
    input.with_context("constants")?;
    let setup = Setup::from_config(&input)?;

    println!("{} configuration from {}...", "Loaded".bold().cyan(), path.bold().blue());
    println!("\t* n1 = {}, n2 = {}", setup.n1, setup.n2);
    match setup.critical_angle() {
        Some(angle) => println!("\t* critical angle = {:.3} deg, Brewster angle = {:.3} deg", angle, setup.brewster_angle()),
        None => println!("\t* no critical angle, Brewster angle = {:.3} deg", setup.brewster_angle()),
    }
    println!("\t* kw_0 = {}, kr_w = {} (reference medium: {})", setup.kw_0, setup.kr_w, setup.reference);
    println!("\t* k_vac = {:.6}, k = {:.6}", setup.vacuum_wavenumber(), setup.wavenumber());
    println!("\t* waist = {:.6}, waist to interface = {:.6}", setup.waist(), setup.waist_distance());
    println!("\t* source at {}, {:.6} from the waist", setup.position, setup.offset());
    let source = setup.build()?;
    println!("\t* vortex charge = {}", source.parameters().vortex_charge);

    let components: Vec<String> = source.active_components()
        .iter()
        .map(|c| format!("{} ({})", c, c.field_component()))
        .collect();
    println!("\t* polarization: {}", components.join(" and "));

    match source.symmetry() {
        Some(mirror) => {
            let plane = match mirror.normal {
                Axis::Y => "y",
                Axis::Z => "z",
            };
            let parity = if mirror.phase < 0.0 { "odd" } else { "even" };
            println!("\t* field is {} under reflection {} -> -{}", parity, plane, plane);
        },
        None => println!("\t* no mirror symmetry"),
    }

    report!(
        Diagnostic::Warning,
        source.parameterization() == Parameterization::Cartesian,
        "cartesian parameterization selected, expect errors at the percent level."
    );

    if let Some((y, z)) = setup.probe {
        let result = source.evaluate(y, z);
        println!(
            "{} psi({}, {}) = {:.9e} (error {:.3e}, {} evaluations{})",
            "Probe:".bold(), y, z, result.value, result.error, result.evals,
            if result.converged { "" } else { ", not converged" },
        );
        for c in source.active_components() {
            println!("\t* {} = {:.9e}", c.field_component(), source.component_amplitude(c, y, z));
        }
    }

    let [ny, nz] = setup.grid.points();
    println!("{} source amplitude on {} x {} points...", "Tabulating".bold().cyan(), ny, nz);
    let profile = SourceProfile::tabulate(&source, &setup.grid, true);

    report!(
        Diagnostic::Warning,
        profile.unconverged() > 0,
        "{} of {} points did not reach a relative error of {:.1e} within {} evaluations.",
        profile.unconverged(), profile.samples().len(), source.accuracy().tolerance(), source.accuracy().max_evals()
    );

    profile.write_file(&setup.output)?;

    println!(
        "{} peak amplitude {:.6} after {} evaluations, written to {}.",
        "Completed:".bold().bright_green(), profile.peak(), profile.evals(), setup.output.bold().blue()
    );

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();

    let path = match args.get(1) {
        Some(path) => path,
        None => {
            report!(Diagnostic::Error, true, "no input file specified.");
            return Err("Usage: vortex-source input-file".into());
        }
    };

    run(path)
}
