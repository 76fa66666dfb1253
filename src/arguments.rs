use crate::isosurface::Interpolation;
use clap::{crate_authors, App, Arg, ArgMatches};

/// Where the symmetry operations come from, if anywhere.
#[derive(Clone)]
pub enum SymmetrySource {
    Structure(String),
    KpointGenerator(String),
    None,
}

/// Create a container for dealing with clap and being able to test arg parsing
pub enum ClapApp {
    App,
}

impl ClapApp {
    /// Create and return the clap::App
    pub fn get(&self) -> App {
        App::new("Fermi Surface Extraction")
            .author(crate_authors!())
            .version("0.2.0")
            .arg(Arg::new("energy")
                .required(true)
                .index(1)
                .help("The band energy file to extract surfaces from."))
            .arg(Arg::new("level")
                .short('l')
                .long("level")
                .takes_value(true)
                .conflicts_with("scf")
                .help("The energy at which to cut the bands.")
                .long_help(
"The iso-energy level at which to extract the surface, in the same unit as the
energy file. Either this or a self-consistency log to pull the Fermi energy
from must be supplied."))
            .arg(Arg::new("scf")
                .short('f')
                .long("scf")
                .takes_value(true)
                .required_unless_present("level")
                .help("Self-consistency log to read the Fermi energy from."))
            .arg(Arg::new("klist")
                .short('k')
                .long("klist")
                .takes_value(true)
                .help("A k-point list giving the coordinates of the k-point ids.")
                .long_help(
"A k-point list file containing the fractional coordinates of every k-point id
in the energy file. When supplied, each band is remapped onto these
coordinates before the mesh is built."))
            .arg(Arg::new("structure")
                .short('s')
                .long("struct")
                .takes_value(true)
                .conflicts_with("kgen")
                .help("Structure file supplying the symmetry operations."))
            .arg(Arg::new("kgen")
                .short('g')
                .long("kgen")
                .takes_value(true)
                .help("K-point generator log supplying the symmetry matrices.")
                .long_help(
"A k-point generator log to read the symmetry matrices from, as an alternative
to the structure file. Singular matrices in the log are skipped. When either
source is given the irreducible points are expanded into the full zone before
surface extraction."))
            .arg(Arg::new("interpolation")
                .short('i')
                .long("interpolation")
                .takes_value(true)
                .possible_value("nearest")
                .possible_value("linear")
                .possible_value("rbf")
                .default_value("linear")
                .ignore_case(false)
                .help("How to locate the surface inside each grid cell.")
                .long_help(
"Nearest emits the origin corner of every cell the surface passes through,
linear interpolates the crossing along each cell edge from its two end point
energies and rbf fits a multiquadric radial-basis-function model over the
whole zone and bisects each edge against it."))
            .arg(Arg::new("precision")
                .short('p')
                .long("precision")
                .takes_value(true)
                .help("Bisection width at which the rbf interpolation stops.")
                .long_help(
"The fraction of a grid cell below which the rbf bisection considers an edge
converged. Defaults to machine epsilon. Has no effect on the other
interpolation methods."))
            .arg(Arg::new("output")
                .short('o')
                .long("output")
                .takes_value(true)
                .default_value("surface")
                .help("Stem of the per-band output files."))
            .arg(Arg::new("threads")
                .short('J')
                .long("threads")
                .takes_value(true)
                .default_value("0")
                .help("Number of threads to distribute the calculation over.")
                .long_help(
"The number of threads to be used by the program. A default value of 0 is used
to allow the program to best decide how to use the available hardware."))
    }
}

/// Holds the arguments passed to the program from the command-line
pub struct Args {
    pub energy_file: String,
    pub level: Option<f64>,
    pub scf_file: Option<String>,
    pub klist_file: Option<String>,
    pub symmetry: SymmetrySource,
    pub interpolation: Interpolation,
    pub output: String,
    pub threads: usize,
}

impl Args {
    /// Initialises the structure from the command-line arguments.
    pub fn new(arguments: ArgMatches) -> Self {
        let energy_file = match arguments.value_of("energy") {
            Some(f) => String::from(f),
            None => String::new(),
        };
        let level = arguments.value_of("level").map(|s| {
            match s.parse::<f64>() {
                Ok(x) => x,
                Err(e) => panic!("Couldn't parse level into float:\n{}", e),
            }
        });
        let scf_file = arguments.value_of("scf").map(String::from);
        let klist_file = arguments.value_of("klist").map(String::from);
        let symmetry = match (
            arguments.value_of("structure"),
            arguments.value_of("kgen"),
        ) {
            (Some(f), _) => SymmetrySource::Structure(String::from(f)),
            (None, Some(f)) => SymmetrySource::KpointGenerator(String::from(f)),
            (None, None) => SymmetrySource::None,
        };
        let precision = match arguments.value_of("precision") {
            Some(s) => match s.parse::<f64>() {
                Ok(x) => x,
                Err(e) => panic!("Couldn't parse precision into float:\n{}", e),
            },
            None => f64::EPSILON,
        };
        let interpolation = match arguments.value_of("interpolation") {
            Some("nearest") => Interpolation::Nearest,
            Some("rbf") => Interpolation::Rbf { precision },
            _ => Interpolation::Linear,
        };
        let output = match arguments.value_of("output") {
            Some(f) => String::from(f),
            None => String::from("surface"),
        };
        // safe to unwrap as threads has a default value of 0
        let threads = match arguments.value_of("threads").unwrap().parse::<usize>() {
            Ok(0) => num_cpus::get(),
            Ok(x) => x,
            Err(e) => panic!("Couldn't parse threads into integer:\n{}", e),
        };
        Self {
            energy_file,
            level,
            scf_file,
            klist_file,
            symmetry,
            interpolation,
            output,
            threads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clapapp_get() {
        let app = ClapApp::App.get();
        assert_eq!(app.get_name(), "Fermi Surface Extraction")
    }

    #[test]
    fn argument_energy_file() {
        let app = ClapApp::App.get();
        let matches = app.get_matches_from(vec!["fsx", "case.energy", "-l", "0.5"]);
        let args = Args::new(matches);
        assert_eq!(args.energy_file, String::from("case.energy"));
        assert_eq!(args.level, Some(0.5));
    }

    #[test]
    #[should_panic]
    fn argument_no_energy_file() {
        let app = ClapApp::App.get();
        let _ = app
            .try_get_matches_from(vec!["fsx"])
            .unwrap_or_else(|e| panic!("An error occurs: {}", e));
    }

    #[test]
    #[should_panic]
    fn argument_no_level_or_scf() {
        let app = ClapApp::App.get();
        let _ = app
            .try_get_matches_from(vec!["fsx", "case.energy"])
            .unwrap_or_else(|e| panic!("An error occurs: {}", e));
    }

    #[test]
    #[should_panic]
    fn argument_level_conflicts_with_scf() {
        let app = ClapApp::App.get();
        let _ = app
            .try_get_matches_from(vec![
                "fsx", "case.energy", "-l", "0.5", "-f", "case.scf2",
            ])
            .unwrap_or_else(|e| panic!("An error occurs: {}", e));
    }

    #[test]
    fn argument_interpolation_default() {
        let app = ClapApp::App.get();
        let matches = app.get_matches_from(vec!["fsx", "case.energy", "-l", "0.5"]);
        let args = Args::new(matches);
        assert!(matches!(args.interpolation, Interpolation::Linear));
    }

    #[test]
    fn argument_interpolation_rbf_precision() {
        let app = ClapApp::App.get();
        let matches = app.get_matches_from(vec![
            "fsx", "case.energy", "-l", "0.5", "-i", "rbf", "-p", "1e-6",
        ]);
        let args = Args::new(matches);
        match args.interpolation {
            Interpolation::Rbf { precision } => assert_eq!(precision, 1e-6),
            _ => panic!("rbf passed but didnt get Rbf"),
        }
    }

    #[test]
    #[should_panic]
    fn argument_interpolation_unknown() {
        let app = ClapApp::App.get();
        let _ = app
            .try_get_matches_from(vec![
                "fsx", "case.energy", "-l", "0.5", "-i", "cubic",
            ])
            .unwrap_or_else(|e| panic!("An error occurs: {}", e));
    }

    #[test]
    fn argument_symmetry_sources() {
        let app = ClapApp::App.get();
        let matches = app.get_matches_from(vec![
            "fsx", "case.energy", "-l", "0.5", "-s", "case.struct",
        ]);
        let args = Args::new(matches);
        assert!(matches!(args.symmetry, SymmetrySource::Structure(_)));
        let app = ClapApp::App.get();
        let matches = app.get_matches_from(vec![
            "fsx", "case.energy", "-l", "0.5", "-g", "case.outputkgen",
        ]);
        let args = Args::new(matches);
        assert!(matches!(args.symmetry, SymmetrySource::KpointGenerator(_)));
    }

    #[test]
    fn argument_threads() {
        let app = ClapApp::App.get();
        let matches = app.get_matches_from(vec![
            "fsx", "case.energy", "-l", "0.5", "-J", "2",
        ]);
        let args = Args::new(matches);
        assert_eq!(args.threads, 2);
        let app = ClapApp::App.get();
        let matches = app.get_matches_from(vec!["fsx", "case.energy", "-l", "0.5"]);
        let args = Args::new(matches);
        assert!(args.threads > 0);
    }

    #[test]
    fn argument_output_default() {
        let app = ClapApp::App.get();
        let matches = app.get_matches_from(vec!["fsx", "case.energy", "-l", "0.5"]);
        let args = Args::new(matches);
        assert_eq!(args.output, String::from("surface"));
    }
}
