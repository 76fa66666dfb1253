use anyhow::{bail, Context, Result};
use fermisurf::arguments::{Args, ClapApp, SymmetrySource};
use fermisurf::band::Band;
use fermisurf::io::{self, energy, klist, outputkgen, scf2, structfile};
use fermisurf::isosurface;
use fermisurf::kmesh::Kmesh;
use fermisurf::kpoint::KPoint;
use fermisurf::progress::Bar;
use fermisurf::symmetry::SymmetryOperation;
use fermisurf::zone::{expand_ibz, ExpandOptions};

fn main() -> Result<()> {
    // argument parsing
    let app = ClapApp::App.get();
    let args = Args::new(app.get_matches());
    // print splash
    println!("Fermi Surface Extraction ({})", env!("CARGO_PKG_VERSION"));
    println!("Running on {} threads.", args.threads);
    // the iso-energy level, either given directly or read from the log
    let level = match (args.level, &args.scf_file) {
        (Some(level), _) => level,
        (None, Some(filename)) => scf2::read_fermi_energy(filename)
            .with_context(|| format!("Failed to read Fermi energy from {}", filename))?,
        (None, None) => bail!("No energy level supplied"),
    };
    println!("Extracting at energy {}.", level);
    // read the bands
    let mut bands = energy::read_bands(&args.energy_file)
        .with_context(|| format!("Failed to read bands from {}", args.energy_file))?;
    println!("Read {} bands from {}.", bands.len(), args.energy_file);
    // swap the bands onto the coordinates of the k-point list if given
    if let Some(filename) = &args.klist_file {
        let entries = klist::read_klist(filename)
            .with_context(|| format!("Failed to read k-point list from {}", filename))?;
        let coords: Vec<KPoint> =
            entries.iter().map(|entry| entry.to_kpoint()).collect();
        for band in bands.iter_mut() {
            band.map_coords(&coords)
                .with_context(|| format!("Failed to remap band {}", band.id))?;
        }
        println!("Remapped bands onto {} k-points from {}.", coords.len(), filename);
    }
    // collect the symmetry operations
    let operations: Vec<SymmetryOperation> = match &args.symmetry {
        SymmetrySource::Structure(filename) => {
            let structure = structfile::read_structure(filename)
                .with_context(|| format!("Failed to read structure from {}", filename))?;
            println!(
                "Read {} symmetry operations from {} ({} lattice, group {}).",
                structure.operations.len(),
                filename,
                structure.lattice_type,
                structure.space_group
            );
            structure.operations
        }
        SymmetrySource::KpointGenerator(filename) => {
            let operations = outputkgen::read_operations(filename)
                .with_context(|| format!("Failed to read symmetry matrices from {}", filename))?;
            println!("Read {} symmetry matrices from {}.", operations.len(), filename);
            operations
        }
        SymmetrySource::None => vec![],
    };
    for band in bands {
        if band.data.is_empty() {
            continue;
        }
        extract_band(band, &operations, level, &args)?;
    }
    Ok(())
}

/// Expands one band over the full zone, meshes it and writes the extracted
/// surface points, skipping bands the level does not cross.
fn extract_band(
    band: Band,
    operations: &[SymmetryOperation],
    level: f64,
    args: &Args,
) -> Result<()> {
    let rows = if operations.is_empty() {
        band.data
    } else {
        let options = ExpandOptions {
            zone_bounds: Some([1f64; 3]),
            zone_centre: Some([0.5f64; 3]),
            wrap: true,
            sort_by: None,
        };
        expand_ibz(&band.data, operations, &options)
            .with_context(|| format!("Failed to expand band {}", band.id))?
    };
    let mesh = Kmesh::build(&rows)
        .with_context(|| format!("Failed to mesh band {}", band.id))?;
    match mesh.value_range() {
        Some((min, max)) if min <= level && level <= max => (),
        _ => {
            println!("Band {}: not crossed, skipping.", band.id);
            return Ok(());
        }
    }
    let stats = mesh.stats();
    let pbar = Bar::visible(
        mesh.size.x as u64,
        1,
        format!("Band {}: ", band.id),
    );
    let points = isosurface::extract(&mesh, level, &args.interpolation, args.threads, &pbar)
        .with_context(|| format!("Failed to extract the surface of band {}", band.id))?;
    drop(pbar);
    let filename = format!("{}.band{}.dat", args.output, band.id);
    io::write_surface_points(&filename, &points)
        .with_context(|| format!("Failed to write {}", filename))?;
    println!(
        "Band {}: {} surface points written to {} (band mean {:.6}, sd {:.6}).",
        band.id, points.len(), filename, stats.mean, stats.standard_deviation
    );
    Ok(())
}
