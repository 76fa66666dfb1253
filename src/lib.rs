//! A multi-threaded toolkit for post-processing band-structure calculations:
//! expanding irreducible k-point sets over the symmetry operations of the
//! crystal, meshing the sampled energies onto a regular grid and extracting
//! iso-energy (Fermi) surfaces from them.
//!
//! ## Installing the binary
//! ### From Source
//! Compiling from source creates the ./target/release/fsx executable.
//! ```sh
//! $ cargo build --release
//! ```
//! From here you can either move or link the binary to a folder in your path.
//! ```sh
//! $ mv ./target/release/fsx ~/bin
//! ```
//! ## Usage
//! The program takes a band energy file as input, cuts every band at a chosen
//! energy and writes one file of surface points per crossed band. The cutting
//! level can be given directly or read from a self-consistency log, and the
//! irreducible wedge is expanded to the full zone when a symmetry source is
//! supplied.
//! ```sh
//! $ fsx case.energy -f case.scf2 -k case.klist -s case.struct
//! ```
//! The surface can be located by nearest-corner or linear edge interpolation,
//! or by bisecting against a radial-basis-function fit of the whole zone.
//! ```sh
//! $ fsx case.energy -l 0.5 -i rbf -J 4
//! ```
//! For a detailed list of usage options run
//! ```sh
//! $ fsx --help
//! ```
//! ## License
//! MIT

/// For parsing command-line arguments.
pub mod arguments;
/// Contains [Band](band::Band) for holding the sampled k-points of one energy
/// band and remapping them onto new coordinate systems.
pub mod band;
/// Tolerance-aware removal of duplicate k-points.
pub mod dedup;
/// Provides custom errors types.
pub mod errors;
/// Handles the File I/O for the band-structure file formats and the surface
/// point output.
pub mod io;
/// Extracts iso-energy surfaces from a [Kmesh](kmesh::Kmesh) by cell
/// classification and per-edge interpolation.
pub mod isosurface;
/// Contains [Kmesh](kmesh::Kmesh), a regular 3-D grid of energies and
/// k-point ids with a shared presence mask, supporting periodic rolls and
/// strided slicing.
pub mod kmesh;
/// The [KPoint](kpoint::KPoint) row type and the [Column](kpoint::Column)
/// selector used for matching and sorting.
pub mod kpoint;
/// Provides a counter-driven progress [Bar](progress::Bar).
pub mod progress;
/// Infers the offset and spacing of sampled arithmetic progressions.
pub mod series;
/// Contains [SymmetryOperation](symmetry::SymmetryOperation) for mapping
/// k-points between the irreducible wedge and the full zone.
pub mod symmetry;
/// Misc functions mainly for vector and matrix manipulation.
pub mod utils;
/// Expansion of irreducible k-point sets into the full periodic zone and the
/// reduction back, plus regular k-point list generation.
pub mod zone;
