use crate::errors::FormatError;
use std::fs::File;
use std::io::{self, BufWriter, Write};

pub mod energy;
pub mod klist;
pub mod outputkgen;
pub mod reader;
pub mod scf2;
pub mod structfile;

/// Wraps a [FormatError] so it can travel inside [io::Error] alongside the
/// file system failures the readers also produce.
pub(crate) fn format_error(line: usize, reason: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, FormatError::new(line, reason))
}

/// Splits a line on whitespace and parses every field as a float.
pub(crate) fn float_fields(text: &str, line: usize) -> io::Result<Vec<f64>> {
    text.split_whitespace()
        .map(|field| {
            field
                .parse::<f64>()
                .map_err(|_| format_error(line, format!("expected a number, found '{}'", field)))
        })
        .collect()
}

/// Writes extracted surface points to file, one whitespace-separated
/// (x, y, z) triplet per line.
pub fn write_surface_points(filename: &str, points: &[[f64; 3]]) -> io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);
    for point in points {
        writeln!(writer, "{:>15.9} {:>15.9} {:>15.9}", point[0], point[1], point[2])?;
    }
    writer.flush()
}
