use crate::io::reader::BufReader;
use crate::io::format_error;
use regex::Regex;
use std::io;

/// Reads the Fermi energy from a self-consistency log.
///
/// Every iteration prints a `:FER` line; the last one in the file is the
/// converged value. A file without one is an error.
pub fn read_fermi_energy(filename: &str) -> io::Result<f64> {
    let mut reader = BufReader::open(filename)?;
    let mut buffer = String::new();
    let pattern = Regex::new(r"^:FER.*=\s*(-?[0-9.]+([eE][+-]?[0-9]+)?)").unwrap();
    let mut fermi_energy = None;
    while let Some(line) = reader.read_line(&mut buffer) {
        let (text, _) = line?;
        if let Some(captures) = pattern.captures(text.trim_start()) {
            let field = &captures[1];
            fermi_energy = Some(field.parse::<f64>().map_err(|_| {
                format_error(
                    reader.line_number(),
                    format!("expected a number, found '{}'", field),
                )
            })?);
        }
    }
    fermi_energy
        .ok_or_else(|| format_error(reader.line_number(), "no :FER line in file"))
}
