use crate::io::reader::BufReader;
use crate::io::{float_fields, format_error};
use crate::symmetry::SymmetryOperation;
use regex::Regex;
use std::io;

/// The lattice description pulled from the header of a structure file,
/// together with the symmetry operations listed at its tail.
pub struct Structure {
    /// Single-letter Bravais lattice type.
    pub lattice_type: char,
    /// Space group symbol, the part after the underscore in the header.
    pub space_group: String,
    /// Length unit the lattice parameters are given in.
    pub units: String,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub operations: Vec<SymmetryOperation>,
}

impl Structure {
    /// The lengths of the three lattice vectors.
    pub fn lattice_lengths(&self) -> [f64; 3] {
        [self.a, self.b, self.c]
    }
}

/// Reads the lattice header and the symmetry block of a structure file.
///
/// Line two carries the lattice type and the space group, line three the
/// unit, line four the six lattice parameters. The atom positions in between
/// are skipped. The tail of the file declares a count of symmetry operations
/// followed by one block per operation: three rows of three matrix entries
/// plus that row's translation component, then the operation number.
pub fn read_structure(filename: &str) -> io::Result<Structure> {
    let mut reader = BufReader::open(filename)?;
    let mut buffer = String::new();
    let mut lines = Vec::with_capacity(4);
    for _ in 0..4 {
        match reader.read_line(&mut buffer) {
            Some(line) => lines.push(line?.0.clone()),
            None => {
                return Err(format_error(
                    reader.line_number(),
                    "structure file ends before the lattice parameters",
                ))
            }
        }
    }
    let lattice_type = lines[1]
        .chars()
        .next()
        .ok_or_else(|| format_error(2, "empty lattice type line"))?;
    // the space group sits after the group number, e.g. "139_I4/mmm"
    let group_pattern = Regex::new(r"_(\S+)\s*$").unwrap();
    let space_group = group_pattern
        .captures(&lines[1])
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| format_error(2, "no space group on lattice type line"))?;
    let units_pattern = Regex::new(r"unit=(\S+)").unwrap();
    let units = units_pattern
        .captures(&lines[2])
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| format_error(3, "no unit on calculation mode line"))?;
    let parameters = float_fields(&lines[3], 4)?;
    if parameters.len() != 6 {
        return Err(format_error(
            4,
            format!("expected 6 lattice parameters, found {}", parameters.len()),
        ));
    }
    let operations = read_operation_block(&mut reader)?;
    Ok(Structure {
        lattice_type,
        space_group,
        units,
        a: parameters[0],
        b: parameters[1],
        c: parameters[2],
        alpha: parameters[3],
        beta: parameters[4],
        gamma: parameters[5],
        operations,
    })
}

/// Scans forward to the symmetry operation count and reads every operation
/// block after it. A file with no symmetry block yields an empty list.
fn read_operation_block(reader: &mut BufReader) -> io::Result<Vec<SymmetryOperation>> {
    let count_pattern = Regex::new(r"^\s*(\d+)\s+NUMBER OF SYMMETRY OPERATIONS").unwrap();
    let mut buffer = String::new();
    let mut count = None;
    while let Some(line) = reader.read_line(&mut buffer) {
        let (text, _) = line?;
        if let Some(captures) = count_pattern.captures(text) {
            count = captures[1].parse::<usize>().ok();
            break;
        }
    }
    let count = match count {
        Some(count) => count,
        None => return Ok(vec![]),
    };
    let mut operations = Vec::with_capacity(count);
    for n in 0..count {
        let mut matrix = [[0f64; 3]; 3];
        let mut tau = [0f64; 3];
        for row in 0..3 {
            match reader.read_line(&mut buffer) {
                Some(line) => {
                    let (text, _) = line?;
                    let line_number = reader.line_number();
                    let fields = float_fields(text, line_number)?;
                    if fields.len() != 4 {
                        return Err(format_error(
                            line_number,
                            format!("expected 3 matrix entries and a translation, found {} fields", fields.len()),
                        ));
                    }
                    matrix[row] = [fields[0], fields[1], fields[2]];
                    tau[row] = fields[3];
                }
                None => {
                    return Err(format_error(
                        reader.line_number(),
                        "file ends inside a symmetry operation block",
                    ))
                }
            }
        }
        // the line under each block repeats the operation number
        if reader.read_line(&mut buffer).transpose()?.is_none() {
            return Err(format_error(
                reader.line_number(),
                "missing operation number line",
            ));
        }
        operations.push(SymmetryOperation::new(matrix, tau, Some(n + 1)));
    }
    Ok(operations)
}
