use crate::io::reader::BufReader;
use crate::io::format_error;
use crate::symmetry::SymmetryOperation;
use crate::utils::determinant;
use std::io;

/// Lines of run metadata before the symmetry matrices begin.
const HEADER_LINES: usize = 10;
/// Marks the line before a block of side-by-side matrices.
const MATRIX_HEADER: &str = "SYMMETRY MATRIX NR.";

/// Reads the symmetry matrices from a k-point generator log.
///
/// Matrices are printed in blocks of up to three side by side, each block
/// preceded by a header line and spanning the next three lines row-wise.
/// Singular matrices are skipped; they pad the final block. Operations are
/// numbered in file order starting from 1.
pub fn read_operations(filename: &str) -> io::Result<Vec<SymmetryOperation>> {
    let mut reader = BufReader::open(filename)?;
    let mut buffer = String::new();
    let mut operations = vec![];
    while let Some(line) = reader.read_line(&mut buffer) {
        let (text, _) = line?;
        if reader.line_number() <= HEADER_LINES {
            continue;
        }
        if !text.trim_start().starts_with(MATRIX_HEADER) {
            continue;
        }
        // three rows, each holding one row of every matrix in the block
        let mut rows: Vec<Vec<i64>> = Vec::with_capacity(3);
        let mut row_buffer = String::new();
        for _ in 0..3 {
            match reader.read_line(&mut row_buffer) {
                Some(row_line) => {
                    let (row_text, _) = row_line?;
                    let line_number = reader.line_number();
                    let fields = row_text
                        .split_whitespace()
                        .map(|field| {
                            field.parse::<i64>().map_err(|_| {
                                format_error(
                                    line_number,
                                    format!("expected an integer, found '{}'", field),
                                )
                            })
                        })
                        .collect::<io::Result<Vec<i64>>>()?;
                    if fields.is_empty() || fields.len() % 3 != 0 {
                        return Err(format_error(
                            line_number,
                            format!("matrix rows hold multiples of 3 fields, found {}", fields.len()),
                        ));
                    }
                    rows.push(fields);
                }
                None => {
                    return Err(format_error(
                        reader.line_number(),
                        "file ends inside a matrix block",
                    ))
                }
            }
        }
        let count = rows.iter().map(|row| row.len() / 3).min().unwrap_or(0);
        for n in 0..count {
            let mut matrix = [[0f64; 3]; 3];
            for (r, row) in rows.iter().enumerate() {
                for c in 0..3 {
                    matrix[r][c] = row[3 * n + c] as f64;
                }
            }
            if determinant(matrix) == 0f64 {
                continue;
            }
            operations.push(SymmetryOperation::new(
                matrix,
                [0f64; 3],
                Some(operations.len() + 1),
            ));
        }
    }
    Ok(operations)
}
