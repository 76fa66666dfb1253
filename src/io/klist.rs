use crate::io::reader::BufReader;
use crate::io::format_error;
use crate::kpoint::KPoint;
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// The line that closes a k-point list file.
const TERMINATOR: &str = "END";

/// One row of a k-point list file: integer grid coordinates over a common
/// denominator plus the point's multiplicity in the full zone.
#[derive(Clone, PartialEq, Debug)]
pub struct KlistEntry {
    pub id: i64,
    pub grid: [i64; 3],
    pub denominator: i64,
    pub weight: f64,
}

impl KlistEntry {
    /// The fractional coordinates of the point.
    pub fn coords(&self) -> [f64; 3] {
        let d = self.denominator as f64;
        [
            self.grid[0] as f64 / d,
            self.grid[1] as f64 / d,
            self.grid[2] as f64 / d,
        ]
    }

    /// The entry as a k-point with fractional coordinates, the weight as its
    /// value and the denominator carried as an extra column.
    pub fn to_kpoint(&self) -> KPoint {
        KPoint::with_extra(
            self.id,
            self.coords(),
            self.weight,
            vec![self.denominator as f64],
        )
    }
}

/// Reads a k-point list file up to its END terminator.
///
/// Every line carries id, three integer grid coordinates, the denominator
/// and the weight; the first line additionally carries run metadata after the
/// weight, which is ignored.
pub fn read_klist(filename: &str) -> io::Result<Vec<KlistEntry>> {
    let mut reader = BufReader::open(filename)?;
    let mut buffer = String::new();
    let mut entries = vec![];
    while let Some(line) = reader.read_line(&mut buffer) {
        let (text, _) = line?;
        let line_number = reader.line_number();
        if text.trim_start().starts_with(TERMINATOR) {
            break;
        }
        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.len() < 6 {
            return Err(format_error(
                line_number,
                format!("expected at least 6 fields, found {}", fields.len()),
            ));
        }
        let parse_int = |field: &str| {
            field.parse::<i64>().map_err(|_| {
                format_error(
                    line_number,
                    format!("expected an integer, found '{}'", field),
                )
            })
        };
        let weight = fields[5].parse::<f64>().map_err(|_| {
            format_error(
                line_number,
                format!("expected a number, found '{}'", fields[5]),
            )
        })?;
        entries.push(KlistEntry {
            id: parse_int(fields[0])?,
            grid: [
                parse_int(fields[1])?,
                parse_int(fields[2])?,
                parse_int(fields[3])?,
            ],
            denominator: parse_int(fields[4])?,
            weight,
        });
    }
    Ok(entries)
}

/// Writes a k-point list in the fixed-width layout the band-structure codes
/// consume: five 10-wide integers and a 5-wide weight per line, the first
/// line carrying the grid divisions, and an END terminator.
pub fn write_klist(
    filename: &str,
    entries: &[KlistEntry],
    divisions: [usize; 3],
) -> io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);
    let total: usize = divisions.iter().product();
    for (line_number, entry) in entries.iter().enumerate() {
        write!(
            writer,
            "{:>10}{:>10}{:>10}{:>10}{:>10}{:>5.1}",
            entry.id,
            entry.grid[0],
            entry.grid[1],
            entry.grid[2],
            entry.denominator,
            entry.weight
        )?;
        if line_number == 0 {
            write!(
                writer,
                "{:>5.1}{:>5.1}    {:>6} k, div: ({:>3}{:>3}{:>3})",
                -7.0, 1.5, total, divisions[0], divisions[1], divisions[2]
            )?;
        }
        writeln!(writer)?;
    }
    writeln!(writer, "{}", TERMINATOR)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn klist_entry_coords() {
        let entry = KlistEntry {
            id: 3,
            grid: [1, 2, 3],
            denominator: 4,
            weight: 2.0,
        };
        assert_eq!(entry.coords(), [0.25, 0.5, 0.75]);
        let point = entry.to_kpoint();
        assert_eq!(point.id, 3);
        assert_eq!(point.value, 2.0);
        assert_eq!(point.extra, vec![4.0]);
    }
}
