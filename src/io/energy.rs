use crate::band::Band;
use crate::io::reader::BufReader;
use crate::io::{float_fields, format_error};
use crate::kpoint::KPoint;
use std::io;

/// Number of fields on a k-point header line: the three coordinates, the
/// k-point id, a column we do not use, the band count and the weight.
const KPOINT_FIELDS: usize = 7;
/// Number of fields on a band line: the band index and the energy.
const BAND_FIELDS: usize = 2;

/// Reads a band-structure energy file into one [Band] per band index.
///
/// The file interleaves k-point header lines with the per-band energy lines
/// belonging to that k-point. The two line types are told apart by their
/// field count. Band indices are 1-based in the file; not every band is
/// listed under every k-point, so the bands come out ragged.
pub fn read_bands(filename: &str) -> io::Result<Vec<Band>> {
    let mut reader = BufReader::open(filename)?;
    let mut buffer = String::new();
    let mut bands: Vec<Band> = vec![];
    let mut current: Option<(i64, [f64; 3])> = None;
    while let Some(line) = reader.read_line(&mut buffer) {
        let (text, _) = line?;
        let line_number = reader.line_number();
        let fields = float_fields(text, line_number)?;
        match fields.len() {
            KPOINT_FIELDS => {
                let id = fields[3] as i64;
                current = Some((id, [fields[0], fields[1], fields[2]]));
            }
            BAND_FIELDS => {
                let (id, coords) = current.ok_or_else(|| {
                    format_error(line_number, "energy listed before any k-point header")
                })?;
                let band_index = fields[0] as usize;
                if band_index == 0 {
                    return Err(format_error(line_number, "band indices count from 1"));
                }
                while bands.len() < band_index {
                    bands.push(Band::new(bands.len() + 1, String::new(), vec![]));
                }
                bands[band_index - 1]
                    .data
                    .push(KPoint::new(id, coords, fields[1]));
            }
            n => {
                return Err(format_error(
                    line_number,
                    format!(
                        "expected {} or {} fields, found {}",
                        KPOINT_FIELDS, BAND_FIELDS, n
                    ),
                ))
            }
        }
    }
    Ok(bands)
}
