use crate::dedup::remove_duplicates;
use crate::errors::ZoneError;
use crate::io::klist::KlistEntry;
use crate::kpoint::{Column, KPoint, COORD_COLUMNS};
use crate::symmetry::SymmetryOperation;
use rustc_hash::FxHashMap;

/// Options controlling the expansion of an irreducible point set.
pub struct ExpandOptions {
    /// Per-axis extent of the periodic zone. Required when wrapping.
    pub zone_bounds: Option<[f64; 3]>,
    /// Centre of the zone, defaults to the origin.
    pub zone_centre: Option<[f64; 3]>,
    /// Fold transformed points back into the zone. Symmetry operations can
    /// map points into the extended zone scheme; folding models the
    /// periodic lattice.
    pub wrap: bool,
    /// Columns to sort the output by, applied after deduplication.
    pub sort_by: Option<Vec<Column>>,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            zone_bounds: None,
            zone_centre: None,
            wrap: false,
            sort_by: None,
        }
    }
}

/// Decimal places giving a duplicate tolerance of roughly 1e-8 of the
/// coordinate span, so round-off from the matrix multiplies cannot create
/// spurious distinct points.
fn duplicate_decimals(rows: &[KPoint]) -> i32 {
    let mut span = 0f64;
    for axis in 0..3 {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for row in rows {
            min = min.min(row.coords[axis]);
            max = max.max(row.coords[axis]);
        }
        span = span.max(max - min);
    }
    if span <= 0f64 || !span.is_finite() {
        8
    } else {
        // 10^-d <= span * 1e-8
        (8f64 - span.log10()).floor().clamp(1f64, 12f64) as i32
    }
}

/// Fold a value into `[centre - bound / 2, centre + bound / 2)` by repeated
/// shifts of the bound. Large symmetry translations can move a point several
/// cells away so a single-step wrap is not enough; the loop is capped by the
/// excursion-to-bound ratio so malformed operations cannot hang it.
fn wrap_into_zone(value: f64, bound: f64, centre: f64) -> f64 {
    if bound <= 0f64 {
        return value;
    }
    let low = centre - bound / 2f64;
    let high = centre + bound / 2f64;
    let cap = ((value - centre).abs() / bound) as usize + 1;
    let mut value = value;
    let mut steps = 0;
    while value >= high && steps < cap {
        value -= bound;
        steps += 1;
    }
    let mut steps = 0;
    while value < low && steps < cap {
        value += bound;
        steps += 1;
    }
    value
}

/// Expands a set of symmetry-irreducible points into the full periodic zone.
///
/// Every operation is applied to the whole input set, the transformed copies
/// are optionally folded back into the zone, concatenated and deduplicated
/// with a tolerance scaled to the coordinate span. Each input point appears,
/// mapped, at least once in the output and no two output points coincide
/// within the tolerance.
pub fn expand_ibz(
    ibz: &[KPoint],
    operations: &[SymmetryOperation],
    options: &ExpandOptions,
) -> Result<Vec<KPoint>, ZoneError> {
    if operations.is_empty() {
        return Err(ZoneError::NoOperations);
    }
    let bounds = match (options.wrap, options.zone_bounds) {
        (true, None) => return Err(ZoneError::NoBounds),
        (_, bounds) => bounds,
    };
    let centre = options.zone_centre.unwrap_or([0f64; 3]);
    let mut full_zone: Vec<KPoint> = Vec::with_capacity(ibz.len() * operations.len());
    for operation in operations {
        let mut mapped = operation.apply(ibz);
        if options.wrap {
            // bounds is Some here, checked above
            let bounds = bounds.unwrap_or([0f64; 3]);
            for row in mapped.iter_mut() {
                for axis in 0..3 {
                    row.coords[axis] =
                        wrap_into_zone(row.coords[axis], bounds[axis], centre[axis]);
                }
            }
        }
        full_zone.append(&mut mapped);
    }
    let decimals = duplicate_decimals(&full_zone);
    Ok(remove_duplicates(
        &full_zone,
        &COORD_COLUMNS,
        Some(decimals),
        options.sort_by.as_deref(),
    ))
}

/// Folds a full periodic zone down to its symmetry-unique representatives by
/// applying the inverse of every operation and deduplicating, the dual of
/// [expand_ibz].
pub fn reduce_ibz(
    full_zone: &[KPoint],
    operations: &[SymmetryOperation],
    sort_by: Option<&[Column]>,
) -> Result<Vec<KPoint>, ZoneError> {
    if operations.is_empty() {
        return Err(ZoneError::NoOperations);
    }
    let mut reduced: Vec<KPoint> = Vec::with_capacity(full_zone.len() * operations.len());
    for operation in operations {
        let mut mapped = operation.apply_inverse(full_zone)?;
        reduced.append(&mut mapped);
    }
    let decimals = duplicate_decimals(&reduced);
    Ok(remove_duplicates(
        &reduced,
        &COORD_COLUMNS,
        Some(decimals),
        sort_by,
    ))
}

/// Generates a k-point list on a regular integer grid centred on the origin.
///
/// The dense grid runs over `divisions` points per axis at integer
/// coordinates shifted back by half the axis length. When `reduce` is set
/// the grid is folded to its symmetry-unique points and each survivor is
/// weighted by the size of its orbit, found by expanding the reduced set
/// back out and counting how many full-zone points each id produced.
/// The common denominator is the first axis division.
pub fn generate_klist(
    divisions: [usize; 3],
    operations: &[SymmetryOperation],
    reduce: bool,
) -> Result<Vec<KlistEntry>, ZoneError> {
    let mid = [
        (divisions[0] / 2) as f64,
        (divisions[1] / 2) as f64,
        (divisions[2] / 2) as f64,
    ];
    let mut dense = Vec::with_capacity(divisions[0] * divisions[1] * divisions[2]);
    for i in 0..divisions[0] {
        for j in 0..divisions[1] {
            for k in 0..divisions[2] {
                dense.push(KPoint::new(
                    0,
                    [i as f64 - mid[0], j as f64 - mid[1], k as f64 - mid[2]],
                    0f64,
                ));
            }
        }
    }
    let mut points = if reduce {
        reduce_ibz(&dense, operations, None)?
    } else {
        dense
    };
    for (n, point) in points.iter_mut().enumerate() {
        point.id = n as i64 + 1;
    }
    let weights: FxHashMap<i64, usize> = if reduce {
        let options = ExpandOptions {
            zone_bounds: Some([
                divisions[0] as f64,
                divisions[1] as f64,
                divisions[2] as f64,
            ]),
            zone_centre: None,
            wrap: true,
            sort_by: None,
        };
        let full = expand_ibz(&points, operations, &options)?;
        let mut counts = FxHashMap::default();
        for point in &full {
            *counts.entry(point.id).or_insert(0) += 1;
        }
        counts
    } else {
        FxHashMap::default()
    };
    Ok(points
        .iter()
        .map(|point| KlistEntry {
            id: point.id,
            grid: [
                point.coords[0].round() as i64,
                point.coords[1].round() as i64,
                point.coords[2].round() as i64,
            ],
            denominator: divisions[0] as i64,
            weight: if reduce {
                *weights.get(&point.id).unwrap_or(&0) as f64
            } else {
                1f64
            },
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube() -> Vec<KPoint> {
        let mut rows = vec![];
        let mut id = 0;
        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    id += 1;
                    rows.push(KPoint::new(id, [i as f64, j as f64, k as f64], 1.0 + id as f64 / 10.));
                }
            }
        }
        rows
    }

    #[test]
    fn zone_identity_expansion_reproduces_input() {
        let rows = unit_cube();
        let ops = vec![SymmetryOperation::identity()];
        let options = ExpandOptions {
            zone_bounds: Some([2., 2., 2.]),
            zone_centre: Some([0.5, 0.5, 0.5]),
            wrap: true,
            sort_by: Some(vec![Column::Id]),
        };
        let full = expand_ibz(&rows, &ops, &options).unwrap();
        assert_eq!(full.len(), rows.len());
        for (a, b) in full.iter().zip(&rows) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.coords, b.coords);
            assert_eq!(a.value, b.value);
        }
    }

    #[test]
    fn zone_mirror_doubles_points() {
        let rows = vec![
            KPoint::new(1, [0.25, 0., 0.], 1.),
            KPoint::new(2, [0.5, 0., 0.], 2.),
        ];
        let mirror = SymmetryOperation::new(
            [[-1., 0., 0.], [0., 1., 0.], [0., 0., 1.]],
            [0f64; 3],
            None,
        );
        let ops = vec![SymmetryOperation::identity(), mirror];
        let full = expand_ibz(&rows, &ops, &ExpandOptions::default()).unwrap();
        assert_eq!(full.len(), 4);
    }

    #[test]
    fn zone_wrap_requires_bounds() {
        let options = ExpandOptions {
            wrap: true,
            ..ExpandOptions::default()
        };
        let err = expand_ibz(
            &unit_cube(),
            &[SymmetryOperation::identity()],
            &options,
        );
        assert!(matches!(err, Err(ZoneError::NoBounds)));
    }

    #[test]
    fn zone_empty_operations() {
        let err = expand_ibz(&unit_cube(), &[], &ExpandOptions::default());
        assert!(matches!(err, Err(ZoneError::NoOperations)));
        let err = reduce_ibz(&unit_cube(), &[], None);
        assert!(matches!(err, Err(ZoneError::NoOperations)));
    }

    #[test]
    fn zone_wrap_handles_large_translations() {
        // a tau three cells long must still fold back into the zone
        let mut op = SymmetryOperation::identity();
        op.tau = [3.25, 0., 0.];
        let rows = vec![KPoint::new(1, [0., 0., 0.], 0.)];
        let options = ExpandOptions {
            zone_bounds: Some([1., 1., 1.]),
            zone_centre: None,
            wrap: true,
            sort_by: None,
        };
        let full = expand_ibz(&rows, &[op], &options).unwrap();
        assert!((full[0].coords[0] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn zone_reduce_recovers_orbit_count() {
        let mirror = SymmetryOperation::new(
            [[-1., 0., 0.], [0., 1., 0.], [0., 0., 1.]],
            [0f64; 3],
            None,
        );
        let ops = vec![SymmetryOperation::identity(), mirror];
        let ibz = vec![
            KPoint::new(1, [0.25, 0., 0.], 1.),
            KPoint::new(2, [0.5, 0.25, 0.], 2.),
        ];
        let full = expand_ibz(&ibz, &ops, &ExpandOptions::default()).unwrap();
        let reduced_from_full = reduce_ibz(&full, &ops, None).unwrap();
        let reduced_once = reduce_ibz(&ibz, &ops, None).unwrap();
        // folding either side of the expansion closes over the same orbits
        assert_eq!(reduced_from_full.len(), reduced_once.len());
        for point in &ibz {
            assert!(reduced_from_full
                .iter()
                .any(|k| k.coords == point.coords));
        }
    }

    #[test]
    fn zone_generate_klist_dense() {
        let entries = generate_klist([2, 2, 2], &[], false).unwrap();
        assert_eq!(entries.len(), 8);
        assert_eq!(entries[0].id, 1);
        assert_eq!(entries[7].id, 8);
        for entry in &entries {
            assert_eq!(entry.denominator, 2);
            assert_eq!(entry.weight, 1.0);
            for axis in 0..3 {
                assert!(entry.grid[axis] == -1 || entry.grid[axis] == 0);
            }
        }
    }

    #[test]
    fn zone_generate_klist_reduced_weights() {
        // identity-only reduction keeps every point with unit weight
        let ops = vec![SymmetryOperation::identity()];
        let entries = generate_klist([2, 2, 2], &ops, true).unwrap();
        assert_eq!(entries.len(), 8);
        for entry in &entries {
            assert_eq!(entry.weight, 1.0);
        }
        let total: f64 = entries.iter().map(|entry| entry.weight).sum();
        assert_eq!(total, 8.0);
    }

    #[test]
    fn zone_generate_klist_reduce_needs_operations() {
        assert!(matches!(
            generate_klist([2, 2, 2], &[], true),
            Err(ZoneError::NoOperations)
        ));
    }

    #[test]
    fn zone_expansion_dedups_round_off() {
        // a rotation by 90 degrees four times over maps the centre point onto
        // itself with float noise; the tolerance has to swallow it
        let quarter = SymmetryOperation::new(
            [[0., -1., 0.], [1., 0., 0.], [0., 0., 1.]],
            [0f64; 3],
            None,
        );
        let ops = vec![
            SymmetryOperation::identity(),
            quarter.clone(),
            quarter.compose(&quarter),
            quarter.compose(&quarter).compose(&quarter),
        ];
        let rows = vec![KPoint::new(1, [0., 0., 0.5], 1.)];
        let full = expand_ibz(&rows, &ops, &ExpandOptions::default()).unwrap();
        assert_eq!(full.len(), 1);
    }
}
