use crate::errors::{MeshError, NumericalError, RangeError, ShapeError};
use crate::kpoint::KPoint;
use crate::series::{arithmetic_series, series_len};

/// The 3d size of a mesh.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub x: usize,
    pub y: usize,
    pub z: usize,
    /// The total number of cells.
    pub total: usize,
}

impl Size {
    pub fn new(x: usize, y: usize, z: usize) -> Self {
        Self {
            x,
            y,
            z,
            total: x * y * z,
        }
    }

    /// Flatten a 3d index, row-major with the i axis slowest.
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.y + j) * self.z + k
    }

    /// Converts a 1d index of the array into a 3d index.
    pub fn to_3d(&self, p: usize) -> [usize; 3] {
        let i = p / (self.y * self.z);
        let j = (p / self.z).rem_euclid(self.y);
        let k = p.rem_euclid(self.z);
        [i, j, k]
    }
}

/// One axis of the mesh as an arithmetic progression. A spacing of 0 is the
/// sentinel for a degenerate single-point axis.
#[derive(Clone, Copy, PartialEq)]
pub struct Axis {
    pub offset: f64,
    pub spacing: f64,
}

impl Axis {
    /// The coordinate of a grid index on this axis.
    pub fn coordinate(&self, index: usize) -> f64 {
        self.offset + index as f64 * self.spacing
    }

    /// The grid index of a coordinate, None if it misses the grid entirely.
    fn index(&self, coordinate: f64) -> Option<isize> {
        if coordinate.is_nan() {
            return None;
        }
        if self.spacing == 0f64 {
            Some(0)
        } else {
            Some(((coordinate - self.offset) / self.spacing).round() as isize)
        }
    }
}

/// An index range with a stride for [Kmesh::slice], covering
/// `start..end` in steps of `step`.
#[derive(Clone, Copy)]
pub struct SliceRange {
    pub start: usize,
    pub end: usize,
    pub step: usize,
}

impl SliceRange {
    pub fn new(start: usize, end: usize, step: usize) -> Self {
        Self { start, end, step }
    }

    /// The whole of an axis of the given length.
    pub fn full(len: usize) -> Self {
        Self {
            start: 0,
            end: len,
            step: 1,
        }
    }

    fn indices(&self) -> Vec<usize> {
        (self.start..self.end).step_by(self.step.max(1)).collect()
    }
}

/// Summary statistics over the present cells of a mesh.
pub struct MeshStats {
    pub present: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub standard_deviation: f64,
}

/// A masked structured mesh of energies built from scattered k-point rows.
///
/// Three independent axis descriptors are inferred from the sample
/// coordinates, then every row is dropped into its grid cell. Cells no sample
/// mapped to stay absent. The value grid and the id grid share one presence
/// mask so they cannot diverge cell-by-cell; a cell is either present in both
/// or absent in both.
pub struct Kmesh {
    pub size: Size,
    pub axes: [Axis; 3],
    values: Vec<f64>,
    ids: Vec<i64>,
    present: Vec<bool>,
}

impl Kmesh {
    /// Builds a mesh from k-point rows.
    ///
    /// The grid dimension on each axis comes from the numeric span of the
    /// coordinates, not the number of samples, as irreducible-zone data does
    /// not cover every lattice position. A row whose computed index falls
    /// outside that span signals an inconsistency between the inferred grid
    /// and the data and fails fast with a [RangeError]; rows are never
    /// silently dropped. When duplicate rows map to the same cell the last
    /// write wins.
    pub fn build(rows: &[KPoint]) -> Result<Self, MeshError> {
        let mut axes = [Axis {
            offset: 0f64,
            spacing: 0f64,
        }; 3];
        let mut counts = [0usize; 3];
        for axis in 0..3 {
            let values: Vec<f64> = rows.iter().map(|row| row.coords[axis]).collect();
            let (offset, spacing) = arithmetic_series(&values).ok_or(MeshError::NoRows)?;
            let max = values.iter().fold(f64::NEG_INFINITY, |a, b| a.max(*b));
            axes[axis] = Axis { offset, spacing };
            counts[axis] = series_len(offset, max, spacing);
        }
        let size = Size::new(counts[0], counts[1], counts[2]);
        let mut mesh = Self {
            size,
            axes,
            values: vec![0f64; size.total],
            ids: vec![0i64; size.total],
            present: vec![false; size.total],
        };
        for row in rows {
            let mut index = [0usize; 3];
            for axis in 0..3 {
                let i = mesh.axes[axis]
                    .index(row.coords[axis])
                    .ok_or(NumericalError::NotANumber)?;
                if i < 0 || i as usize >= counts[axis] {
                    let mut bad = [0isize; 3];
                    bad[axis] = i;
                    return Err(RangeError {
                        index: bad,
                        size: counts,
                    }
                    .into());
                }
                index[axis] = i as usize;
            }
            if row.value.is_nan() {
                return Err(NumericalError::NotANumber.into());
            }
            let p = size.index(index[0], index[1], index[2]);
            mesh.values[p] = row.value;
            mesh.ids[p] = row.id;
            mesh.present[p] = true;
        }
        Ok(mesh)
    }

    /// The coordinates of every grid index on the i axis.
    pub fn i_vals(&self) -> Vec<f64> {
        (0..self.size.x).map(|i| self.axes[0].coordinate(i)).collect()
    }

    /// The coordinates of every grid index on the j axis.
    pub fn j_vals(&self) -> Vec<f64> {
        (0..self.size.y).map(|j| self.axes[1].coordinate(j)).collect()
    }

    /// The coordinates of every grid index on the k axis.
    pub fn k_vals(&self) -> Vec<f64> {
        (0..self.size.z).map(|k| self.axes[2].coordinate(k)).collect()
    }

    /// The centre of the zone covered by the mesh.
    pub fn centre_point(&self) -> [f64; 3] {
        let counts = [self.size.x, self.size.y, self.size.z];
        let mut centre = [0f64; 3];
        for axis in 0..3 {
            let min = self.axes[axis].coordinate(0);
            let max = self.axes[axis].coordinate(counts[axis] - 1);
            centre[axis] = (min + max) / 2f64;
        }
        centre
    }

    /// The id and value at a 3d index, None for absent cells.
    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<(i64, f64)> {
        let p = self.size.index(i, j, k);
        if self.present[p] {
            Some((self.ids[p], self.values[p]))
        } else {
            None
        }
    }

    /// Present-only rows as `(id, i, j, k, value)` with the grid indices in
    /// the coordinate columns.
    pub fn indexes(&self) -> Vec<KPoint> {
        (0..self.size.total)
            .filter(|p| self.present[*p])
            .map(|p| {
                let [i, j, k] = self.size.to_3d(p);
                KPoint::new(
                    self.ids[p],
                    [i as f64, j as f64, k as f64],
                    self.values[p],
                )
            })
            .collect()
    }

    /// Present-only rows as `(id, x, y, z, value)` with the axis descriptors
    /// applied to the grid indices.
    pub fn kpoints(&self) -> Vec<KPoint> {
        (0..self.size.total)
            .filter(|p| self.present[*p])
            .map(|p| {
                let [i, j, k] = self.size.to_3d(p);
                KPoint::new(
                    self.ids[p],
                    [
                        self.axes[0].coordinate(i),
                        self.axes[1].coordinate(j),
                        self.axes[2].coordinate(k),
                    ],
                    self.values[p],
                )
            })
            .collect()
    }

    /// Broadcast coordinate arrays for contouring: for each axis, that axis's
    /// coordinate replicated across the other two, flattened in the same
    /// row-major order as the value grid. Array 0 always carries the i-axis
    /// coordinate; length-1 axes simply repeat their single value, which is
    /// what squeezing them away would present to a contouring routine.
    pub fn plaid(&self) -> [Vec<f64>; 3] {
        let mut out = [
            Vec::with_capacity(self.size.total),
            Vec::with_capacity(self.size.total),
            Vec::with_capacity(self.size.total),
        ];
        for p in 0..self.size.total {
            let [i, j, k] = self.size.to_3d(p);
            out[0].push(self.axes[0].coordinate(i));
            out[1].push(self.axes[1].coordinate(j));
            out[2].push(self.axes[2].coordinate(k));
        }
        out
    }

    /// The smallest and largest present value, None for an all-absent mesh.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut range = None;
        for p in 0..self.size.total {
            if self.present[p] {
                let (min, max) = range.unwrap_or((f64::INFINITY, f64::NEG_INFINITY));
                range = Some((min.min(self.values[p]), max.max(self.values[p])));
            }
        }
        range
    }

    /// Summary statistics over the present cells.
    pub fn stats(&self) -> MeshStats {
        let mut present = 0usize;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0f64;
        for p in 0..self.size.total {
            if self.present[p] {
                present += 1;
                min = min.min(self.values[p]);
                max = max.max(self.values[p]);
                sum += self.values[p];
            }
        }
        let mean = if present == 0 { 0f64 } else { sum / present as f64 };
        let mut variance = 0f64;
        for p in 0..self.size.total {
            if self.present[p] {
                variance += (self.values[p] - mean).powi(2);
            }
        }
        let standard_deviation = if present == 0 {
            0f64
        } else {
            (variance / present as f64).sqrt()
        };
        MeshStats {
            present,
            min,
            max,
            mean,
            standard_deviation,
        }
    }

    /// Shifts the centre of the mesh by periodically rolling both grids in
    /// place and moving the axis offsets to match, so every occupied cell
    /// keeps its id and value and the move is a bijection on the occupied
    /// set. In relative mode the shift is a fraction of each axis span,
    /// otherwise a distance in axis coordinates.
    pub fn shift_centre(&mut self, shift: [f64; 3], relative: bool) -> Result<(), MeshError> {
        if self.values.len() != self.ids.len() || self.values.len() != self.present.len() {
            return Err(ShapeError::new(format!(
                "value grid has {} cells but id grid has {}",
                self.values.len(),
                self.ids.len()
            ))
            .into());
        }
        let counts = [self.size.x, self.size.y, self.size.z];
        for axis in 0..3 {
            let cells = if relative {
                (shift[axis] * (counts[axis] - 1) as f64).ceil() as isize
            } else if self.axes[axis].spacing == 0f64 {
                // a degenerate axis has no period to roll over
                if shift[axis] != 0f64 {
                    return Err(NumericalError::ZeroSpacing(axis).into());
                }
                0
            } else {
                (shift[axis] / self.axes[axis].spacing).ceil() as isize
            };
            let roll = cells.rem_euclid(counts[axis] as isize) as usize;
            if roll != 0 {
                self.roll_axis(axis, roll);
            }
            // rolled contents keep their coordinates, modulo the period
            self.axes[axis].offset -= cells as f64 * self.axes[axis].spacing;
        }
        Ok(())
    }

    /// Roll one axis of all three grids right by `cells`.
    fn roll_axis(&mut self, axis: usize, cells: usize) {
        let chunk = match axis {
            0 => self.size.total,
            1 => self.size.y * self.size.z,
            _ => self.size.z,
        };
        let shift = match axis {
            0 => cells * self.size.y * self.size.z,
            1 => cells * self.size.z,
            _ => cells,
        };
        for start in (0..self.size.total).step_by(chunk) {
            self.values[start..start + chunk].rotate_right(shift);
            self.ids[start..start + chunk].rotate_right(shift);
            self.present[start..start + chunk].rotate_right(shift);
        }
    }

    /// Returns a new mesh holding the selected sub-block.
    ///
    /// For each axis the offset and spacing are re-inferred from the
    /// coordinate values implied by the retained indices rather than copied,
    /// since a strided slice changes the effective spacing. Nothing outside
    /// the masked grids and axis descriptors is needed, so a mesh can be
    /// re-sliced indefinitely without the original rows.
    pub fn slice(&self, ranges: [SliceRange; 3]) -> Result<Self, MeshError> {
        let counts = [self.size.x, self.size.y, self.size.z];
        let mut retained: [Vec<usize>; 3] = [vec![], vec![], vec![]];
        let mut axes = self.axes;
        for axis in 0..3 {
            let range = ranges[axis];
            if range.start >= range.end || range.end > counts[axis] {
                return Err(RangeError {
                    index: [range.start as isize, range.end as isize, 0],
                    size: counts,
                }
                .into());
            }
            retained[axis] = range.indices();
            let implied: Vec<f64> = retained[axis]
                .iter()
                .map(|i| self.axes[axis].coordinate(*i))
                .collect();
            let (offset, spacing) = arithmetic_series(&implied).ok_or(MeshError::NoRows)?;
            axes[axis] = Axis { offset, spacing };
        }
        let size = Size::new(
            retained[0].len(),
            retained[1].len(),
            retained[2].len(),
        );
        let mut values = Vec::with_capacity(size.total);
        let mut ids = Vec::with_capacity(size.total);
        let mut present = Vec::with_capacity(size.total);
        for i in &retained[0] {
            for j in &retained[1] {
                for k in &retained[2] {
                    let p = self.size.index(*i, *j, *k);
                    values.push(self.values[p]);
                    ids.push(self.ids[p]);
                    present.push(self.present[p]);
                }
            }
        }
        Ok(Self {
            size,
            axes,
            values,
            ids,
            present,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_rows(nx: usize, ny: usize, nz: usize) -> Vec<KPoint> {
        let mut rows = vec![];
        let mut id = 0;
        for i in 0..nx {
            for j in 0..ny {
                for k in 0..nz {
                    id += 1;
                    rows.push(KPoint::new(
                        id,
                        [i as f64 * 0.25, j as f64 * 0.25, k as f64 * 0.25],
                        id as f64,
                    ));
                }
            }
        }
        rows
    }

    #[test]
    fn kmesh_build_full_grid() {
        let mesh = Kmesh::build(&full_rows(3, 4, 2)).unwrap();
        assert_eq!(mesh.size.x, 3);
        assert_eq!(mesh.size.y, 4);
        assert_eq!(mesh.size.z, 2);
        assert_eq!(mesh.stats().present, 24);
        assert_eq!(mesh.get(0, 0, 0), Some((1, 1.)));
        assert_eq!(mesh.get(2, 3, 1), Some((24, 24.)));
    }

    #[test]
    fn kmesh_build_partial_grid_masks_missing() {
        let mut rows = full_rows(2, 2, 2);
        rows.remove(3);
        let mesh = Kmesh::build(&rows).unwrap();
        assert_eq!(mesh.size.total, 8);
        assert_eq!(mesh.stats().present, 7);
        assert_eq!(mesh.get(0, 1, 1), None);
    }

    #[test]
    fn kmesh_build_infers_span_from_incomplete_axis() {
        // only the end points along i are sampled; the grid must still be 3 wide
        let rows = vec![
            KPoint::new(1, [0.0, 0., 0.], 1.),
            KPoint::new(2, [0.25, 0., 0.], 2.),
            KPoint::new(3, [0.75, 0., 0.], 3.),
        ];
        let mesh = Kmesh::build(&rows).unwrap();
        assert_eq!(mesh.size.x, 4);
        assert_eq!(mesh.get(2, 0, 0), None);
        assert_eq!(mesh.get(3, 0, 0), Some((3, 3.)));
    }

    #[test]
    fn kmesh_build_degenerate_axis() {
        let rows = vec![
            KPoint::new(1, [0., 0.5, 0.], 1.),
            KPoint::new(2, [0.25, 0.5, 0.], 2.),
        ];
        let mesh = Kmesh::build(&rows).unwrap();
        assert_eq!(mesh.size.y, 1);
        assert_eq!(mesh.axes[1].spacing, 0.);
        assert_eq!(mesh.axes[1].offset, 0.5);
    }

    #[test]
    fn kmesh_build_empty_fails() {
        assert!(Kmesh::build(&[]).is_err());
    }

    #[test]
    fn kmesh_last_write_wins_on_collision() {
        let rows = vec![
            KPoint::new(1, [0., 0., 0.], 1.),
            KPoint::new(2, [0.25, 0., 0.], 2.),
            KPoint::new(3, [0., 0., 0.], 3.),
        ];
        let mesh = Kmesh::build(&rows).unwrap();
        assert_eq!(mesh.get(0, 0, 0), Some((3, 3.)));
    }

    #[test]
    fn kmesh_axis_vals() {
        let mesh = Kmesh::build(&full_rows(3, 2, 2)).unwrap();
        assert_eq!(mesh.i_vals(), vec![0., 0.25, 0.5]);
        assert_eq!(mesh.centre_point(), [0.25, 0.125, 0.125]);
    }

    #[test]
    fn kmesh_kpoints_round_trip() {
        let rows = full_rows(2, 2, 2);
        let mesh = Kmesh::build(&rows).unwrap();
        let back = mesh.kpoints();
        assert_eq!(back.len(), rows.len());
        for (a, b) in back.iter().zip(&rows) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.coords, b.coords);
            assert_eq!(a.value, b.value);
        }
    }

    #[test]
    fn kmesh_plaid_axis_convention() {
        let mesh = Kmesh::build(&full_rows(2, 2, 2)).unwrap();
        let [i_plaid, j_plaid, k_plaid] = mesh.plaid();
        // axis 0 is the i axis, slowest in row-major order
        assert_eq!(i_plaid[0], 0.);
        assert_eq!(i_plaid[7], 0.25);
        assert_eq!(j_plaid[2], 0.25);
        assert_eq!(k_plaid[1], 0.25);
    }

    #[test]
    fn kmesh_shift_centre_round_trip() {
        let mut mesh = Kmesh::build(&full_rows(5, 3, 2)).unwrap();
        let before = mesh.indexes();
        let occupied = mesh.stats().present;
        mesh.shift_centre([0.5, 0., 0.], true).unwrap();
        assert_eq!(mesh.stats().present, occupied);
        mesh.shift_centre([-0.5, 0., 0.], true).unwrap();
        let after = mesh.indexes();
        assert_eq!(before.len(), after.len());
        for (a, b) in before.iter().zip(&after) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.coords, b.coords);
            assert_eq!(a.value, b.value);
        }
        assert!((mesh.axes[0].offset).abs() < 1e-12);
    }

    #[test]
    fn kmesh_shift_centre_moves_offset() {
        let mut mesh = Kmesh::build(&full_rows(4, 1, 1)).unwrap();
        mesh.shift_centre([0.25, 0., 0.], false).unwrap();
        // one cell of roll, offset moves a cell the other way
        assert_eq!(mesh.axes[0].offset, -0.25);
        assert_eq!(mesh.get(1, 0, 0), Some((1, 1.)));
    }

    #[test]
    fn kmesh_shift_centre_degenerate_axis() {
        let mut mesh = Kmesh::build(&full_rows(4, 1, 1)).unwrap();
        // a zero shift along the flat axis is a noop
        mesh.shift_centre([0.25, 0., 0.], false).unwrap();
        let result = mesh.shift_centre([0., 0.25, 0.], false);
        assert!(matches!(
            result,
            Err(MeshError::Numerical(NumericalError::ZeroSpacing(1)))
        ));
    }

    #[test]
    fn kmesh_slice_recomputes_axes() {
        let mesh = Kmesh::build(&full_rows(4, 4, 2)).unwrap();
        let sliced = mesh
            .slice([
                SliceRange::new(1, 4, 2),
                SliceRange::full(4),
                SliceRange::full(2),
            ])
            .unwrap();
        assert_eq!(sliced.size.x, 2);
        // stride 2 doubles the spacing, start 1 moves the offset
        assert_eq!(sliced.axes[0].offset, 0.25);
        assert_eq!(sliced.axes[0].spacing, 0.5);
        assert_eq!(sliced.axes[1].spacing, 0.25);
        // the parent is untouched
        assert_eq!(mesh.size.x, 4);
        assert_eq!(mesh.axes[0].spacing, 0.25);
    }

    #[test]
    fn kmesh_slice_single_index_degenerates_axis() {
        let mesh = Kmesh::build(&full_rows(4, 4, 2)).unwrap();
        let sliced = mesh
            .slice([
                SliceRange::new(2, 3, 1),
                SliceRange::full(4),
                SliceRange::full(2),
            ])
            .unwrap();
        assert_eq!(sliced.size.x, 1);
        assert_eq!(sliced.axes[0].offset, 0.5);
        assert_eq!(sliced.axes[0].spacing, 0.);
    }

    #[test]
    fn kmesh_slice_out_of_range() {
        let mesh = Kmesh::build(&full_rows(2, 2, 2)).unwrap();
        let err = mesh.slice([
            SliceRange::new(0, 3, 1),
            SliceRange::full(2),
            SliceRange::full(2),
        ]);
        assert!(matches!(err, Err(MeshError::Range(_))));
    }

    #[test]
    fn kmesh_stats() {
        let rows = vec![
            KPoint::new(1, [0., 0., 0.], 1.),
            KPoint::new(2, [0.25, 0., 0.], 3.),
        ];
        let mesh = Kmesh::build(&rows).unwrap();
        let stats = mesh.stats();
        assert_eq!(stats.present, 2);
        assert_eq!(stats.min, 1.);
        assert_eq!(stats.max, 3.);
        assert_eq!(stats.mean, 2.);
        assert_eq!(stats.standard_deviation, 1.);
    }
}
