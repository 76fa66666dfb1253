use crate::errors::NumericalError;
use crate::kmesh::Kmesh;
use crate::progress::Bar;
use crate::utils::solve;
use crossbeam_utils::thread;

/// How the threshold crossing is located along a straddling cell edge.
/// Validated once at construction rather than re-parsed on every call.
#[derive(Clone, PartialEq)]
pub enum Interpolation {
    /// No interpolation: the corner of every surface cell is emitted.
    Nearest,
    /// 1d linear interpolation along each straddling edge.
    Linear,
    /// A radial-basis-function model fitted over every present point,
    /// bisected along each straddling edge until the bracket is narrower
    /// than `precision`.
    Rbf { precision: f64 },
}

impl Interpolation {
    /// The RBF method at machine precision.
    pub fn rbf() -> Self {
        Self::Rbf {
            precision: f64::EPSILON,
        }
    }
}

/// Corner offsets in (i, j, k) order matched to the marching-cubes bit for
/// each corner of a cell: near face 1, 2, 4, 8 then far face 16, 32, 64, 128.
const CORNERS: [([usize; 3], u16); 8] = [
    ([0, 0, 0], 1),
    ([0, 0, 1], 2),
    ([0, 1, 0], 4),
    ([0, 1, 1], 8),
    ([1, 0, 0], 16),
    ([1, 0, 1], 32),
    ([1, 1, 0], 64),
    ([1, 1, 1], 128),
];

/// The bit pairs whose disagreement marks a crossing on the three edges
/// leaving the cell-origin corner, one per axis.
const EDGE_BITS: [(u16, u16, usize); 3] = [(1, 16, 0), (1, 4, 1), (1, 2, 2)];

/// A dense copy of the mesh scalar field with degenerate axes tiled out to
/// length 2, since an 8-corner cell needs two samples on every axis.
struct Field {
    dims: [usize; 3],
    tiled: [bool; 3],
    values: Vec<Option<f64>>,
}

impl Field {
    fn new(mesh: &Kmesh) -> Self {
        let source = [mesh.size.x, mesh.size.y, mesh.size.z];
        let dims = [source[0].max(2), source[1].max(2), source[2].max(2)];
        let tiled = [source[0] == 1, source[1] == 1, source[2] == 1];
        let mut values = Vec::with_capacity(dims[0] * dims[1] * dims[2]);
        for i in 0..dims[0] {
            for j in 0..dims[1] {
                for k in 0..dims[2] {
                    let si = if tiled[0] { 0 } else { i };
                    let sj = if tiled[1] { 0 } else { j };
                    let sk = if tiled[2] { 0 } else { k };
                    values.push(mesh.get(si, sj, sk).map(|(_, value)| value));
                }
            }
        }
        Self {
            dims,
            tiled,
            values,
        }
    }

    fn get(&self, i: usize, j: usize, k: usize) -> Option<f64> {
        self.values[(i * self.dims[1] + j) * self.dims[2] + k]
    }

    /// The 8 corner values of the cell at (i, j, k), None if any corner is
    /// absent from the mesh.
    fn corners(&self, i: usize, j: usize, k: usize) -> Option<[f64; 8]> {
        let mut out = [0f64; 8];
        for (n, (offset, _)) in CORNERS.iter().enumerate() {
            out[n] = self.get(i + offset[0], j + offset[1], k + offset[2])?;
        }
        Some(out)
    }
}

/// The marching-cubes configuration code: bit n is set when corner n exceeds
/// the level. 0 and 255 carry no surface.
fn configuration(corners: &[f64; 8], level: f64) -> u16 {
    CORNERS
        .iter()
        .enumerate()
        .fold(0u16, |code, (n, (_, bit))| {
            if corners[n] > level {
                code | bit
            } else {
                code
            }
        })
}

/// A multiquadric radial-basis-function model of the scalar field, with the
/// node centres in grid-index space so the shape parameter is the unit grid
/// spacing.
struct RbfModel {
    centres: Vec<[f64; 3]>,
    weights: Vec<f64>,
}

impl RbfModel {
    fn kernel(r2: f64) -> f64 {
        (r2 + 1f64).sqrt()
    }

    fn distance2(a: [f64; 3], b: [f64; 3]) -> f64 {
        (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
    }

    /// Fit the model over every present point of the mesh by solving the
    /// dense symmetric collocation system.
    fn fit(mesh: &Kmesh) -> Result<Self, NumericalError> {
        let rows = mesh.indexes();
        let centres: Vec<[f64; 3]> = rows.iter().map(|row| row.coords).collect();
        let mut values: Vec<f64> = rows.iter().map(|row| row.value).collect();
        let mut system: Vec<Vec<f64>> = centres
            .iter()
            .map(|a| {
                centres
                    .iter()
                    .map(|b| Self::kernel(Self::distance2(*a, *b)))
                    .collect()
            })
            .collect();
        let weights = solve(&mut system, &mut values)?;
        Ok(Self { centres, weights })
    }

    fn evaluate(&self, point: [f64; 3]) -> f64 {
        self.centres
            .iter()
            .zip(&self.weights)
            .map(|(centre, weight)| weight * Self::kernel(Self::distance2(*centre, point)))
            .sum()
    }
}

/// An edge whose end point values straddle the level, in grid-index space.
struct Edge {
    /// The cell-origin corner.
    origin: [usize; 3],
    /// Which axis the edge runs along.
    axis: usize,
    /// Value at the origin corner.
    near: f64,
    /// Value at the far corner.
    far: f64,
}

/// Extracts the iso-surface of the mesh at the given level.
///
/// Every unit cell of the grid is classified into an 8-bit configuration by
/// comparing its corners against the level; cells entirely below (0) or above
/// (255) the level, and cells touching an absent sample, carry no surface.
/// The crossing position along each straddling edge is then located according
/// to the chosen [Interpolation] and converted back to axis coordinates. The
/// RBF path distributes the per-edge bisections over `threads` workers, each
/// edge being independent of the rest. A level outside the value range of
/// the mesh yields an empty list.
pub fn extract(
    mesh: &Kmesh,
    level: f64,
    interpolation: &Interpolation,
    threads: usize,
    progress_bar: &Bar,
) -> Result<Vec<[f64; 3]>, NumericalError> {
    if level.is_nan() {
        return Err(NumericalError::NotANumber);
    }
    match mesh.value_range() {
        Some((min, max)) if min <= level && level <= max => (),
        _ => return Ok(vec![]),
    }
    let field = Field::new(mesh);
    let mut surface_cells: Vec<([usize; 3], u16, [f64; 8])> = vec![];
    for i in 0..field.dims[0] - 1 {
        for j in 0..field.dims[1] - 1 {
            for k in 0..field.dims[2] - 1 {
                if let Some(corners) = field.corners(i, j, k) {
                    let code = configuration(&corners, level);
                    if code != 0 && code != 255 {
                        surface_cells.push(([i, j, k], code, corners));
                    }
                }
            }
        }
        progress_bar.tick();
    }
    let fractional = match interpolation {
        Interpolation::Nearest => surface_cells
            .iter()
            .map(|(origin, _, _)| [origin[0] as f64, origin[1] as f64, origin[2] as f64])
            .collect(),
        Interpolation::Linear => straddling_edges(&surface_cells)
            .iter()
            .map(|edge| {
                let mut point = [
                    edge.origin[0] as f64,
                    edge.origin[1] as f64,
                    edge.origin[2] as f64,
                ];
                // x3 = x2 + (y3 - y2) * (x2 - x1) / (y2 - y1) with the level as y3
                point[edge.axis] += (level - edge.near) / (edge.far - edge.near);
                point
            })
            .collect(),
        Interpolation::Rbf { precision } => {
            let model = RbfModel::fit(mesh)?;
            let edges = straddling_edges(&surface_cells);
            bisect_edges(&edges, &model, level, *precision, threads, progress_bar)
        }
    };
    Ok(fractional
        .into_iter()
        .map(|point| {
            let mut out = [0f64; 3];
            for axis in 0..3 {
                let f = if field.tiled[axis] { 0f64 } else { point[axis] };
                out[axis] = mesh.axes[axis].offset + f * mesh.axes[axis].spacing;
            }
            out
        })
        .collect())
}

/// The origin-incident edges of every surface cell whose end points straddle
/// the level.
fn straddling_edges(cells: &[([usize; 3], u16, [f64; 8])]) -> Vec<Edge> {
    let mut edges = vec![];
    for (origin, code, corners) in cells {
        for (near_bit, far_bit, axis) in EDGE_BITS {
            if ((code & near_bit) != 0) != ((code & far_bit) != 0) {
                let far_corner = match axis {
                    0 => 4,
                    1 => 2,
                    _ => 1,
                };
                edges.push(Edge {
                    origin: *origin,
                    axis,
                    near: corners[0],
                    far: corners[far_corner],
                });
            }
        }
    }
    edges
}

/// Bisect every edge against the fitted model, searching from whichever end
/// is above the level, until the bracket is below `precision`.
fn bisect_edges(
    edges: &[Edge],
    model: &RbfModel,
    level: f64,
    precision: f64,
    threads: usize,
    progress_bar: &Bar,
) -> Vec<[f64; 3]> {
    let chunk_size = (edges.len() / threads.max(1)).max(1);
    thread::scope(|s| {
        let handles: Vec<_> = edges
            .chunks(chunk_size)
            .map(|chunk| {
                s.spawn(move |_| {
                    chunk
                        .iter()
                        .map(|edge| {
                            let point = bisect(edge, model, level, precision);
                            progress_bar.tick();
                            point
                        })
                        .collect::<Vec<[f64; 3]>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect()
    })
    .unwrap()
}

fn bisect(edge: &Edge, model: &RbfModel, level: f64, precision: f64) -> [f64; 3] {
    let origin = edge.origin[edge.axis] as f64;
    // search from the corner already above the level
    let (mut inside, mut outside) = if edge.near > level {
        (origin, origin + 1f64)
    } else {
        (origin + 1f64, origin)
    };
    let mut point = [
        edge.origin[0] as f64,
        edge.origin[1] as f64,
        edge.origin[2] as f64,
    ];
    // a machine-epsilon bracket closes in well under 64 halvings
    for _ in 0..64 {
        if (outside - inside).abs() <= precision {
            break;
        }
        let mid = (inside + outside) / 2f64;
        point[edge.axis] = mid;
        if model.evaluate(point) > level {
            inside = mid;
        } else {
            outside = mid;
        }
    }
    point[edge.axis] = (inside + outside) / 2f64;
    point
}
