use std::fmt::{Debug, Display};

/// An error for a line of an input file that cannot be parsed.
pub struct FormatError {
    /// The 1-based line number at which parsing failed.
    pub line: usize,
    /// What was expected of the line.
    pub reason: String,
}

impl FormatError {
    pub fn new(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}

impl Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unexpected file format (line: {}): {}",
            self.line, self.reason
        )
    }
}

impl Debug for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl std::error::Error for FormatError {}

/// An error for operations that are undefined on the supplied numbers.
pub enum NumericalError {
    /// A symmetry matrix with the contained determinant cannot be inverted.
    SingularMatrix(f64),
    /// A NaN appeared where a coordinate or energy was expected.
    NotANumber,
    /// A zero spacing was used on an axis that is not degenerate.
    ZeroSpacing(usize),
}

impl Display for NumericalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SingularMatrix(det) => {
                write!(f, "matrix with determinant {} cannot be inverted", det)
            }
            Self::NotANumber => write!(f, "NaN encountered in numeric data"),
            Self::ZeroSpacing(axis) => write!(
                f,
                "axis {} has zero spacing but more than one grid point",
                axis
            ),
        }
    }
}

impl Debug for NumericalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl std::error::Error for NumericalError {}

/// An error for cooperating structures whose shapes have diverged.
pub struct ShapeError {
    /// Description of the two shapes that should have matched.
    pub reason: String,
}

impl ShapeError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Display for ShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "shape mismatch: {}", self.reason)
    }
}

impl Debug for ShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl std::error::Error for ShapeError {}

/// An error for a computed grid index falling outside the allocated grid.
pub struct RangeError {
    /// The computed 3d index.
    pub index: [isize; 3],
    /// The allocated grid size.
    pub size: [usize; 3],
}

impl Display for RangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "index ({}, {}, {}) lies outside the ({}, {}, {}) grid",
            self.index[0],
            self.index[1],
            self.index[2],
            self.size[0],
            self.size[1],
            self.size[2]
        )
    }
}

impl Debug for RangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl std::error::Error for RangeError {}

/// Errors raised while expanding or reducing a Brillouin zone.
pub enum ZoneError {
    /// The symmetry operation list was empty.
    NoOperations,
    /// Wrapping into the zone was requested without zone bounds.
    NoBounds,
    /// A symmetry operation could not be applied.
    Numerical(NumericalError),
}

impl Display for ZoneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoOperations => write!(f, "no symmetry operations in list"),
            Self::NoBounds => write!(
                f,
                "zone bounds must be supplied to wrap points back into the zone"
            ),
            Self::Numerical(e) => write!(f, "{}", e),
        }
    }
}

impl Debug for ZoneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl std::error::Error for ZoneError {}

impl From<NumericalError> for ZoneError {
    fn from(e: NumericalError) -> Self {
        Self::Numerical(e)
    }
}

/// Errors raised while building or re-slicing a [Kmesh](crate::kmesh::Kmesh).
pub enum MeshError {
    /// No rows were supplied to build the mesh from.
    NoRows,
    /// A row mapped outside the inferred grid.
    Range(RangeError),
    /// The value and id grids have diverged.
    Shape(ShapeError),
    /// A numeric invariant was violated.
    Numerical(NumericalError),
}

impl Display for MeshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoRows => write!(f, "cannot build a mesh from zero rows"),
            Self::Range(e) => write!(f, "{}", e),
            Self::Shape(e) => write!(f, "{}", e),
            Self::Numerical(e) => write!(f, "{}", e),
        }
    }
}

impl Debug for MeshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl std::error::Error for MeshError {}

impl From<RangeError> for MeshError {
    fn from(e: RangeError) -> Self {
        Self::Range(e)
    }
}

impl From<ShapeError> for MeshError {
    fn from(e: ShapeError) -> Self {
        Self::Shape(e)
    }
}

impl From<NumericalError> for MeshError {
    fn from(e: NumericalError) -> Self {
        Self::Numerical(e)
    }
}
