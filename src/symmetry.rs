use crate::errors::NumericalError;
use crate::kpoint::KPoint;
use crate::utils::{dot, invert, matmul, transpose};

/// A point-group symmetry operation: a 3x3 matrix, a tau offset used to nudge
/// points off high-symmetry loci before the matrix is applied and an optional
/// id recording which operation of the input file this is.
#[derive(Clone, PartialEq)]
pub struct SymmetryOperation {
    pub matrix: [[f64; 3]; 3],
    pub tau: [f64; 3],
    pub id: Option<usize>,
}

impl SymmetryOperation {
    pub fn new(matrix: [[f64; 3]; 3], tau: [f64; 3], id: Option<usize>) -> Self {
        Self { matrix, tau, id }
    }

    /// The operation that maps every point onto itself.
    pub fn identity() -> Self {
        Self {
            matrix: [[1., 0., 0.], [0., 1., 0.], [0., 0., 1.]],
            tau: [0f64; 3],
            id: None,
        }
    }

    /// Transform a single coordinate vector: tau first, then the matrix.
    pub fn apply_vector(&self, v: [f64; 3]) -> [f64; 3] {
        let shifted = [v[0] + self.tau[0], v[1] + self.tau[1], v[2] + self.tau[2]];
        // row vector times the transpose is the operator acting on the column
        dot(shifted, transpose(self.matrix))
    }

    /// Transform a batch of rows, leaving ids, values and trailing columns
    /// untouched.
    pub fn apply(&self, rows: &[KPoint]) -> Vec<KPoint> {
        rows.iter()
            .map(|row| {
                let mut row = row.clone();
                row.coords = self.apply_vector(row.coords);
                row
            })
            .collect()
    }

    /// Undo the operation on a batch of rows: inverse matrix first, then the
    /// tau offset is removed to put the points back on the high-symmetry
    /// positions. A singular matrix has no inverse.
    pub fn apply_inverse(&self, rows: &[KPoint]) -> Result<Vec<KPoint>, NumericalError> {
        let inverse = transpose(invert(self.matrix)?);
        Ok(rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                let v = dot(row.coords, inverse);
                row.coords = [v[0] - self.tau[0], v[1] - self.tau[1], v[2] - self.tau[2]];
                row
            })
            .collect())
    }

    /// Combine two operations into the one performing `self` after `other`.
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            matrix: matmul(self.matrix, other.matrix),
            tau: other.tau,
            id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<KPoint> {
        vec![
            KPoint::new(1, [0., 0., 1.], 1.1),
            KPoint::new(2, [0., 1., 0.], 1.2),
            KPoint::new(3, [0., 1., 1.], 1.0),
        ]
    }

    #[test]
    fn symmetry_identity_is_noop() {
        let op = SymmetryOperation::identity();
        let mapped = op.apply(&rows());
        assert_eq!(mapped, rows())
    }

    #[test]
    fn symmetry_tau_offset() {
        let mut op = SymmetryOperation::identity();
        op.tau = [0., 2., 0.];
        let mapped = op.apply(&rows());
        assert_eq!(mapped[0].coords, [0., 2., 1.]);
        assert_eq!(mapped[2].coords, [0., 3., 1.]);
        // everything else passes through
        assert_eq!(mapped[0].id, 1);
        assert_eq!(mapped[0].value, 1.1);
    }

    #[test]
    fn symmetry_inverse_round_trip() {
        let op = SymmetryOperation::new(
            [[0., -1., 0.], [1., 0., 0.], [0., 0., 1.]],
            [0.25, 0., 0.],
            Some(2),
        );
        let mapped = op.apply(&rows());
        let back = op.apply_inverse(&mapped).unwrap();
        for (a, b) in back.iter().zip(rows()) {
            for i in 0..3 {
                assert!((a.coords[i] - b.coords[i]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn symmetry_inverse_singular() {
        let op = SymmetryOperation::new([[1., 0., 0.], [2., 0., 0.], [0., 0., 1.]], [0f64; 3], None);
        assert!(op.apply_inverse(&rows()).is_err())
    }

    #[test]
    fn symmetry_compose() {
        let quarter_turn = SymmetryOperation::new(
            [[0., -1., 0.], [1., 0., 0.], [0., 0., 1.]],
            [0f64; 3],
            None,
        );
        let half_turn = quarter_turn.compose(&quarter_turn);
        let mapped = half_turn.apply(&[KPoint::new(1, [1., 0., 0.], 0.)]);
        assert!((mapped[0].coords[0] + 1.).abs() < 1e-12);
        assert!(mapped[0].coords[1].abs() < 1e-12);
    }
}
