use crate::errors::NumericalError;

/// compute the dot product between a row vector and a matrix
pub fn dot(v: [f64; 3], m: [[f64; 3]; 3]) -> [f64; 3] {
    let mut out = [0f64; 3];
    for (i, out) in out.iter_mut().enumerate() {
        *out = v[0] * m[0][i] + v[1] * m[1][i] + v[2] * m[2][i]
    }
    out
}

/// transpose a 3x3 matrix
pub fn transpose(m: [[f64; 3]; 3]) -> [[f64; 3]; 3] {
    [
        [m[0][0], m[1][0], m[2][0]],
        [m[0][1], m[1][1], m[2][1]],
        [m[0][2], m[1][2], m[2][2]],
    ]
}

/// multiply two 3x3 matrices
pub fn matmul(a: [[f64; 3]; 3], b: [[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut out = [[0f64; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            for (k, b) in b.iter().enumerate() {
                out[i][j] += a[i][k] * b[j];
            }
        }
    }
    out
}

/// the determinant of a 3x3 matrix
pub fn determinant(m: [[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// calculates the inverse of a 3x3 matrix
pub fn invert(m: [[f64; 3]; 3]) -> Result<[[f64; 3]; 3], NumericalError> {
    let det = determinant(m);
    if det.abs() < 1e-12 {
        return Err(NumericalError::SingularMatrix(det));
    }
    Ok([
        [
            (m[1][1] * m[2][2] - m[1][2] * m[2][1]) / det,
            (m[0][2] * m[2][1] - m[0][1] * m[2][2]) / det,
            (m[0][1] * m[1][2] - m[0][2] * m[1][1]) / det,
        ],
        [
            (m[1][2] * m[2][0] - m[1][0] * m[2][2]) / det,
            (m[0][0] * m[2][2] - m[0][2] * m[2][0]) / det,
            (m[0][2] * m[1][0] - m[0][0] * m[1][2]) / det,
        ],
        [
            (m[1][0] * m[2][1] - m[1][1] * m[2][0]) / det,
            (m[0][1] * m[2][0] - m[0][0] * m[2][1]) / det,
            (m[0][0] * m[1][1] - m[0][1] * m[1][0]) / det,
        ],
    ])
}

/// round a value to the supplied number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// convert an energy in Rydberg to electron-volts
pub fn rydberg_to_ev(energy: f64) -> f64 {
    13.6056923 * energy
}

/// convert an energy in Hartree to electron-volts
pub fn hartree_to_ev(energy: f64) -> f64 {
    rydberg_to_ev(energy) * 2f64
}

/// Solves the dense system a.x = b in place by Gaussian elimination with
/// partial pivoting. `a` is row-major with n rows of n columns.
pub fn solve(a: &mut [Vec<f64>], b: &mut [f64]) -> Result<Vec<f64>, NumericalError> {
    let n = b.len();
    for col in 0..n {
        // pivot on the largest remaining value in this column
        let mut pivot = col;
        for row in (col + 1)..n {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }
        if a[pivot][col].abs() < f64::EPSILON {
            return Err(NumericalError::SingularMatrix(0f64));
        }
        if pivot != col {
            a.swap(pivot, col);
            b.swap(pivot, col);
        }
        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }
    let mut x = vec![0f64; n];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for col in (row + 1)..n {
            sum -= a[row][col] * x[col];
        }
        x[row] = sum / a[row][row];
    }
    Ok(x)
}
