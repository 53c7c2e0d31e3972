use nalgebra::DMatrix;

/// Moore–Penrose pseudo-inverse via SVD.
///
/// IK systems are frequently rank-deficient (short chains, locked axes,
/// singular poses); the pseudo-inverse turns those into small finite steps
/// instead of failures. If the decomposition itself cannot be computed the
/// result is a zero matrix, i.e. a zero step.
pub fn pseudo_inverse(matrix: &DMatrix<f32>, epsilon: f32) -> DMatrix<f32> {
    let (rows, columns) = matrix.shape();
    matrix
        .clone()
        .pseudo_inverse(epsilon)
        .unwrap_or_else(|_| DMatrix::zeros(columns, rows))
}
