pub(crate) use super::*;

#[test]
fn test_from_vec() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    assert_eq!(m.shape(), (2, 3));
    assert!((m.get(0, 0) - 1.0).abs() < 1e-6);
    assert!((m.get(1, 2) - 6.0).abs() < 1e-6);
}

#[test]
fn test_from_vec_error() {
    let result = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0]);
    assert!(result.is_err());
}

#[test]
fn test_from_columns_is_row_major() {
    let a = [1.0_f32, 2.0, 3.0];
    let b = [10.0_f32, 20.0, 30.0];
    let m = Matrix::from_columns(&[&a, &b]).expect("equal length columns");
    assert_eq!(m.shape(), (3, 2));
    assert_eq!(m.row_slice(1), &[2.0, 20.0]);
}

#[test]
fn test_from_columns_length_mismatch() {
    let a = [1.0_f32, 2.0];
    let b = [1.0_f32];
    assert!(Matrix::from_columns(&[&a, &b]).is_err());
}

#[test]
fn test_gram_matches_explicit_product() {
    // X = [[1, 2], [3, 4], [5, 6]] => XᵀX = [[35, 44], [44, 56]]
    let x = Matrix::from_vec(3, 2, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("3x2");
    let g = x.gram();
    assert_eq!(g.shape(), (2, 2));
    assert_eq!(g.as_slice(), &[35.0, 44.0, 44.0, 56.0]);
}

#[test]
fn test_transpose_matvec() {
    let x = Matrix::from_vec(3, 2, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("3x2");
    let v = Vector::from_slice(&[1.0, 0.0, -1.0]);
    let out = x.transpose_matvec(&v).expect("3 rows");
    assert_eq!(out.as_slice(), &[-4.0, -4.0]);
    assert!(x.transpose_matvec(&Vector::from_slice(&[1.0])).is_err());
}

#[test]
fn test_select_rows() {
    let m = Matrix::from_vec(3, 3, (0..9).map(|i| i as f32).collect())
        .expect("test data has correct dimensions: 3*3=9 elements");

    let rows = m.select_rows(&[2, 0]);
    assert_eq!(rows.shape(), (2, 3));
    assert_eq!(rows.row_slice(0), &[6.0, 7.0, 8.0]);
    assert_eq!(rows.row_slice(1), &[0.0, 1.0, 2.0]);
}

#[test]
fn test_matvec() {
    let a = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("2x3");
    let v = Vector::from_slice(&[1.0, 1.0, 2.0]);
    assert_eq!(a.matvec(&v).expect("3 columns").as_slice(), &[9.0, 21.0]);
}

#[test]
fn test_matvec_dimension_error() {
    let a = Matrix::from_vec(2, 2, vec![1.0_f32, 2.0, 3.0, 4.0]).expect("2x2");
    let v = Vector::from_slice(&[1.0, 2.0, 3.0]);
    assert!(a.matvec(&v).is_err());
}

#[test]
fn test_cholesky_solve() {
    // [[4, 2], [2, 3]] x = [2, 1] => x = [0.5, 0]
    let a = Matrix::from_vec(2, 2, vec![4.0_f32, 2.0, 2.0, 3.0]).expect("2x2");
    let b = Vector::from_slice(&[2.0, 1.0]);
    let x = a.cholesky_solve(&b).expect("positive definite");
    assert!((x[0] - 0.5).abs() < 1e-5);
    assert!(x[1].abs() < 1e-5);
}

#[test]
fn test_cholesky_rejects_singular() {
    let a = Matrix::from_vec(2, 2, vec![1.0_f32, 1.0, 1.0, 1.0]).expect("2x2");
    let b = Vector::from_slice(&[1.0, 1.0]);
    assert!(a.cholesky_solve(&b).is_err());
}
