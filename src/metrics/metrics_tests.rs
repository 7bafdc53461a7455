use super::*;

#[test]
fn test_r2_perfect() {
    let y = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    assert!((r_squared(&y, &y) - 1.0).abs() < 1e-6);
}

#[test]
fn test_r2_negative_for_bad_predictions() {
    let y_true = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let y_pred = Vector::from_slice(&[10.0, 20.0, 30.0, 40.0, 50.0]);
    assert!(r_squared(&y_pred, &y_true) < 0.0);
}

#[test]
fn test_r2_constant_target_is_zero() {
    let y_true = Vector::from_slice(&[2.0, 2.0, 2.0]);
    let y_pred = Vector::from_slice(&[1.0, 2.0, 3.0]);
    assert_eq!(r_squared(&y_pred, &y_true), 0.0);
}

#[test]
fn test_mse_zero_for_perfect() {
    let y = Vector::from_slice(&[1.0, -2.0, 3.5]);
    assert_eq!(mse(&y, &y), 0.0);
}

#[test]
fn test_mae_known_value() {
    let y_true = Vector::from_slice(&[3.0, -0.5, 2.0, 7.0]);
    let y_pred = Vector::from_slice(&[2.5, 0.0, 2.0, 8.0]);
    assert!((mae(&y_pred, &y_true) - 0.5).abs() < 1e-6);
}

#[test]
#[should_panic(expected = "Vectors cannot be empty")]
fn test_mse_empty_panics() {
    let empty = Vector::<f32>::from_vec(vec![]);
    let _ = mse(&empty, &empty);
}

#[test]
fn test_inertia_zero_when_points_are_centroids() {
    let data = Matrix::from_vec(2, 2, vec![0.0, 0.0, 5.0, 5.0]).expect("2x2");
    assert_eq!(inertia(&data, &data, &[0, 1]), 0.0);
}

#[test]
fn test_pearson_bounds() {
    let a = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0]);
    let b = Vector::from_slice(&[2.0, 4.0, 6.0, 8.0]);
    let c = Vector::from_slice(&[8.0, 6.0, 4.0, 2.0]);
    assert!((pearson(&a, &b) - 1.0).abs() < 1e-6);
    assert!((pearson(&a, &c) + 1.0).abs() < 1e-6);
}

#[test]
fn test_pearson_constant_is_zero() {
    let a = Vector::from_slice(&[1.0, 2.0, 3.0]);
    let b = Vector::from_slice(&[5.0, 5.0, 5.0]);
    assert_eq!(pearson(&a, &b), 0.0);
}
