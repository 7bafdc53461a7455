use super::*;

#[test]
fn test_new() {
    let model = LinearRegression::new();
    assert!(!model.is_fitted());
    assert!(model.fit_intercept);
}

#[test]
fn test_simple_regression() {
    // y = 2x + 1
    let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).expect("4x1");
    let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);

    let mut model = LinearRegression::new();
    model.fit(&x, &y).expect("fit should succeed");

    assert!(model.is_fitted());
    let at = model.predict(&Matrix::from_vec(2, 1, vec![0.0, 10.0]).expect("2x1"));
    assert!((at[0] - 1.0).abs() < 1e-3);
    assert!((at[1] - 21.0).abs() < 1e-3);
    assert!((model.score(&x, &y) - 1.0).abs() < 1e-4);
}

#[test]
fn test_multivariate_regression() {
    // y = 1 + 2*x1 + 3*x2
    let x = Matrix::from_vec(4, 2, vec![1.0, 1.0, 2.0, 1.0, 1.0, 2.0, 2.0, 2.0]).expect("4x2");
    let y = Vector::from_slice(&[6.0, 8.0, 9.0, 11.0]);

    let mut model = LinearRegression::new();
    model.fit(&x, &y).expect("fit should succeed");

    let unit = Matrix::from_vec(3, 2, vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0]).expect("3x2");
    let at = model.predict(&unit);
    assert!((at[0] - 1.0).abs() < 1e-3);
    assert!((at[1] - 3.0).abs() < 1e-3);
    assert!((at[2] - 4.0).abs() < 1e-3);
}

#[test]
fn test_no_intercept() {
    let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).expect("4x1");
    let y = Vector::from_slice(&[2.0, 4.0, 6.0, 8.0]);

    let mut model = LinearRegression::new().with_intercept(false);
    model.fit(&x, &y).expect("fit should succeed");

    let at = model.predict(&Matrix::from_vec(2, 1, vec![0.0, 10.0]).expect("2x1"));
    assert_eq!(at[0], 0.0);
    assert!((at[1] - 20.0).abs() < 1e-3);
}

#[test]
fn test_predict_new_data() {
    let x_train = Matrix::from_vec(3, 1, vec![1.0, 2.0, 3.0]).expect("3x1");
    let y_train = Vector::from_slice(&[2.0, 3.0, 4.0]);

    let mut model = LinearRegression::new();
    model.fit(&x_train, &y_train).expect("fit should succeed");

    let x_test = Matrix::from_vec(2, 1, vec![4.0, 5.0]).expect("2x1");
    let predictions = model.predict(&x_test);
    assert!((predictions[0] - 5.0).abs() < 1e-3);
    assert!((predictions[1] - 6.0).abs() < 1e-3);
}

#[test]
fn test_dimension_mismatch_error() {
    let x = Matrix::from_vec(3, 2, vec![1.0; 6]).expect("3x2");
    let y = Vector::from_slice(&[1.0, 2.0]);

    let mut model = LinearRegression::new();
    assert!(matches!(
        model.fit(&x, &y),
        Err(TabscoutError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_empty_data_error() {
    let x = Matrix::from_vec(0, 2, vec![]).expect("0x2");
    let y = Vector::from_vec(vec![]);

    let mut model = LinearRegression::new();
    assert!(model.fit(&x, &y).is_err());
}

#[test]
fn test_underdetermined_error() {
    let x = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("2x3");
    let y = Vector::from_slice(&[1.0, 2.0]);

    let mut model = LinearRegression::new();
    assert!(model.fit(&x, &y).is_err());
}

#[test]
fn test_collinear_columns_singular() {
    let x = Matrix::from_vec(4, 2, vec![1.0, 2.0, 2.0, 4.0, 3.0, 6.0, 4.0, 8.0]).expect("4x2");
    let y = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0]);

    let mut model = LinearRegression::new();
    assert!(matches!(
        model.fit(&x, &y),
        Err(TabscoutError::SingularMatrix { .. })
    ));
}

#[test]
#[should_panic(expected = "Model not fitted")]
fn test_predict_unfitted_panics() {
    let model = LinearRegression::new();
    let x = Matrix::from_vec(1, 1, vec![1.0]).expect("1x1");
    let _ = model.predict(&x);
}

#[test]
fn test_ridge_zero_alpha_matches_ols() {
    let x = Matrix::from_vec(5, 1, vec![1.0, 2.0, 3.0, 4.0, 5.0]).expect("5x1");
    let y = Vector::from_slice(&[3.1, 4.9, 7.2, 8.8, 11.1]);

    let mut ols = LinearRegression::new();
    ols.fit(&x, &y).expect("fit should succeed");
    let mut ridge = Ridge::new(0.0);
    ridge.fit(&x, &y).expect("fit should succeed");

    let (a, b) = (ols.predict(&x), ridge.predict(&x));
    for i in 0..a.len() {
        assert!((a[i] - b[i]).abs() < 1e-3);
    }
}

#[test]
fn test_ridge_shrinks_coefficients() {
    let x = Matrix::from_vec(5, 1, vec![1.0, 2.0, 3.0, 4.0, 5.0]).expect("5x1");
    let y = Vector::from_slice(&[2.0, 4.0, 6.0, 8.0, 10.0]);

    let mut weak = Ridge::new(0.01);
    weak.fit(&x, &y).expect("fit should succeed");
    let mut strong = Ridge::new(100.0);
    strong.fit(&x, &y).expect("fit should succeed");

    let slope = |p: Vector<f32>| p[4] - p[0];
    assert!(slope(strong.predict(&x)).abs() < slope(weak.predict(&x)).abs());
}

#[test]
fn test_ridge_negative_alpha_rejected() {
    let x = Matrix::from_vec(2, 1, vec![1.0, 2.0]).expect("2x1");
    let y = Vector::from_slice(&[1.0, 2.0]);

    let mut model = Ridge::new(-1.0);
    assert!(matches!(
        model.fit(&x, &y),
        Err(TabscoutError::InvalidHyperparameter { .. })
    ));
}

#[test]
fn test_lasso_soft_threshold() {
    assert!((Lasso::soft_threshold(5.0, 2.0) - 3.0).abs() < 1e-6);
    assert!((Lasso::soft_threshold(-5.0, 2.0) - (-3.0)).abs() < 1e-6);
    assert_eq!(Lasso::soft_threshold(1.0, 2.0), 0.0);
    assert_eq!(Lasso::soft_threshold(-1.0, 2.0), 0.0);
}

#[test]
fn test_lasso_zeroes_irrelevant_feature() {
    // y = 3*x1, x2 is noise uncorrelated with x1.
    let x = Matrix::from_vec(
        6,
        2,
        vec![1.0, 1.0, 2.0, -1.0, 3.0, 1.0, 4.0, -1.0, 5.0, 1.0, 6.0, -1.0],
    )
    .expect("6x2");
    let y = Vector::from_slice(&[3.0, 6.0, 9.0, 12.0, 15.0, 18.0]);

    let mut model = Lasso::new(0.5);
    model.fit(&x, &y).expect("fit should converge");

    let unit = Matrix::from_vec(3, 2, vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0]).expect("3x2");
    let at = model.predict(&unit);
    assert!(at[1] - at[0] > 2.5);
    assert!((at[2] - at[0]).abs() < 0.1);
}

#[test]
fn test_lasso_convergence_failure() {
    let x = Matrix::from_vec(4, 2, vec![1.0, 0.5, 2.0, 1.5, 3.0, 2.0, 4.0, 3.5]).expect("4x2");
    let y = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0]);

    let mut model = Lasso::new(0.001).with_max_iter(1).with_tol(1e-12);
    assert!(matches!(
        model.fit(&x, &y),
        Err(TabscoutError::ConvergenceFailure { iterations: 1, .. })
    ));
    assert!(!model.is_fitted());
}
