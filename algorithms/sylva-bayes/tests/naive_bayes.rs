use ndarray::array;
use serde_json::{json, Value};
use sylva::prelude::*;
use sylva_bayes::{
    GaussianNbEstimator, GaussianNbParams, MultinomialNbEstimator, MultinomialNbParams,
    NaiveBayesError, Result,
};

fn param_map(value: Value) -> ParamMap {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

fn gaussian_data() -> Dataset<f64> {
    Dataset::new(
        array![
            [-2., -1.],
            [-1., -1.],
            [-1., -2.],
            [1., 1.],
            [1., 2.],
            [2., 1.],
            [6., 6.],
            [6., 7.],
            [7., 6.]
        ],
        array![0., 0., 0., 1., 1., 1., 2., 2., 2.],
    )
}

#[test]
fn gaussian_estimator_life_cycle() -> Result<()> {
    let dataset = gaussian_data();
    let mut estimator = GaussianNbEstimator::new(GaussianNbParams::new());

    assert!(matches!(
        estimator.predict(dataset.records()),
        Err(NaiveBayesError::BaseCrate(Error::NotFitted))
    ));

    estimator.fit(&dataset)?;
    let accuracy = estimator.score(&dataset, |truth, pred| pred.accuracy(&truth))?;
    assert!((accuracy - 1.0).abs() < 1e-12);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gaussian.bin");
    estimator.save(&path)?;

    let restored = GaussianNbEstimator::<f64>::from_file(&path)?;
    let queries = array![[0., 0.], [5., 5.], [-3., 1.]];
    assert_eq!(restored.predict(&queries)?, estimator.predict(&queries)?);
    assert_eq!(restored.get_params(), estimator.get_params());

    Ok(())
}

#[test]
fn multinomial_estimator_params() -> Result<()> {
    let dataset = Dataset::new(
        array![[3., 0., 1.], [4., 1., 0.], [0., 3., 1.], [1., 5., 0.]],
        array![0., 0., 1., 1.],
    );
    let mut estimator = MultinomialNbEstimator::new(MultinomialNbParams::new());

    estimator.set_params(&param_map(json!({"alpha": 0.5})))?;
    assert_eq!(estimator.get_params(), param_map(json!({"alpha": 0.5})));

    // a rejected update keeps the previous value
    assert!(estimator
        .set_params(&param_map(json!({"alpha": -2.0})))
        .is_err());
    assert_eq!(estimator.get_params(), param_map(json!({"alpha": 0.5})));

    estimator.fit(&dataset)?;
    assert_eq!(
        estimator.predict(&array![[5., 0., 0.], [0., 5., 0.]])?,
        array![0., 1.]
    );
    assert!(matches!(
        estimator.predict(&array![[1., 2.]]),
        Err(NaiveBayesError::BaseCrate(Error::FeatureMismatch { .. }))
    ));

    Ok(())
}
