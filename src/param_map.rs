//! Dynamic parameter maps
//!
//! Every estimator exposes its hyperparameters as a JSON object, so that they can be inspected,
//! stored next to experiment results, or updated from configuration files without knowing the
//! concrete parameter type. Unknown keys are ignored by all estimators, while recognized keys
//! with a value of the wrong type are rejected.
use serde_json::Value;

use crate::dataset::Float;
use crate::error::{Error, Result};

/// Hyperparameters as a JSON object
pub type ParamMap = serde_json::Map<String, Value>;

fn wrong_type(key: &str, expected: &str, value: &Value) -> Error {
    Error::Parameters(format!(
        "`{}` should be {}, but was {}",
        key, expected, value
    ))
}

/// Read a non-negative integer, `None` if the key is absent
pub fn get_usize(params: &ParamMap, key: &str) -> Result<Option<usize>> {
    params
        .get(key)
        .map(|value| {
            value
                .as_u64()
                .map(|x| x as usize)
                .ok_or_else(|| wrong_type(key, "a non-negative integer", value))
        })
        .transpose()
}

/// Read a number, `None` if the key is absent
///
/// Integers are accepted as well, so that `{"alpha": 1}` sets `alpha` to `1.0`.
pub fn get_float<F: Float>(params: &ParamMap, key: &str) -> Result<Option<F>> {
    params
        .get(key)
        .map(|value| {
            value
                .as_f64()
                .map(F::cast)
                .ok_or_else(|| wrong_type(key, "a number", value))
        })
        .transpose()
}

/// Read a boolean, `None` if the key is absent
pub fn get_bool(params: &ParamMap, key: &str) -> Result<Option<bool>> {
    params
        .get(key)
        .map(|value| {
            value
                .as_bool()
                .ok_or_else(|| wrong_type(key, "a boolean", value))
        })
        .transpose()
}

/// Read a string, `None` if the key is absent
pub fn get_str<'a>(params: &'a ParamMap, key: &str) -> Result<Option<&'a str>> {
    params
        .get(key)
        .map(|value| {
            value
                .as_str()
                .ok_or_else(|| wrong_type(key, "a string", value))
        })
        .transpose()
}

/// Convert a float into a JSON number, non-finite values become `null`
pub fn float_value<F: Float>(x: F) -> Value {
    x.to_f64().map(Value::from).unwrap_or(Value::Null)
}
