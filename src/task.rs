//! Kind of target an estimator predicts
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The kind of target an estimator is fitted for
///
/// Estimators which handle both kinds, like decision trees and nearest neighbours, use the task
/// to decide how targets are aggregated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    /// Discrete labels, stored as integral floats. The most frequent label wins.
    Classification,
    /// Continuous targets, aggregated by their mean
    Regression,
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Task::Classification => write!(f, "classification"),
            Task::Regression => write!(f, "regression"),
        }
    }
}

impl FromStr for Task {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "classification" => Ok(Task::Classification),
            "regression" => Ok(Task::Regression),
            _ => Err(Error::Parameters(format!(
                "task should be `classification` or `regression`, but was `{}`",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Task;

    #[test]
    fn parses_and_prints_lowercase_names() {
        for task in &[Task::Classification, Task::Regression] {
            assert_eq!(task.to_string().parse::<Task>().unwrap(), *task);
        }
        assert!("Classification".parse::<Task>().is_err());
        assert!("forest".parse::<Task>().is_err());
    }
}
