mod algorithm;
mod hyperparams;
mod iter;
mod split;

pub use algorithm::*;
pub use hyperparams::*;
pub use iter::*;
pub use sylva::Task;
pub use split::{
    classification_score, gini_impurity, regression_score, sum_squared_deviations, weighted_gini,
};
