use thiserror::Error;

/// Simplified `Result` using [`NnError`](crate::NnError) as error type
pub type Result<T> = std::result::Result<T, NnError>;

/// Error variants from hyper-parameter construction or model estimation
#[derive(Error, Debug, Clone)]
pub enum NnError {
    /// At least one neighbour has to be consulted
    #[error("the number of neighbours must be at least one")]
    ZeroNeighbours,
    #[error(transparent)]
    BaseCrate(#[from] sylva::Error),
}
