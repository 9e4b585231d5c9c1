use thiserror::Error;

/// Failure conditions of the training pipeline.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("index {index} is out of range for a matrix dimension of {bound}")]
    IndexOutOfRange { index: u32, bound: usize },

    #[error("the dataset contains no observed ratings")]
    EmptyDataset,

    #[error("unable to build the worker pool")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
