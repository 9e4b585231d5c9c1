use ndarray::Array2;
use rayon::ThreadPoolBuilder;

mod errors;
pub mod embeddings;
pub mod io;
pub mod mse;
pub mod stats;
pub mod types;

#[cfg(test)]
mod usage_tests;

pub use crate::errors::TrainError;

use crate::mse::{cost, gradients};
use crate::types::SparseMatrix;

/// Momentum coefficient of the velocity updates.
const MOMENTUM: f64 = 0.9;

/// Cadence of the cost reports emitted during training.
const REPORT_EVERY: usize = 50;

/// Trained factor matrices. Row i of `emb_user` is the latent vector of user
/// i, row j of `emb_item` the latent vector of item j, and their dot product
/// predicts the rating of item j by user i.
pub struct Factorization {
    pub emb_user: Array2<f64>,
    pub emb_item: Array2<f64>,
}

/// Cost snapshot handed to the reporting callback every fiftieth iteration.
/// The held-out cost is absent when no held-out ratings were supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct CostReport {
    pub iteration: usize,
    pub training_cost: f64,
    pub validation_cost: Option<f64>,
}

/// Trains a low-rank factorization of the rating matrix with momentum
/// gradient descent.
///
/// The sparse rating matrix is built once from the encoded `ratings` and
/// stays fixed for the whole run. Every iteration computes the gradients of
/// the mean squared error over the observed entries, folds them into the
/// velocities and replaces both factor matrices wholesale:
///
///   velocity  <-  0.9 * velocity + 0.1 * gradient
///   factors   <-  factors - learning_rate * velocity
///
/// Every fiftieth iteration (including iteration zero, measured after that
/// iteration's update) the training cost, and the cost on the held-out
/// `validation_ratings` if present, are passed to `report`. The loop runs
/// for exactly `iterations` steps, there is no early stop.
///
/// The per-entry prediction work is spread over `pool_size` worker threads.
pub fn factorize<F>(
    ratings: &[(u32, u32, f64)],
    validation_ratings: Option<&[(u32, u32, f64)]>,
    emb_user: Array2<f64>,
    emb_item: Array2<f64>,
    iterations: usize,
    learning_rate: f64,
    pool_size: usize,
    mut report: F,
) -> Result<Factorization, TrainError>
where
    F: FnMut(&CostReport),
{
    if ratings.is_empty() {
        return Err(TrainError::EmptyDataset);
    }

    // A held-out set whose ratings were all filtered out cannot be scored.
    let validation_ratings = validation_ratings.filter(|heldout| !heldout.is_empty());

    let pool = ThreadPoolBuilder::new().num_threads(pool_size).build()?;

    let observed = SparseMatrix::from_triples(emb_user.nrows(), emb_item.nrows(), ratings)?;

    let mut emb_user = emb_user;
    let mut emb_item = emb_item;
    let mut velocity_user: Array2<f64> = Array2::zeros(emb_user.raw_dim());
    let mut velocity_item: Array2<f64> = Array2::zeros(emb_item.raw_dim());

    for iteration in 0..iterations {

        let (grad_user, grad_item) = gradients(&observed, &emb_user, &emb_item, &pool)?;

        velocity_user = &velocity_user * MOMENTUM + &grad_user * (1.0 - MOMENTUM);
        velocity_item = &velocity_item * MOMENTUM + &grad_item * (1.0 - MOMENTUM);

        emb_user = &emb_user - &(&velocity_user * learning_rate);
        emb_item = &emb_item - &(&velocity_item * learning_rate);

        if iteration % REPORT_EVERY == 0 {
            let training_cost = cost(ratings, &emb_user, &emb_item, &pool)?;
            let validation_cost = validation_ratings
                .map(|heldout| cost(heldout, &emb_user, &emb_item, &pool))
                .transpose()?;

            report(&CostReport { iteration, training_cost, validation_cost });
        }
    }

    Ok(Factorization { emb_user, emb_item })
}
