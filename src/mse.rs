/**
 * FactoReco
 * Copyright (C) 2026 The FactoReco developers
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use ndarray::Array2;
use rayon::prelude::*;
use rayon::ThreadPool;

use crate::errors::TrainError;
use crate::types::SparseMatrix;

/// Step size for the forward-difference quotient.
const FINITE_DIFFERENCE_EPSILON: f64 = 0.000000001;

/// Computes the dot-product predictions at the pattern of `observed` and
/// returns them as a sparse matrix over exactly that pattern. Each length-K
/// reduction is independent of all others, so the entries are scored in
/// parallel on the worker pool. Runs in O(nnz * K) with O(nnz) extra memory;
/// the dense product of the two factor matrices is never materialized.
pub fn predict_observed(
    emb_user: &Array2<f64>,
    emb_item: &Array2<f64>,
    observed: &SparseMatrix,
    pool: &ThreadPool,
) -> SparseMatrix {

    debug_assert_eq!(observed.num_rows(), emb_user.nrows());
    debug_assert_eq!(observed.num_cols(), emb_item.nrows());

    let predictions: Vec<f64> = pool.install(|| {
        observed.rows()
            .par_iter()
            .zip(observed.cols().par_iter())
            .map(|(&user_index, &item_index)| {
                emb_user.row(user_index as usize).dot(&emb_item.row(item_index as usize))
            })
            .collect()
    });

    observed.with_values(predictions)
}

/// Mean squared error between the observed ratings and their predictions,
/// taken over the observed entries only.
pub fn cost(
    ratings: &[(u32, u32, f64)],
    emb_user: &Array2<f64>,
    emb_item: &Array2<f64>,
    pool: &ThreadPool,
) -> Result<f64, TrainError> {

    if ratings.is_empty() {
        return Err(TrainError::EmptyDataset);
    }

    let observed = SparseMatrix::from_triples(emb_user.nrows(), emb_item.nrows(), ratings)?;
    let predicted = predict_observed(emb_user, emb_item, &observed, pool);
    let residual = observed.residual(&predicted);

    let squared_sum: f64 = residual.values()
        .iter()
        .map(|difference| difference * difference)
        .sum();

    Ok(squared_sum / observed.nnz() as f64)
}

/// Partial derivatives of the mean squared error with respect to both factor
/// matrices:
///
///   grad_user = -2 * (R * emb_item)  / nnz
///   grad_item = -2 * (Rᵗ * emb_user) / nnz
///
/// where R is the residual over the observed pattern. Only observed entries
/// contribute, users and items without ratings keep a zero gradient row.
pub fn gradients(
    observed: &SparseMatrix,
    emb_user: &Array2<f64>,
    emb_item: &Array2<f64>,
    pool: &ThreadPool,
) -> Result<(Array2<f64>, Array2<f64>), TrainError> {

    if observed.nnz() == 0 {
        return Err(TrainError::EmptyDataset);
    }

    let predicted = predict_observed(emb_user, emb_item, observed, pool);
    let residual = observed.residual(&predicted);

    let scale = -2.0 / observed.nnz() as f64;
    let grad_user = residual.times_dense(emb_item) * scale;
    let grad_item = residual.transposed_times_dense(emb_user) * scale;

    Ok((grad_user, grad_item))
}

/// Selects a single factor entry for perturbation.
#[derive(Debug, Clone, Copy)]
pub enum FactorEntry {
    User { index: usize, factor: usize },
    Item { index: usize, factor: usize },
}

/// Forward-difference quotient of the cost under a perturbation of a single
/// factor entry. Numerical cross-check for the analytic gradients, consumed
/// by the test suite and not part of the training path.
pub fn finite_difference(
    ratings: &[(u32, u32, f64)],
    emb_user: &Array2<f64>,
    emb_item: &Array2<f64>,
    entry: FactorEntry,
    pool: &ThreadPool,
) -> Result<f64, TrainError> {

    let unperturbed = cost(ratings, emb_user, emb_item, pool)?;

    let mut emb_user = emb_user.clone();
    let mut emb_item = emb_item.clone();

    match entry {
        FactorEntry::User { index, factor } => {
            emb_user[[index, factor]] += FINITE_DIFFERENCE_EPSILON;
        },
        FactorEntry::Item { index, factor } => {
            emb_item[[index, factor]] += FINITE_DIFFERENCE_EPSILON;
        },
    }

    let perturbed = cost(ratings, &emb_user, &emb_item, pool)?;

    Ok((perturbed - unperturbed) / FINITE_DIFFERENCE_EPSILON)
}
