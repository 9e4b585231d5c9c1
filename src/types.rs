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

use fnv::FnvHashMap;
use ndarray::Array2;

use crate::errors::TrainError;

/// Ratings table with encoded user and item indexes.
pub type Ratings = Vec<(u32, u32, f64)>;

/// Coordinate-format sparse matrix over the observed ratings. Stores one
/// entry per observed (row, column) pair, so memory stays proportional to the
/// number of nonzeros no matter how large the dense shape is.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    num_rows: usize,
    num_cols: usize,
    rows: Vec<u32>,
    cols: Vec<u32>,
    values: Vec<f64>,
}

impl SparseMatrix {

    /// Builds a sparse matrix from (row, column, value) triples. Fails if any
    /// index is not covered by the requested shape, without returning a
    /// partial matrix. A duplicate (row, column) pair overwrites the value
    /// seen earlier and keeps the earlier position in the pattern.
    pub fn from_triples(
        num_rows: usize,
        num_cols: usize,
        triples: &[(u32, u32, f64)],
    ) -> Result<Self, TrainError> {

        let mut rows: Vec<u32> = Vec::with_capacity(triples.len());
        let mut cols: Vec<u32> = Vec::with_capacity(triples.len());
        let mut values: Vec<f64> = Vec::with_capacity(triples.len());

        let mut positions: FnvHashMap<(u32, u32), usize> =
            FnvHashMap::with_capacity_and_hasher(triples.len(), Default::default());

        for &(row, col, value) in triples {

            if row as usize >= num_rows {
                return Err(TrainError::IndexOutOfRange { index: row, bound: num_rows });
            }
            if col as usize >= num_cols {
                return Err(TrainError::IndexOutOfRange { index: col, bound: num_cols });
            }

            match positions.get(&(row, col)) {
                Some(&position) => values[position] = value,
                None => {
                    positions.insert((row, col), values.len());
                    rows.push(row);
                    cols.push(col);
                    values.push(value);
                }
            }
        }

        Ok(SparseMatrix { num_rows, num_cols, rows, cols, values })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Number of observed entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn rows(&self) -> &[u32] {
        &self.rows
    }

    pub fn cols(&self) -> &[u32] {
        &self.cols
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Replaces the stored values while keeping the pattern. Expects exactly
    /// one value per pattern entry.
    pub fn with_values(&self, values: Vec<f64>) -> Self {
        assert_eq!(values.len(), self.nnz());

        SparseMatrix {
            num_rows: self.num_rows,
            num_cols: self.num_cols,
            rows: self.rows.clone(),
            cols: self.cols.clone(),
            values,
        }
    }

    /// Elementwise difference over the shared pattern. Both matrices must
    /// hold the identical pattern; entries outside of it do not exist and are
    /// never compared.
    pub fn residual(&self, other: &SparseMatrix) -> SparseMatrix {
        debug_assert_eq!(self.rows, other.rows);
        debug_assert_eq!(self.cols, other.cols);

        let values = self.values
            .iter()
            .zip(other.values.iter())
            .map(|(observed, predicted)| observed - predicted)
            .collect();

        self.with_values(values)
    }

    /// Sparse-dense matrix product. For every nonzero (i, j, v), row j of
    /// `dense` is accumulated into row i of the product, scaled by v. Runs in
    /// O(nnz * K) for a dense matrix with K columns; rows without nonzeros
    /// stay zero.
    pub fn times_dense(&self, dense: &Array2<f64>) -> Array2<f64> {
        debug_assert_eq!(self.num_cols, dense.nrows());

        let mut product = Array2::zeros((self.num_rows, dense.ncols()));

        for ((&row, &col), &value) in self.rows.iter().zip(&self.cols).zip(&self.values) {
            product.row_mut(row as usize).scaled_add(value, &dense.row(col as usize));
        }

        product
    }

    /// Product of the transposed sparse matrix with a dense matrix, computed
    /// without materializing the transpose.
    pub fn transposed_times_dense(&self, dense: &Array2<f64>) -> Array2<f64> {
        debug_assert_eq!(self.num_rows, dense.nrows());

        let mut product = Array2::zeros((self.num_cols, dense.ncols()));

        for ((&row, &col), &value) in self.rows.iter().zip(&self.cols).zip(&self.values) {
            product.row_mut(col as usize).scaled_add(value, &dense.row(row as usize));
        }

        product
    }
}

#[cfg(test)]
mod tests {

    use ndarray::arr2;

    use super::SparseMatrix;
    use crate::errors::TrainError;

    #[test]
    fn build_keeps_one_entry_per_observed_pair() {
        let matrix = SparseMatrix::from_triples(2, 3, &[(0, 0, 5.0), (1, 2, 3.0)]).unwrap();

        assert_eq!(matrix.num_rows(), 2);
        assert_eq!(matrix.num_cols(), 3);
        assert_eq!(matrix.nnz(), 2);
        assert_eq!(matrix.rows(), &[0, 1]);
        assert_eq!(matrix.cols(), &[0, 2]);
        assert_eq!(matrix.values(), &[5.0, 3.0]);
    }

    #[test]
    fn build_rejects_row_index_out_of_range() {
        let result = SparseMatrix::from_triples(2, 2, &[(0, 0, 5.0), (2, 0, 1.0)]);

        assert!(matches!(
            result,
            Err(TrainError::IndexOutOfRange { index: 2, bound: 2 })
        ));
    }

    #[test]
    fn build_rejects_column_index_out_of_range() {
        let result = SparseMatrix::from_triples(4, 3, &[(1, 3, 1.0)]);

        assert!(matches!(
            result,
            Err(TrainError::IndexOutOfRange { index: 3, bound: 3 })
        ));
    }

    #[test]
    fn duplicate_pairs_overwrite_earlier_values() {
        let matrix = SparseMatrix::from_triples(
            2,
            2,
            &[(0, 0, 5.0), (1, 1, 2.0), (0, 0, 3.0)],
        ).unwrap();

        assert_eq!(matrix.nnz(), 2);
        assert_eq!(matrix.rows(), &[0, 1]);
        assert_eq!(matrix.cols(), &[0, 1]);
        assert_eq!(matrix.values(), &[3.0, 2.0]);
    }

    #[test]
    fn times_dense_accumulates_scaled_rows() {
        let matrix = SparseMatrix::from_triples(
            2,
            2,
            &[(0, 0, 2.0), (1, 0, 1.0), (1, 1, 3.0)],
        ).unwrap();
        let dense = arr2(&[[1.0, 2.0], [3.0, 4.0]]);

        let product = matrix.times_dense(&dense);

        assert_eq!(product, arr2(&[[2.0, 4.0], [10.0, 14.0]]));
    }

    #[test]
    fn transposed_times_dense_swaps_the_roles_of_rows_and_columns() {
        let matrix = SparseMatrix::from_triples(2, 3, &[(0, 1, 2.0), (1, 1, 1.0)]).unwrap();
        let dense = arr2(&[[1.0, 2.0], [3.0, 4.0]]);

        let product = matrix.transposed_times_dense(&dense);

        assert_eq!(product, arr2(&[[0.0, 0.0], [5.0, 8.0], [0.0, 0.0]]));
    }

    #[test]
    fn residual_subtracts_over_the_shared_pattern() {
        let observed = SparseMatrix::from_triples(2, 2, &[(0, 0, 5.0), (1, 1, 3.0)]).unwrap();
        let predicted = observed.with_values(vec![1.0, 1.0]);

        let residual = observed.residual(&predicted);

        assert_eq!(residual.values(), &[4.0, 2.0]);
        assert_eq!(residual.rows(), observed.rows());
        assert_eq!(residual.cols(), observed.cols());
    }
}
