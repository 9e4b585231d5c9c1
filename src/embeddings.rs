use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seed for the embedding initialization. Reproducibility of a training run
/// is part of the contract, so the seed is not a caller option.
const EMBEDDING_SEED: u64 = 3;

/// Returns the fixed-seed generator used for embedding initialization. Two
/// initializations from freshly created generators are bit-identical.
pub fn embedding_rng() -> StdRng {
    StdRng::seed_from_u64(EMBEDDING_SEED)
}

/// Creates an n x K factor matrix with entries drawn uniformly from
/// [0, 6/K). At this scale a length-K dot product of two factor rows lands
/// in the range of typical rating values.
pub fn random_embeddings<R: Rng>(n: usize, num_factors: usize, rng: &mut R) -> Array2<f64> {
    let scale = 6.0 / num_factors as f64;

    Array2::from_shape_fn((n, num_factors), |_| rng.gen::<f64>() * scale)
}
