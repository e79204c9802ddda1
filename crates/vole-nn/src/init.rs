// nn::init — Parameter initialization utilities
//
// Standalone functions for creating initialized weight buffers. The layer
// uses `normal` for its table (N(0, 1) is the standard embedding init);
// `zeros` is what callers allocate gradient buffers with.

use rand_distr::{Distribution, Normal};
use vole_core::element::Element;
use vole_core::error::{Error, Result};

/// A buffer of `len` elements drawn from N(mean, std).
pub fn normal<T: Element>(len: usize, mean: f64, std: f64) -> Result<Vec<T>> {
    let dist = Normal::new(mean, std)
        .map_err(|e| Error::msg(format!("invalid normal distribution: {}", e)))?;
    let mut rng = rand::thread_rng();
    Ok((0..len).map(|_| T::from_f64(dist.sample(&mut rng))).collect())
}

/// A buffer of `len` zeros.
pub fn zeros<T: Element>(len: usize) -> Vec<T> {
    vec![T::zero(); len]
}
