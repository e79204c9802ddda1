// Embedding — Lookup table for discrete categories
//
// An embedding layer maps integer indices to dense vectors. It's the
// standard way to handle categorical data (words, tokens, item IDs):
//
//   embedding[category_id] → vector of size output_dim
//
// The operator in vole-core is stateless and borrows every tensor from the
// caller; this layer is the convenience wrapper that owns the one tensor a
// lookup table actually has — the (input_dim, output_dim) weight matrix —
// and allocates output/gradient buffers at the shapes the operator infers.

use vole_core::backend::Backend;
use vole_core::element::Element;
use vole_core::embedding::{MultiEmbedding, MultiEmbeddingConfig};
use vole_core::error::{Error, Result};
use vole_core::matrix::{MatMut, MatRef};
use vole_core::op::OpReq;
use vole_core::shape::Shape;

use crate::init;

/// A lookup table mapping integer indices in `[0, input_dim)` to dense
/// rows of length `output_dim`, stored row-major.
#[derive(Debug)]
pub struct Embedding<B: Backend, T: Element> {
    op: MultiEmbedding,
    weight: Vec<T>,
    device: B::Device,
}

impl<B: Backend, T: Element> Embedding<B, T> {
    /// Create a new layer with normally-distributed random weights.
    ///
    /// N(0, 1) init — standard for embeddings.
    pub fn new(input_dim: usize, output_dim: usize, device: &B::Device) -> Result<Self> {
        let op = MultiEmbedding::new(MultiEmbeddingConfig {
            input_dim,
            output_dim,
        })?;
        let weight = init::normal(input_dim * output_dim, 0.0, 1.0)?;
        Ok(Embedding {
            op,
            weight,
            device: device.clone(),
        })
    }

    /// Create from an existing row-major weight buffer of shape
    /// `(input_dim, output_dim)`.
    pub fn from_weight(
        weight: Vec<T>,
        input_dim: usize,
        output_dim: usize,
        device: &B::Device,
    ) -> Result<Self> {
        let op = MultiEmbedding::new(MultiEmbeddingConfig {
            input_dim,
            output_dim,
        })?;
        if weight.len() != input_dim * output_dim {
            return Err(Error::ElementCountMismatch {
                shape: Shape::from((input_dim, output_dim)),
                expected: input_dim * output_dim,
                got: weight.len(),
            });
        }
        Ok(Embedding {
            op,
            weight,
            device: device.clone(),
        })
    }

    pub fn input_dim(&self) -> usize {
        self.op.input_dim()
    }

    pub fn output_dim(&self) -> usize {
        self.op.output_dim()
    }

    /// The weight table as a flat row-major slice.
    pub fn weight(&self) -> &[T] {
        &self.weight
    }

    /// The weight table, mutably (for an external optimizer to update).
    pub fn weight_mut(&mut self) -> &mut [T] {
        &mut self.weight
    }

    /// Look up embeddings for the given indices.
    ///
    /// Returns a freshly allocated row-major `(indices.len(), output_dim)`
    /// buffer with `result[k] = weight[indices[k]]`.
    pub fn forward(&self, indices: &[u32]) -> Result<Vec<T>> {
        let cols = self.op.output_dim();
        let mut out = vec![T::zero(); indices.len() * cols];
        self.op.forward::<B, T>(
            &self.device,
            OpReq::Write,
            indices,
            MatRef::new(&self.weight, self.op.input_dim(), cols)?,
            MatMut::new(&mut out, indices.len(), cols)?,
        )?;
        Ok(out)
    }

    /// Compute the weight gradient for one batch into a fresh buffer.
    ///
    /// `grad_out` is the row-major `(indices.len(), output_dim)` gradient of
    /// the loss with respect to the forward output. Positions sharing an
    /// index have their rows summed.
    pub fn backward(&self, indices: &[u32], grad_out: &[T]) -> Result<Vec<T>> {
        let mut grad_weight = init::zeros(self.op.input_dim() * self.op.output_dim());
        self.run_backward(indices, grad_out, OpReq::Write, &mut grad_weight)?;
        Ok(grad_weight)
    }

    /// Accumulate one batch's weight gradient into an existing buffer
    /// (e.g. summing gradients across micro-batches).
    pub fn backward_accumulate(
        &self,
        indices: &[u32],
        grad_out: &[T],
        grad_weight: &mut [T],
    ) -> Result<()> {
        self.run_backward(indices, grad_out, OpReq::Add, grad_weight)
    }

    fn run_backward(
        &self,
        indices: &[u32],
        grad_out: &[T],
        weight_req: OpReq,
        grad_weight: &mut [T],
    ) -> Result<()> {
        let cols = self.op.output_dim();
        self.op.backward::<B, T>(
            &self.device,
            indices,
            MatRef::new(grad_out, indices.len(), cols)?,
            OpReq::Null,
            weight_req,
            MatMut::new(grad_weight, self.op.input_dim(), cols)?,
        )
    }
}
