use crate::backend::Backend;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::matrix::{MatMut, MatRef};
use crate::op::{operand, OpReq};
use crate::shape::Shape;

// MultiEmbedding — lookup-table transform for multi-hot categorical input
//
// Given a batch of N integer indices and a dense (input_dim, output_dim)
// weight table, forward gathers one table row per index into an
// (N, output_dim) output. Backward scatters the incoming output gradient
// back into the rows that were read, SUMMING contributions when an index
// repeats within the batch.
//
// The operator is stateless: it holds only its configuration. Tensors are
// borrowed from the caller per call, and the shapes the host allocated are
// re-validated against the configuration before any kernel runs.

/// Static configuration for [`MultiEmbedding`].
///
/// `input_dim` is the number of categories (weight rows); `output_dim` is
/// the embedding width (weight columns). Both must be at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiEmbeddingConfig {
    pub input_dim: usize,
    pub output_dim: usize,
}

/// Shapes fixed by one successful inference pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredShapes {
    /// Weight table shape: `(input_dim, output_dim)`.
    pub weight: Shape,
    /// Output shape: `(N, output_dim)` for an index vector of length N.
    pub out: Shape,
}

/// The multi-hot embedding operator: shape validator plus lookup engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiEmbedding {
    input_dim: usize,
    output_dim: usize,
}

impl MultiEmbedding {
    /// Create the operator, validating the configuration.
    ///
    /// Fails with [`Error::Config`] if either dimension is zero.
    pub fn new(config: MultiEmbeddingConfig) -> Result<Self> {
        if config.input_dim < 1 {
            return Err(Error::Config {
                name: "input_dim",
                value: config.input_dim,
            });
        }
        if config.output_dim < 1 {
            return Err(Error::Config {
                name: "output_dim",
                value: config.output_dim,
            });
        }
        Ok(MultiEmbedding {
            input_dim: config.input_dim,
            output_dim: config.output_dim,
        })
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn output_dim(&self) -> usize {
        self.output_dim
    }

    /// Infer weight and output shapes from the index-vector shape.
    ///
    /// Shape inference is a two-phase protocol: the host graph builder may
    /// call this before upstream shapes have settled. `data = None` means
    /// "not resolved yet" and yields `Ok(None)` — a deferral, never a hard
    /// failure — so the host can retry once the index-vector shape is known.
    /// A resolved length of 0 is a valid empty batch, not a deferral.
    ///
    /// `weight` is the previously fixed weight shape, if the host has one;
    /// a conflict with `(input_dim, output_dim)` is a [`Error::ShapeMismatch`].
    pub fn infer_shapes(
        &self,
        data: Option<&Shape>,
        weight: Option<&Shape>,
    ) -> Result<Option<InferredShapes>> {
        let data = match data {
            None => return Ok(None),
            Some(s) => s,
        };
        if data.rank() != 1 {
            return Err(Error::RankMismatch {
                expected: 1,
                got: data.rank(),
            });
        }
        let weight_shape = Shape::from((self.input_dim, self.output_dim));
        if let Some(w) = weight {
            if *w != weight_shape {
                return Err(Error::ShapeMismatch {
                    expected: weight_shape,
                    got: w.clone(),
                });
            }
        }
        let n = data.dim(0)?;
        Ok(Some(InferredShapes {
            weight: weight_shape,
            out: Shape::from((n, self.output_dim)),
        }))
    }

    /// Forward gather: `out[k] = weight[data[k]]` for each `k`.
    ///
    /// The output is overwrite-only; any `req` other than [`OpReq::Write`]
    /// fails with [`Error::UnsupportedWriteMode`] before computation.
    /// Weight and output shapes are validated against the configuration and
    /// the index-vector length, then the gather is dispatched to `B`.
    pub fn forward<B: Backend, T: Element>(
        &self,
        device: &B::Device,
        req: OpReq,
        data: &[u32],
        weight: MatRef<'_, T>,
        out: MatMut<'_, T>,
    ) -> Result<()> {
        if req != OpReq::Write {
            return Err(Error::UnsupportedWriteMode {
                operand: operand::OUTPUTS[operand::OUT],
                req,
            });
        }
        let weight_shape = Shape::from((self.input_dim, self.output_dim));
        if weight.shape() != weight_shape {
            return Err(Error::ShapeMismatch {
                expected: weight_shape,
                got: weight.shape(),
            });
        }
        let out_shape = Shape::from((data.len(), self.output_dim));
        if out.shape() != out_shape {
            return Err(Error::ShapeMismatch {
                expected: out_shape,
                got: out.shape(),
            });
        }
        B::gather_rows(device, data, weight, out)
    }

    /// Backward scatter-add: `grad_weight[data[k]] += grad_out[k]` for each `k`.
    ///
    /// Duplicate indices sum their contributions — that accumulation is the
    /// correctness property that distinguishes this from a plain scatter.
    ///
    /// `data_req` must be [`OpReq::Null`]: the index vector is categorical,
    /// its gradient is undefined, and asking for it fails fast with
    /// [`Error::UnsupportedGradient`] rather than silently returning zeros.
    /// `weight_req` selects [`OpReq::Write`] (zero-fill, then accumulate) or
    /// [`OpReq::Add`] (accumulate into the caller's existing buffer);
    /// [`OpReq::Null`] makes the whole call a no-op.
    pub fn backward<B: Backend, T: Element>(
        &self,
        device: &B::Device,
        data: &[u32],
        grad_out: MatRef<'_, T>,
        data_req: OpReq,
        weight_req: OpReq,
        mut grad_weight: MatMut<'_, T>,
    ) -> Result<()> {
        if data_req != OpReq::Null {
            return Err(Error::UnsupportedGradient {
                operand: operand::ARGUMENTS[operand::DATA],
            });
        }
        if weight_req == OpReq::Null {
            return Ok(());
        }
        let grad_out_shape = Shape::from((data.len(), self.output_dim));
        if grad_out.shape() != grad_out_shape {
            return Err(Error::ShapeMismatch {
                expected: grad_out_shape,
                got: grad_out.shape(),
            });
        }
        let grad_weight_shape = Shape::from((self.input_dim, self.output_dim));
        if grad_weight.shape() != grad_weight_shape {
            return Err(Error::ShapeMismatch {
                expected: grad_weight_shape,
                got: grad_weight.shape(),
            });
        }
        if weight_req == OpReq::Write {
            grad_weight.fill(T::zero());
        }
        B::scatter_add_rows(device, data, grad_out, grad_weight)
    }

    /// Which forward-pass tensors backward actually needs.
    ///
    /// Only the output gradient and the original index vector: the weight
    /// values and the forward output never enter the backward computation.
    /// The host uses this to drop everything else at the forward/backward
    /// boundary instead of retaining it — a memory contract, not a hint.
    ///
    /// The slices are the host's generic tensor-id lists for this operator,
    /// indexed by the [`operand`] positions.
    pub fn backward_dependencies<I: Copy>(
        &self,
        out_grad: &[I],
        in_data: &[I],
        _out_data: &[I],
    ) -> [I; 2] {
        [out_grad[operand::OUT], in_data[operand::DATA]]
    }
}
