//! # Vole
//!
//! Multi-hot embedding lookup: a forward gather and backward scatter-add
//! over a dense weight table, with the shape-inference and validation
//! contract a host graph executor needs around them.
//!
//! This is the top-level facade crate that re-exports everything you need.
//!
//! ## Usage
//!
//! ```rust
//! use vole::prelude::*;
//! ```
//!
//! ## Architecture
//!
//! | Crate | Purpose |
//! |-------|----------|
//! | `vole-core` | Shapes, matrix views, Element trait, Backend trait, the MultiEmbedding operator |
//! | `vole-cpu` | CPU backend: rayon-parallel gather, single-writer scatter-add |
//! | `vole-nn` | Embedding layer owning a weight table, plus initializers |

/// Re-export core types.
pub use vole_core::{
    operand, Backend, BackendDevice, Element, Error, InferredShapes, MatMut, MatRef,
    MultiEmbedding, MultiEmbeddingConfig, OpReq, Result, Shape,
};

/// Re-export the CPU backend.
pub use vole_cpu::{CpuBackend, CpuDevice};

/// Re-export the embedding layer.
pub mod nn {
    pub use vole_nn::*;
}

/// Everything most programs want in scope.
pub mod prelude {
    pub use crate::nn::Embedding;
    pub use vole_core::{
        operand, Backend, BackendDevice, Element, Error, InferredShapes, MatMut, MatRef,
        MultiEmbedding, MultiEmbeddingConfig, OpReq, Result, Shape,
    };
    pub use vole_cpu::{CpuBackend, CpuDevice};
}
