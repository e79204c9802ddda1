//! # vole-core
//!
//! Core types for the Vole multi-hot embedding lookup.
//!
//! This crate provides:
//! - [`MultiEmbedding`] — the operator: shape inference, validation, and
//!   dispatch of the forward gather / backward scatter-add
//! - [`Shape`] — n-dimensional shape values for shape inference
//! - [`MatRef`] / [`MatMut`] — borrowed row-major 2-D views over caller memory
//! - [`Element`] — trait over the supported table element types (f16, bf16, f32, f64)
//! - [`Backend`] trait — abstraction over execution strategies (CPU, GPU, ...)
//! - [`OpReq`] / [`operand`] — the host-facing write-mode and operand-binding contract

pub mod backend;
pub mod element;
pub mod embedding;
pub mod error;
pub mod matrix;
pub mod op;
pub mod shape;

pub use backend::{Backend, BackendDevice};
pub use element::Element;
pub use embedding::{InferredShapes, MultiEmbedding, MultiEmbeddingConfig};
pub use error::{Error, Result};
pub use matrix::{MatMut, MatRef};
pub use op::{operand, OpReq};
pub use shape::Shape;
