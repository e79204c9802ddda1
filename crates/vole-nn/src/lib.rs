//! # vole-nn
//!
//! The embedding layer: a weight table that owns its memory, wrapping the
//! stateless [`vole_core::MultiEmbedding`] operator, plus initialization
//! helpers.

pub mod embedding;
pub mod init;

pub use embedding::Embedding;
