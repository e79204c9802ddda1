// OpReq and operand naming — the host-facing calling convention
//
// A host graph executor binds tensors to an operator by position, and tells
// the operator how to write each result: overwrite the buffer, accumulate
// into it, or skip it entirely. These two small pieces are the whole
// contract; there is no registry and no string-keyed parameter dictionary —
// configuration is a plain typed struct (see `embedding::MultiEmbeddingConfig`).

/// How an operator should write into a result buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpReq {
    /// Do not compute this result at all.
    Null,
    /// Overwrite the buffer.
    Write,
    /// Accumulate into the buffer's existing contents.
    Add,
}

/// Operand positions and names for the multi-embedding operator.
///
/// Hosts bind tensors by position; the names exist so a symbolic graph can
/// also bind by name. Forward takes `[data, weight]` and produces `[out]`.
pub mod operand {
    /// Position of the index vector in the forward input list.
    pub const DATA: usize = 0;
    /// Position of the weight matrix in the forward input list.
    pub const WEIGHT: usize = 1;
    /// Position of the output matrix in the forward output list.
    pub const OUT: usize = 0;

    /// Ordered names of the forward inputs.
    pub const ARGUMENTS: [&str; 2] = ["data", "weight"];
    /// Ordered names of the forward outputs.
    pub const OUTPUTS: [&str; 1] = ["out"];
}
