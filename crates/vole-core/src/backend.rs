use crate::element::Element;
use crate::error::Result;
use crate::matrix::{MatMut, MatRef};
use std::fmt;

// Backend — Abstraction over execution strategies (CPU loop, GPU grid, ...)
//
// The operator's validation logic is backend-independent; only the two row
// kernels differ per device. Each backend implements this trait, providing
// its own device type and its own gather/scatter loops.
//
// WHY A TRAIT AND NOT AN ENUM?
//
// Using a trait (vs. an enum like `Device::Cpu | Device::Cuda`) means new
// backends can be added as separate crates without modifying vole-core,
// and the compiler monomorphizes the kernels per element type.

/// Identifies a compute device (e.g., "cpu", "cuda:0").
pub trait BackendDevice: Clone + fmt::Debug + Send + Sync + 'static {
    /// A human-readable name for this device.
    fn name(&self) -> String;
}

/// The two row kernels every backend must implement.
///
/// Both kernels may assume the shapes already agree — the operator validates
/// `weight.rows() == out/grad rows` relationships before dispatching — but
/// must check each index against the table size and fail with
/// `Error::IndexOutOfBounds` rather than read or write out of range.
pub trait Backend: Clone + Send + Sync + fmt::Debug + 'static {
    /// The device type for this backend.
    type Device: BackendDevice;

    /// Forward gather: for each position `k`, copy `weight[indices[k]]` into
    /// `out[k]`, in full, overwriting prior content.
    ///
    /// Output rows never alias each other, so implementations are free to
    /// parallelize across `k` without synchronization.
    fn gather_rows<T: Element>(
        device: &Self::Device,
        indices: &[u32],
        weight: MatRef<'_, T>,
        out: MatMut<'_, T>,
    ) -> Result<()>;

    /// Backward scatter-add: for each position `k`, add `grad_out[k]` into
    /// `grad_weight[indices[k]]`.
    ///
    /// When the same index appears at several positions their contributions
    /// must SUM — overwriting would silently drop duplicate-index gradients.
    /// A parallel implementation must therefore use atomic accumulation or a
    /// segmented reduction; plain concurrent writes lose updates.
    fn scatter_add_rows<T: Element>(
        device: &Self::Device,
        indices: &[u32],
        grad_out: MatRef<'_, T>,
        grad_weight: MatMut<'_, T>,
    ) -> Result<()>;
}
