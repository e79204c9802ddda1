//! # vole-cpu
//!
//! CPU backend for Vole.
//!
//! The forward gather parallelizes across index positions with rayon:
//! each output row is an independent chunk, no two positions write the
//! same row, so the copy loop needs no synchronization.
//!
//! The backward scatter-add is the one place where parallelism could lose
//! updates — two positions carrying the same index target the same gradient
//! row. This backend takes the single-writer strategy: one sequential pass
//! over the index positions, accumulating in place. With one writer there
//! is nothing to race. (An atomic or segmented-reduction variant would be
//! the parallel alternative; the `Backend` contract requires accumulate
//! semantics either way.)

use rayon::prelude::*;
use vole_core::backend::{Backend, BackendDevice};
use vole_core::element::Element;
use vole_core::error::{Error, Result};
use vole_core::matrix::{MatMut, MatRef};

/// The (only) CPU device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuDevice;

impl BackendDevice for CpuDevice {
    fn name(&self) -> String {
        "cpu".to_string()
    }
}

/// CPU implementation of the gather/scatter-add kernels.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuBackend;

/// Check every index against the table size before touching any row.
///
/// Out-of-range indices are an upstream bug by contract, but we surface
/// them as a typed error instead of letting a slice access panic.
fn check_bounds(indices: &[u32], rows: usize) -> Result<()> {
    for (pos, &index) in indices.iter().enumerate() {
        if index as usize >= rows {
            return Err(Error::IndexOutOfBounds {
                index,
                pos,
                bound: rows,
            });
        }
    }
    Ok(())
}

impl Backend for CpuBackend {
    type Device = CpuDevice;

    fn gather_rows<T: Element>(
        _device: &CpuDevice,
        indices: &[u32],
        weight: MatRef<'_, T>,
        mut out: MatMut<'_, T>,
    ) -> Result<()> {
        check_bounds(indices, weight.rows())?;
        debug_assert_eq!(out.rows(), indices.len());
        debug_assert_eq!(out.cols(), weight.cols());
        if indices.is_empty() {
            return Ok(());
        }
        let cols = weight.cols();
        out.as_slice_mut()
            .par_chunks_mut(cols)
            .zip(indices.par_iter())
            .for_each(|(row, &index)| {
                row.copy_from_slice(weight.row(index as usize));
            });
        Ok(())
    }

    fn scatter_add_rows<T: Element>(
        _device: &CpuDevice,
        indices: &[u32],
        grad_out: MatRef<'_, T>,
        mut grad_weight: MatMut<'_, T>,
    ) -> Result<()> {
        check_bounds(indices, grad_weight.rows())?;
        debug_assert_eq!(grad_out.rows(), indices.len());
        debug_assert_eq!(grad_out.cols(), grad_weight.cols());
        for (k, &index) in indices.iter().enumerate() {
            let src = grad_out.row(k);
            let dst = grad_weight.row_mut(index as usize);
            for (d, s) in dst.iter_mut().zip(src.iter()) {
                *d = *d + *s;
            }
        }
        Ok(())
    }
}
