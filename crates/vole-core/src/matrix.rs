use crate::error::{Error, Result};
use crate::shape::Shape;

// MatRef / MatMut — Borrowed row-major 2-D views
//
// The operator never owns tensor memory: the weight table lives in the
// caller's parameter store, and output/gradient buffers are allocated by
// the caller at the shapes inference fixed. These two views are the whole
// data contract — a flat slice plus (rows, cols), validated once at
// construction so the kernels can index rows without re-checking lengths.
//
// Row-major by convention: row `i` of an (input_dim, output_dim) weight
// matrix is the embedding vector for category `i`, at data[i*cols..(i+1)*cols].

/// Immutable row-major 2-D view over a caller-owned slice.
#[derive(Debug, Clone, Copy)]
pub struct MatRef<'a, T> {
    data: &'a [T],
    rows: usize,
    cols: usize,
}

impl<'a, T> MatRef<'a, T> {
    /// Create a view, checking that the slice holds exactly `rows * cols` elements.
    pub fn new(data: &'a [T], rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::ElementCountMismatch {
                shape: Shape::from((rows, cols)),
                expected: rows * cols,
                got: data.len(),
            });
        }
        Ok(MatRef { data, rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> Shape {
        Shape::from((self.rows, self.cols))
    }

    /// Row `i` as a slice of length `cols`.
    ///
    /// Panics if `i >= rows`; callers go through the operator, which
    /// bounds-checks indices before any row access.
    pub fn row(&self, i: usize) -> &'a [T] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// The underlying flat slice.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }
}

/// Mutable row-major 2-D view over a caller-owned slice.
#[derive(Debug)]
pub struct MatMut<'a, T> {
    data: &'a mut [T],
    rows: usize,
    cols: usize,
}

impl<'a, T> MatMut<'a, T> {
    /// Create a view, checking that the slice holds exactly `rows * cols` elements.
    pub fn new(data: &'a mut [T], rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::ElementCountMismatch {
                shape: Shape::from((rows, cols)),
                expected: rows * cols,
                got: data.len(),
            });
        }
        Ok(MatMut { data, rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> Shape {
        Shape::from((self.rows, self.cols))
    }

    /// Row `i` as a mutable slice of length `cols`.
    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// The underlying flat slice, mutably.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data[..]
    }

    /// Reborrow as an immutable view.
    pub fn as_ref(&self) -> MatRef<'_, T> {
        MatRef {
            data: &self.data[..],
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl<'a, T: Copy> MatMut<'a, T> {
    /// Overwrite every element with `value`.
    pub fn fill(&mut self, value: T) {
        for v in self.data.iter_mut() {
            *v = value;
        }
    }
}
