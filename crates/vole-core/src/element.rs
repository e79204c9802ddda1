// Element — Rust types that can live in an embedding table
//
// The lookup kernels are generic over the element type: forward copies rows
// verbatim and backward only needs addition, so the trait surface stays
// small. We support the usual floating-point menu for deep learning:
//
//   f16  — 16-bit IEEE half float, for mixed-precision tables
//   bf16 — 16-bit brain float, for mixed-precision tables
//   f32  — the default workhorse
//   f64  — for high-precision work
//
// By implementing Element for a concrete type we can write generic
// functions like `fn forward<T: Element>(...)` and have the whole kernel
// monomorphized per dtype.

use std::ops::Add;

/// Trait implemented by Rust types that can be stored in a weight table.
///
/// `Add` is required because backward accumulates gradient rows in place;
/// `NumCast` plus the f64 conversions let generic host code (initializers,
/// tests) produce values without knowing the concrete type.
pub trait Element:
    Copy + Send + Sync + 'static + Add<Output = Self> + num_traits::NumCast + std::fmt::Debug + PartialEq
{
    /// Convert this value to f64 (for generic numeric code).
    fn to_f64(self) -> f64;

    /// Create a value of this type from f64.
    fn from_f64(v: f64) -> Self;

    /// The zero value.
    fn zero() -> Self {
        Self::from_f64(0.0)
    }

    /// The one value.
    fn one() -> Self {
        Self::from_f64(1.0)
    }
}

impl Element for f32 {
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

impl Element for f64 {
    fn to_f64(self) -> f64 {
        self
    }
    fn from_f64(v: f64) -> Self {
        v
    }
}

impl Element for half::f16 {
    fn to_f64(self) -> f64 {
        self.to_f32() as f64
    }
    fn from_f64(v: f64) -> Self {
        half::f16::from_f64(v)
    }
}

impl Element for half::bf16 {
    fn to_f64(self) -> f64 {
        self.to_f32() as f64
    }
    fn from_f64(v: f64) -> Self {
        half::bf16::from_f64(v)
    }
}
