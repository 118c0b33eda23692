//! # Lanewise
//!
//! A zero-overhead batch abstraction over 128-bit integer SIMD registers.
//!
//! ## Design Philosophy
//!
//! **One surface, one backend per build.**
//!
//! - [`Batch<i8>`](Batch): 16 lanes of 8-bit arithmetic in one hardware
//!   register, with value semantics and no heap.
//! - [`Mask`]: the boolean companion batch, produced by comparisons and
//!   consumed by [`select`](Mask::select).
//! - The backend is picked at build time from `target_arch` — NEON on
//!   aarch64, SSE2 on x86_64, a plain array everywhere else. There is no
//!   runtime dispatch and no feature detection.
//!
//! Each operator routes to a native vector instruction where the instruction
//! set has one and to a documented emulation where it does not; the
//! observable semantics are identical on every backend, down to wraparound,
//! shift policy, and reduction order.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

pub mod backend;
pub mod backends;
pub mod batch;
pub mod mask;

pub use backend::{BatchMemory, BatchOps, LaneElement, MaskOps};
pub use batch::Batch;
pub use mask::Mask;

/// Number of lanes in every batch: a 128-bit register holds 16 bytes.
pub const LANES: usize = 16;

/// Alignment the aligned load/store contract requires, in bytes.
pub const VECTOR_ALIGN: usize = 16;
