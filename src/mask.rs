//! # Native Mask Type
//!
//! [`Mask`] wraps the backend's native comparison-result register: one
//! boolean lane per [`Batch`] lane, held in whatever predicate form the
//! backend's blend instruction consumes (all-ones or all-zero bytes on the
//! vector backends).
//!
//! Comparisons are the only public producer; a mask is never built from
//! arbitrary booleans at this layer.
//!
//! ## Usage
//!
//! ```ignore
//! let mask = a.cmp_lt(b);                 // Returns Mask
//! let clamped = mask.select(a, b);        // Per-lane merge
//! if mask.any() { /* some lane was below b */ }
//! ```

use core::fmt;
use core::ops::{BitAnd, BitOr, BitXor, Not};

use crate::backend::{BatchOps, LaneElement, MaskOps};
use crate::backends::native as backend;
use crate::batch::Batch;
use crate::LANES;

/// A batch of boolean lanes, one per [`Batch`] lane.
///
/// Combine with `& | ^ !`, query with [`any`](Mask::any) /
/// [`all`](Mask::all) / [`none`](Mask::none), and merge value batches with
/// [`select`](Mask::select).
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Mask<T: LaneElement>(pub(crate) backend::MaskReg<T>);

impl<T: LaneElement> Mask<T>
where
    backend::MaskReg<T>: MaskOps,
{
    /// True if any lane is set.
    #[inline(always)]
    pub fn any(self) -> bool {
        self.0.any()
    }

    /// True if every lane is set.
    #[inline(always)]
    pub fn all(self) -> bool {
        self.0.all()
    }

    /// True if no lane is set.
    #[inline(always)]
    pub fn none(self) -> bool {
        !self.0.any()
    }

    /// The lanes as booleans, lane 0 first.
    #[inline(always)]
    pub fn to_bool_array(self) -> [bool; LANES] {
        self.0.to_bool_array()
    }
}

impl<T: LaneElement> Mask<T>
where
    backend::Reg<T>: BatchOps<T, Mask = backend::MaskReg<T>>,
{
    /// Branchless per-lane merge: where the lane is set the result takes
    /// `if_true`'s lane, elsewhere `if_false`'s.
    #[inline(always)]
    #[must_use]
    pub fn select(self, if_true: Batch<T>, if_false: Batch<T>) -> Batch<T> {
        Batch {
            inner: backend::Reg::select(self.0, if_true.inner, if_false.inner),
        }
    }
}

impl<T: LaneElement> BitAnd for Mask<T>
where
    backend::MaskReg<T>: MaskOps,
{
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0.and(rhs.0))
    }
}

impl<T: LaneElement> BitOr for Mask<T>
where
    backend::MaskReg<T>: MaskOps,
{
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0.or(rhs.0))
    }
}

impl<T: LaneElement> BitXor for Mask<T>
where
    backend::MaskReg<T>: MaskOps,
{
    type Output = Self;
    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0.xor(rhs.0))
    }
}

impl<T: LaneElement> Not for Mask<T>
where
    backend::MaskReg<T>: MaskOps,
{
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        Self(self.0.not())
    }
}

impl<T: LaneElement> fmt::Debug for Mask<T>
where
    backend::MaskReg<T>: MaskOps,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Mask").field(&self.0.to_bool_array()).finish()
    }
}
