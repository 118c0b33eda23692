//! The capability traits every backend implements for its register types.
//!
//! Three layers, smallest first: [`LaneElement`] ties an element type to its
//! opposite-signedness partner, [`BatchMemory`] covers construction and
//! memory movement, and [`BatchOps`] is the operation table. Shared behavior
//! lives in default methods — derived comparisons, the decomposed
//! multiply-accumulate forms, the portable horizontal-sum fold, the
//! unaligned-via-aligned load path — so a backend only writes the operations
//! its instruction set actually expresses differently.

use core::fmt::Debug;

use crate::LANES;

mod sealed {
    pub trait Sealed {}
    impl Sealed for i8 {}
    impl Sealed for u8 {}
}

/// An integer type that can populate the lanes of a 128-bit batch.
///
/// Sealed: the 8-bit family is the full set for this register width.
pub trait LaneElement:
    sealed::Sealed + Copy + Debug + Default + PartialEq + Send + Sync + 'static
{
    /// Same-width integer type with the opposite signedness.
    type Opposite: LaneElement;

    /// Modular addition at the lane width.
    fn wrapping_add(self, rhs: Self) -> Self;
}

impl LaneElement for i8 {
    type Opposite = u8;

    #[inline(always)]
    fn wrapping_add(self, rhs: Self) -> Self {
        i8::wrapping_add(self, rhs)
    }
}

impl LaneElement for u8 {
    type Opposite = i8;

    #[inline(always)]
    fn wrapping_add(self, rhs: Self) -> Self {
        u8::wrapping_add(self, rhs)
    }
}

/// Construction and memory movement for one register specialization.
///
/// A register is a plain 16-byte value: `Copy`, no heap, no lifecycle.
/// Every constructor fills all lanes; there is no partial initialization.
pub trait BatchMemory<T: LaneElement>: Copy + Clone + Debug + Default + Send + Sync {
    /// All lanes set to `value`.
    fn splat(value: T) -> Self;

    /// Reads [`LANES`] contiguous elements starting at `src`.
    ///
    /// # Safety
    /// `src` must be valid for reading [`LANES`] elements and aligned to
    /// [`VECTOR_ALIGN`](crate::VECTOR_ALIGN). Misalignment is not checked;
    /// it faults or yields garbage depending on the architecture.
    unsafe fn load_aligned(src: *const T) -> Self;

    /// Writes [`LANES`] contiguous elements starting at `dst`.
    ///
    /// # Safety
    /// `dst` must be valid for writing [`LANES`] elements and aligned to
    /// [`VECTOR_ALIGN`](crate::VECTOR_ALIGN).
    unsafe fn store_aligned(self, dst: *mut T);

    /// Reads [`LANES`] contiguous elements from an arbitrarily aligned
    /// address.
    ///
    /// The default reuses the aligned path, which is correct on
    /// architectures whose plain vector load carries no alignment
    /// requirement. Backends with a distinct aligned instruction must
    /// override.
    ///
    /// # Safety
    /// `src` must be valid for reading [`LANES`] elements.
    #[inline(always)]
    unsafe fn load_unaligned(src: *const T) -> Self {
        unsafe { Self::load_aligned(src) }
    }

    /// Writes [`LANES`] contiguous elements to an arbitrarily aligned
    /// address. Same override rule as [`load_unaligned`](Self::load_unaligned).
    ///
    /// # Safety
    /// `dst` must be valid for writing [`LANES`] elements.
    #[inline(always)]
    unsafe fn store_unaligned(self, dst: *mut T) {
        unsafe { self.store_aligned(dst) }
    }

    /// Loads from a buffer of the opposite signedness.
    ///
    /// A bit-for-bit view, never a numeric conversion: a `0xFF` byte loads
    /// as `-1`, not as a clamped value.
    ///
    /// # Safety
    /// Same contract as [`load_aligned`](Self::load_aligned).
    #[inline(always)]
    unsafe fn load_aligned_bits(src: *const T::Opposite) -> Self {
        unsafe { Self::load_aligned(src.cast()) }
    }

    /// Unaligned form of [`load_aligned_bits`](Self::load_aligned_bits).
    ///
    /// # Safety
    /// Same contract as [`load_unaligned`](Self::load_unaligned).
    #[inline(always)]
    unsafe fn load_unaligned_bits(src: *const T::Opposite) -> Self {
        unsafe { Self::load_unaligned(src.cast()) }
    }

    /// Stores to a buffer of the opposite signedness, bit for bit.
    ///
    /// # Safety
    /// Same contract as [`store_aligned`](Self::store_aligned).
    #[inline(always)]
    unsafe fn store_aligned_bits(self, dst: *mut T::Opposite) {
        unsafe { self.store_aligned(dst.cast()) }
    }

    /// Unaligned form of [`store_aligned_bits`](Self::store_aligned_bits).
    ///
    /// # Safety
    /// Same contract as [`store_unaligned`](Self::store_unaligned).
    #[inline(always)]
    unsafe fn store_unaligned_bits(self, dst: *mut T::Opposite) {
        unsafe { self.store_unaligned(dst.cast()) }
    }

    /// Lane `i` set to `lanes[i]`, in order.
    #[inline(always)]
    fn from_array(lanes: [T; LANES]) -> Self {
        // An array in hand is always valid for an unaligned read.
        unsafe { Self::load_unaligned(lanes.as_ptr()) }
    }

    /// The lanes as an array, lane 0 first.
    #[inline(always)]
    fn to_array(self) -> [T; LANES] {
        let mut lanes = [T::default(); LANES];
        unsafe { self.store_unaligned(lanes.as_mut_ptr()) };
        lanes
    }

    /// The value of lane `index`.
    ///
    /// Panics if `index` is not below [`LANES`].
    #[inline(always)]
    fn extract(self, index: usize) -> T {
        self.to_array()[index]
    }

    /// The value of lane 0.
    #[inline(always)]
    fn first(self) -> T {
        self.extract(0)
    }
}

/// Boolean lane mask produced by comparisons and consumed by
/// [`BatchOps::select`].
///
/// Each lane is all-ones or all-zero at the element width. Masks are never
/// built from arbitrary booleans at this layer; comparisons are the only
/// public producer.
pub trait MaskOps: Copy + Clone + Debug + Send + Sync {
    /// Lane-wise AND.
    fn and(self, rhs: Self) -> Self;
    /// Lane-wise OR.
    fn or(self, rhs: Self) -> Self;
    /// Lane-wise XOR.
    fn xor(self, rhs: Self) -> Self;
    /// Lane-wise complement.
    fn not(self) -> Self;
    /// True if any lane is set.
    fn any(self) -> bool;
    /// True if every lane is set.
    fn all(self) -> bool;
    /// The lanes as booleans, lane 0 first.
    fn to_bool_array(self) -> [bool; LANES];
}

/// The operation table for one register specialization.
///
/// Arithmetic wraps at the lane width. Operations with no vector instruction
/// on a given architecture are implemented by the documented emulation, with
/// semantics identical across backends.
pub trait BatchOps<T: LaneElement>: BatchMemory<T> {
    /// Mask register this backend's comparisons produce.
    type Mask: MaskOps;

    /// Lane-wise wrapping negation.
    fn neg(self) -> Self;
    /// Lane-wise wrapping sum.
    fn add(self, rhs: Self) -> Self;
    /// Lane-wise wrapping difference.
    fn sub(self, rhs: Self) -> Self;
    /// Lane-wise wrapping product.
    fn mul(self, rhs: Self) -> Self;

    /// Lane-wise truncating quotient.
    ///
    /// No supported instruction set has a vector integer divide at this
    /// width, so every lane is divided independently in scalar code. A zero
    /// divisor, or `MIN / -1`, panics exactly as scalar `/` does.
    fn div(self, rhs: Self) -> Self;

    /// Lane-wise remainder; same emulation and panics as [`div`](Self::div).
    fn rem(self, rhs: Self) -> Self;

    /// Lane-wise equality.
    fn cmp_eq(self, rhs: Self) -> Self::Mask;
    /// Lane-wise signed less-than.
    fn cmp_lt(self, rhs: Self) -> Self::Mask;
    /// Lane-wise signed less-or-equal.
    fn cmp_le(self, rhs: Self) -> Self::Mask;

    /// Lane-wise inequality: the complement of [`cmp_eq`](Self::cmp_eq).
    /// No architecture in the family has a direct not-equal.
    #[inline(always)]
    fn cmp_ne(self, rhs: Self) -> Self::Mask {
        self.cmp_eq(rhs).not()
    }

    /// Lane-wise signed greater-than, by operand swap.
    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> Self::Mask {
        rhs.cmp_lt(self)
    }

    /// Lane-wise signed greater-or-equal, by operand swap.
    #[inline(always)]
    fn cmp_ge(self, rhs: Self) -> Self::Mask {
        rhs.cmp_le(self)
    }

    /// Lane-wise AND.
    fn bitand(self, rhs: Self) -> Self;
    /// Lane-wise OR.
    fn bitor(self, rhs: Self) -> Self;
    /// Lane-wise XOR.
    fn bitxor(self, rhs: Self) -> Self;
    /// Lane-wise complement.
    fn not(self) -> Self;
    /// Lane-wise `self & !rhs`, one instruction where the ISA has it.
    fn andnot(self, rhs: Self) -> Self;

    /// Lane-wise signed minimum.
    fn min(self, rhs: Self) -> Self;
    /// Lane-wise signed maximum.
    fn max(self, rhs: Self) -> Self;
    /// Lane-wise wrapping absolute value (`MIN` stays `MIN`).
    fn abs(self) -> Self;

    /// `self * b + c`, as separate wrapping multiply and add.
    ///
    /// Integer lanes gain nothing from fusion; these four exist for
    /// interface parity with the floating-point batches.
    #[inline(always)]
    fn mul_add(self, b: Self, c: Self) -> Self {
        self.mul(b).add(c)
    }

    /// `self * b - c`, as separate wrapping multiply and subtract.
    #[inline(always)]
    fn mul_sub(self, b: Self, c: Self) -> Self {
        self.mul(b).sub(c)
    }

    /// `-(self * b) + c`.
    #[inline(always)]
    fn neg_mul_add(self, b: Self, c: Self) -> Self {
        self.mul(b).neg().add(c)
    }

    /// `-(self * b) - c`.
    #[inline(always)]
    fn neg_mul_sub(self, b: Self, c: Self) -> Self {
        self.mul(b).neg().sub(c)
    }

    /// Horizontal wrapping sum of all lanes.
    ///
    /// The default pairs adjacent lanes down to half the lane count, then
    /// accumulates the partials in lane order. The order is fixed so that a
    /// backend overriding this with a cross-lane instruction stays
    /// bit-equivalent — guaranteed today by wrapping integer addition, and
    /// kept as a guard should a non-associative element ever join the
    /// family.
    #[inline(always)]
    fn reduce_add(self) -> T {
        let lanes = self.to_array();
        let mut acc = T::default();
        for i in (0..LANES).step_by(2) {
            acc = acc.wrapping_add(lanes[i].wrapping_add(lanes[i + 1]));
        }
        acc
    }

    /// Shifts every lane left by `amount`.
    ///
    /// Amount 0 returns the input unchanged. Any amount outside `0..=7`
    /// (including negative) returns the all-zero batch — the documented
    /// policy on every backend, chosen because the reference architecture's
    /// shift instruction only exists for that closed set of immediates. It
    /// never panics and is never masked language-style; callers wanting
    /// `amount & 7` semantics mask the amount themselves.
    fn shl(self, amount: i32) -> Self;

    /// Shifts every lane right arithmetically by `amount`.
    ///
    /// Same amount policy as [`shl`](Self::shl): out-of-range amounts yield
    /// the all-zero batch, even though an arithmetic shift of a negative
    /// lane by ≥ 8 would otherwise fill with the sign.
    fn shr(self, amount: i32) -> Self;

    /// Shifts every lane by the signed count in the matching lane of
    /// `counts`: positive counts shift left, negative counts shift right
    /// arithmetically, and counts of magnitude ≥ 8 produce the fully
    /// shifted value (0 leftward, the sign fill rightward).
    ///
    /// These are the reference architecture's vector-shift semantics;
    /// backends without the instruction emulate them lane by lane.
    fn shl_each(self, counts: Self) -> Self;

    /// Per-lane merge: where the mask lane is set the result takes
    /// `if_true`'s lane, elsewhere `if_false`'s.
    fn select(mask: Self::Mask, if_true: Self, if_false: Self) -> Self;
}
