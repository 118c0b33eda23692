//! The public batch value type and its operator surface.
//!
//! [`Batch`] is a `#[repr(transparent)]` wrapper over the register type of
//! the backend module the build selected (see [`crate::backends`]). Every
//! method forwards to the [`BatchMemory`]/[`BatchOps`] kernel traits, so the
//! surface here compiles unchanged against NEON, SSE2, or the portable array
//! kernel.

use core::fmt;
use core::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
    DivAssign, Mul, MulAssign, Neg, Not, Rem, RemAssign, Shl, ShlAssign, Shr, ShrAssign, Sub,
    SubAssign,
};

use crate::backend::{BatchMemory, BatchOps, LaneElement};
use crate::backends::native as backend;
use crate::mask::Mask;
use crate::LANES;

/// A 128-bit batch of [`LANES`] integer lanes, backed by one hardware
/// register.
///
/// Value semantics throughout: copying copies all lanes, every constructor
/// fills all lanes, and there is no heap and no interior mutability.
/// Arithmetic wraps at the lane width.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Batch<T: LaneElement> {
    pub(crate) inner: backend::Reg<T>,
}

impl<T: LaneElement> Batch<T>
where
    backend::Reg<T>: BatchMemory<T>,
{
    /// All lanes set to `value`.
    #[inline(always)]
    #[must_use]
    pub fn splat(value: T) -> Self {
        Self {
            inner: backend::Reg::splat(value),
        }
    }

    /// Lane `i` set to `lanes[i]`, in order.
    #[inline(always)]
    #[must_use]
    pub fn from_array(lanes: [T; LANES]) -> Self {
        Self {
            inner: backend::Reg::from_array(lanes),
        }
    }

    /// The lanes as an array, lane 0 first.
    #[inline(always)]
    pub fn to_array(self) -> [T; LANES] {
        self.inner.to_array()
    }

    /// Reads [`LANES`] contiguous elements starting at `src`.
    ///
    /// # Safety
    /// `src` must be valid for reading [`LANES`] elements and aligned to
    /// [`VECTOR_ALIGN`](crate::VECTOR_ALIGN). Misalignment is not checked;
    /// it faults or yields garbage depending on the architecture.
    #[inline(always)]
    #[must_use]
    pub unsafe fn load_aligned(src: *const T) -> Self {
        Self {
            inner: unsafe { backend::Reg::load_aligned(src) },
        }
    }

    /// Reads [`LANES`] contiguous elements from an arbitrarily aligned
    /// address.
    ///
    /// # Safety
    /// `src` must be valid for reading [`LANES`] elements.
    #[inline(always)]
    #[must_use]
    pub unsafe fn load_unaligned(src: *const T) -> Self {
        Self {
            inner: unsafe { backend::Reg::load_unaligned(src) },
        }
    }

    /// Loads from a buffer of the opposite signedness.
    ///
    /// A bit-for-bit view, never a numeric conversion: a `0xFF` byte loads
    /// as `-1`, not as a clamped value.
    ///
    /// # Safety
    /// Same contract as [`load_aligned`](Self::load_aligned).
    #[inline(always)]
    #[must_use]
    pub unsafe fn load_aligned_bits(src: *const T::Opposite) -> Self {
        Self {
            inner: unsafe { backend::Reg::load_aligned_bits(src) },
        }
    }

    /// Unaligned form of [`load_aligned_bits`](Self::load_aligned_bits).
    ///
    /// # Safety
    /// Same contract as [`load_unaligned`](Self::load_unaligned).
    #[inline(always)]
    #[must_use]
    pub unsafe fn load_unaligned_bits(src: *const T::Opposite) -> Self {
        Self {
            inner: unsafe { backend::Reg::load_unaligned_bits(src) },
        }
    }

    /// Writes [`LANES`] contiguous elements starting at `dst`.
    ///
    /// # Safety
    /// `dst` must be valid for writing [`LANES`] elements and aligned to
    /// [`VECTOR_ALIGN`](crate::VECTOR_ALIGN).
    #[inline(always)]
    pub unsafe fn store_aligned(self, dst: *mut T) {
        unsafe { self.inner.store_aligned(dst) };
    }

    /// Writes [`LANES`] contiguous elements to an arbitrarily aligned
    /// address.
    ///
    /// # Safety
    /// `dst` must be valid for writing [`LANES`] elements.
    #[inline(always)]
    pub unsafe fn store_unaligned(self, dst: *mut T) {
        unsafe { self.inner.store_unaligned(dst) };
    }

    /// Stores to a buffer of the opposite signedness, bit for bit.
    ///
    /// # Safety
    /// Same contract as [`store_aligned`](Self::store_aligned).
    #[inline(always)]
    pub unsafe fn store_aligned_bits(self, dst: *mut T::Opposite) {
        unsafe { self.inner.store_aligned_bits(dst) };
    }

    /// Unaligned form of [`store_aligned_bits`](Self::store_aligned_bits).
    ///
    /// # Safety
    /// Same contract as [`store_unaligned`](Self::store_unaligned).
    #[inline(always)]
    pub unsafe fn store_unaligned_bits(self, dst: *mut T::Opposite) {
        unsafe { self.inner.store_unaligned_bits(dst) };
    }

    /// Loads the first [`LANES`] elements of `src`.
    ///
    /// The safe entry to the pointer loads: the length is asserted, then
    /// the transfer is unaligned. Panics if `src` holds fewer than
    /// [`LANES`] elements.
    #[inline(always)]
    #[must_use]
    pub fn from_slice(src: &[T]) -> Self {
        assert!(src.len() >= LANES, "batch load needs {LANES} elements");
        unsafe { Self::load_unaligned(src.as_ptr()) }
    }

    /// Writes all lanes over the first [`LANES`] elements of `dst`.
    ///
    /// Panics if `dst` holds fewer than [`LANES`] elements.
    #[inline(always)]
    pub fn write_to_slice(self, dst: &mut [T]) {
        assert!(dst.len() >= LANES, "batch store needs {LANES} elements");
        unsafe { self.store_unaligned(dst.as_mut_ptr()) };
    }

    /// The value of lane `index`.
    ///
    /// Panics if `index` is not below [`LANES`].
    #[inline(always)]
    pub fn extract(self, index: usize) -> T {
        self.inner.extract(index)
    }

    /// The value of lane 0.
    #[inline(always)]
    pub fn first(self) -> T {
        self.inner.first()
    }
}

impl<T: LaneElement> Batch<T>
where
    backend::Reg<T>: BatchOps<T, Mask = backend::MaskReg<T>>,
{
    /// Lane-wise equality.
    #[inline(always)]
    #[must_use]
    pub fn cmp_eq(self, rhs: Self) -> Mask<T> {
        Mask(self.inner.cmp_eq(rhs.inner))
    }

    /// Lane-wise inequality.
    #[inline(always)]
    #[must_use]
    pub fn cmp_ne(self, rhs: Self) -> Mask<T> {
        Mask(self.inner.cmp_ne(rhs.inner))
    }

    /// Lane-wise signed less-than.
    #[inline(always)]
    #[must_use]
    pub fn cmp_lt(self, rhs: Self) -> Mask<T> {
        Mask(self.inner.cmp_lt(rhs.inner))
    }

    /// Lane-wise signed less-or-equal.
    #[inline(always)]
    #[must_use]
    pub fn cmp_le(self, rhs: Self) -> Mask<T> {
        Mask(self.inner.cmp_le(rhs.inner))
    }

    /// Lane-wise signed greater-than.
    #[inline(always)]
    #[must_use]
    pub fn cmp_gt(self, rhs: Self) -> Mask<T> {
        Mask(self.inner.cmp_gt(rhs.inner))
    }

    /// Lane-wise signed greater-or-equal.
    #[inline(always)]
    #[must_use]
    pub fn cmp_ge(self, rhs: Self) -> Mask<T> {
        Mask(self.inner.cmp_ge(rhs.inner))
    }

    /// Lane-wise signed minimum.
    #[inline(always)]
    #[must_use]
    pub fn min(self, rhs: Self) -> Self {
        Self {
            inner: self.inner.min(rhs.inner),
        }
    }

    /// Lane-wise signed maximum.
    #[inline(always)]
    #[must_use]
    pub fn max(self, rhs: Self) -> Self {
        Self {
            inner: self.inner.max(rhs.inner),
        }
    }

    /// Lane-wise wrapping absolute value (`MIN` stays `MIN`).
    #[inline(always)]
    #[must_use]
    pub fn abs(self) -> Self {
        Self {
            inner: self.inner.abs(),
        }
    }

    /// Lane-wise `self & !rhs`, one instruction where the ISA has it.
    #[inline(always)]
    #[must_use]
    pub fn andnot(self, rhs: Self) -> Self {
        Self {
            inner: self.inner.andnot(rhs.inner),
        }
    }

    /// `self * b + c`, as separate wrapping multiply and add.
    ///
    /// Integer lanes gain nothing from fusion; this quartet exists for
    /// interface parity with the floating-point batches.
    #[inline(always)]
    #[must_use]
    pub fn mul_add(self, b: Self, c: Self) -> Self {
        Self {
            inner: self.inner.mul_add(b.inner, c.inner),
        }
    }

    /// `self * b - c`, as separate wrapping multiply and subtract.
    #[inline(always)]
    #[must_use]
    pub fn mul_sub(self, b: Self, c: Self) -> Self {
        Self {
            inner: self.inner.mul_sub(b.inner, c.inner),
        }
    }

    /// `-(self * b) + c`.
    #[inline(always)]
    #[must_use]
    pub fn neg_mul_add(self, b: Self, c: Self) -> Self {
        Self {
            inner: self.inner.neg_mul_add(b.inner, c.inner),
        }
    }

    /// `-(self * b) - c`.
    #[inline(always)]
    #[must_use]
    pub fn neg_mul_sub(self, b: Self, c: Self) -> Self {
        Self {
            inner: self.inner.neg_mul_sub(b.inner, c.inner),
        }
    }

    /// Horizontal wrapping sum of all lanes.
    ///
    /// Bit-equivalent on every backend: where a cross-lane instruction
    /// exists it is used, elsewhere the fixed pair-then-accumulate fold.
    #[inline(always)]
    pub fn reduce_add(self) -> T {
        self.inner.reduce_add()
    }
}

impl<T: LaneElement> Default for Batch<T>
where
    backend::Reg<T>: BatchMemory<T>,
{
    /// The all-zero batch.
    #[inline(always)]
    fn default() -> Self {
        Self {
            inner: backend::Reg::default(),
        }
    }
}

impl<T: LaneElement> fmt::Debug for Batch<T>
where
    backend::Reg<T>: BatchMemory<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Batch").field(&self.inner.to_array()).finish()
    }
}

impl<T: LaneElement> Neg for Batch<T>
where
    backend::Reg<T>: BatchOps<T>,
{
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            inner: self.inner.neg(),
        }
    }
}

impl<T: LaneElement> Add for Batch<T>
where
    backend::Reg<T>: BatchOps<T>,
{
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self {
            inner: self.inner.add(rhs.inner),
        }
    }
}

impl<T: LaneElement> Sub for Batch<T>
where
    backend::Reg<T>: BatchOps<T>,
{
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self {
            inner: self.inner.sub(rhs.inner),
        }
    }
}

impl<T: LaneElement> Mul for Batch<T>
where
    backend::Reg<T>: BatchOps<T>,
{
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self {
            inner: self.inner.mul(rhs.inner),
        }
    }
}

impl<T: LaneElement> Div for Batch<T>
where
    backend::Reg<T>: BatchOps<T>,
{
    type Output = Self;
    /// Lane-wise truncating quotient; panics on a zero divisor or
    /// `MIN / -1`, like scalar `/`.
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        Self {
            inner: self.inner.div(rhs.inner),
        }
    }
}

impl<T: LaneElement> Rem for Batch<T>
where
    backend::Reg<T>: BatchOps<T>,
{
    type Output = Self;
    /// Lane-wise remainder; same panics as division.
    #[inline(always)]
    fn rem(self, rhs: Self) -> Self {
        Self {
            inner: self.inner.rem(rhs.inner),
        }
    }
}

impl<T: LaneElement> BitAnd for Batch<T>
where
    backend::Reg<T>: BatchOps<T>,
{
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self {
            inner: self.inner.bitand(rhs.inner),
        }
    }
}

impl<T: LaneElement> BitOr for Batch<T>
where
    backend::Reg<T>: BatchOps<T>,
{
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self {
            inner: self.inner.bitor(rhs.inner),
        }
    }
}

impl<T: LaneElement> BitXor for Batch<T>
where
    backend::Reg<T>: BatchOps<T>,
{
    type Output = Self;
    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self {
            inner: self.inner.bitxor(rhs.inner),
        }
    }
}

impl<T: LaneElement> Not for Batch<T>
where
    backend::Reg<T>: BatchOps<T>,
{
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        Self {
            inner: self.inner.not(),
        }
    }
}

impl<T: LaneElement> Shl<i32> for Batch<T>
where
    backend::Reg<T>: BatchOps<T>,
{
    type Output = Self;
    /// Shifts every lane left by `amount`.
    ///
    /// Amounts outside `0..=7` yield the all-zero batch; see
    /// [`BatchOps::shl`].
    #[inline(always)]
    fn shl(self, amount: i32) -> Self {
        Self {
            inner: self.inner.shl(amount),
        }
    }
}

impl<T: LaneElement> Shr<i32> for Batch<T>
where
    backend::Reg<T>: BatchOps<T>,
{
    type Output = Self;
    /// Shifts every lane right arithmetically by `amount`.
    ///
    /// Amounts outside `0..=7` yield the all-zero batch; see
    /// [`BatchOps::shr`].
    #[inline(always)]
    fn shr(self, amount: i32) -> Self {
        Self {
            inner: self.inner.shr(amount),
        }
    }
}

impl<T: LaneElement> Shl<Batch<T>> for Batch<T>
where
    backend::Reg<T>: BatchOps<T>,
{
    type Output = Self;
    /// Shifts every lane by the signed count in the matching lane of
    /// `counts`: positive counts shift left, negative counts shift right
    /// arithmetically, and counts of magnitude ≥ 8 produce the fully
    /// shifted value. See [`BatchOps::shl_each`].
    #[inline(always)]
    fn shl(self, counts: Batch<T>) -> Self {
        Self {
            inner: self.inner.shl_each(counts.inner),
        }
    }
}

macro_rules! forward_assign {
    ($trait_:ident, $method:ident, $op:tt) => {
        impl<T: LaneElement> $trait_ for Batch<T>
        where
            backend::Reg<T>: BatchOps<T>,
        {
            #[inline(always)]
            fn $method(&mut self, rhs: Self) {
                *self = *self $op rhs;
            }
        }
    };
}

forward_assign!(AddAssign, add_assign, +);
forward_assign!(SubAssign, sub_assign, -);
forward_assign!(MulAssign, mul_assign, *);
forward_assign!(DivAssign, div_assign, /);
forward_assign!(RemAssign, rem_assign, %);
forward_assign!(BitAndAssign, bitand_assign, &);
forward_assign!(BitOrAssign, bitor_assign, |);
forward_assign!(BitXorAssign, bitxor_assign, ^);

impl<T: LaneElement> ShlAssign<i32> for Batch<T>
where
    backend::Reg<T>: BatchOps<T>,
{
    #[inline(always)]
    fn shl_assign(&mut self, amount: i32) {
        *self = *self << amount;
    }
}

impl<T: LaneElement> ShrAssign<i32> for Batch<T>
where
    backend::Reg<T>: BatchOps<T>,
{
    #[inline(always)]
    fn shr_assign(&mut self, amount: i32) {
        *self = *self >> amount;
    }
}

impl<T: LaneElement> ShlAssign<Batch<T>> for Batch<T>
where
    backend::Reg<T>: BatchOps<T>,
{
    #[inline(always)]
    fn shl_assign(&mut self, counts: Batch<T>) {
        *self = *self << counts;
    }
}

#[cfg(target_arch = "aarch64")]
impl From<core::arch::aarch64::int8x16_t> for Batch<i8> {
    /// Wraps a raw NEON register; zero cost, bits unchanged.
    #[inline(always)]
    fn from(raw: core::arch::aarch64::int8x16_t) -> Self {
        Self {
            inner: backend::Reg::from_raw(raw),
        }
    }
}

#[cfg(target_arch = "aarch64")]
impl From<Batch<i8>> for core::arch::aarch64::int8x16_t {
    /// Unwraps to the raw NEON register; zero cost, bits unchanged.
    #[inline(always)]
    fn from(batch: Batch<i8>) -> Self {
        batch.inner.into_raw()
    }
}

#[cfg(target_arch = "x86_64")]
impl From<core::arch::x86_64::__m128i> for Batch<i8> {
    /// Wraps a raw SSE register; zero cost, bits unchanged.
    #[inline(always)]
    fn from(raw: core::arch::x86_64::__m128i) -> Self {
        Self {
            inner: backend::Reg::from_raw(raw),
        }
    }
}

#[cfg(target_arch = "x86_64")]
impl From<Batch<i8>> for core::arch::x86_64::__m128i {
    /// Unwraps to the raw SSE register; zero cost, bits unchanged.
    #[inline(always)]
    fn from(batch: Batch<i8>) -> Self {
        batch.inner.into_raw()
    }
}
