//! aarch64 NEON kernel: 128-bit registers, 16 lanes of 8-bit integers.
//!
//! The one ISA in the family whose plain vector load/store carries no
//! alignment requirement, so the aligned and unaligned paths share an
//! instruction. Its 8-bit immediate shifts demand compile-time amounts; a
//! local dispatch table bridges the runtime amount onto the closed set of
//! legal immediates.

use core::arch::aarch64::*;
use core::fmt;
use core::marker::PhantomData;

use crate::backend::{BatchMemory, BatchOps, MaskOps};
use crate::LANES;

/// NEON register holding 16 lanes of `T`.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Reg<T: Copy>(pub(crate) int8x16_t, pub(crate) PhantomData<T>);

/// NEON comparison result: one all-ones or all-zero byte per lane.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct MaskReg<T: Copy>(pub(crate) uint8x16_t, pub(crate) PhantomData<T>);

impl<T: Copy> fmt::Debug for Reg<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "neon::Reg<{}>", core::any::type_name::<T>())
    }
}

impl<T: Copy> fmt::Debug for MaskReg<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "neon::MaskReg<{}>", core::any::type_name::<T>())
    }
}

impl Default for Reg<i8> {
    #[inline(always)]
    fn default() -> Self {
        Self(unsafe { vdupq_n_s8(0) }, PhantomData)
    }
}

impl Reg<i8> {
    /// Wraps a raw register value; zero cost, bits unchanged.
    #[inline(always)]
    pub fn from_raw(raw: int8x16_t) -> Self {
        Self(raw, PhantomData)
    }

    /// Unwraps to the raw register value; zero cost, bits unchanged.
    #[inline(always)]
    pub fn into_raw(self) -> int8x16_t {
        self.0
    }
}

// The 8-bit shift instructions take the amount as a compile-time immediate.
// One arm per legal amount; everything outside the table shifts fully out.
macro_rules! shift_table {
    ($intr:ident, $raw:expr, $amount:expr; $( $imm:literal )*) => {
        match $amount {
            $( $imm => unsafe { $intr::<$imm>($raw) }, )*
            _ => unsafe { vdupq_n_s8(0) },
        }
    };
}

impl BatchMemory<i8> for Reg<i8> {
    #[inline(always)]
    fn splat(value: i8) -> Self {
        Self(unsafe { vdupq_n_s8(value) }, PhantomData)
    }

    #[inline(always)]
    unsafe fn load_aligned(src: *const i8) -> Self {
        // vld1q tolerates any address; the aligned contract is the caller's.
        Self(unsafe { vld1q_s8(src) }, PhantomData)
    }

    #[inline(always)]
    unsafe fn store_aligned(self, dst: *mut i8) {
        unsafe { vst1q_s8(dst, self.0) };
    }
}

impl BatchOps<i8> for Reg<i8> {
    type Mask = MaskReg<i8>;

    #[inline(always)]
    fn neg(self) -> Self {
        Self(unsafe { vnegq_s8(self.0) }, PhantomData)
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(unsafe { vaddq_s8(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(unsafe { vsubq_s8(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self(unsafe { vmulq_s8(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        // No vector integer divide; one scalar divide per lane.
        let lhs = self.to_array();
        let rhs = rhs.to_array();
        let mut out = [0i8; LANES];
        for i in 0..LANES {
            out[i] = lhs[i] / rhs[i];
        }
        Self::from_array(out)
    }

    #[inline(always)]
    fn rem(self, rhs: Self) -> Self {
        let lhs = self.to_array();
        let rhs = rhs.to_array();
        let mut out = [0i8; LANES];
        for i in 0..LANES {
            out[i] = lhs[i] % rhs[i];
        }
        Self::from_array(out)
    }

    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> Self::Mask {
        MaskReg(unsafe { vceqq_s8(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn cmp_lt(self, rhs: Self) -> Self::Mask {
        MaskReg(unsafe { vcltq_s8(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn cmp_le(self, rhs: Self) -> Self::Mask {
        MaskReg(unsafe { vcleq_s8(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self(unsafe { vandq_s8(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self(unsafe { vorrq_s8(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self(unsafe { veorq_s8(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn not(self) -> Self {
        Self(unsafe { vmvnq_s8(self.0) }, PhantomData)
    }

    #[inline(always)]
    fn andnot(self, rhs: Self) -> Self {
        // vbic computes lhs & !rhs directly.
        Self(unsafe { vbicq_s8(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        Self(unsafe { vminq_s8(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        Self(unsafe { vmaxq_s8(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Self(unsafe { vabsq_s8(self.0) }, PhantomData)
    }

    #[inline(always)]
    fn reduce_add(self) -> i8 {
        // Native cross-lane sum; wraps like the portable fold.
        unsafe { vaddvq_s8(self.0) }
    }

    #[inline(always)]
    fn shl(self, amount: i32) -> Self {
        if amount == 0 {
            return self;
        }
        Self(
            shift_table!(vshlq_n_s8, self.0, amount; 1 2 3 4 5 6 7),
            PhantomData,
        )
    }

    #[inline(always)]
    fn shr(self, amount: i32) -> Self {
        if amount == 0 {
            return self;
        }
        Self(
            shift_table!(vshrq_n_s8, self.0, amount; 1 2 3 4 5 6 7),
            PhantomData,
        )
    }

    #[inline(always)]
    fn shl_each(self, counts: Self) -> Self {
        Self(unsafe { vshlq_s8(self.0, counts.0) }, PhantomData)
    }

    #[inline(always)]
    fn select(mask: Self::Mask, if_true: Self, if_false: Self) -> Self {
        Self(unsafe { vbslq_s8(mask.0, if_true.0, if_false.0) }, PhantomData)
    }
}

impl MaskOps for MaskReg<i8> {
    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        Self(unsafe { vandq_u8(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        Self(unsafe { vorrq_u8(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn xor(self, rhs: Self) -> Self {
        Self(unsafe { veorq_u8(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn not(self) -> Self {
        Self(unsafe { vmvnq_u8(self.0) }, PhantomData)
    }

    #[inline(always)]
    fn any(self) -> bool {
        unsafe { vmaxvq_u8(self.0) != 0 }
    }

    #[inline(always)]
    fn all(self) -> bool {
        unsafe { vminvq_u8(self.0) != 0 }
    }

    #[inline(always)]
    fn to_bool_array(self) -> [bool; LANES] {
        let mut bytes = [0u8; LANES];
        unsafe { vst1q_u8(bytes.as_mut_ptr(), self.0) };
        bytes.map(|b| b != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splat_fills_every_lane() {
        let v = Reg::<i8>::splat(-7);
        assert_eq!(v.to_array(), [-7i8; 16]);
    }

    #[test]
    fn add_wraps_at_lane_width() {
        let a = Reg::<i8>::splat(127);
        let b = Reg::<i8>::splat(1);
        assert_eq!(a.add(b).to_array(), [-128i8; 16]);
    }

    #[test]
    fn unsigned_view_load_reinterprets_bits() {
        let bytes: [u8; 16] = [0xFF; 16];
        let v = unsafe { Reg::<i8>::load_unaligned_bits(bytes.as_ptr()) };
        assert_eq!(v.to_array(), [-1i8; 16]);
    }

    #[test]
    fn compare_then_select_merges_lanes() {
        let a = Reg::<i8>::from_array([0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]);
        let b = Reg::<i8>::splat(8);
        let mask = a.cmp_lt(b);
        let merged = Reg::select(mask, Reg::splat(1), Reg::splat(0));
        assert_eq!(
            merged.to_array(),
            [1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn native_sum_matches_pair_fold() {
        let v = Reg::<i8>::from_array([
            100, 100, 100, 100, 1, 2, 3, 4, -5, -6, -7, -8, 9, 10, 11, 12,
        ]);
        let mut fold: i8 = 0;
        for pair in v.to_array().chunks_exact(2) {
            fold = fold.wrapping_add(pair[0].wrapping_add(pair[1]));
        }
        assert_eq!(v.reduce_add(), fold);
    }

    #[test]
    fn shift_immediates_hit_every_table_arm() {
        let v = Reg::<i8>::splat(3);
        for amount in 0..8 {
            assert_eq!(v.shl(amount).to_array(), [3i8 << amount; 16]);
        }
        assert_eq!(v.shl(8).to_array(), [0i8; 16]);
        assert_eq!(v.shl(-1).to_array(), [0i8; 16]);
        let w = Reg::<i8>::splat(-128);
        for amount in 0..8 {
            assert_eq!(w.shr(amount).to_array(), [-128i8 >> amount; 16]);
        }
        assert_eq!(w.shr(8).to_array(), [0i8; 16]);
    }

    #[test]
    fn vector_shift_takes_signed_counts() {
        let v = Reg::<i8>::splat(16);
        let counts = Reg::<i8>::from_array([0, 1, 2, 3, -1, -2, -3, -4, 8, 9, -8, -9, 0, 1, -1, 2]);
        assert_eq!(
            v.shl_each(counts).to_array(),
            [16, 32, 64, -128, 8, 4, 2, 1, 0, 0, 0, 0, 16, 32, 8, 64]
        );
    }

    #[test]
    fn raw_register_round_trip() {
        let v = Reg::<i8>::splat(42);
        let raw = v.into_raw();
        assert_eq!(Reg::<i8>::from_raw(raw).to_array(), [42i8; 16]);
    }
}
