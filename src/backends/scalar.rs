//! Portable fallback kernel: the 128-bit register modeled as a 16-byte
//! array.
//!
//! Compiled on every target. On hosts with a vector backend it doubles as
//! the reference implementation the intrinsic kernels are checked against;
//! lane count and every observable semantic are identical.

use core::fmt;
use core::marker::PhantomData;
use core::ptr;

use super::shift_lane_signed;
use crate::backend::{BatchMemory, BatchOps, MaskOps};
use crate::LANES;

/// Fallback register: 16 lanes of `T` in an ordinary array.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct Reg<T: Copy>(pub(crate) [T; LANES]);

/// Fallback comparison result: one `0xFF` or `0x00` byte per lane.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct MaskReg<T: Copy>(pub(crate) [u8; LANES], pub(crate) PhantomData<T>);

impl<T: Copy> fmt::Debug for MaskReg<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scalar::MaskReg({:?})", self.0)
    }
}

impl Default for Reg<i8> {
    #[inline(always)]
    fn default() -> Self {
        Self([0; LANES])
    }
}

#[inline(always)]
fn map2(a: [i8; LANES], b: [i8; LANES], op: impl Fn(i8, i8) -> i8) -> [i8; LANES] {
    let mut out = [0i8; LANES];
    for i in 0..LANES {
        out[i] = op(a[i], b[i]);
    }
    out
}

#[inline(always)]
fn compare(a: [i8; LANES], b: [i8; LANES], op: impl Fn(i8, i8) -> bool) -> [u8; LANES] {
    let mut out = [0u8; LANES];
    for i in 0..LANES {
        out[i] = if op(a[i], b[i]) { 0xFF } else { 0 };
    }
    out
}

impl BatchMemory<i8> for Reg<i8> {
    #[inline(always)]
    fn splat(value: i8) -> Self {
        Self([value; LANES])
    }

    #[inline(always)]
    unsafe fn load_aligned(src: *const i8) -> Self {
        // Byte arrays carry no hardware alignment; one path serves both.
        let mut lanes = [0i8; LANES];
        unsafe { ptr::copy_nonoverlapping(src, lanes.as_mut_ptr(), LANES) };
        Self(lanes)
    }

    #[inline(always)]
    unsafe fn store_aligned(self, dst: *mut i8) {
        unsafe { ptr::copy_nonoverlapping(self.0.as_ptr(), dst, LANES) };
    }

    #[inline(always)]
    fn from_array(lanes: [i8; LANES]) -> Self {
        Self(lanes)
    }

    #[inline(always)]
    fn to_array(self) -> [i8; LANES] {
        self.0
    }
}

impl BatchOps<i8> for Reg<i8> {
    type Mask = MaskReg<i8>;

    #[inline(always)]
    fn neg(self) -> Self {
        Self(self.0.map(i8::wrapping_neg))
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(map2(self.0, rhs.0, i8::wrapping_add))
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(map2(self.0, rhs.0, i8::wrapping_sub))
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self(map2(self.0, rhs.0, i8::wrapping_mul))
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        Self(map2(self.0, rhs.0, |a, b| a / b))
    }

    #[inline(always)]
    fn rem(self, rhs: Self) -> Self {
        Self(map2(self.0, rhs.0, |a, b| a % b))
    }

    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> Self::Mask {
        MaskReg(compare(self.0, rhs.0, |a, b| a == b), PhantomData)
    }

    #[inline(always)]
    fn cmp_lt(self, rhs: Self) -> Self::Mask {
        MaskReg(compare(self.0, rhs.0, |a, b| a < b), PhantomData)
    }

    #[inline(always)]
    fn cmp_le(self, rhs: Self) -> Self::Mask {
        MaskReg(compare(self.0, rhs.0, |a, b| a <= b), PhantomData)
    }

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self(map2(self.0, rhs.0, |a, b| a & b))
    }

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self(map2(self.0, rhs.0, |a, b| a | b))
    }

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self(map2(self.0, rhs.0, |a, b| a ^ b))
    }

    #[inline(always)]
    fn not(self) -> Self {
        Self(self.0.map(|x| !x))
    }

    #[inline(always)]
    fn andnot(self, rhs: Self) -> Self {
        Self(map2(self.0, rhs.0, |a, b| a & !b))
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        Self(map2(self.0, rhs.0, |a, b| a.min(b)))
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        Self(map2(self.0, rhs.0, |a, b| a.max(b)))
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Self(self.0.map(i8::wrapping_abs))
    }

    #[inline(always)]
    fn shl(self, amount: i32) -> Self {
        if !(0..8).contains(&amount) {
            return Self::splat(0);
        }
        Self(self.0.map(|x| shift_lane_signed(x, amount as i8)))
    }

    #[inline(always)]
    fn shr(self, amount: i32) -> Self {
        if !(0..8).contains(&amount) {
            return Self::splat(0);
        }
        Self(self.0.map(|x| shift_lane_signed(x, -(amount as i8))))
    }

    #[inline(always)]
    fn shl_each(self, counts: Self) -> Self {
        Self(map2(self.0, counts.0, shift_lane_signed))
    }

    #[inline(always)]
    fn select(mask: Self::Mask, if_true: Self, if_false: Self) -> Self {
        let mut out = [0i8; LANES];
        for i in 0..LANES {
            out[i] = if mask.0[i] != 0 {
                if_true.0[i]
            } else {
                if_false.0[i]
            };
        }
        Self(out)
    }
}

impl MaskOps for MaskReg<i8> {
    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        let mut out = [0u8; LANES];
        for i in 0..LANES {
            out[i] = self.0[i] & rhs.0[i];
        }
        Self(out, PhantomData)
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        let mut out = [0u8; LANES];
        for i in 0..LANES {
            out[i] = self.0[i] | rhs.0[i];
        }
        Self(out, PhantomData)
    }

    #[inline(always)]
    fn xor(self, rhs: Self) -> Self {
        let mut out = [0u8; LANES];
        for i in 0..LANES {
            out[i] = self.0[i] ^ rhs.0[i];
        }
        Self(out, PhantomData)
    }

    #[inline(always)]
    fn not(self) -> Self {
        Self(self.0.map(|b| !b), PhantomData)
    }

    #[inline(always)]
    fn any(self) -> bool {
        self.0.iter().any(|&b| b != 0)
    }

    #[inline(always)]
    fn all(self) -> bool {
        self.0.iter().all(|&b| b != 0)
    }

    #[inline(always)]
    fn to_bool_array(self) -> [bool; LANES] {
        self.0.map(|b| b != 0)
    }
}
