//! x86_64 SSE2 kernel: 128-bit registers, 16 lanes of 8-bit integers.
//!
//! Baseline SSE2 only — nothing from SSSE3 or SSE4.1 is assumed. The ISA
//! has no byte multiply, byte min/max/abs, or byte shifts, so each of those
//! is the documented emulation: widening even/odd multiply, compare-blend
//! selection, and 16-bit shifts with the crossed-in bits masked off. The
//! observable semantics match the other backends exactly.

use core::arch::x86_64::*;
use core::fmt;
use core::marker::PhantomData;

use super::shift_lane_signed;
use crate::backend::{BatchMemory, BatchOps, MaskOps};
use crate::LANES;

/// SSE2 register holding 16 lanes of `T`.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Reg<T: Copy>(pub(crate) __m128i, pub(crate) PhantomData<T>);

/// SSE2 comparison result: one all-ones or all-zero byte per lane.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct MaskReg<T: Copy>(pub(crate) __m128i, pub(crate) PhantomData<T>);

impl<T: Copy> fmt::Debug for Reg<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x86::Reg<{}>", core::any::type_name::<T>())
    }
}

impl<T: Copy> fmt::Debug for MaskReg<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x86::MaskReg<{}>", core::any::type_name::<T>())
    }
}

impl Default for Reg<i8> {
    #[inline(always)]
    fn default() -> Self {
        Self(unsafe { _mm_setzero_si128() }, PhantomData)
    }
}

impl Reg<i8> {
    /// Wraps a raw register value; zero cost, bits unchanged.
    #[inline(always)]
    pub fn from_raw(raw: __m128i) -> Self {
        Self(raw, PhantomData)
    }

    /// Unwraps to the raw register value; zero cost, bits unchanged.
    #[inline(always)]
    pub fn into_raw(self) -> __m128i {
        self.0
    }
}

/// `(mask & if_true) | (!mask & if_false)` — the SSE2 blend.
#[inline(always)]
fn blend(mask: __m128i, if_true: __m128i, if_false: __m128i) -> __m128i {
    unsafe { _mm_or_si128(_mm_and_si128(mask, if_true), _mm_andnot_si128(mask, if_false)) }
}

impl BatchMemory<i8> for Reg<i8> {
    #[inline(always)]
    fn splat(value: i8) -> Self {
        Self(unsafe { _mm_set1_epi8(value) }, PhantomData)
    }

    #[inline(always)]
    unsafe fn load_aligned(src: *const i8) -> Self {
        // movdqa faults on a misaligned address; that is the contract.
        Self(unsafe { _mm_load_si128(src.cast()) }, PhantomData)
    }

    #[inline(always)]
    unsafe fn store_aligned(self, dst: *mut i8) {
        unsafe { _mm_store_si128(dst.cast(), self.0) };
    }

    #[inline(always)]
    unsafe fn load_unaligned(src: *const i8) -> Self {
        Self(unsafe { _mm_loadu_si128(src.cast()) }, PhantomData)
    }

    #[inline(always)]
    unsafe fn store_unaligned(self, dst: *mut i8) {
        unsafe { _mm_storeu_si128(dst.cast(), self.0) };
    }
}

impl BatchOps<i8> for Reg<i8> {
    type Mask = MaskReg<i8>;

    #[inline(always)]
    fn neg(self) -> Self {
        Self(
            unsafe { _mm_sub_epi8(_mm_setzero_si128(), self.0) },
            PhantomData,
        )
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(unsafe { _mm_add_epi8(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(unsafe { _mm_sub_epi8(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        // No byte multiply below AVX-512BW. Widen to 16 bits, multiply the
        // even and odd bytes separately, and knit the low product bytes
        // back together.
        unsafe {
            let even = _mm_mullo_epi16(self.0, rhs.0);
            let odd = _mm_mullo_epi16(_mm_srli_epi16::<8>(self.0), _mm_srli_epi16::<8>(rhs.0));
            let keep_even = _mm_set1_epi16(0x00FF);
            Self(
                _mm_or_si128(_mm_and_si128(even, keep_even), _mm_slli_epi16::<8>(odd)),
                PhantomData,
            )
        }
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
        MaskReg(unsafe { _mm_cmpeq_epi8(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn cmp_lt(self, rhs: Self) -> Self::Mask {
        MaskReg(unsafe { _mm_cmplt_epi8(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn cmp_le(self, rhs: Self) -> Self::Mask {
        // No byte less-or-equal; the complement of greater-than.
        unsafe {
            let gt = _mm_cmpgt_epi8(self.0, rhs.0);
            MaskReg(_mm_xor_si128(gt, _mm_set1_epi8(-1)), PhantomData)
        }
    }

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self(unsafe { _mm_and_si128(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self(unsafe { _mm_or_si128(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self(unsafe { _mm_xor_si128(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn not(self) -> Self {
        Self(
            unsafe { _mm_xor_si128(self.0, _mm_set1_epi8(-1)) },
            PhantomData,
        )
    }

    #[inline(always)]
    fn andnot(self, rhs: Self) -> Self {
        // pandn computes !lhs & rhs, so the operands swap.
        Self(unsafe { _mm_andnot_si128(rhs.0, self.0) }, PhantomData)
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        // Signed byte min arrives with SSE4.1; baseline is compare + blend.
        let takes_rhs = unsafe { _mm_cmpgt_epi8(self.0, rhs.0) };
        Self(blend(takes_rhs, rhs.0, self.0), PhantomData)
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        let takes_lhs = unsafe { _mm_cmpgt_epi8(self.0, rhs.0) };
        Self(blend(takes_lhs, self.0, rhs.0), PhantomData)
    }

    #[inline(always)]
    fn abs(self) -> Self {
        unsafe {
            let negated = _mm_sub_epi8(_mm_setzero_si128(), self.0);
            let negative = _mm_cmpgt_epi8(_mm_setzero_si128(), self.0);
            Self(blend(negative, negated, self.0), PhantomData)
        }
    }

    #[inline(always)]
    fn reduce_add(self) -> i8 {
        // psadbw only sums unsigned bytes. Bias every lane by +128 with an
        // XOR, take the two 8-byte absolute-difference sums against zero
        // (exact in 16 bits), then remove the 16-lane bias; the final cast
        // wraps like the portable fold.
        unsafe {
            let biased = _mm_xor_si128(self.0, _mm_set1_epi8(-128));
            let sums = _mm_sad_epu8(biased, _mm_setzero_si128());
            let total = _mm_cvtsi128_si32(sums) + _mm_extract_epi16::<4>(sums);
            (total - 128 * LANES as i32) as i8
        }
    }

    #[inline(always)]
    fn shl(self, amount: i32) -> Self {
        if amount == 0 {
            return self;
        }
        if !(1..8).contains(&amount) {
            return Self::splat(0);
        }
        // No byte shift; shift 16-bit lanes and drop the bits that crossed
        // in from the neighbor byte.
        unsafe {
            let wide = _mm_sll_epi16(self.0, _mm_cvtsi32_si128(amount));
            let keep = _mm_set1_epi8((0xFFu8 << amount) as i8);
            Self(_mm_and_si128(wide, keep), PhantomData)
        }
    }

    #[inline(always)]
    fn shr(self, amount: i32) -> Self {
        if amount == 0 {
            return self;
        }
        if !(1..8).contains(&amount) {
            return Self::splat(0);
        }
        // Arithmetic byte shift built from 16-bit shifts: even bytes ride a
        // sign-extending widen (up 8, then down 8 + amount); odd bytes
        // already sit in the sign-carrying half of each 16-bit lane.
        unsafe {
            let even = _mm_sra_epi16(
                _mm_slli_epi16::<8>(self.0),
                _mm_cvtsi32_si128(amount + 8),
            );
            let odd = _mm_sra_epi16(self.0, _mm_cvtsi32_si128(amount));
            let keep_even = _mm_set1_epi16(0x00FF);
            Self(
                _mm_or_si128(
                    _mm_and_si128(even, keep_even),
                    _mm_andnot_si128(keep_even, odd),
                ),
                PhantomData,
            )
        }
    }

    #[inline(always)]
    fn shl_each(self, counts: Self) -> Self {
        // No per-lane byte shift in the ISA; apply the reference semantics
        // lane by lane.
        let values = self.to_array();
        let counts = counts.to_array();
        let mut out = [0i8; LANES];
        for i in 0..LANES {
            out[i] = shift_lane_signed(values[i], counts[i]);
        }
        Self::from_array(out)
    }

    #[inline(always)]
    fn select(mask: Self::Mask, if_true: Self, if_false: Self) -> Self {
        Self(blend(mask.0, if_true.0, if_false.0), PhantomData)
    }
}

impl MaskOps for MaskReg<i8> {
    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        Self(unsafe { _mm_and_si128(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        Self(unsafe { _mm_or_si128(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn xor(self, rhs: Self) -> Self {
        Self(unsafe { _mm_xor_si128(self.0, rhs.0) }, PhantomData)
    }

    #[inline(always)]
    fn not(self) -> Self {
        Self(
            unsafe { _mm_xor_si128(self.0, _mm_set1_epi8(-1)) },
            PhantomData,
        )
    }

    #[inline(always)]
    fn any(self) -> bool {
        unsafe { _mm_movemask_epi8(self.0) != 0 }
    }

    #[inline(always)]
    fn all(self) -> bool {
        unsafe { _mm_movemask_epi8(self.0) == 0xFFFF }
    }

    #[inline(always)]
    fn to_bool_array(self) -> [bool; LANES] {
        let mut bytes = [0u8; LANES];
        unsafe { _mm_storeu_si128(bytes.as_mut_ptr().cast(), self.0) };
        bytes.map(|b| b != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_matches_scalar_wrapping_product() {
        let a = Reg::<i8>::from_array([
            1, -1, 2, -2, 3, -3, 50, -50, 100, -100, 127, -128, 0, 7, 11, 13,
        ]);
        let b = Reg::<i8>::from_array([
            3, 3, -5, -5, 9, 9, 4, 4, 3, 3, 2, 2, 9, -7, 11, -13,
        ]);
        let expected = {
            let (x, y) = (a.to_array(), b.to_array());
            let mut out = [0i8; 16];
            for i in 0..16 {
                out[i] = x[i].wrapping_mul(y[i]);
            }
            out
        };
        assert_eq!(a.mul(b).to_array(), expected);
    }

    #[test]
    fn min_max_abs_without_sse4() {
        let a = Reg::<i8>::from_array([
            5, -5, 0, -128, 127, 1, -1, 64, -64, 33, -33, 2, -2, 120, -120, 9,
        ]);
        let b = Reg::<i8>::splat(3);
        let xs = a.to_array();
        let mut lo = [0i8; 16];
        let mut hi = [0i8; 16];
        let mut mag = [0i8; 16];
        for i in 0..16 {
            lo[i] = xs[i].min(3);
            hi[i] = xs[i].max(3);
            mag[i] = xs[i].wrapping_abs();
        }
        assert_eq!(a.min(b).to_array(), lo);
        assert_eq!(a.max(b).to_array(), hi);
        assert_eq!(a.abs().to_array(), mag);
    }

    #[test]
    fn sad_sum_matches_pair_fold() {
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
    fn byte_shifts_stay_within_their_lane() {
        let v = Reg::<i8>::from_array([
            1, -1, 2, -2, 64, -64, 127, -128, 85, -86, 3, -3, 17, -17, 102, -102,
        ]);
        let xs = v.to_array();
        for amount in 0..8 {
            let mut left = [0i8; 16];
            let mut right = [0i8; 16];
            for i in 0..16 {
                left[i] = ((xs[i] as u8) << amount) as i8;
                right[i] = xs[i] >> amount;
            }
            assert_eq!(v.shl(amount).to_array(), left, "left by {amount}");
            assert_eq!(v.shr(amount).to_array(), right, "right by {amount}");
        }
        assert_eq!(v.shl(8).to_array(), [0i8; 16]);
        assert_eq!(v.shr(8).to_array(), [0i8; 16]);
        assert_eq!(v.shl(-3).to_array(), [0i8; 16]);
    }

    #[test]
    fn aligned_and_unaligned_paths_round_trip() {
        #[repr(align(16))]
        struct Aligned([i8; 16]);

        let mut buf = Aligned([0; 16]);
        let v = Reg::<i8>::from_array([
            9, 8, 7, 6, 5, 4, 3, 2, 1, 0, -1, -2, -3, -4, -5, -6,
        ]);
        unsafe { v.store_aligned(buf.0.as_mut_ptr()) };
        let back = unsafe { Reg::<i8>::load_aligned(buf.0.as_ptr()) };
        assert_eq!(back.to_array(), v.to_array());

        let mut raw = [0i8; 17];
        unsafe { v.store_unaligned(raw.as_mut_ptr().add(1)) };
        let back = unsafe { Reg::<i8>::load_unaligned(raw.as_ptr().add(1)) };
        assert_eq!(back.to_array(), v.to_array());
    }

    #[test]
    fn movemask_truth_queries() {
        let a = Reg::<i8>::splat(1);
        let b = Reg::<i8>::splat(1);
        assert!(a.cmp_eq(b).all());
        assert!(a.cmp_eq(b).any());
        assert!(!a.cmp_ne(b).any());
    }
}
