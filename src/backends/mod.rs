//! Architecture kernels.
//!
//! Exactly one vector backend compiles for any given target, selected by
//! `target_arch` alone — never by runtime detection. The scalar fallback
//! always compiles; it is the portable reference the vector backends are
//! checked against in the test suites.

#[cfg(target_arch = "aarch64")]
pub mod neon;
pub mod scalar;
#[cfg(target_arch = "x86_64")]
pub mod x86;

#[cfg(target_arch = "aarch64")]
pub use self::neon as native;
#[cfg(target_arch = "x86_64")]
pub use self::x86 as native;
#[cfg(not(any(target_arch = "aarch64", target_arch = "x86_64")))]
pub use self::scalar as native;

/// One lane of the vector-variable shift: positive counts shift left,
/// negative counts shift right arithmetically, and counts of magnitude ≥ 8
/// produce the fully shifted value (0 leftward, the sign fill rightward).
/// Matches the reference architecture's vector-shift instruction exactly.
#[inline(always)]
pub(crate) fn shift_lane_signed(value: i8, count: i8) -> i8 {
    if count >= 8 {
        0
    } else if count >= 0 {
        ((value as u8) << count) as i8
    } else if count > -8 {
        value >> -count
    } else if value < 0 {
        -1
    } else {
        0
    }
}
