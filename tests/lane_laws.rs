//! Property-based laws over the batch surface.
//!
//! Strategy:
//! 1. Generate random lane arrays (and shift amounts) with proptest.
//! 2. Compute every operation lane by lane in plain scalar Rust.
//! 3. Assert the batch result matches the scalar reference exactly — the
//!    integer ops are bit-exact, so there is no epsilon anywhere.

use lanewise::{Batch, LANES};
use proptest::prelude::*;

fn lanes() -> impl Strategy<Value = [i8; LANES]> {
    any::<[i8; LANES]>()
}

/// Divisors with the two panicking cases excluded: no zero lanes, and no -1
/// lanes (so MIN / -1 can never pair up regardless of the dividend).
fn divisors() -> impl Strategy<Value = [i8; LANES]> {
    any::<[i8; LANES]>().prop_map(|mut d| {
        for lane in &mut d {
            if *lane == 0 || *lane == -1 {
                *lane = 1;
            }
        }
        d
    })
}

proptest! {
    #[test]
    fn round_trip_from_array(a in lanes()) {
        prop_assert_eq!(Batch::from_array(a).to_array(), a);
    }

    #[test]
    fn round_trip_through_memory(a in lanes()) {
        let mut buf = [0i8; LANES];
        Batch::from_array(a).write_to_slice(&mut buf);
        prop_assert_eq!(Batch::from_slice(&buf).to_array(), a);
    }

    #[test]
    fn bit_view_round_trip_preserves_bits(bytes in any::<[u8; LANES]>()) {
        let v = unsafe { Batch::<i8>::load_unaligned_bits(bytes.as_ptr()) };
        prop_assert_eq!(v.to_array(), bytes.map(|b| b as i8));
        let mut out = [0u8; LANES];
        unsafe { v.store_unaligned_bits(out.as_mut_ptr()) };
        prop_assert_eq!(out, bytes);
    }

    #[test]
    fn add_is_lane_wise_wrapping(a in lanes(), b in lanes()) {
        let got = (Batch::from_array(a) + Batch::from_array(b)).to_array();
        for i in 0..LANES {
            prop_assert_eq!(got[i], a[i].wrapping_add(b[i]));
        }
    }

    #[test]
    fn sub_is_lane_wise_wrapping(a in lanes(), b in lanes()) {
        let got = (Batch::from_array(a) - Batch::from_array(b)).to_array();
        for i in 0..LANES {
            prop_assert_eq!(got[i], a[i].wrapping_sub(b[i]));
        }
    }

    #[test]
    fn mul_is_lane_wise_wrapping(a in lanes(), b in lanes()) {
        let got = (Batch::from_array(a) * Batch::from_array(b)).to_array();
        for i in 0..LANES {
            prop_assert_eq!(got[i], a[i].wrapping_mul(b[i]));
        }
    }

    #[test]
    fn neg_is_lane_wise_wrapping(a in lanes()) {
        let got = (-Batch::from_array(a)).to_array();
        for i in 0..LANES {
            prop_assert_eq!(got[i], a[i].wrapping_neg());
        }
    }

    #[test]
    fn bitwise_ops_are_lane_wise(a in lanes(), b in lanes()) {
        let (va, vb) = (Batch::from_array(a), Batch::from_array(b));
        let and = (va & vb).to_array();
        let or = (va | vb).to_array();
        let xor = (va ^ vb).to_array();
        let not = (!va).to_array();
        let andnot = va.andnot(vb).to_array();
        for i in 0..LANES {
            prop_assert_eq!(and[i], a[i] & b[i]);
            prop_assert_eq!(or[i], a[i] | b[i]);
            prop_assert_eq!(xor[i], a[i] ^ b[i]);
            prop_assert_eq!(not[i], !a[i]);
            prop_assert_eq!(andnot[i], a[i] & !b[i]);
        }
    }

    #[test]
    fn min_max_abs_are_lane_wise(a in lanes(), b in lanes()) {
        let (va, vb) = (Batch::from_array(a), Batch::from_array(b));
        let lo = va.min(vb).to_array();
        let hi = va.max(vb).to_array();
        let mag = va.abs().to_array();
        for i in 0..LANES {
            prop_assert_eq!(lo[i], a[i].min(b[i]));
            prop_assert_eq!(hi[i], a[i].max(b[i]));
            prop_assert_eq!(mag[i], a[i].wrapping_abs());
        }
    }

    #[test]
    fn eq_is_reflexive(a in lanes()) {
        prop_assert!(Batch::from_array(a).cmp_eq(Batch::from_array(a)).all());
    }

    #[test]
    fn ne_is_negated_eq(a in lanes(), b in lanes()) {
        let (va, vb) = (Batch::from_array(a), Batch::from_array(b));
        prop_assert_eq!(
            va.cmp_ne(vb).to_bool_array(),
            (!va.cmp_eq(vb)).to_bool_array()
        );
    }

    #[test]
    fn comparisons_match_scalar(a in lanes(), b in lanes()) {
        let (va, vb) = (Batch::from_array(a), Batch::from_array(b));
        let lt = va.cmp_lt(vb).to_bool_array();
        let le = va.cmp_le(vb).to_bool_array();
        let gt = va.cmp_gt(vb).to_bool_array();
        let ge = va.cmp_ge(vb).to_bool_array();
        for i in 0..LANES {
            prop_assert_eq!(lt[i], a[i] < b[i]);
            prop_assert_eq!(le[i], a[i] <= b[i]);
            prop_assert_eq!(gt[i], a[i] > b[i]);
            prop_assert_eq!(ge[i], a[i] >= b[i]);
        }
    }

    #[test]
    fn select_merges_per_lane(a in lanes(), b in lanes(), pivot in any::<i8>()) {
        let (va, vb) = (Batch::from_array(a), Batch::from_array(b));
        let mask = va.cmp_lt(Batch::splat(pivot));
        let got = mask.select(va, vb).to_array();
        for i in 0..LANES {
            prop_assert_eq!(got[i], if a[i] < pivot { a[i] } else { b[i] });
        }
    }

    #[test]
    fn reduce_add_matches_pair_fold(a in lanes()) {
        let mut fold: i8 = 0;
        for pair in a.chunks_exact(2) {
            fold = fold.wrapping_add(pair[0].wrapping_add(pair[1]));
        }
        prop_assert_eq!(Batch::from_array(a).reduce_add(), fold);
    }

    #[test]
    fn division_identity_holds(a in lanes(), b in divisors()) {
        let (va, vb) = (Batch::from_array(a), Batch::from_array(b));
        let q = (va / vb).to_array();
        let r = (va % vb).to_array();
        for i in 0..LANES {
            prop_assert_eq!(q[i], a[i] / b[i]);
            prop_assert_eq!(r[i], a[i] % b[i]);
            prop_assert_eq!(q[i].wrapping_mul(b[i]).wrapping_add(r[i]), a[i]);
        }
    }

    #[test]
    fn shift_policy_in_range(a in lanes(), k in 0i32..8) {
        let v = Batch::from_array(a);
        let left = (v << k).to_array();
        let right = (v >> k).to_array();
        for i in 0..LANES {
            prop_assert_eq!(left[i], ((a[i] as u8) << k) as i8);
            prop_assert_eq!(right[i], a[i] >> k);
        }
    }

    #[test]
    fn shift_policy_out_of_range(a in lanes(), k in any::<i32>()) {
        prop_assume!(!(0..8).contains(&k));
        let v = Batch::from_array(a);
        prop_assert_eq!((v << k).to_array(), [0; LANES]);
        prop_assert_eq!((v >> k).to_array(), [0; LANES]);
    }

    #[test]
    fn per_lane_shift_matches_reference(a in lanes(), counts in lanes()) {
        let got = (Batch::from_array(a) << Batch::from_array(counts)).to_array();
        for i in 0..LANES {
            let expected = if counts[i] >= 8 {
                0
            } else if counts[i] >= 0 {
                ((a[i] as u8) << counts[i]) as i8
            } else if counts[i] > -8 {
                a[i] >> -counts[i]
            } else if a[i] < 0 {
                -1
            } else {
                0
            };
            prop_assert_eq!(got[i], expected, "lane {} count {}", i, counts[i]);
        }
    }

    #[test]
    fn mul_accumulate_family_decomposes(a in lanes(), b in lanes(), c in lanes()) {
        let (va, vb, vc) = (
            Batch::from_array(a),
            Batch::from_array(b),
            Batch::from_array(c),
        );
        prop_assert_eq!(va.mul_add(vb, vc).to_array(), (va * vb + vc).to_array());
        prop_assert_eq!(va.mul_sub(vb, vc).to_array(), (va * vb - vc).to_array());
        prop_assert_eq!(
            va.neg_mul_add(vb, vc).to_array(),
            (-(va * vb) + vc).to_array()
        );
        prop_assert_eq!(
            va.neg_mul_sub(vb, vc).to_array(),
            (-(va * vb) - vc).to_array()
        );
    }
}
