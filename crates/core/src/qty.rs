//! Case-pack quantity rounding
//!
//! Every cart/order quantity must be a positive multiple of the product's
//! `qtd_multiplo`. This module is the single place that rule lives.

/// Round `qty` to the nearest multiple of `multiple`, never below one full
/// multiple.
///
/// Total function: `multiple` is coerced to >= 1 and `qty` is clamped at 0,
/// so any input produces a valid quantity. An explicit qty of 0 still floors
/// at one multiple — removing a line is a distinct operation, not a
/// set-to-zero.
pub fn round_to_multiple(qty: i32, multiple: i32) -> i32 {
    let m = i64::from(multiple.max(1));
    let q = i64::from(qty.max(0));

    // Integer round-half-up of q / m, scaled back to the multiple.
    let rounded = (2 * q + m) / (2 * m) * m;

    rounded.max(m) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_is_always_a_positive_multiple() {
        for multiple in 1..=12 {
            for qty in 0..=100 {
                let r = round_to_multiple(qty, multiple);
                assert_eq!(r % multiple, 0, "qty={} multiple={}", qty, multiple);
                assert!(r >= multiple, "qty={} multiple={}", qty, multiple);
            }
        }
    }

    #[test]
    fn test_zero_floors_at_one_multiple() {
        assert_eq!(round_to_multiple(0, 1), 1);
        assert_eq!(round_to_multiple(0, 3), 3);
        assert_eq!(round_to_multiple(0, 12), 12);
    }

    #[test]
    fn test_rounds_to_nearest() {
        // 4 is closer to 3 than to 6
        assert_eq!(round_to_multiple(4, 3), 3);
        // 5 is closer to 6
        assert_eq!(round_to_multiple(5, 3), 6);
        // halfway rounds up
        assert_eq!(round_to_multiple(3, 2), 4);
        // exact multiples pass through
        assert_eq!(round_to_multiple(9, 3), 9);
    }

    #[test]
    fn test_invalid_inputs_are_coerced() {
        // non-positive multiple falls back to 1
        assert_eq!(round_to_multiple(7, 0), 7);
        assert_eq!(round_to_multiple(7, -4), 7);
        // negative qty clamps to 0, then floors at the multiple
        assert_eq!(round_to_multiple(-10, 5), 5);
    }
}
