/// Applies a percentage discount, rounding the result up and flooring it
/// at one minor currency unit. A discount may never make a sale free.
pub fn discounted_price_minor(price_minor: i32, discount_percent: i32) -> i32 {
    let remaining = (100 - discount_percent).clamp(0, 100) as i64;
    let scaled = price_minor as i64 * remaining;
    // Equivalent to `scaled.div_ceil(100)`; the signed `div_ceil` inherent
    // method is still unstable on this toolchain (rust-lang/rust#88581).
    let quotient = scaled / 100;
    let discounted = if scaled % 100 > 0 { quotient + 1 } else { quotient };
    discounted.max(1) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_up_to_the_next_minor_unit() {
        assert_eq!(discounted_price_minor(100, 15), 85);
        assert_eq!(discounted_price_minor(500, 10), 450);
        assert_eq!(discounted_price_minor(999, 33), 670);
    }

    #[test]
    fn never_drops_below_one_minor_unit() {
        assert_eq!(discounted_price_minor(10, 95), 1);
        assert_eq!(discounted_price_minor(1, 99), 1);
        assert_eq!(discounted_price_minor(100, 100), 1);
    }
}
