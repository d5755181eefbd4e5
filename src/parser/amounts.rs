use crate::types::AssetDelta;

/// Render an atomic amount as a minimal decimal string.
///
/// Exact integer division against `scale`; the fractional part is
/// zero-padded to `decimals` digits and stripped of trailing zeros. The
/// sign is dropped: outputs are absolute values.
pub fn format_amount(delta: i128, scale: i128, decimals: u8) -> String {
    let abs = delta.unsigned_abs();
    let scale = scale as u128;
    let int_part = abs / scale;
    let rem = abs % scale;

    if rem == 0 {
        return int_part.to_string();
    }

    let frac = format!("{rem:0>width$}", width = decimals as usize);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        int_part.to_string()
    } else {
        format!("{int_part}.{frac}")
    }
}

/// Format one active asset's magnitude.
pub fn formatted(asset: &AssetDelta) -> String {
    format_amount(asset.delta, asset.scale, asset.decimals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_amounts_have_no_point() {
        assert_eq!(format_amount(5_000_000, 1_000_000, 6), "5");
        assert_eq!(format_amount(-1_000_000_000, 1_000_000_000, 9), "1");
        assert_eq!(format_amount(0, 1_000_000, 6), "0");
        // k * scale == str(k)
        for k in [1i128, 7, 1000, 123_456] {
            assert_eq!(format_amount(k * 1_000_000_000, 1_000_000_000, 9), k.to_string());
        }
    }

    #[test]
    fn test_fraction_strips_trailing_zeros() {
        assert_eq!(format_amount(1_500_000_000, 1_000_000_000, 9), "1.5");
        assert_eq!(format_amount(1_230_000, 1_000_000, 6), "1.23");
        assert_eq!(format_amount(123, 1_000_000, 6), "0.000123");
        assert_eq!(format_amount(-2_000_000_001, 1_000_000_000, 9), "2.000000001");
    }

    #[test]
    fn test_zero_decimals() {
        assert_eq!(format_amount(42, 1, 0), "42");
        assert_eq!(format_amount(-42, 1, 0), "42");
    }

    #[test]
    fn test_integer_part_keeps_its_zeros() {
        assert_eq!(format_amount(100_000_000_000, 1_000_000_000, 9), "100");
        assert_eq!(format_amount(10_000_000_001, 1_000_000_000, 9), "10.000000001");
    }
}
