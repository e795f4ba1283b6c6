//! Display formatting for market figures
//!
//! Currency amounts are abbreviated by magnitude to keep large market figures compact.

/// Shown wherever a value is missing or malformed
pub const PLACEHOLDER: &str = "—";

pub const CURRENCY_SYMBOL: &str = "$";

pub const DEFAULT_FRACTION_DIGITS: usize = 2;

/// Alpha suffix applied to chart fill colours (0xcc = 80% opacity)
pub const FILL_ALPHA: &str = "cc";

/// Fixed ordered chart palette
pub const PALETTE: [&str; 15] = [
    "#06d6a0", "#4cc9f0", "#f72585", "#ffd166", "#48bfe3", "#8338ec", "#ff7b00", "#80ed99",
    "#00f5d4", "#a2d2ff", "#ef476f", "#06b6d4", "#22c55e", "#f59e0b", "#38bdf8",
];

/// Magnitude tiers, largest first: (threshold, suffix)
const TIERS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

/// Format a USD amount
///
/// - `None` → [`PLACEHOLDER`]
/// - ≥ 1e12 / 1e9 / 1e6 / 1e3 → scaled with "T" / "B" / "M" / "K" suffix and 2 decimals
/// - otherwise → thousands-grouped with `fraction_digits` decimals
pub fn format_currency(value: Option<f64>, fraction_digits: usize) -> String {
    let Some(num) = value.filter(|v| v.is_finite()) else {
        return PLACEHOLDER.to_string();
    };

    for (threshold, suffix) in TIERS {
        if num >= threshold {
            return format!("{}{:.2}{}", CURRENCY_SYMBOL, num / threshold, suffix);
        }
    }

    let formatted = format!("{:.*}", fraction_digits, num);
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        // Anything that rounds to zero prints unsigned
        Some(rest) if rest.bytes().any(|b| matches!(b, b'1'..=b'9')) => ("-", rest),
        Some(rest) => ("", rest),
        None => ("", formatted.as_str()),
    };

    match unsigned.split_once('.') {
        Some((int_part, frac_part)) => format!(
            "{}{}{}.{}",
            CURRENCY_SYMBOL,
            sign,
            group_thousands(int_part),
            frac_part
        ),
        None => format!("{}{}{}", CURRENCY_SYMBOL, sign, group_thousands(unsigned)),
    }
}

/// [`format_currency`] with [`DEFAULT_FRACTION_DIGITS`]
pub fn format_usd(value: Option<f64>) -> String {
    format_currency(value, DEFAULT_FRACTION_DIGITS)
}

/// Deterministic colour sequence of length `count`, cycling through [`PALETTE`]
pub fn color_palette(count: usize) -> Vec<&'static str> {
    (0..count).map(|i| PALETTE[i % PALETTE.len()]).collect()
}

/// Append an alpha channel to a "#rrggbb" colour, eg/ "#06d6a0" → "#06d6a0cc"
pub fn with_alpha(hex: &str, alpha: &str) -> String {
    format!("{hex}{alpha}")
}

/// Parse "#rrggbb" or "#rrggbbaa" into (r, g, b, a)
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    let channel = |i: usize| {
        digits
            .get(i..i + 2)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
    };

    match digits.len() {
        6 => Some((channel(0)?, channel(2)?, channel(4)?, u8::MAX)),
        8 => Some((channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
        _ => None,
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        struct TestCase {
            value: Option<f64>,
            fraction_digits: usize,
            expected: &'static str,
        }

        let tests = vec![
            TestCase {
                // TC0: billions
                value: Some(1_500_000_000.0),
                fraction_digits: 2,
                expected: "$1.50B",
            },
            TestCase {
                // TC1: below a thousand keeps fraction digits
                value: Some(999.0),
                fraction_digits: 2,
                expected: "$999.00",
            },
            TestCase {
                // TC2: missing value
                value: None,
                fraction_digits: 2,
                expected: "—",
            },
            TestCase {
                // TC3: trillions
                value: Some(2_346_000_000_000.0),
                fraction_digits: 2,
                expected: "$2.35T",
            },
            TestCase {
                // TC4: millions
                value: Some(12_340_000.0),
                fraction_digits: 0,
                expected: "$12.34M",
            },
            TestCase {
                // TC5: thousands ignore fraction digits
                value: Some(50_000.0),
                fraction_digits: 4,
                expected: "$50.00K",
            },
            TestCase {
                // TC6: exact tier boundary
                value: Some(1_000.0),
                fraction_digits: 2,
                expected: "$1.00K",
            },
            TestCase {
                // TC7: small price with 4 fraction digits
                value: Some(0.123456),
                fraction_digits: 4,
                expected: "$0.1235",
            },
            TestCase {
                // TC8: zero fraction digits for axis ticks
                value: Some(250.4),
                fraction_digits: 0,
                expected: "$250",
            },
            TestCase {
                // TC9: negative values are grouped, never abbreviated
                value: Some(-1_234_567.5),
                fraction_digits: 2,
                expected: "$-1,234,567.50",
            },
            TestCase {
                // TC10: NaN is treated as missing
                value: Some(f64::NAN),
                fraction_digits: 2,
                expected: "—",
            },
            TestCase {
                // TC11: zero
                value: Some(0.0),
                fraction_digits: 2,
                expected: "$0.00",
            },
            TestCase {
                // TC12: negative zero prints unsigned
                value: Some(-0.0),
                fraction_digits: 2,
                expected: "$0.00",
            },
            TestCase {
                // TC13: small negative rounding to zero prints unsigned
                value: Some(-0.001),
                fraction_digits: 2,
                expected: "$0.00",
            },
            TestCase {
                // TC14: small negative still visible at more fraction digits
                value: Some(-0.001),
                fraction_digits: 4,
                expected: "$-0.0010",
            },
            TestCase {
                // TC15: tier is picked before rounding
                value: Some(999.996),
                fraction_digits: 2,
                expected: "$1,000.00",
            },
            TestCase {
                // TC16: just under a million rounds up within the thousands tier
                value: Some(999_999.0),
                fraction_digits: 2,
                expected: "$1000.00K",
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = format_currency(test.value, test.fraction_digits);
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_format_usd_default_digits() {
        assert_eq!(format_usd(Some(26_500.0)), "$26.50K");
        assert_eq!(format_usd(Some(12.5)), "$12.50");
    }

    #[test]
    fn test_color_palette_wraps() {
        let colors = color_palette(20);
        assert_eq!(colors.len(), 20);
        assert_eq!(colors[15], colors[0]);
        assert_eq!(colors[19], colors[4]);
        assert_eq!(color_palette(20), colors);
        assert!(color_palette(0).is_empty());
    }

    #[test]
    fn test_with_alpha_and_parse() {
        let fill = with_alpha(PALETTE[0], FILL_ALPHA);
        assert_eq!(fill, "#06d6a0cc");
        assert_eq!(parse_hex_color(&fill), Some((0x06, 0xd6, 0xa0, 0xcc)));
        assert_eq!(parse_hex_color("#ff7b00"), Some((0xff, 0x7b, 0x00, 0xff)));
        assert_eq!(parse_hex_color("ff7b00"), None);
        assert_eq!(parse_hex_color("#zz7b00"), None);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }
}
