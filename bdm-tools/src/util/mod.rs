pub mod cli;
pub mod logging;

use std::num::ParseIntError;

/// Parse a number in decimal (`16`), hexadecimal (`0x10`), octal (`0o20`) or binary (`0b10000`).
pub fn parse_u32(input: &str) -> Result<u32, ParseIntError> {
    parse_int::parse(input)
}

/// Parse an address or data word. The input is hexadecimal, with or without a `0x` prefix.
pub fn parse_hex_u32(input: &str) -> Result<u32, ParseIntError> {
    u32::from_str_radix(&hex_digits(input), 16)
}

/// Parse an exclusive region end, which may be one past the last 32-bit address.
pub fn parse_region_end(input: &str) -> Result<u64, ParseIntError> {
    u64::from_str_radix(&hex_digits(input), 16)
}

/// Strip an optional `0x` prefix and digit separators.
///
/// `0b` and `0o` are hex digits here, so `0BADF00D` reads as 0x0BADF00D.
fn hex_digits(input: &str) -> String {
    let input = input.trim();
    input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input)
        .replace('_', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("0x1000", 0x1000)]
    #[test_case("1000", 0x1000)]
    #[test_case("FF000000", 0xFF00_0000)]
    #[test_case("0X12345678", 0x1234_5678)]
    #[test_case("0BADF00D", 0x0BAD_F00D)]
    #[test_case("0b101", 0xB101)]
    #[test_case("0B10", 0xB10)]
    #[test_case("4000_0000", 0x4000_0000)]
    fn hex_by_default(input: &str, expected: u32) {
        assert_eq!(parse_hex_u32(input).unwrap(), expected);
    }

    #[test_case(""; "empty")]
    #[test_case("0xZZ"; "bad digits")]
    #[test_case("100000000"; "too wide")]
    #[test_case("0o20"; "octal prefix")]
    fn reject_hex(input: &str) {
        assert!(parse_hex_u32(input).is_err());
    }

    #[test]
    fn decimal_counts() {
        assert_eq!(parse_u32("16").unwrap(), 16);
        assert_eq!(parse_u32("0x10").unwrap(), 16);
    }

    #[test]
    fn region_end_can_cover_the_top_word() {
        assert_eq!(parse_region_end("0x100000000").unwrap(), 1 << 32);
        assert_eq!(parse_region_end("40100000").unwrap(), 0x4010_0000);
    }

    #[test_case("0B10")]
    #[test_case("0b000101")]
    #[test_case("0x0BADF00D")]
    #[test_case("FFFF_FFFF")]
    fn address_and_end_parse_alike(input: &str) {
        assert_eq!(
            parse_region_end(input).unwrap(),
            u64::from(parse_hex_u32(input).unwrap())
        );
    }
}
