//! Field text to typed value conversion.
//!
//! Conversions work on raw bytes and never allocate. An empty field is not
//! a conversion error; the tokenizer handles it before calling in here.

/// Parse a base-10 integer with an optional leading `+` or `-`.
///
/// Returns `None` for empty input, a bare sign, any non-digit byte, or a
/// value outside `i64`. Surrounding whitespace is not accepted.
pub fn parse_int(field: &[u8]) -> Option<i64> {
    let (negative, digits) = match field.split_first()? {
        (b'-', rest) => (true, rest),
        (b'+', rest) => (false, rest),
        _ => (false, field),
    };
    if digits.is_empty() {
        return None;
    }

    // Accumulate toward the sign so i64::MIN is representable.
    let mut value: i64 = 0;
    for &b in digits {
        let digit = b.wrapping_sub(b'0');
        if digit > 9 {
            return None;
        }
        value = value.checked_mul(10)?;
        value = if negative {
            value.checked_sub(digit as i64)?
        } else {
            value.checked_add(digit as i64)?
        };
    }
    Some(value)
}

/// Parse a base-10 floating point literal: optional sign, digits with an
/// optional decimal point, optional exponent. `inf` and `nan` are accepted.
pub fn parse_float(field: &[u8]) -> Option<f64> {
    // Fast path for plain integers, the common case in numeric columns.
    if field.len() < 16 {
        if let Some(v) = parse_int(field) {
            // `-0` keeps its sign bit, as it does when spelled `-0.0`.
            if v == 0 && field[0] == b'-' {
                return Some(-0.0);
            }
            return Some(v as f64);
        }
    }
    std::str::from_utf8(field).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_basic() {
        assert_eq!(parse_int(b"0"), Some(0));
        assert_eq!(parse_int(b"42"), Some(42));
        assert_eq!(parse_int(b"-17"), Some(-17));
        assert_eq!(parse_int(b"+5"), Some(5));
        assert_eq!(parse_int(b"007"), Some(7));
    }

    #[test]
    fn test_parse_int_limits() {
        assert_eq!(parse_int(b"9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_int(b"-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_int(b"9223372036854775808"), None);
        assert_eq!(parse_int(b"-9223372036854775809"), None);
    }

    #[test]
    fn test_parse_int_rejects() {
        assert_eq!(parse_int(b""), None);
        assert_eq!(parse_int(b"-"), None);
        assert_eq!(parse_int(b"+"), None);
        assert_eq!(parse_int(b"1.5"), None);
        assert_eq!(parse_int(b"12a"), None);
        assert_eq!(parse_int(b" 1"), None);
        assert_eq!(parse_int(b"1\r"), None);
        assert_eq!(parse_int(b"--1"), None);
    }

    #[test]
    fn test_parse_float_basic() {
        assert_eq!(parse_float(b"2.5"), Some(2.5));
        assert_eq!(parse_float(b"-0.25"), Some(-0.25));
        assert_eq!(parse_float(b"+3"), Some(3.0));
        assert_eq!(parse_float(b"1e3"), Some(1000.0));
        assert_eq!(parse_float(b"1.5E-2"), Some(0.015));
        assert_eq!(parse_float(b".5"), Some(0.5));
        assert_eq!(parse_float(b"5."), Some(5.0));
        assert!(parse_float(b"-0").unwrap().is_sign_negative());
        assert!(parse_float(b"-000").unwrap().is_sign_negative());
        assert!(parse_float(b"0").unwrap().is_sign_positive());
        assert!(parse_float(b"+0").unwrap().is_sign_positive());
    }

    #[test]
    fn test_parse_float_large_integer_literal() {
        assert_eq!(parse_float(b"123456789012345678901234"), Some(123456789012345678901234.0));
    }

    #[test]
    fn test_parse_float_special() {
        assert_eq!(parse_float(b"inf"), Some(f64::INFINITY));
        assert_eq!(parse_float(b"-inf"), Some(f64::NEG_INFINITY));
        assert!(parse_float(b"NaN").unwrap().is_nan());
    }

    #[test]
    fn test_parse_float_rejects() {
        assert_eq!(parse_float(b""), None);
        assert_eq!(parse_float(b"abc"), None);
        assert_eq!(parse_float(b"1.2.3"), None);
        assert_eq!(parse_float(b"1e"), None);
        assert_eq!(parse_float(&[0xff]), None);
    }
}
