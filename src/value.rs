//!
//! Raw literal parsing for the built-in scalar converters.
//!
use crate::error::LiteralError;
use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

///
/// Parse a boolean literal.
///
/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
///
pub fn parse_bool(raw: &str) -> Result<bool, LiteralError> {
    match raw.trim() {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        "" => Err(LiteralError::EmptyStr),
        other => Err(LiteralError::SyntaxError(String::from(other))),
    }
}

/// Splits the radix prefix (`0x`, `0o`, `0b`, or a bare leading `0` for
/// octal) from the digits.
fn split_radix(raw: &str) -> (u32, &str) {
    let lowered = raw.get(..2).map(str::to_ascii_lowercase);

    match lowered.as_deref() {
        Some("0x") => (16, &raw[2..]),
        Some("0o") => (8, &raw[2..]),
        Some("0b") => (2, &raw[2..]),
        Some(_) if raw.starts_with('0') => (8, &raw[1..]),
        _ => (10, raw),
    }
}

fn parse_magnitude(raw: &str, digits: &str) -> Result<u128, LiteralError> {
    let (radix, digits) = split_radix(digits);
    let digits = digits.replace('_', "");

    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(LiteralError::NumberError(String::from(raw)));
    }

    u128::from_str_radix(&digits, radix).map_err(|e| {
        if digits.chars().all(|ch| ch.is_digit(radix)) {
            LiteralError::OutOfRange(String::from(raw))
        } else {
            LiteralError::CustomError(format!("invalid number [{}]: {}", raw, e))
        }
    })
}

///
/// Parse a signed integer, with an optional sign, radix prefix and `_`
/// digit separators: `-42`, `0x2A`, `1_000`.
///
/// A leading `0` means octal (`010` is 8), surrounding whitespace is
/// rejected.
///
pub fn parse_signed<T>(raw: &str) -> Result<T, LiteralError>
where
    T: TryFrom<i128>,
{
    if raw.is_empty() {
        return Err(LiteralError::EmptyStr);
    }

    let (negative, digits) = match raw.as_bytes()[0] {
        b'-' => (true, &raw[1..]),
        b'+' => (false, &raw[1..]),
        _ => (false, raw),
    };

    let magnitude = parse_magnitude(raw, digits)?;
    let out_of_range = || LiteralError::OutOfRange(String::from(raw));

    let value = if negative {
        if magnitude == i128::MIN.unsigned_abs() {
            i128::MIN
        } else {
            -i128::try_from(magnitude).map_err(|_| out_of_range())?
        }
    } else {
        i128::try_from(magnitude).map_err(|_| out_of_range())?
    };

    T::try_from(value).map_err(|_| out_of_range())
}

/// Parse an unsigned integer, signs are rejected.
pub fn parse_unsigned<T>(raw: &str) -> Result<T, LiteralError>
where
    T: TryFrom<u128>,
{
    if raw.is_empty() {
        return Err(LiteralError::EmptyStr);
    }

    let magnitude = parse_magnitude(raw, raw)?;
    T::try_from(magnitude).map_err(|_| LiteralError::OutOfRange(String::from(raw)))
}

fn unit_scale(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3_600 * NANOS_PER_SEC),
        _ => None,
    }
}

#[inline]
fn leading_digits(raw: &str) -> (&str, &str) {
    let end = raw
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(raw.len());
    raw.split_at(end)
}

///
/// Parse a duration literal.
///
/// A duration is a sequence of decimal numbers, each with an optional
/// fraction and a mandatory unit: `300ms`, `1.5h`, `2h45m`. Valid units are
/// `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. A bare `0` is accepted.
///
pub fn parse_duration(raw: &str) -> Result<Duration, LiteralError> {
    let trimmed = raw.trim();
    let syntax = || LiteralError::SyntaxError(String::from(trimmed));
    let out_of_range = || LiteralError::OutOfRange(String::from(trimmed));

    let mut rest = trimmed.strip_prefix('+').unwrap_or(trimmed);

    if trimmed.is_empty() {
        return Err(LiteralError::EmptyStr);
    } else if rest.starts_with('-') {
        return Err(out_of_range());
    } else if rest == "0" {
        return Ok(Duration::ZERO);
    } else if rest.is_empty() {
        return Err(syntax());
    }

    let mut total: u128 = 0;

    while !rest.is_empty() {
        let (int_part, tail) = leading_digits(rest);
        let (frac_part, tail) = match tail.strip_prefix('.') {
            Some(tail) => leading_digits(tail),
            None => ("", tail),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(syntax());
        }

        let unit_end = tail
            .find(|ch: char| ch.is_ascii_digit() || ch == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);
        let scale = unit_scale(unit).ok_or_else(syntax)?;

        let int = if int_part.is_empty() {
            0
        } else {
            int_part.parse::<u128>().map_err(|_| out_of_range())?
        };
        let mut nanos = int.checked_mul(scale).ok_or_else(out_of_range)?;

        if !frac_part.is_empty() {
            // anything below a nanosecond is dropped anyway
            let digits = &frac_part[..frac_part.len().min(18)];
            let frac = digits.parse::<u128>().map_err(|_| syntax())?;
            nanos += frac * scale / 10u128.pow(digits.len() as u32);
        }

        total = total.checked_add(nanos).ok_or_else(out_of_range)?;
        rest = tail;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).map_err(|_| out_of_range())?;
    Ok(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}

#[cfg(test)]
mod test {
    use super::{parse_bool, parse_duration, parse_signed, parse_unsigned};
    use crate::error::LiteralError;
    use std::time::Duration;

    #[test]
    fn test_parse_bool() {
        for raw in &["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(raw), Ok(true));
        }
        for raw in &["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(raw), Ok(false));
        }

        assert!(parse_bool("yes").is_err());
        assert_eq!(parse_bool(""), Err(LiteralError::EmptyStr));
    }

    #[test]
    fn test_parse_signed() {
        assert_eq!(parse_signed::<i32>("42"), Ok(42));
        assert_eq!(parse_signed::<i32>("-42"), Ok(-42));
        assert_eq!(parse_signed::<i64>("+0x2A"), Ok(42));
        assert_eq!(parse_signed::<i64>("-0b101"), Ok(-5));
        assert_eq!(parse_signed::<i64>("0o17"), Ok(15));
        assert_eq!(parse_signed::<i64>("1_000"), Ok(1000));
        assert_eq!(parse_signed::<i8>("-128"), Ok(i8::MIN));
        assert_eq!(parse_signed::<i128>(&i128::MIN.to_string()), Ok(i128::MIN));

        assert!(matches!(parse_signed::<i8>("128"), Err(LiteralError::OutOfRange(_))));
        assert!(parse_signed::<i32>("FOOO").is_err());
        assert!(parse_signed::<i32>("--1").is_err());
        assert!(parse_signed::<i32>("1.5").is_err());
    }

    #[test]
    fn test_parse_integer_base_rules() {
        assert_eq!(parse_signed::<i32>("010"), Ok(8));
        assert_eq!(parse_signed::<i32>("-0_17"), Ok(-15));
        assert_eq!(parse_signed::<i32>("0"), Ok(0));
        assert_eq!(parse_unsigned::<u16>("0755"), Ok(493));
        assert_eq!(parse_unsigned::<u16>("00"), Ok(0));

        assert!(parse_signed::<i32>("09").is_err());
        assert!(parse_signed::<i32>(" 42").is_err());
        assert!(parse_unsigned::<u32>("42\n").is_err());
    }

    #[test]
    fn test_parse_unsigned() {
        assert_eq!(parse_unsigned::<u8>("255"), Ok(255));
        assert_eq!(parse_unsigned::<u64>("0xff"), Ok(255));

        assert!(matches!(parse_unsigned::<u8>("256"), Err(LiteralError::OutOfRange(_))));
        assert!(parse_unsigned::<u32>("-1").is_err());
        assert!(parse_unsigned::<u32>("+1").is_err());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("0"), Ok(Duration::ZERO));
        assert_eq!(parse_duration("300ms"), Ok(Duration::from_millis(300)));
        assert_eq!(parse_duration("1.5s"), Ok(Duration::from_millis(1500)));
        assert_eq!(parse_duration("2h45m"), Ok(Duration::from_secs(2 * 3600 + 45 * 60)));
        assert_eq!(parse_duration("1µs"), Ok(Duration::from_micros(1)));
        assert_eq!(parse_duration(".5m"), Ok(Duration::from_secs(30)));
        assert_eq!(parse_duration("+10ns"), Ok(Duration::from_nanos(10)));

        assert!(matches!(parse_duration("10"), Err(LiteralError::SyntaxError(_))));
        assert!(matches!(parse_duration("10y"), Err(LiteralError::SyntaxError(_))));
        assert!(matches!(parse_duration("-1s"), Err(LiteralError::OutOfRange(_))));
        assert_eq!(parse_duration(""), Err(LiteralError::EmptyStr));
    }
}
