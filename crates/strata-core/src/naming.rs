//! Display-name parsing and the rename bump

use crate::error::{Result, StrataError};
use crate::random::RandomSource;
use regex::Regex;
use std::sync::LazyLock;

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)([0-9]+)$").expect("name pattern is a valid regex")
});

/// Check that `name` matches `<letters><digits>`.
pub fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

/// Split a display name into its alphabetic prefix and numeric suffix.
pub fn parse_name(name: &str) -> Result<(&str, u64)> {
    let caps = NAME_PATTERN
        .captures(name)
        .ok_or_else(|| StrataError::format(name))?;
    let (Some(prefix), Some(digits)) = (caps.get(1), caps.get(2)) else {
        return Err(StrataError::format(name));
    };
    let suffix = digits
        .as_str()
        .parse::<u64>()
        .map_err(|_| StrataError::format(name))?;
    Ok((prefix.as_str(), suffix))
}

/// Apply one rename bump: re-case the prefix at random and increment the suffix.
///
/// The case is drawn fresh on every call, independent of the current case.
pub fn bump_name(name: &str, rng: &mut RandomSource) -> Result<String> {
    let (prefix, suffix) = parse_name(name)?;
    let next = suffix
        .checked_add(1)
        .ok_or_else(|| StrataError::format(name))?;
    let prefix = if rng.coin() {
        prefix.to_ascii_uppercase()
    } else {
        prefix.to_ascii_lowercase()
    };
    Ok(format!("{prefix}{next}"))
}

/// The `i`-th generator name: `A0, B0, … Z0, BA0, BB0, …` (base 26, `A` as zero).
pub fn nth_name(mut i: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (i % 26) as u8);
        i /= 26;
        if i == 0 {
            break;
        }
    }
    letters.reverse();
    format!("{}0", String::from_utf8_lossy(&letters))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name() {
        assert_eq!(parse_name("A0").unwrap(), ("A", 0));
        assert_eq!(parse_name("bc12").unwrap(), ("bc", 12));
        assert!(parse_name("12").is_err());
        assert!(parse_name("A").is_err());
        assert!(parse_name("A0b").is_err());
        assert!(parse_name("").is_err());
        assert!(parse_name("A-0").is_err());
    }

    #[test]
    fn test_bump_increments_suffix() {
        let mut rng = RandomSource::seeded(7);
        let mut name = "Ab9".to_string();
        for expected in 10..20u64 {
            name = bump_name(&name, &mut rng).unwrap();
            let (prefix, suffix) = parse_name(&name).unwrap();
            assert_eq!(suffix, expected);
            assert!(prefix == "AB" || prefix == "ab", "unexpected prefix {prefix}");
        }
    }

    #[test]
    fn test_bump_rejects_malformed() {
        let mut rng = RandomSource::seeded(1);
        assert!(matches!(
            bump_name("not-a-name", &mut rng),
            Err(StrataError::Format { .. })
        ));
    }

    #[test]
    fn test_bump_overflow() {
        let mut rng = RandomSource::seeded(1);
        let name = format!("A{}", u64::MAX);
        assert!(bump_name(&name, &mut rng).is_err());
    }

    #[test]
    fn test_nth_name() {
        assert_eq!(nth_name(0), "A0");
        assert_eq!(nth_name(25), "Z0");
        assert_eq!(nth_name(26), "BA0");
        assert_eq!(nth_name(27), "BB0");
    }
}
