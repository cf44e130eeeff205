// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Segment comparison based on rpm's rpmvercmp, without tilde/caret handling.

use std::cmp::Ordering;

use crate::{Error, Result, types::Evr};

/// textual epoch values that mean "no epoch".
const EPOCH_SENTINELS: &[&str] = &["(none)", "", "None"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Numeric(&'a str),
    Alpha(&'a str),
}

/// splits a version string into maximal digit and alphabetic runs.
/// every other character is a separator and is dropped.
fn segments(version: &str) -> Vec<Segment<'_>> {
    let mut result = Vec::new();
    let mut rest = version;

    while let Some(c) = rest.chars().next() {
        // only ascii digits form numeric runs; other unicode digits are separators
        if c.is_ascii_digit() {
            let end = run_end(rest, |c| c.is_ascii_digit());
            result.push(Segment::Numeric(&rest[..end]));
            rest = &rest[end..];
        } else if c.is_alphabetic() {
            let end = run_end(rest, char::is_alphabetic);
            result.push(Segment::Alpha(&rest[..end]));
            rest = &rest[end..];
        } else {
            rest = &rest[c.len_utf8()..];
        }
    }

    result
}

fn run_end(s: &str, pred: impl Fn(char) -> bool) -> usize {
    s.char_indices()
        .find(|&(_, c)| !pred(c))
        .map_or(s.len(), |(i, _)| i)
}

/// compares two digit runs by value without parsing them into a fixed-width integer.
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_segment(a: Segment<'_>, b: Segment<'_>) -> Ordering {
    match (a, b) {
        (Segment::Numeric(a), Segment::Numeric(b)) => compare_numeric(a, b),
        (Segment::Alpha(a), Segment::Alpha(b)) => a.cmp(b),
        (Segment::Numeric(_), Segment::Alpha(_)) => Ordering::Greater,
        (Segment::Alpha(_), Segment::Numeric(_)) => Ordering::Less,
    }
}

/// compares two version (or release) strings.
///
/// numeric runs compare by value, alphabetic runs by code point, and a
/// numeric run always outranks an alphabetic one at the same position.
/// when every shared segment is equal the string with more segments wins.
pub fn compare_version_strings(a: &str, b: &str) -> Ordering {
    let left = segments(a);
    let right = segments(b);

    left.iter()
        .zip(&right)
        .map(|(&l, &r)| compare_segment(l, r))
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| left.len().cmp(&right.len()))
}

/// parses an epoch, treating `(none)` and empty values as zero.
pub fn normalize_epoch(epoch: &str) -> Result<u64> {
    let trimmed = epoch.trim();
    if EPOCH_SENTINELS.contains(&trimmed) {
        return Ok(0);
    }
    trimmed
        .parse::<u64>()
        .map_err(|_| Error::invalid_epoch(epoch))
}

/// compares installed against available: epoch, then version, then release.
/// returns `Ordering::Less` when the available build is newer.
pub fn compare_full_version(installed: &Evr, available: &Evr) -> Result<Ordering> {
    let epochs = installed.epoch_value()?.cmp(&available.epoch_value()?);

    Ok(epochs
        .then_with(|| compare_version_strings(&installed.version, &available.version))
        .then_with(|| compare_version_strings(&installed.release, &available.release)))
}

/// returns true if `available` is newer than `installed`.
pub fn is_update_available(installed: &Evr, available: &Evr) -> Result<bool> {
    Ok(compare_full_version(installed, available)? == Ordering::Less)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evr(epoch: &str, version: &str, release: &str) -> Evr {
        Evr::new(epoch, version, release)
    }

    #[test]
    fn test_segments_drop_separators() {
        assert_eq!(
            segments("1.2.3-4.el9"),
            vec![
                Segment::Numeric("1"),
                Segment::Numeric("2"),
                Segment::Numeric("3"),
                Segment::Numeric("4"),
                Segment::Alpha("el"),
                Segment::Numeric("9"),
            ]
        );
        assert_eq!(
            segments("1.2a3"),
            vec![
                Segment::Numeric("1"),
                Segment::Numeric("2"),
                Segment::Alpha("a"),
                Segment::Numeric("3"),
            ]
        );
        assert!(segments("..-_~").is_empty());
    }

    #[test]
    fn test_numeric_runs_compare_by_value() {
        assert_eq!(compare_version_strings("9", "10"), Ordering::Less);
        assert_eq!(compare_version_strings("10", "9"), Ordering::Greater);
        assert_eq!(compare_version_strings("007", "7"), Ordering::Equal);
        assert_eq!(
            compare_version_strings("99999999999999999999999", "100000000000000000000000"),
            Ordering::Less
        );
    }

    #[test]
    fn test_numeric_beats_alpha() {
        assert_eq!(compare_version_strings("1.a", "1.1"), Ordering::Less);
        assert_eq!(compare_version_strings("1.1", "1.a"), Ordering::Greater);
        assert_eq!(compare_version_strings("1.0", "1.zzz"), Ordering::Greater);
    }

    #[test]
    fn test_alpha_runs_compare_lexically() {
        assert_eq!(compare_version_strings("1.0a", "1.0b"), Ordering::Less);
        assert_eq!(compare_version_strings("el8", "el9"), Ordering::Less);
        assert_eq!(compare_version_strings("B", "a"), Ordering::Less);
    }

    #[test]
    fn test_longer_sequence_wins_on_tie() {
        assert_eq!(compare_version_strings("1.0", "1.0.1"), Ordering::Less);
        assert_eq!(compare_version_strings("1.0.1", "1.0"), Ordering::Greater);
        assert_eq!(compare_version_strings("", "0"), Ordering::Less);
    }

    #[test]
    fn test_separators_are_insignificant() {
        assert_eq!(compare_version_strings("1.0", "1_0"), Ordering::Equal);
        assert_eq!(compare_version_strings("1..0", "1.0"), Ordering::Equal);
        assert_eq!(
            compare_version_strings("427.13.1.el9_4", "427.13.1.el9_4"),
            Ordering::Equal
        );
    }

    #[test]
    fn test_non_ascii_digits_are_separators() {
        assert_eq!(segments("1.\u{0663}"), vec![Segment::Numeric("1")]);
        assert_eq!(compare_version_strings("1.\u{0663}", "1"), Ordering::Equal);
    }

    #[test]
    fn test_normalize_epoch_sentinels() {
        assert_eq!(normalize_epoch("(none)").unwrap(), 0);
        assert_eq!(normalize_epoch("").unwrap(), 0);
        assert_eq!(normalize_epoch("0").unwrap(), 0);
        assert_eq!(normalize_epoch(" 2 ").unwrap(), 2);
        assert!(matches!(
            normalize_epoch("abc"),
            Err(Error::InvalidEpoch(_))
        ));
        assert!(normalize_epoch("-1").is_err());
    }

    #[test]
    fn test_compare_full_version_fields_in_order() {
        let base = evr("0", "1.0", "1.el9");
        assert_eq!(
            compare_full_version(&base, &evr("0", "1.0", "2.el9")).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            compare_full_version(&base, &evr("0", "2.0", "1.el9")).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            compare_full_version(&base, &evr("0", "1.0", "1.el9")).unwrap(),
            Ordering::Equal
        );
        assert_eq!(
            compare_full_version(&evr("0", "1.0", "2.el9"), &base).unwrap(),
            Ordering::Greater
        );
    }

    #[test]
    fn test_epoch_dominates_version_and_release() {
        let installed = evr("0", "99.9", "99.el9");
        let available = evr("1", "0.1", "1.el9");
        assert!(is_update_available(&installed, &available).unwrap());
        assert!(!is_update_available(&available, &installed).unwrap());
    }

    #[test]
    fn test_epoch_sentinel_equivalence() {
        let none = evr("(none)", "1.0", "1");
        let empty = evr("", "1.0", "1");
        let zero = evr("0", "1.0", "1");
        assert_eq!(compare_full_version(&none, &zero).unwrap(), Ordering::Equal);
        assert_eq!(compare_full_version(&empty, &zero).unwrap(), Ordering::Equal);
        assert!(is_update_available(&none, &evr("0", "1.0", "2")).unwrap());
    }

    #[test]
    fn test_compare_full_version_is_antisymmetric() {
        let samples = [
            evr("0", "1.0", "1.el9"),
            evr("1", "1.0", "1.el9"),
            evr("0", "1.0a", "1"),
            evr("0", "1.0.1", "1"),
            evr("(none)", "2", "el9"),
            evr("0", "5.14.0", "427.13.1.el9_4"),
            evr("0", "5.14.0", "427.el9"),
        ];
        for a in &samples {
            for b in &samples {
                let ab = compare_full_version(a, b).unwrap();
                let ba = compare_full_version(b, a).unwrap();
                assert_eq!(ab, ba.reverse(), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_invalid_epoch_is_an_error() {
        let bad = evr("x", "1", "1");
        assert!(compare_full_version(&bad, &evr("0", "1", "1")).is_err());
    }
}
