//! Candidate sources: the numeric code space and wordlist files.

use anyhow::{anyhow, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Widest code space accepted; keeps `10^digits` comfortably inside a `u64`.
pub const MAX_DIGITS: u32 = 9;

/// Number of distinct codes with `digits` decimal places.
///
/// `digits` above [`MAX_DIGITS`] is clamped to it.
pub fn keyspace_size(digits: u32) -> u64 {
    10u64.pow(digits.min(MAX_DIGITS))
}

/// Lazily yields every zero-padded code of `digits` places, in ascending order.
///
/// `numeric_codes(4)` produces "0000", "0001", ..., "9999". Like
/// [`keyspace_size`], `digits` is clamped to [`MAX_DIGITS`].
pub fn numeric_codes(digits: u32) -> impl Iterator<Item = String> {
    let digits = digits.min(MAX_DIGITS);
    let width = digits as usize;
    (0..keyspace_size(digits)).map(move |n| format!("{:0width$}", n, width = width))
}

/// Read a wordlist, one candidate per line. Blank lines are skipped and
/// surrounding whitespace trimmed.
pub fn load_wordlist<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let file = File::open(path.as_ref())
        .map_err(|e| anyhow!("Failed to open file '{}': {}", path.as_ref().display(), e))?;
    let reader = BufReader::new(file);
    Ok(reader
        .lines()
        .filter_map(|line| line.ok().map(|s| s.trim().to_string()))
        .filter(|line| !line.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn four_digit_space_is_padded_and_ordered() {
        let codes: Vec<String> = numeric_codes(4).collect();
        assert_eq!(codes.len(), 10_000);
        assert_eq!(codes[0], "0000");
        assert_eq!(codes[7], "0007");
        assert_eq!(codes[42], "0042");
        assert_eq!(codes[9999], "9999");
    }

    #[test]
    fn generation_is_lazy() {
        let mut codes = numeric_codes(MAX_DIGITS);
        assert_eq!(codes.next().as_deref(), Some("000000000"));
        assert_eq!(codes.nth(122).as_deref(), Some("000000123"));
    }

    #[test]
    fn single_digit_space() {
        let codes: Vec<String> = numeric_codes(1).collect();
        assert_eq!(codes, vec!["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"]);
        assert_eq!(keyspace_size(1), 10);
    }

    #[test]
    fn oversized_digit_count_is_clamped() {
        assert_eq!(keyspace_size(20), keyspace_size(MAX_DIGITS));
        assert_eq!(keyspace_size(u32::MAX), 1_000_000_000);

        let mut codes = numeric_codes(25);
        assert_eq!(codes.next().as_deref(), Some("000000000"));
        assert_eq!(codes.size_hint(), (999_999_999, Some(999_999_999)));
    }

    #[test]
    fn wordlist_skips_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  1234  ").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "abcd").unwrap();
        writeln!(file, "   ").unwrap();

        let words = load_wordlist(file.path()).unwrap();
        assert_eq!(words, vec!["1234", "abcd"]);
    }

    #[test]
    fn missing_wordlist_is_an_error() {
        let err = load_wordlist("/nonexistent/wordlist.txt").unwrap_err();
        assert!(err.to_string().contains("Failed to open file"));
    }
}
