//! Natural-order keys for take and directory names
//!
//! Recording apps number takes inconsistently ("Recording.m4a",
//! "Recording (2).m4a", "03 Scene_Take (10).m4a") and filesystem listing order
//! is unspecified, so every ordering decision in the pipeline goes through a key
//! derived from the name alone.
//!
//! **Policies:**
//! - [`OrderPolicy::Parenthetical`]: first integer inside parentheses; names
//!   without one count as take 1
//! - [`OrderPolicy::DualNumber`]: `(leading number, parenthetical number)`,
//!   each defaulting to 0; used on flattened names
//! - [`OrderPolicy::Padded`]: every digit run zero-padded to 4 digits, then
//!   compared as text
//!
//! **Limit:** padding is fixed at 4 digits. Runs of 5 or more digits are left
//! as they are and do not order numerically against shorter runs
//! (`"a10000"` sorts before `"a9999"`). Callers walking user trees report such
//! names with [`exceeds_padding_limit`].

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::cmp::Ordering;

/// Width every digit run is padded to
pub const PAD_WIDTH: usize = 4;

static PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([0-9]+)\)").expect("parenthetical pattern is valid"));

static LEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([0-9]+)").expect("leading-number pattern is valid"));

static DIGIT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("digit-run pattern is valid"));

/// Ordering policy selected by the calling stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderPolicy {
    /// First parenthetical integer, default 1
    Parenthetical,
    /// Leading integer then parenthetical integer, each default 0
    DualNumber,
    /// Zero-padded text comparison
    Padded,
}

/// Leading/parenthetical number pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DualKey {
    pub leading: u64,
    pub parenthetical: u64,
}

impl DualKey {
    pub fn of(name: &str) -> Self {
        Self {
            leading: leading_number(name).unwrap_or(0),
            parenthetical: first_parenthetical(name).unwrap_or(0),
        }
    }
}

/// Padding-normalized comparison key
///
/// Compares the alphanumeric projection (lowercase, punctuation and whitespace
/// dropped, extension excluded) first and the full normalized name second. The
/// projection is what lets `Recording.m4a` (normalized `Recording0001.m4a`) sort
/// before `Recording (2).m4a` (normalized `Recording (0002).m4a`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PaddedKey {
    projection: String,
    normalized: String,
}

impl PaddedKey {
    /// Key for a file name (numberless stems count as ordinal 1)
    pub fn for_file(name: &str) -> Self {
        let normalized = normalize_file_name(name);
        let (stem, _) = split_extension(&normalized);
        Self {
            projection: project(stem),
            normalized,
        }
    }

    /// Key for a directory name (padding only)
    pub fn for_dir(name: &str) -> Self {
        let normalized = normalize_dir_name(name);
        Self {
            projection: project(&normalized),
            normalized,
        }
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

/// Primary key under one policy
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrderKey {
    Parenthetical(u64),
    Dual(DualKey),
    Padded(PaddedKey),
}

/// Total-order sort key: policy key, then padded key, then raw name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey {
    primary: OrderKey,
    fallback: PaddedKey,
    raw: String,
}

impl OrderPolicy {
    /// Comparable key for a file name under this policy
    pub fn key(self, name: &str) -> OrderKey {
        match self {
            OrderPolicy::Parenthetical => OrderKey::Parenthetical(parenthetical_number(name)),
            OrderPolicy::DualNumber => OrderKey::Dual(DualKey::of(name)),
            OrderPolicy::Padded => OrderKey::Padded(PaddedKey::for_file(name)),
        }
    }

    /// Key that breaks policy ties deterministically
    pub fn sort_key(self, name: &str) -> SortKey {
        SortKey {
            primary: self.key(name),
            fallback: PaddedKey::for_file(name),
            raw: name.to_string(),
        }
    }

    pub fn compare(self, a: &str, b: &str) -> Ordering {
        self.sort_key(a).cmp(&self.sort_key(b))
    }
}

/// First parenthetical integer, or 1 when the name has none
///
/// `"audio (12).m4a"` → 12, `"Recording.m4a"` → 1
pub fn parenthetical_number(name: &str) -> u64 {
    first_parenthetical(name).unwrap_or(1)
}

fn first_parenthetical(name: &str) -> Option<u64> {
    PARENTHETICAL
        .captures(name)
        .map(|caps| parse_digits(&caps[1]))
}

fn leading_number(name: &str) -> Option<u64> {
    LEADING.captures(name).map(|caps| parse_digits(&caps[1]))
}

// Runs too long for u64 saturate instead of collapsing to the default
fn parse_digits(digits: &str) -> u64 {
    digits.parse().unwrap_or(u64::MAX)
}

/// Zero-pad every digit run to [`PAD_WIDTH`] digits
pub fn pad_digits(text: &str) -> String {
    DIGIT_RUN
        .replace_all(text, |caps: &Captures| {
            format!("{:0>width$}", &caps[0], width = PAD_WIDTH)
        })
        .into_owned()
}

/// Normalize a directory name: digit runs padded, nothing else changed
pub fn normalize_dir_name(name: &str) -> String {
    pad_digits(name)
}

/// Normalize a file name
///
/// A stem with no digits is take 1 and gets the ordinal appended before
/// padding (`"Recording.m4a"` → `"Recording0001.m4a"`). Only the stem is
/// padded; the extension is kept verbatim (`.mp3` stays `.mp3`).
pub fn normalize_file_name(name: &str) -> String {
    let (stem, ext) = split_extension(name);
    if stem.bytes().any(|b| b.is_ascii_digit()) {
        format!("{}{}", pad_digits(stem), ext)
    } else {
        format!("{}{}", pad_digits(&format!("{}1", stem)), ext)
    }
}

/// Whether a name holds a digit run the fixed padding cannot order
pub fn exceeds_padding_limit(name: &str) -> bool {
    DIGIT_RUN
        .find_iter(name)
        .any(|m| m.as_str().len() > PAD_WIDTH)
}

/// Split `"take (2).m4a"` into `("take (2)", ".m4a")`; dotfiles have no extension
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

fn project(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(policy: OrderPolicy, names: &[&str]) -> Vec<String> {
        let mut names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        names.sort_by_cached_key(|s| policy.sort_key(s));
        names
    }

    #[test]
    fn test_parenthetical_number() {
        assert_eq!(parenthetical_number("audio (12).m4a"), 12);
        assert_eq!(parenthetical_number("audio (3) (7).m4a"), 3);
        assert_eq!(parenthetical_number("Recording.m4a"), 1);
        assert_eq!(parenthetical_number("take (v2).m4a"), 1);
    }

    #[test]
    fn test_parenthetical_increases_regardless_of_length() {
        for n in 1..200u64 {
            let a = format!("a ({}).m4a", n);
            let b = format!("a ({}).m4a", n + 1);
            assert!(OrderPolicy::Parenthetical.key(&a) < OrderPolicy::Parenthetical.key(&b));
            assert!(OrderPolicy::Padded.key(&a) < OrderPolicy::Padded.key(&b));
        }
        assert_eq!(
            OrderPolicy::Parenthetical.compare("a (2).m4a", "a (10).m4a"),
            Ordering::Less
        );
    }

    #[test]
    fn test_recording_is_first_take() {
        let policy = OrderPolicy::Parenthetical;
        assert_eq!(policy.key("Recording.m4a"), policy.key("Recording (1).m4a"));
        assert!(policy.key("Recording.m4a") < policy.key("Recording (2).m4a"));
        assert_eq!(
            sorted(policy, &["Recording (3).m4a", "Recording (2).m4a", "Recording.m4a"]),
            vec!["Recording.m4a", "Recording (2).m4a", "Recording (3).m4a"]
        );
    }

    #[test]
    fn test_recording_first_under_padding() {
        assert_eq!(
            sorted(
                OrderPolicy::Padded,
                &["Recording (10).m4a", "Recording (2).m4a", "Recording.m4a"]
            ),
            vec!["Recording.m4a", "Recording (2).m4a", "Recording (10).m4a"]
        );
    }

    #[test]
    fn test_dual_key_defaults_and_order() {
        assert_eq!(
            DualKey::of("0003 Scene_Take (0012).m4a"),
            DualKey { leading: 3, parenthetical: 12 }
        );
        assert_eq!(DualKey::of("Recording.m4a"), DualKey { leading: 0, parenthetical: 0 });
        assert_eq!(DualKey::of("  7 intro.m4a"), DualKey { leading: 7, parenthetical: 0 });
        assert!(DualKey::of("2_a (9).m4a") < DualKey::of("10_a (1).m4a"));
        assert!(DualKey::of("2_a (1).m4a") < DualKey::of("2_a (9).m4a"));
    }

    #[test]
    fn test_dual_policy_orders_takes() {
        assert_eq!(
            sorted(OrderPolicy::DualNumber, &["t (2).m4a", "t (1).m4a", "Recording.m4a"]),
            vec!["Recording.m4a", "t (1).m4a", "t (2).m4a"]
        );
    }

    #[test]
    fn test_normalize_file_name() {
        assert_eq!(normalize_file_name("Recording.m4a"), "Recording0001.m4a");
        assert_eq!(normalize_file_name("Recording (2).m4a"), "Recording (0002).m4a");
        assert_eq!(normalize_file_name("take 12 (3).m4a"), "take 0012 (0003).m4a");
        assert_eq!(normalize_file_name("Recording.mp3"), "Recording0001.mp3");
        assert_eq!(normalize_file_name("README"), "README0001");
    }

    #[test]
    fn test_normalize_dir_name() {
        assert_eq!(normalize_dir_name("Scene 2"), "Scene 0002");
        assert_eq!(normalize_dir_name("Prologue"), "Prologue");
        assert_eq!(normalize_dir_name("1.10"), "0001.0010");
    }

    #[test]
    fn test_pad_digits_leaves_long_runs() {
        assert_eq!(pad_digits("a12345"), "a12345");
        assert_eq!(pad_digits("a9999"), "a9999");
        assert_eq!(pad_digits("7 and 42"), "0007 and 0042");
    }

    #[test]
    fn test_padding_limit_is_detected() {
        assert!(exceeds_padding_limit("take (10000).m4a"));
        assert!(!exceeds_padding_limit("take (9999).m4a"));
        assert!(!exceeds_padding_limit("Recording.m4a"));
    }

    #[test]
    fn test_directory_keys_natural_order() {
        let mut dirs = vec!["Scene 10", "Scene 2", "Scene 1", "Act 3"];
        dirs.sort_by_cached_key(|d| PaddedKey::for_dir(d));
        assert_eq!(dirs, vec!["Act 3", "Scene 1", "Scene 2", "Scene 10"]);
    }

    #[test]
    fn test_sort_key_is_total() {
        // Equal under the dual policy, still strictly ordered
        let policy = OrderPolicy::DualNumber;
        assert_eq!(policy.key("alpha.m4a"), policy.key("beta.m4a"));
        assert_eq!(policy.compare("alpha.m4a", "beta.m4a"), Ordering::Less);
        assert_eq!(policy.compare("beta.m4a", "alpha.m4a"), Ordering::Greater);
        assert_eq!(policy.compare("alpha.m4a", "alpha.m4a"), Ordering::Equal);
    }

    #[test]
    fn test_key_is_stable() {
        let name = "03 Scene_Take (7).m4a";
        for policy in [OrderPolicy::Parenthetical, OrderPolicy::DualNumber, OrderPolicy::Padded] {
            assert_eq!(policy.key(name), policy.key(name));
        }
    }

    #[test]
    fn test_huge_numbers_saturate() {
        assert_eq!(parenthetical_number("x (99999999999999999999999).m4a"), u64::MAX);
    }
}
