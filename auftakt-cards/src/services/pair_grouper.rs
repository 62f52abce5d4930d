//! Pair grouping of takes into cards
//!
//! Takes are sorted by the dual-number key and grouped two at a time. An odd
//! count leaves the last pair with an empty second slot. Takes are never
//! rotated, reordered or dropped to force an even count.
//!
//! No I/O: this is a pure function over an in-memory list.

use crate::models::AudioFile;
use crate::services::order_key::OrderPolicy;

/// Takes per card
pub const GROUP_SIZE: usize = 2;

/// One card's worth of takes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub first: AudioFile,
    /// `None` only for the last pair of an odd-count directory
    pub second: Option<AudioFile>,
}

impl Pair {
    /// Takes in card order
    pub fn files(&self) -> impl Iterator<Item = &AudioFile> {
        std::iter::once(&self.first).chain(self.second.as_ref())
    }

    /// 1 or 2
    pub fn arity(&self) -> usize {
        1 + usize::from(self.second.is_some())
    }

    pub fn is_complete(&self) -> bool {
        self.second.is_some()
    }
}

/// Sort takes by the dual-number key and pair them in that order
pub fn group(mut files: Vec<AudioFile>) -> Vec<Pair> {
    files.sort_by_cached_key(|f| f.order_key(OrderPolicy::DualNumber));

    let mut pairs = Vec::with_capacity(files.len().div_ceil(GROUP_SIZE));
    let mut takes = files.into_iter();
    while let Some(first) = takes.next() {
        let second = takes.next();
        pairs.push(Pair { first, second });
    }

    if let Some(last) = pairs.last().filter(|p| !p.is_complete()) {
        tracing::debug!(take = %last.first.raw_name, "Odd take count, last card holds one asset");
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn takes(names: &[&str]) -> Vec<AudioFile> {
        names
            .iter()
            .map(|n| AudioFile::new(PathBuf::from("A").join(n)))
            .collect()
    }

    fn names(pair: &Pair) -> Vec<&str> {
        pair.files().map(|f| f.raw_name.as_str()).collect()
    }

    #[test]
    fn test_odd_count_pads_last_pair() {
        let pairs = group(takes(&["t (2).m4a", "t (1).m4a", "Recording.m4a"]));
        assert_eq!(pairs.len(), 2);
        assert_eq!(names(&pairs[0]), vec!["Recording.m4a", "t (1).m4a"]);
        assert_eq!(names(&pairs[1]), vec!["t (2).m4a"]);
        assert!(pairs[0].is_complete());
        assert!(!pairs[1].is_complete());
        assert_eq!(pairs[1].arity(), 1);
    }

    #[test]
    fn test_even_count_pairs_in_order() {
        let pairs = group(takes(&[
            "Recording (4).m4a",
            "Recording (10).m4a",
            "Recording (2).m4a",
            "Recording (3).m4a",
        ]));
        assert_eq!(pairs.len(), 2);
        assert_eq!(names(&pairs[0]), vec!["Recording (2).m4a", "Recording (3).m4a"]);
        assert_eq!(names(&pairs[1]), vec!["Recording (4).m4a", "Recording (10).m4a"]);
    }

    #[test]
    fn test_flattened_names_use_leading_number_first() {
        let pairs = group(takes(&[
            "0002 B_take (0001).m4a",
            "0001 A_take (0002).m4a",
            "0001 A_take (0001).m4a",
            "0010 C_take (0001).m4a",
        ]));
        assert_eq!(names(&pairs[0]), vec!["0001 A_take (0001).m4a", "0001 A_take (0002).m4a"]);
        assert_eq!(names(&pairs[1]), vec!["0002 B_take (0001).m4a", "0010 C_take (0001).m4a"]);
    }

    #[test]
    fn test_no_take_dropped() {
        for count in 0..9 {
            let files: Vec<String> = (1..=count).map(|i| format!("x ({}).m4a", i)).collect();
            let refs: Vec<&str> = files.iter().map(String::as_str).collect();
            let pairs = group(takes(&refs));
            assert_eq!(pairs.iter().map(Pair::arity).sum::<usize>(), count);
            assert_eq!(pairs.len(), count.div_ceil(2));
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(group(Vec::new()).is_empty());
    }
}
