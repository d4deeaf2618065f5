//! PHP-style version comparison

use std::cmp::Ordering;

use crate::Operator;

/// Compare two version strings the way PHP's `version_compare` orders them.
///
/// Versions are split into runs of digits and runs of letters. Digit runs
/// compare numerically, letter runs by stability rank
/// (`dev < alpha < beta < RC < number < pl`), and a digit run always beats a
/// letter run in the same position. When one version is a prefix of the
/// other, a trailing number makes the longer one greater while a trailing
/// word is ranked against a number, so `1.0rc1 < 1.0 < 1.0.0 < 1.0pl1`.
pub fn version_compare(a: &str, b: &str) -> Ordering {
    let mut a_iter = PartIter::new(a);
    let mut b_iter = PartIter::new(b);

    loop {
        let cmp = match (a_iter.next(), b_iter.next()) {
            (None, None) => return Ordering::Equal,
            (Some(a_part), Some(b_part)) => compare_part(a_part, b_part),
            (Some(Part::Digits(_)), None) => Ordering::Greater,
            (None, Some(Part::Digits(_))) => Ordering::Less,
            (Some(Part::Word(word)), None) => special_rank(word).cmp(&NUMBER_RANK),
            (None, Some(Part::Word(word))) => NUMBER_RANK.cmp(&special_rank(word)),
        };

        if cmp != Ordering::Equal {
            return cmp;
        }
    }
}

/// Compare `actual` against `required` with the given operator
pub fn compare(actual: &str, operator: Operator, required: &str) -> bool {
    operator.accepts(version_compare(actual, required))
}

/// Rank given to a numeric part when it is compared with a word.
const NUMBER_RANK: i32 = 4;

/// Rank of words that are not a known stability marker.
const UNKNOWN_RANK: i32 = -6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part<'a> {
    Digits(&'a str),
    Word(&'a str),
}

struct PartIter<'a> {
    input: &'a str,
    bytes: &'a [u8],
    index: usize,
}

impl<'a> PartIter<'a> {
    fn new(input: &'a str) -> Self {
        PartIter {
            input,
            bytes: input.as_bytes(),
            index: 0,
        }
    }
}

impl<'a> Iterator for PartIter<'a> {
    type Item = Part<'a>;

    fn next(&mut self) -> Option<Part<'a>> {
        let len = self.bytes.len();
        while self.index < len && !self.bytes[self.index].is_ascii_alphanumeric() {
            self.index += 1;
        }
        if self.index >= len {
            return None;
        }

        let start = self.index;
        let is_digit = self.bytes[start].is_ascii_digit();
        self.index += 1;

        while self.index < len {
            let b = self.bytes[self.index];
            let same_kind = if is_digit {
                b.is_ascii_digit()
            } else {
                b.is_ascii_alphabetic()
            };
            if !same_kind {
                break;
            }
            self.index += 1;
        }

        let text = &self.input[start..self.index];
        Some(if is_digit {
            Part::Digits(text)
        } else {
            Part::Word(text)
        })
    }
}

fn compare_part(a: Part<'_>, b: Part<'_>) -> Ordering {
    match (a, b) {
        (Part::Digits(a), Part::Digits(b)) => compare_digits(a, b),
        (Part::Digits(_), Part::Word(word)) => NUMBER_RANK.cmp(&special_rank(word)),
        (Part::Word(word), Part::Digits(_)) => special_rank(word).cmp(&NUMBER_RANK),
        (Part::Word(a), Part::Word(b)) => special_rank(a).cmp(&special_rank(b)),
    }
}

/// Numeric comparison of two digit runs of any length.
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Stability rank of a word. Matching is by prefix, in the same order PHP
/// checks its special forms, so `development` ranks as `dev`.
fn special_rank(word: &str) -> i32 {
    const FORMS: [(&str, i32); 9] = [
        ("dev", 0),
        ("alpha", 1),
        ("a", 1),
        ("beta", 2),
        ("b", 2),
        ("RC", 3),
        ("rc", 3),
        ("pl", 5),
        ("p", 5),
    ];

    FORMS
        .iter()
        .find(|(form, _)| word.starts_with(form))
        .map(|(_, rank)| *rank)
        .unwrap_or(UNKNOWN_RANK)
}
