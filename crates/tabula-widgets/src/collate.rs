//! Locale-style string ordering.
//!
//! Plain `str::cmp` orders by code point, which puts every uppercase letter
//! before every lowercase one, sends accented letters after `z` and
//! scatters punctuation between digits and letters. Users expect dictionary
//! order instead. [`locale_cmp`] follows the shape of the Unicode root
//! collation, working on the canonical decomposition (NFD) of each string:
//!
//! 1. primary: character class (whitespace, punctuation and symbols, digits,
//!    letters), then the case-folded base letter with accents stripped;
//! 2. secondary: at the first letter differing only by accent, the
//!    unaccented one sorts first;
//! 3. tertiary: at the first position differing only by case, lowercase
//!    sorts first;
//! 4. byte order as the final tie-break, so the order is total.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Class {
    Space,
    Symbol,
    Digit,
    Letter,
}

fn class(c: char) -> Class {
    if c.is_whitespace() {
        Class::Space
    } else if c.is_numeric() {
        Class::Digit
    } else if c.is_alphabetic() {
        Class::Letter
    } else {
        Class::Symbol
    }
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn primary(a: char, b: char) -> Ordering {
    class(a).cmp(&class(b)).then_with(|| fold(a).cmp(&fold(b)))
}

/// A base character and the combining marks that follow it.
struct Unit {
    base: char,
    marks: Vec<char>,
}

fn units(s: &str) -> Vec<Unit> {
    let mut out: Vec<Unit> = Vec::new();
    for c in s.nfd() {
        match out.last_mut() {
            Some(unit) if is_combining_mark(c) => unit.marks.push(c),
            _ => out.push(Unit {
                base: c,
                marks: Vec::new(),
            }),
        }
    }
    out
}

/// Compare two strings in dictionary order.
///
/// ```
/// use std::cmp::Ordering;
/// use tabula_widgets::collate::locale_cmp;
///
/// assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
/// assert_eq!(locale_cmp("ann", "Ann"), Ordering::Less);
/// assert_eq!(locale_cmp("Émile", "eve"), Ordering::Less);
/// ```
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let (ua, ub) = (units(a), units(b));

    let by_primary = ua
        .iter()
        .zip(&ub)
        .map(|(x, y)| primary(x.base, y.base))
        .find(|o| o.is_ne())
        .unwrap_or_else(|| ua.len().cmp(&ub.len()));
    if by_primary.is_ne() {
        return by_primary;
    }

    // Same length and same folded bases from here on.
    let by_accent = ua
        .iter()
        .zip(&ub)
        .map(|(x, y)| x.marks.cmp(&y.marks))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal);
    if by_accent.is_ne() {
        return by_accent;
    }

    let by_case = ua
        .iter()
        .zip(&ub)
        .find(|(x, y)| x.base != y.base)
        .map_or(Ordering::Equal, |(x, y)| {
            y.base.is_lowercase().cmp(&x.base.is_lowercase())
        });

    by_case.then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut v: Vec<&str>) -> Vec<&str> {
        v.sort_by(|a, b| locale_cmp(a, b));
        v
    }

    #[test]
    fn case_does_not_split_the_alphabet() {
        assert_eq!(
            sorted(vec!["banana", "Cherry", "apple", "Banana"]),
            vec!["apple", "banana", "Banana", "Cherry"]
        );
    }

    #[test]
    fn prefix_sorts_first() {
        assert_eq!(locale_cmp("Ann", "Anna"), Ordering::Less);
        assert_eq!(locale_cmp("Anna", "Ann"), Ordering::Greater);
    }

    #[test]
    fn punctuation_then_digits_then_letters() {
        assert_eq!(sorted(vec!["b", "1", "_x", "a"]), vec!["_x", "1", "a", "b"]);
    }

    #[test]
    fn non_ascii_letters_fold_case() {
        assert_eq!(locale_cmp("émile", "Émile"), Ordering::Less);
    }

    #[test]
    fn accented_letters_sort_with_their_base_letter() {
        assert_eq!(
            sorted(vec!["Zoe", "Émile", "Adam", "eve"]),
            vec!["Adam", "Émile", "eve", "Zoe"]
        );
        assert_eq!(
            sorted(vec!["resume", "résumé", "rest", "Resume"]),
            vec!["rest", "resume", "Resume", "résumé"]
        );
    }

    #[test]
    fn accent_outranks_case() {
        assert_eq!(locale_cmp("emile", "Émile"), Ordering::Less);
        assert_eq!(locale_cmp("Emile", "émile"), Ordering::Less);
    }

    #[test]
    fn precomposed_and_decomposed_forms_tie_on_letters() {
        // U+00E9 versus e + U+0301: only the byte tie-break separates them.
        assert_ne!(locale_cmp("caf\u{e9}", "cafe\u{301}"), Ordering::Equal);
        assert_eq!(locale_cmp("caf\u{e9}", "cafd"), Ordering::Greater);
        assert_eq!(locale_cmp("caf\u{e9}", "caff"), Ordering::Less);
    }

    #[test]
    fn equal_strings_are_equal() {
        assert_eq!(locale_cmp("Bob", "Bob"), Ordering::Equal);
        assert_eq!(locale_cmp("", ""), Ordering::Equal);
    }
}
