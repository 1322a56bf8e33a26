//! camelCase / snake_case sub-word boundaries.
//!
//! A *camel start* is the first character of a sub-word: an uppercase letter
//! not preceded by another uppercase letter (or one that begins a capitalised
//! run inside an acronym, `HTML|Parser`), a lowercase letter not preceded by a
//! letter, or a digit not preceded by a digit. A *camel end* is the mirror
//! image looking at the following characters.

use crate::TextSource;
use crate::classify::{is_alpha, is_digit, is_lower, is_upper};

pub fn is_camel_start<T: TextSource + ?Sized>(text: &T, offset: usize) -> bool {
    let Some(cur) = text.char_at(offset) else {
        return false;
    };
    let prev = offset.checked_sub(1).and_then(|p| text.char_at(p));
    let next = text.char_at(offset + 1);
    if is_upper(cur) {
        prev.is_none_or(|p| !is_upper(p)) || next.is_some_and(is_lower)
    } else if is_lower(cur) {
        prev.is_none_or(|p| !is_alpha(p))
    } else if is_digit(cur) {
        prev.is_none_or(|p| !is_digit(p))
    } else {
        false
    }
}

pub fn is_camel_end<T: TextSource + ?Sized>(text: &T, offset: usize) -> bool {
    let Some(cur) = text.char_at(offset) else {
        return false;
    };
    let next = text.char_at(offset + 1);
    if is_upper(cur) {
        match next {
            None => true,
            Some(n) if !is_alpha(n) => true,
            Some(n) => is_upper(n) && text.char_at(offset + 2).is_some_and(is_lower),
        }
    } else if is_lower(cur) {
        next.is_none_or(|n| !is_lower(n))
    } else if is_digit(cur) {
        next.is_none_or(|n| !is_digit(n))
    } else {
        false
    }
}

/// Scan from one step past `offset` for the `|count|`-th camel start, backwards when
/// `count` is negative. Falls back to the furthest boundary found; `None` when
/// there is no boundary at all in that direction.
pub fn find_next_camel_start<T: TextSource + ?Sized>(
    text: &T,
    offset: usize,
    count: isize,
) -> Option<usize> {
    scan(text, offset, count, is_camel_start::<T>)
}

/// Like [`find_next_camel_start`] for camel ends.
pub fn find_next_camel_end<T: TextSource + ?Sized>(
    text: &T,
    offset: usize,
    count: isize,
) -> Option<usize> {
    scan(text, offset, count, is_camel_end::<T>)
}

fn scan<T: TextSource + ?Sized>(
    text: &T,
    offset: usize,
    count: isize,
    hit: fn(&T, usize) -> bool,
) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let len = text.len_chars();
    let forward = count > 0;
    let mut remaining = count.unsigned_abs();
    let mut found = None;
    let mut pos = offset;
    loop {
        pos = if forward {
            if pos + 1 >= len {
                break;
            }
            pos + 1
        } else {
            match pos.checked_sub(1) {
                Some(p) => p,
                None => break,
            }
        };
        if hit(text, pos) {
            found = Some(pos);
            remaining -= 1;
            if remaining == 0 {
                break;
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Buffer;

    fn buf(s: &str) -> Buffer {
        Buffer::from_str("t", s).unwrap()
    }

    #[test]
    fn starts_and_ends_in_mixed_identifier() {
        let b = buf("parseHTMLDoc2go_now");
        let starts: Vec<usize> = (0..b.len_chars()).filter(|&i| is_camel_start(&b, i)).collect();
        assert_eq!(starts, vec![0, 5, 9, 12, 13, 16]);
        let ends: Vec<usize> = (0..b.len_chars()).filter(|&i| is_camel_end(&b, i)).collect();
        assert_eq!(ends, vec![4, 8, 11, 12, 14, 18]);
    }

    #[test]
    fn scan_counts_and_direction() {
        let b = buf("fooBarBaz qux");
        assert_eq!(find_next_camel_start(&b, 0, 1), Some(3));
        assert_eq!(find_next_camel_start(&b, 0, 2), Some(6));
        assert_eq!(find_next_camel_start(&b, 0, 3), Some(10));
        assert_eq!(find_next_camel_start(&b, 7, -1), Some(6));
        assert_eq!(find_next_camel_end(&b, 0, 1), Some(2));
        assert_eq!(find_next_camel_end(&b, 4, 2), Some(8));
    }

    #[test]
    fn scan_falls_back_to_furthest_boundary() {
        let b = buf("fooBar");
        assert_eq!(find_next_camel_start(&b, 0, 5), Some(3));
        assert_eq!(find_next_camel_start(&b, 0, -1), None);
        assert_eq!(find_next_camel_end(&b, 5, 1), None);
    }
}
