//! Decoding of serialized string lists such as `['Go', "Rust"]`.
//!
//! The time series dataset stores each repository's languages as the text
//! of a list literal. Cells are decoded with a small dedicated parser that
//! only understands a bracketed (or parenthesized) sequence of quoted
//! strings; anything else is rejected rather than interpreted.

use std::iter::Peekable;
use std::str::Chars;

/// Decode a serialized language list, returning an empty sequence when the
/// text is not a list of string literals.
///
/// Never fails: row-level decoding problems must not void a whole load.
///
/// # Examples
///
/// ```
/// use stargaze_data::literal::decode_language_list;
///
/// assert_eq!(decode_language_list("['Go', \"Rust\"]"), vec!["Go", "Rust"]);
/// assert_eq!(decode_language_list("('C',)"), vec!["C"]);
/// assert!(decode_language_list("['Go'").is_empty());
/// assert!(decode_language_list("").is_empty());
/// ```
pub fn decode_language_list(text: &str) -> Vec<String> {
    try_decode_language_list(text).unwrap_or_default()
}

/// Decode a serialized language list, returning `None` when the text is not
/// a list of string literals.
///
/// Blank text is treated as a missing cell and decodes to `Some(vec![])`.
///
/// # Examples
///
/// ```
/// use stargaze_data::literal::try_decode_language_list;
///
/// assert_eq!(try_decode_language_list("[]"), Some(vec![]));
/// assert_eq!(try_decode_language_list("   "), Some(vec![]));
/// assert_eq!(try_decode_language_list("[1, 2]"), None);
/// ```
pub fn try_decode_language_list(text: &str) -> Option<Vec<String>> {
    if text.trim().is_empty() {
        return Some(Vec::new());
    }

    let mut chars = text.chars().peekable();
    skip_whitespace(&mut chars);

    let close = match chars.next()? {
        '[' => ']',
        '(' => ')',
        _ => return None,
    };

    let mut items = Vec::new();
    let mut trailing_comma = false;
    loop {
        skip_whitespace(&mut chars);
        match chars.peek().copied()? {
            c if c == close => {
                chars.next();
                break;
            }
            '\'' | '"' => {
                items.push(parse_string(&mut chars)?);
                trailing_comma = false;
            }
            _ => return None,
        }

        skip_whitespace(&mut chars);
        match chars.next()? {
            ',' => trailing_comma = true,
            c if c == close => break,
            _ => return None,
        }
    }

    // A parenthesized single element needs its trailing comma to be a tuple.
    if close == ')' && items.len() == 1 && !trailing_comma {
        return None;
    }

    skip_whitespace(&mut chars);
    if chars.next().is_some() {
        return None;
    }

    Some(items)
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}

fn parse_string(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
    let quote = chars.next()?;
    let mut out = String::new();
    loop {
        match chars.next()? {
            c if c == quote => return Some(out),
            '\n' => return None,
            '\\' => {
                let escaped = chars.next()?;
                match escaped {
                    '\\' => out.push('\\'),
                    '\'' => out.push('\''),
                    '"' => out.push('"'),
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    '0' => out.push('\0'),
                    other => {
                        out.push('\\');
                        out.push(other);
                    }
                }
            }
            c => out.push(c),
        }
    }
}
