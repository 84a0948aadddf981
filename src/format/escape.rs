//! Backslash escape decoding for format strings and delimiters.

/// Decode the character following a backslash.
///
/// Unrecognized characters decode to themselves, so `\q` yields `q`.
///
/// # Examples
///
/// ```
/// use pkgfmt::format::escape::decode_escape;
///
/// assert_eq!(decode_escape('n'), '\n');
/// assert_eq!(decode_escape('e'), '\x1b');
/// assert_eq!(decode_escape('q'), 'q');
/// ```
#[must_use]
pub const fn decode_escape(c: char) -> char {
    match c {
        'a' => '\x07',
        'b' => '\x08',
        // \e is nonstandard
        'e' => '\x1b',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\x0b',
        '0' => '\0',
        // `\\`, `\"` and everything else map to themselves
        other => other,
    }
}

/// Decode every `\`-escape in a user-supplied delimiter.
///
/// A trailing lone backslash is kept as a literal backslash.
///
/// # Examples
///
/// ```
/// use pkgfmt::format::escape::unescape;
///
/// assert_eq!(unescape(r"\n"), "\n");
/// assert_eq!(unescape(r"a\tb"), "a\tb");
/// assert_eq!(unescape(r"x\"), "x\\");
/// ```
#[must_use]
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(chars.next().map_or('\\', decode_escape));
        } else {
            out.push(c);
        }
    }
    out
}
