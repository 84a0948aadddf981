//! Lazy scanning of a format string into segments.
use super::directive::Spec;
use super::escape::decode_escape;

/// One unit of a format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'f> {
    /// Text copied verbatim.
    Literal(&'f str),
    /// A decoded `\x` escape.
    Escape(char),
    /// A `%[flags][width]<token>` directive.
    Directive {
        /// Field token.
        token: char,
        /// Flags and width preceding the token.
        spec: Spec,
    },
}

/// Iterator over the [`Segment`]s of a format string.
///
/// A trailing lone `\`, or a `%` with no token before the end of the string,
/// is yielded as a literal.
///
/// # Examples
///
/// ```
/// use pkgfmt::format::segment::{Segment, Segments};
///
/// let segments: Vec<_> = Segments::new("%n\\t100%%").collect();
/// assert!(matches!(segments[0], Segment::Directive { token: 'n', .. }));
/// assert_eq!(segments[1], Segment::Escape('\t'));
/// assert_eq!(segments[2], Segment::Literal("100"));
/// assert_eq!(segments[3], Segment::Literal("%"));
/// ```
#[derive(Debug, Clone)]
pub struct Segments<'f> {
    rest: &'f str,
}

impl<'f> Segments<'f> {
    /// Start scanning `format`.
    #[must_use]
    pub const fn new(format: &'f str) -> Self {
        Self { rest: format }
    }

    /// Yield everything that is left as a literal.
    fn take_rest(&mut self) -> Segment<'f> {
        let rest = self.rest;
        self.rest = "";
        Segment::Literal(rest)
    }
}

impl<'f> Iterator for Segments<'f> {
    type Item = Segment<'f>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut chars = self.rest.chars();
        match chars.next()? {
            '\\' => match chars.next() {
                Some(c) => {
                    self.rest = chars.as_str();
                    Some(Segment::Escape(decode_escape(c)))
                }
                None => Some(self.take_rest()),
            },
            '%' => {
                let after = chars.as_str();
                let (spec, consumed) = Spec::parse(after);
                let mut tail = after.get(consumed..).unwrap_or_default().chars();
                match tail.next() {
                    None => Some(self.take_rest()),
                    Some('%') => {
                        self.rest = tail.as_str();
                        Some(Segment::Literal("%"))
                    }
                    Some(token) => {
                        self.rest = tail.as_str();
                        Some(Segment::Directive { token, spec })
                    }
                }
            }
            _ => {
                let end = self.rest.find(['\\', '%']).unwrap_or(self.rest.len());
                let (literal, rest) = self.rest.split_at(end);
                self.rest = rest;
                Some(Segment::Literal(literal))
            }
        }
    }
}
