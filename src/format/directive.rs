//! printf-style flag and width modifiers of a `%` directive.

/// Flag characters accepted between `%` and the width.
pub const FLAG_CHARS: &str = "'-+ #0I";

/// Upper bound on a directive width; larger widths are clamped.
pub const MAX_WIDTH: usize = 4096;

/// Parsed flags of a directive.
///
/// Only `-`, `0`, `+` and space change the output. `'`, `#` and `I` are
/// accepted and ignored since they have no effect on strings or on decimal
/// integers in the C locale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Flags {
    /// `-`: pad on the right instead of the left.
    pub left: bool,
    /// `0`: pad integers with zeros.
    pub zero: bool,
    /// `+`: always print a sign on integers.
    pub plus: bool,
    /// ` `: print a space in place of a `+` sign on integers.
    pub space: bool,
}

/// Flags and width attached to a single directive.
///
/// # Examples
///
/// ```
/// use pkgfmt::format::directive::Spec;
///
/// let (spec, consumed) = Spec::parse("-12n");
/// assert_eq!(consumed, 3);
/// assert_eq!(spec.pad("ab"), "ab          ");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spec {
    /// Parsed flags.
    pub flags: Flags,
    /// Minimum field width in characters.
    pub width: Option<usize>,
}

impl Spec {
    /// Parse flags then width from the text following a `%`.
    ///
    /// Returns the spec and the number of bytes consumed; the token is the
    /// character at that offset.
    #[must_use]
    pub fn parse(s: &str) -> (Self, usize) {
        let mut spec = Self::default();
        let mut consumed = 0;

        for c in s.chars() {
            if !FLAG_CHARS.contains(c) {
                break;
            }
            match c {
                '-' => spec.flags.left = true,
                '0' => spec.flags.zero = true,
                '+' => spec.flags.plus = true,
                ' ' => spec.flags.space = true,
                _ => {}
            }
            consumed += 1;
        }

        let digits = s
            .get(consumed..)
            .unwrap_or_default()
            .chars()
            .map_while(|c| c.to_digit(10));
        for digit in digits {
            let value = usize::try_from(digit).unwrap_or(MAX_WIDTH);
            let width = spec.width.unwrap_or(0).saturating_mul(10).saturating_add(value);
            spec.width = Some(width.min(MAX_WIDTH));
            consumed += 1;
        }

        (spec, consumed)
    }

    /// Pad a rendered string to the width with spaces.
    #[must_use]
    pub fn pad(&self, s: &str) -> String {
        let width = self.width.unwrap_or(0);
        if self.flags.left {
            format!("{s:<width$}")
        } else {
            format!("{s:>width$}")
        }
    }

    /// Format an integer honoring sign flags, zero padding and width.
    #[must_use]
    pub fn format_int(&self, n: i64) -> String {
        let sign = if n < 0 {
            "-"
        } else if self.flags.plus {
            "+"
        } else if self.flags.space {
            " "
        } else {
            ""
        };
        let digits = n.unsigned_abs().to_string();
        let width = self.width.unwrap_or(0);

        if self.flags.zero && !self.flags.left {
            let zeros = width.saturating_sub(sign.len() + digits.len());
            format!("{sign}{}{digits}", "0".repeat(zeros))
        } else {
            self.pad(&format!("{sign}{digits}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_spec() {
        let (spec, consumed) = Spec::parse("n");
        assert_eq!(consumed, 0);
        assert_eq!(spec, Spec::default());
    }

    #[test]
    fn parses_flags_then_width() {
        let (spec, consumed) = Spec::parse("-+08v");
        assert_eq!(consumed, 4);
        assert!(spec.flags.left);
        assert!(spec.flags.plus);
        assert!(spec.flags.zero);
        assert_eq!(spec.width, Some(8));
    }

    #[test]
    fn ignored_flags_are_consumed() {
        let (spec, consumed) = Spec::parse("'#I3n");
        assert_eq!(consumed, 4);
        assert_eq!(spec.width, Some(3));
    }

    #[test]
    fn flags_after_width_are_not_consumed() {
        let (_, consumed) = Spec::parse("5-n");
        assert_eq!(consumed, 1);
    }

    #[test]
    fn width_stops_at_non_ascii_digits() {
        let (spec, consumed) = Spec::parse("12\u{0663}n");
        assert_eq!(consumed, 2);
        assert_eq!(spec.width, Some(12));
    }

    #[test]
    fn huge_width_is_clamped() {
        let (spec, _) = Spec::parse("99999999999999999999999n");
        assert_eq!(spec.width, Some(MAX_WIDTH));
    }

    #[test]
    fn pads_right_aligned_by_default() {
        let (spec, _) = Spec::parse("6n");
        assert_eq!(spec.pad("abc"), "   abc");
    }

    #[test]
    fn width_shorter_than_value_does_not_truncate() {
        let (spec, _) = Spec::parse("2n");
        assert_eq!(spec.pad("abcdef"), "abcdef");
    }

    #[test]
    fn zero_flag_does_not_affect_strings() {
        let (spec, _) = Spec::parse("05n");
        assert_eq!(spec.pad("ab"), "   ab");
    }

    #[test]
    fn format_int_variants() {
        assert_eq!(Spec::parse("!").0.format_int(7), "7");
        assert_eq!(Spec::parse("04!").0.format_int(7), "0007");
        assert_eq!(Spec::parse("+4!").0.format_int(7), "  +7");
        assert_eq!(Spec::parse("+04!").0.format_int(7), "+007");
        assert_eq!(Spec::parse(" !").0.format_int(7), " 7");
        assert_eq!(Spec::parse("-04!").0.format_int(7), "7   ");
        assert_eq!(Spec::parse("3!").0.format_int(-2), " -2");
    }
}
