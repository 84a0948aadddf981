//! Byte-size rendering for the `%k` and `%m` directives.
use std::fmt;
use std::str::FromStr;

/// Binary size units, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Bytes.
    B,
    /// Kibibytes.
    K,
    /// Mebibytes.
    M,
    /// Gibibytes.
    G,
    /// Tebibytes.
    T,
    /// Pebibytes.
    P,
    /// Exbibytes.
    E,
    /// Zebibytes.
    Z,
    /// Yobibytes.
    Y,
}

impl Unit {
    /// All units in ascending order.
    pub const ALL: [Self; 9] = [
        Self::B,
        Self::K,
        Self::M,
        Self::G,
        Self::T,
        Self::P,
        Self::E,
        Self::Z,
        Self::Y,
    ];

    /// Display label (`B`, `KiB`, …).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::B => "B",
            Self::K => "KiB",
            Self::M => "MiB",
            Self::G => "GiB",
            Self::T => "TiB",
            Self::P => "PiB",
            Self::E => "EiB",
            Self::Z => "ZiB",
            Self::Y => "YiB",
        }
    }
}

/// How sizes are rendered. Fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeFormat {
    /// Exact byte count, no label.
    #[default]
    Bytes,
    /// Scaled to the largest unit that keeps the magnitude below 1024.
    Auto,
    /// Scaled to a fixed unit.
    Unit(Unit),
}

impl FromStr for SizeFormat {
    type Err = String;

    /// Parse a `--humansize` argument.
    ///
    /// `B` selects exact bytes, `auto` picks a unit per value, any other
    /// unit letter (`K`, `M`, … `Y`) scales to that unit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        let mut chars = s.chars();
        let unit = match (chars.next().map(|c| c.to_ascii_uppercase()), chars.next()) {
            (Some('B'), None) => return Ok(Self::Bytes),
            (Some('K'), None) => Unit::K,
            (Some('M'), None) => Unit::M,
            (Some('G'), None) => Unit::G,
            (Some('T'), None) => Unit::T,
            (Some('P'), None) => Unit::P,
            (Some('E'), None) => Unit::E,
            (Some('Z'), None) => Unit::Z,
            (Some('Y'), None) => Unit::Y,
            _ => return Err(format!("invalid size unit: {s}")),
        };
        Ok(Self::Unit(unit))
    }
}

impl fmt::Display for SizeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes => f.write_str("B"),
            Self::Auto => f.write_str("auto"),
            Self::Unit(unit) => f.write_str(unit.label().get(..1).unwrap_or_default()),
        }
    }
}

/// Scale `bytes` by repeated factors of 1024.
///
/// With a target unit, divides until that unit is reached. Without one,
/// divides until the magnitude is below 1024. Never goes past `YiB`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn humanize(bytes: i64, target: Option<Unit>) -> (f64, Unit) {
    let mut value = bytes as f64;
    let mut unit = Unit::B;

    for next in Unit::ALL.iter().skip(1) {
        match target {
            Some(t) if t == unit => break,
            None if value.abs() < 1024.0 => break,
            _ => {}
        }
        value /= 1024.0;
        unit = *next;
    }

    (value, unit)
}

/// Render a size field according to the run's size format.
///
/// # Examples
///
/// ```
/// use pkgfmt::format::size::{SizeFormat, format_size};
///
/// assert_eq!(format_size(0, SizeFormat::Bytes), "0");
/// assert_eq!(format_size(0, SizeFormat::Auto), "0.00 B");
/// assert_eq!(format_size(1536, SizeFormat::Auto), "1.50 KiB");
/// ```
#[must_use]
pub fn format_size(bytes: i64, format: SizeFormat) -> String {
    let target = match format {
        SizeFormat::Bytes => return bytes.to_string(),
        SizeFormat::Auto => None,
        SizeFormat::Unit(unit) => Some(unit),
    };
    let (value, unit) = humanize(bytes, target);
    format!("{value:.2} {}", unit.label())
}
