//! Rendering of multi-valued fields.
use std::borrow::Cow;

use super::RenderSettings;

/// Join list items with the list delimiter.
///
/// An empty list renders as nothing, or `None` in verbose mode. Absent
/// items are skipped without emitting a delimiter.
pub fn render_list<'a, I>(items: I, settings: &RenderSettings) -> String
where
    I: IntoIterator<Item = Option<Cow<'a, str>>>,
{
    let mut items = items.into_iter().peekable();
    if items.peek().is_none() {
        return absent(settings);
    }

    let mut out = String::new();
    let mut first = true;
    for item in items.flatten() {
        if !first {
            out.push_str(&settings.list_delim);
        }
        out.push_str(&item);
        first = false;
    }
    out
}

/// The rendering of a missing value: empty, or `None` in verbose mode.
pub(super) fn absent(settings: &RenderSettings) -> String {
    if settings.verbose {
        "None".to_string()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(values: &[&'static str]) -> Vec<Option<Cow<'static, str>>> {
        values.iter().map(|v| Some(Cow::Borrowed(*v))).collect()
    }

    #[test]
    fn empty_list_renders_nothing() {
        let settings = RenderSettings::default();
        assert_eq!(render_list(items(&[]), &settings), "");
    }

    #[test]
    fn empty_list_renders_none_when_verbose() {
        let settings = RenderSettings {
            verbose: true,
            ..RenderSettings::default()
        };
        assert_eq!(render_list(items(&[]), &settings), "None");
    }

    #[test]
    fn joins_with_delimiter_without_leading_or_trailing() {
        let settings = RenderSettings {
            list_delim: ", ".to_string(),
            ..RenderSettings::default()
        };
        assert_eq!(render_list(items(&["a", "b", "c"]), &settings), "a, b, c");
        assert_eq!(render_list(items(&["only"]), &settings), "only");
    }

    #[test]
    fn default_delimiter_is_two_spaces() {
        let settings = RenderSettings::default();
        assert_eq!(render_list(items(&["GPL", "MIT"]), &settings), "GPL  MIT");
    }

    #[test]
    fn absent_items_are_skipped() {
        let settings = RenderSettings {
            list_delim: "|".to_string(),
            ..RenderSettings::default()
        };
        let list = vec![
            None,
            Some(Cow::Borrowed("a")),
            None,
            Some(Cow::Borrowed("b")),
            None,
        ];
        assert_eq!(render_list(list, &settings), "a|b");
    }
}
