//! Page-level settings read from the attributes a rendered page carries.

/// Visible line count used when the page does not configure one.
pub const DEFAULT_MAX_LINES: usize = 100;

/// Caption prefix used when image positions are shown.
pub const DEFAULT_IMAGE_POSITION_LABEL: &str = "Figure";

/// Element that owns a page attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOwner {
    /// The `<html>` element.
    Root,
    /// The `<body>` element.
    Body,
}

/// The attributes the page template writes for the client-side layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAttribute {
    MaxLines,
    LinesByDefault,
    ShowImagePosition,
    BaseUrl,
}

impl PageAttribute {
    pub const ALL: [PageAttribute; 4] = [
        PageAttribute::MaxLines,
        PageAttribute::LinesByDefault,
        PageAttribute::ShowImagePosition,
        PageAttribute::BaseUrl,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PageAttribute::MaxLines => "data-code",
            PageAttribute::LinesByDefault => "data-lines",
            PageAttribute::ShowImagePosition => "data-figures",
            PageAttribute::BaseUrl => "data-url",
        }
    }

    pub fn owner(self) -> AttributeOwner {
        match self {
            PageAttribute::ShowImagePosition => AttributeOwner::Root,
            _ => AttributeOwner::Body,
        }
    }
}

/// Settings that drive the code-block pipeline and page behaviors.
///
/// Every field has a usable default so a page without any attributes still
/// gets a working (if mostly inactive) layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSettings {
    /// Maximum number of visible lines before a block is clamped.
    pub max_lines: usize,
    /// `Some(false)` hides line numbers on load; `None` leaves the markup alone.
    pub lines_by_default: Option<bool>,
    pub show_image_position: bool,
    pub image_position_label: String,
    /// Site root; links under it are treated as internal.
    pub base_url: String,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            max_lines: DEFAULT_MAX_LINES,
            lines_by_default: None,
            show_image_position: false,
            image_position_label: DEFAULT_IMAGE_POSITION_LABEL.to_string(),
            base_url: String::new(),
        }
    }
}

impl PageSettings {
    /// Build settings from an attribute lookup.
    ///
    /// Missing or malformed values fall back to the defaults; nothing here fails.
    pub fn from_attributes<F>(lookup: F) -> Self
    where
        F: Fn(PageAttribute) -> Option<String>,
    {
        let defaults = Self::default();

        let max_lines = lookup(PageAttribute::MaxLines)
            .and_then(|value| parse_max_lines(&value))
            .unwrap_or(defaults.max_lines);

        let lines_by_default =
            lookup(PageAttribute::LinesByDefault).and_then(|value| parse_boolean(&value));

        let show_image_position = lookup(PageAttribute::ShowImagePosition)
            .and_then(|value| parse_boolean(&value))
            .unwrap_or(defaults.show_image_position);

        let base_url = lookup(PageAttribute::BaseUrl).unwrap_or(defaults.base_url);

        Self {
            max_lines,
            lines_by_default,
            show_image_position,
            base_url,
            ..defaults
        }
    }
}

/// Parse a boolean-like attribute value.
///
/// Only "true" and "false" (any case, surrounding whitespace ignored) count;
/// everything else is treated as unset.
pub fn parse_boolean(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_max_lines(value: &str) -> Option<usize> {
    match value.trim().parse::<usize>() {
        Ok(0) | Err(_) => None,
        Ok(lines) => Some(lines),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(PageAttribute, &str)]) -> impl Fn(PageAttribute) -> Option<String> {
        let map: HashMap<&'static str, String> = pairs
            .iter()
            .map(|(attr, value)| (attr.name(), value.to_string()))
            .collect();
        move |attr| map.get(attr.name()).cloned()
    }

    #[rstest]
    #[case("true", Some(true))]
    #[case("  TRUE ", Some(true))]
    #[case("False", Some(false))]
    #[case("", None)]
    #[case("yes", None)]
    fn test_parse_boolean(#[case] input: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_boolean(input), expected);
    }

    #[test]
    fn test_empty_page_uses_defaults() {
        let settings = PageSettings::from_attributes(|_| None);
        assert_eq!(settings, PageSettings::default());
        assert_eq!(settings.max_lines, DEFAULT_MAX_LINES);
    }

    #[test]
    fn test_reads_all_attributes() {
        let settings = PageSettings::from_attributes(lookup_from(&[
            (PageAttribute::MaxLines, "20"),
            (PageAttribute::LinesByDefault, "false"),
            (PageAttribute::ShowImagePosition, "true"),
            (PageAttribute::BaseUrl, "https://example.com/"),
        ]));

        assert_eq!(settings.max_lines, 20);
        assert_eq!(settings.lines_by_default, Some(false));
        assert!(settings.show_image_position);
        assert_eq!(settings.base_url, "https://example.com/");
        assert_eq!(settings.image_position_label, "Figure");
    }

    #[rstest]
    #[case("0")]
    #[case("-3")]
    #[case("lots")]
    fn test_invalid_max_lines_falls_back(#[case] raw: &str) {
        let settings =
            PageSettings::from_attributes(lookup_from(&[(PageAttribute::MaxLines, raw)]));
        assert_eq!(settings.max_lines, DEFAULT_MAX_LINES);
    }

    #[test]
    fn test_attribute_owners() {
        assert_eq!(PageAttribute::ShowImagePosition.owner(), AttributeOwner::Root);
        assert_eq!(PageAttribute::MaxLines.owner(), AttributeOwner::Body);
    }
}
