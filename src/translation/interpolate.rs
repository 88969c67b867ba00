//! `{placeholder}` substitution with HTML escaping.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// Value supplied for a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Unsigned(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Unsigned(u64::from(value))
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        Self::Unsigned(value)
    }
}

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        u64::try_from(value).map_or_else(|_| Self::Text(value.to_string()), Self::Unsigned)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Placeholder values for one translation call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    /// Placeholder name to value.
    values: HashMap<String, ParamValue>,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a placeholder value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

/// Escape the characters that are significant in HTML markup.
///
/// # Examples
/// ```
/// use portfolio_i18n::translation::escape_html;
///
/// assert_eq!(escape_html("<b>\"Tom\" & 'Jerry'</b>"),
///            "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;");
/// ```
#[must_use]
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + text.len() / 4);
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

/// Whether `name` is a valid placeholder identifier.
fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Replace `{name}` tokens in `template` with HTML-escaped parameter values.
///
/// Tokens without a matching parameter, and brace pairs that do not contain
/// an identifier, are copied to the output unchanged. The template is
/// returned as-is (borrowed) when nothing was substituted.
///
/// # Examples
/// ```
/// use portfolio_i18n::translation::{Params, interpolate};
///
/// let params = Params::new().with("name", "<b>Al</b>").with("count", 3);
/// assert_eq!(
///     interpolate("Hello {name}, you have {count} items in {place}", &params),
///     "Hello &lt;b&gt;Al&lt;/b&gt;, you have 3 items in {place}",
/// );
/// ```
#[must_use]
pub fn interpolate<'a>(template: &'a str, params: &Params) -> Cow<'a, str> {
    if params.is_empty() || !template.contains('{') {
        return Cow::Borrowed(template);
    }

    let mut output = String::with_capacity(template.len());
    let mut rest = template;
    let mut replaced = false;

    while let Some(open) = rest.find('{') {
        let (literal, from_open) = rest.split_at(open);
        output.push_str(literal);

        let Some(after_open) = from_open.strip_prefix('{') else {
            break;
        };

        if let Some((name, tail)) = after_open.split_once('}')
            && is_identifier(name)
            && let Some(value) = params.get(name)
        {
            output.push_str(&escape_html(&value.to_string()));
            rest = tail;
            replaced = true;
        } else {
            output.push('{');
            rest = after_open;
        }
    }
    output.push_str(rest);

    if replaced { Cow::Owned(output) } else { Cow::Borrowed(template) }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn sample_params() -> Params {
        Params::new().with("name", "<b>Al</b>").with("count", 3)
    }

    #[googletest::test]
    fn test_interpolate_example_sentence() {
        let result = interpolate("Hello {name}, you have {count} items", &sample_params());

        expect_that!(result.into_owned(), eq("Hello &lt;b&gt;Al&lt;/b&gt;, you have 3 items"));
    }

    #[rstest]
    #[case("Missing {other}", "Missing {other}")]
    #[case("Spaced { name }", "Spaced { name }")]
    #[case("Empty {}", "Empty {}")]
    #[case("Unclosed {name", "Unclosed {name")]
    #[case("Double {{count}}", "Double {3}")]
    #[case("Hyphen {na-me}", "Hyphen {na-me}")]
    #[case("Case {Name}", "Case {Name}")]
    #[case("{count}{count}", "33")]
    #[case("}{count}{", "}3{")]
    fn test_interpolate_edge_cases(#[case] template: &str, #[case] expected: &str) {
        assert_that!(interpolate(template, &sample_params()).into_owned(), eq(expected));
    }

    #[rstest]
    #[case("no tokens at all")]
    #[case("Hello {name}")]
    #[case("")]
    fn test_interpolate_without_params_is_identity(#[case] template: &str) {
        let result = interpolate(template, &Params::new());

        assert!(matches!(result, Cow::Borrowed(t) if t == template));
    }

    #[googletest::test]
    fn test_interpolate_borrows_when_nothing_matches() {
        let result = interpolate("Only {unknown}", &sample_params());

        expect_that!(matches!(result, Cow::Borrowed(_)), eq(true));
    }

    #[rstest]
    #[case("<script>alert(1)</script>", "&lt;script&gt;alert(1)&lt;/script&gt;")]
    #[case("Tom & Jerry", "Tom &amp; Jerry")]
    #[case("\"quoted\"", "&quot;quoted&quot;")]
    #[case("it's", "it&#x27;s")]
    #[case("&amp;", "&amp;amp;")]
    fn test_interpolate_escapes_values(#[case] value: &str, #[case] expected: &str) {
        let params = Params::new().with("v", value);

        let result = interpolate("[{v}]", &params).into_owned();

        let wrapped = format!("[{expected}]");
        assert_that!(result, eq(wrapped.as_str()));
        assert_that!(result, not(contains_substring("<script>")));
    }

    #[googletest::test]
    fn test_template_markup_is_not_escaped() {
        let params = Params::new().with("name", "Al");

        let result = interpolate("<strong>{name}</strong>", &params);

        expect_that!(result.into_owned(), eq("<strong>Al</strong>"));
    }

    #[rstest]
    #[case(ParamValue::from(3), "3")]
    #[case(ParamValue::from(-42_i64), "-42")]
    #[case(ParamValue::from(7_usize), "7")]
    #[case(ParamValue::from(2.5), "2.5")]
    #[case(ParamValue::from(3.0), "3")]
    #[case(ParamValue::from("text"), "text")]
    fn test_param_value_display(#[case] value: ParamValue, #[case] expected: &str) {
        assert_that!(value.to_string(), eq(expected));
    }

    #[rstest]
    #[case("Grüße, {name}!", "Zoë", "Grüße, Zoë!")]
    #[case("Привет, {name}", "Мир", "Привет, Мир")]
    #[case("你好 {name} 👋", "世界🌍", "你好 世界🌍 👋")]
    #[case("{name}\u{301}", "e", "e\u{301}")]
    #[case("👨‍👩‍👧 {name}", "👍🏽", "👨‍👩‍👧 👍🏽")]
    fn test_interpolate_preserves_unicode(
        #[case] template: &str,
        #[case] value: &str,
        #[case] expected: &str,
    ) {
        let params = Params::new().with("name", value);

        assert_that!(interpolate(template, &params).into_owned(), eq(expected));
    }

    #[googletest::test]
    fn test_params_from_iterator() {
        let params: Params = [("a", "1"), ("b", "2")].into_iter().collect();

        expect_that!(params.len(), eq(2));
        expect_that!(params.get("a"), some(eq(&ParamValue::Text("1".to_string()))));
        expect_that!(params.get("c"), none());
    }

    #[googletest::test]
    fn test_escape_html_borrows_clean_text() {
        expect_that!(matches!(escape_html("plain ünïcode"), Cow::Borrowed(_)), eq(true));
    }
}
