//! Declared-language detection (`Accept-Language`, browser language lists).

use std::cmp::Reverse;

use super::Locale;

/// Weight assigned to a language range without (or with an unreadable) `q` parameter.
const FULL_QUALITY: u16 = 1000;

/// Normalize a language tag to its primary subtag.
///
/// # Examples
/// ```
/// use portfolio_i18n::locale::normalize_language_tag;
///
/// assert_eq!(normalize_language_tag("de-CH"), "de");
/// assert_eq!(normalize_language_tag("EN_us"), "en");
/// assert_eq!(normalize_language_tag("fr"), "fr");
/// ```
#[must_use]
pub fn normalize_language_tag(tag: &str) -> String {
    let tag = tag.trim();
    let primary = tag.split(['-', '_']).next().unwrap_or(tag);
    primary.to_ascii_lowercase()
}

/// Parse an `Accept-Language` header value into language tags, best first.
///
/// Entries with `q=0` and the `*` wildcard are dropped. Entries with equal
/// weight keep their header order.
#[must_use]
pub fn parse_accept_language(header: &str) -> Vec<String> {
    let mut weighted: Vec<(String, u16)> = header
        .split(',')
        .filter_map(|part| {
            let mut components = part.split(';');
            let tag = components.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }

            let quality = components
                .filter_map(|param| param.trim().strip_prefix("q="))
                .map(|q| parse_quality(q.trim()).unwrap_or(FULL_QUALITY))
                .next()
                .unwrap_or(FULL_QUALITY);

            (quality > 0).then(|| (tag.to_string(), quality))
        })
        .collect();

    weighted.sort_by_key(|(_, quality)| Reverse(*quality));
    weighted.into_iter().map(|(tag, _)| tag).collect()
}

/// Parse an RFC 7231 `qvalue` into thousandths.
fn parse_quality(value: &str) -> Option<u16> {
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    if fraction.len() > 3 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let thousandths = format!("{fraction:0<3}").parse::<u16>().ok()?;
    match whole {
        "0" => Some(thousandths),
        "1" if thousandths == 0 => Some(FULL_QUALITY),
        _ => None,
    }
}

/// Return the first declared language whose primary subtag is supported.
pub fn detect_locale<I, S>(tags: I) -> Option<Locale>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter().find_map(|tag| Locale::from_code(&normalize_language_tag(tag.as_ref())))
}
