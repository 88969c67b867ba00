//! Dotted-key lookup.

use serde_json::Value;

use super::TranslationMap;

/// Default separator between key segments.
pub const DEFAULT_KEY_SEPARATOR: &str = ".";

/// Look up `key` in `map`, splitting it on `separator`.
///
/// Returns `None` for empty keys and keys with empty segments, when any
/// segment is missing, when the walk reaches a non-object before the key is
/// exhausted, or when the key names a group of translations instead of a
/// string leaf. Matching is exact (no case folding,
/// no partial matches).
///
/// # Examples
/// ```
/// use portfolio_i18n::translation::{TranslationMap, resolve};
///
/// let map = TranslationMap::parse(r#"{"nav": {"dashboards": "Dashboards"}}"#).unwrap();
/// assert_eq!(resolve(&map, "nav.dashboards", "."), Some("Dashboards"));
/// assert_eq!(resolve(&map, "nav", "."), None);
/// ```
#[must_use]
pub fn resolve<'a>(map: &'a TranslationMap, key: &str, separator: &str) -> Option<&'a str> {
    if separator.is_empty() || key.split(separator).any(str::is_empty) {
        return None;
    }

    let mut segments = key.split(separator);
    let mut node = map.root().get(segments.next()?)?;

    for segment in segments {
        let Value::Object(children) = node else {
            return None;
        };
        node = children.get(segment)?;
    }

    node.as_str()
}

impl TranslationMap {
    /// Look up a key using the default `.` separator.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        resolve(self, key, DEFAULT_KEY_SEPARATOR)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::{
        fixture,
        rstest,
    };
    use serde_json::json;

    use super::*;

    #[fixture]
    fn map() -> TranslationMap {
        TranslationMap::from_value(json!({
            "nav": {
                "dashboards": "Dashboards",
                "settings": { "profile": { "title": "Profile" } }
            },
            "common": { "save": "Save", "count": 3 },
            "flat.key": "Dotted literal",
            "a": { "": { "b": "hit" }, "x": { "": "trail" } },
            "": { "": "dot", "x": "lead" }
        }))
        .unwrap()
    }

    #[rstest]
    #[case("nav.dashboards", Some("Dashboards"))]
    #[case("nav.settings.profile.title", Some("Profile"))]
    #[case("common.save", Some("Save"))]
    // Groups are not leaves
    #[case("nav", None)]
    #[case("nav.settings", None)]
    // Missing segments
    #[case("nav.missing", None)]
    #[case("missing", None)]
    #[case("common.save.extra", None)]
    // Exact matching only
    #[case("NAV.dashboards", None)]
    #[case("nav.dash", None)]
    // Non-string leaves are not translations
    #[case("common.count", None)]
    // Keys containing the separator cannot be addressed
    #[case("flat.key", None)]
    // Empty segments never match, even when the map has "" keys
    #[case("", None)]
    #[case(".", None)]
    #[case("a..b", None)]
    #[case(".x", None)]
    #[case("a.x.", None)]
    #[case("x.", None)]
    fn test_resolve(map: TranslationMap, #[case] key: &str, #[case] expected: Option<&str>) {
        assert_that!(resolve(&map, key, "."), eq(expected));
    }

    #[rstest]
    fn test_resolve_custom_separator(map: TranslationMap) {
        assert_that!(resolve(&map, "nav:settings:profile:title", ":"), some(eq("Profile")));
        assert_that!(resolve(&map, "nav.dashboards", ":"), none());
    }

    #[rstest]
    fn test_resolve_empty_separator_is_not_found(map: TranslationMap) {
        assert_that!(resolve(&map, "nav.dashboards", ""), none());
    }

    #[rstest]
    fn test_get_uses_dot_separator(map: TranslationMap) {
        assert_that!(map.get("nav.settings.profile.title"), some(eq("Profile")));
    }

    #[googletest::test]
    fn test_resolve_deeply_nested_key() {
        let mut value = json!("leaf");
        let mut key = Vec::new();
        for depth in (0..32).rev() {
            let segment = format!("level{depth}");
            value = Value::Object(serde_json::Map::from_iter([(segment.clone(), value)]));
            key.push(segment);
        }
        key.reverse();
        let map = TranslationMap::from_value(value).unwrap();

        expect_that!(resolve(&map, &key.join("."), "."), some(eq("leaf")));
    }
}
