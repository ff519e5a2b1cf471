//! Allow-list input sanitization.
//!
//! Strips disallowed markup from string values while keeping their text
//! content, mirroring the strip-mode behavior of the classic allow-list
//! cleaners. Allowed tags survive with only their allowed attributes.
//!
//! JSON bodies are depth-checked BEFORE any cleaning happens so an
//! adversarially nested document is rejected without paying for recursive
//! sanitization of its leaves.

use crate::error::PolicyError;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use warden_configs::SanitizerSettings;

static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("static regex"));

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<[/!]?[a-zA-Z][^>]*>").expect("static regex"));

static TAG_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<\s*(/?)\s*([a-zA-Z][a-zA-Z0-9-]*)").expect("static regex"));

static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([a-zA-Z][a-zA-Z0-9-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>/]+))"#)
        .expect("static regex")
});

/// Allow-list HTML sanitizer.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    allowed_tags: HashSet<String>,
    allowed_attrs: HashMap<String, HashSet<String>>,
}

impl Sanitizer {
    pub fn new(tags: &[String], attrs: &HashMap<String, Vec<String>>) -> Self {
        Self {
            allowed_tags: tags.iter().map(|t| t.to_ascii_lowercase()).collect(),
            allowed_attrs: attrs
                .iter()
                .map(|(tag, names)| {
                    (
                        tag.to_ascii_lowercase(),
                        names.iter().map(|n| n.to_ascii_lowercase()).collect(),
                    )
                })
                .collect(),
        }
    }

    pub fn from_settings(settings: &SanitizerSettings) -> Self {
        Self::new(&settings.allowed_tags, &settings.allowed_attributes)
    }

    /// Clean a single string value: comments removed, disallowed tags
    /// stripped (text content kept), allowed tags rebuilt with only their
    /// allowed attributes.
    pub fn clean(&self, input: &str) -> String {
        let without_comments = COMMENT_RE.replace_all(input, "");
        TAG_RE
            .replace_all(&without_comments, |caps: &Captures| self.rewrite_tag(&caps[0]))
            .into_owned()
    }

    fn rewrite_tag(&self, raw: &str) -> String {
        let (closing, name) = match TAG_NAME_RE.captures(raw) {
            Some(caps) => (!caps[1].is_empty(), caps[2].to_ascii_lowercase()),
            // Declarations (<!doctype ...>) and other non-element markup
            None => return String::new(),
        };

        if !self.allowed_tags.contains(&name) {
            return String::new();
        }

        if closing {
            return format!("</{}>", name);
        }

        let mut rebuilt = format!("<{}", name);
        if let Some(allowed) = self.allowed_attrs.get(&name) {
            for caps in ATTR_RE.captures_iter(raw) {
                let attr = caps[1].to_ascii_lowercase();
                if !allowed.contains(&attr) {
                    continue;
                }
                let value = caps
                    .get(2)
                    .or_else(|| caps.get(3))
                    .or_else(|| caps.get(4))
                    .map(|m| m.as_str())
                    .unwrap_or("");
                rebuilt.push_str(&format!(" {}=\"{}\"", attr, value));
            }
        }
        if raw.trim_end_matches('>').ends_with('/') {
            rebuilt.push_str(" /");
        }
        rebuilt.push('>');
        rebuilt
    }

    /// Clean every value of a flat query-pair list, preserving original key
    /// order and duplicate keys.
    pub fn sanitize_query(&self, pairs: &[(String, String)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(key, value)| (key.clone(), self.clean(value)))
            .collect()
    }

    /// Check nesting depth of a JSON tree against `max`.
    ///
    /// Runs before any sanitization work; deeper structures fail with
    /// [`PolicyError::DepthExceeded`] and the body is rejected outright.
    pub fn check_depth(value: &Value, max: usize) -> Result<(), PolicyError> {
        fn walk(value: &Value, depth: usize, max: usize) -> Result<(), PolicyError> {
            if depth > max {
                return Err(PolicyError::DepthExceeded { max });
            }
            match value {
                Value::Object(map) => {
                    for child in map.values() {
                        walk(child, depth + 1, max)?;
                    }
                }
                Value::Array(items) => {
                    for child in items {
                        walk(child, depth + 1, max)?;
                    }
                }
                _ => {}
            }
            Ok(())
        }
        walk(value, 0, max)
    }

    /// Recursively clean every string leaf of a JSON tree.
    ///
    /// Objects and arrays are rebuilt, not mutated, so the result never
    /// aliases the input.
    pub fn sanitize_json(&self, value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, child)| (key.clone(), self.sanitize_json(child)))
                    .collect(),
            ),
            Value::Array(items) => {
                Value::Array(items.iter().map(|child| self.sanitize_json(child)).collect())
            }
            Value::String(s) => Value::String(self.clean(s)),
            other => other.clone(),
        }
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::from_settings(&SanitizerSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strips_script_tags_keeps_text() {
        let sanitizer = Sanitizer::default();
        assert_eq!(sanitizer.clean("<script>alert(1)</script>"), "alert(1)");
    }

    #[test]
    fn test_keeps_allowed_tags() {
        let sanitizer = Sanitizer::default();
        assert_eq!(sanitizer.clean("<b>bold</b> and <i>italic</i>"), "<b>bold</b> and <i>italic</i>");
    }

    #[test]
    fn test_filters_disallowed_attributes() {
        let sanitizer = Sanitizer::default();
        let cleaned = sanitizer.clean(r#"<a href="/x" onclick="steal()">link</a>"#);
        assert_eq!(cleaned, r#"<a href="/x">link</a>"#);
    }

    #[test]
    fn test_attributes_only_on_allowed_tags() {
        let sanitizer = Sanitizer::default();
        // <b> is allowed but has no allowed attributes
        assert_eq!(sanitizer.clean(r#"<b class="x">t</b>"#), "<b>t</b>");
    }

    #[test]
    fn test_removes_comments() {
        let sanitizer = Sanitizer::default();
        assert_eq!(sanitizer.clean("a<!-- hidden -->b"), "ab");
    }

    #[test]
    fn test_plain_text_untouched() {
        let sanitizer = Sanitizer::default();
        assert_eq!(sanitizer.clean("1 < 2 and 3 > 2"), "1 < 2 and 3 > 2");
    }

    #[test]
    fn test_query_pairs_preserve_order_and_duplicates() {
        let sanitizer = Sanitizer::default();
        let pairs = vec![
            ("tag".to_string(), "<script>x</script>".to_string()),
            ("q".to_string(), "hello".to_string()),
            ("tag".to_string(), "<b>y</b>".to_string()),
        ];
        let cleaned = sanitizer.sanitize_query(&pairs);
        assert_eq!(cleaned.len(), 3);
        assert_eq!(cleaned[0], ("tag".to_string(), "x".to_string()));
        assert_eq!(cleaned[1], ("q".to_string(), "hello".to_string()));
        assert_eq!(cleaned[2], ("tag".to_string(), "<b>y</b>".to_string()));
    }

    #[test]
    fn test_depth_within_limit_passes() {
        let body = json!({"a": {"b": {"c": [1, 2, 3]}}});
        assert!(Sanitizer::check_depth(&body, 10).is_ok());
    }

    #[test]
    fn test_depth_exceeded_fails() {
        let mut body = json!("leaf");
        for _ in 0..12 {
            body = json!({ "nested": body });
        }
        assert!(matches!(
            Sanitizer::check_depth(&body, 10),
            Err(PolicyError::DepthExceeded { max: 10 })
        ));
    }

    #[test]
    fn test_sanitize_json_cleans_nested_strings() {
        let sanitizer = Sanitizer::default();
        let body = json!({
            "name": "<script>x</script>safe",
            "tags": ["<b>ok</b>", "<iframe>drop</iframe>"],
            "count": 3,
            "flag": true
        });
        let cleaned = sanitizer.sanitize_json(&body);
        assert_eq!(cleaned["name"], "xsafe");
        assert_eq!(cleaned["tags"][0], "<b>ok</b>");
        assert_eq!(cleaned["tags"][1], "drop");
        assert_eq!(cleaned["count"], 3);
        assert_eq!(cleaned["flag"], true);
    }

    #[test]
    fn test_sanitize_json_does_not_alias_input() {
        let sanitizer = Sanitizer::default();
        let body = json!({"v": "<u>x</u>"});
        let cleaned = sanitizer.sanitize_json(&body);
        assert_eq!(body["v"], "<u>x</u>");
        assert_eq!(cleaned["v"], "x");
    }
}
