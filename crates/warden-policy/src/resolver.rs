//! First-match policy resolution.
//!
//! One resolver serves every per-path knob in the pipeline — timeouts, size
//! limits, header overrides. Rules are evaluated in declaration order; the
//! first rule whose optional method filter matches (case-insensitively) and
//! whose pattern matches at the start of the path wins. No match falls back
//! to the caller-supplied default, so resolution is total and never errors
//! at request time.

use crate::error::PolicyError;
use regex::Regex;

/// A single compiled rule carrying an arbitrary value type.
#[derive(Debug, Clone)]
pub struct CompiledRule<T> {
    pattern: Regex,
    method: Option<String>,
    pub value: T,
}

impl<T> CompiledRule<T> {
    /// Compile a rule. The pattern matches like a prefix-anchored regex:
    /// it must match starting at the first byte of the path.
    pub fn new(pattern: &str, method: Option<&str>, value: T) -> Result<Self, PolicyError> {
        let compiled = Regex::new(pattern).map_err(|source| PolicyError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern: compiled,
            method: method.map(|m| m.to_string()),
            value,
        })
    }

    fn matches(&self, path: &str, method: &str) -> bool {
        if let Some(ref m) = self.method {
            if !m.eq_ignore_ascii_case(method) {
                return false;
            }
        }
        self.pattern.find(path).map(|m| m.start() == 0).unwrap_or(false)
    }
}

/// Resolve the effective value for `(path, method)` against an ordered rule
/// list, falling back to `default`.
pub fn resolve<'a, T>(
    rules: &'a [CompiledRule<T>],
    path: &str,
    method: &str,
    default: &'a T,
) -> &'a T {
    rules
        .iter()
        .find(|rule| rule.matches(path, method))
        .map(|rule| &rule.value)
        .unwrap_or(default)
}
