//! Per-path query parameter schemas.
//!
//! A [`ParamSchema`] whitelists the parameters a path accepts and the
//! constraints on each. Unknown keys are always an error on schema'd paths.
//! Strict mode extends the refusal to paths with no declared schema: if
//! parameters show up there, the request is rejected rather than silently
//! accepted.

use crate::error::PolicyError;
use regex::Regex;
use std::collections::HashMap;
use warden_configs::ValidationSettings;

/// Runtime validation switches, compiled from settings.
#[derive(Debug, Clone)]
pub struct ValidationPolicy {
    pub enabled: bool,
    pub strict_mode: bool,
    pub excluded_paths: Vec<String>,
    pub max_json_depth: usize,
}

impl From<&ValidationSettings> for ValidationPolicy {
    fn from(settings: &ValidationSettings) -> Self {
        Self {
            enabled: settings.enabled,
            strict_mode: settings.strict_mode,
            excluded_paths: settings.excluded_paths.clone(),
            max_json_depth: settings.max_json_depth,
        }
    }
}

impl ValidationPolicy {
    pub fn is_excluded(&self, path: &str) -> bool {
        self.excluded_paths.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }
}

/// Constraint set for a single parameter.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Str {
        min_len: Option<usize>,
        max_len: Option<usize>,
        pattern: Option<Regex>,
    },
    Int {
        min: Option<i64>,
        max: Option<i64>,
    },
    Bool,
}

/// A named parameter with its constraints.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn string() -> Self {
        Self {
            required: false,
            kind: FieldKind::Str { min_len: None, max_len: None, pattern: None },
        }
    }

    pub fn int() -> Self {
        Self { required: false, kind: FieldKind::Int { min: None, max: None } }
    }

    pub fn boolean() -> Self {
        Self { required: false, kind: FieldKind::Bool }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn len_range(mut self, min: usize, max: usize) -> Self {
        if let FieldKind::Str { min_len, max_len, .. } = &mut self.kind {
            *min_len = Some(min);
            *max_len = Some(max);
        }
        self
    }

    pub fn pattern(mut self, re: &str) -> Result<Self, PolicyError> {
        let compiled = Regex::new(re).map_err(|source| PolicyError::InvalidPattern {
            pattern: re.to_string(),
            source,
        })?;
        if let FieldKind::Str { pattern, .. } = &mut self.kind {
            *pattern = Some(compiled);
        }
        Ok(self)
    }

    pub fn range(mut self, lo: i64, hi: i64) -> Self {
        if let FieldKind::Int { min, max } = &mut self.kind {
            *min = Some(lo);
            *max = Some(hi);
        }
        self
    }

    fn check(&self, name: &str, raw: &str) -> Result<(), PolicyError> {
        match &self.kind {
            FieldKind::Str { min_len, max_len, pattern } => {
                if let Some(min) = min_len {
                    if raw.chars().count() < *min {
                        return Err(PolicyError::InvalidParameter(format!(
                            "'{}' shorter than {} characters",
                            name, min
                        )));
                    }
                }
                if let Some(max) = max_len {
                    if raw.chars().count() > *max {
                        return Err(PolicyError::InvalidParameter(format!(
                            "'{}' longer than {} characters",
                            name, max
                        )));
                    }
                }
                if let Some(re) = pattern {
                    if !re.is_match(raw) {
                        return Err(PolicyError::InvalidParameter(format!(
                            "'{}' does not match the expected pattern",
                            name
                        )));
                    }
                }
            }
            FieldKind::Int { min, max } => {
                let parsed: i64 = raw.parse().map_err(|_| {
                    PolicyError::InvalidParameter(format!("'{}' is not an integer", name))
                })?;
                if let Some(lo) = min {
                    if parsed < *lo {
                        return Err(PolicyError::InvalidParameter(format!(
                            "'{}' below minimum {}",
                            name, lo
                        )));
                    }
                }
                if let Some(hi) = max {
                    if parsed > *hi {
                        return Err(PolicyError::InvalidParameter(format!(
                            "'{}' above maximum {}",
                            name, hi
                        )));
                    }
                }
            }
            FieldKind::Bool => {
                if !matches!(raw, "true" | "false" | "1" | "0") {
                    return Err(PolicyError::InvalidParameter(format!(
                        "'{}' is not a boolean",
                        name
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Expected-parameters schema for one path.
#[derive(Debug, Clone, Default)]
pub struct ParamSchema {
    fields: HashMap<String, FieldSpec>,
}

impl ParamSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(name.into(), spec);
        self
    }

    /// Validate a decoded parameter list against this schema.
    ///
    /// Unknown keys are an error; constraint violations are errors; missing
    /// required fields are errors. Duplicate keys are validated
    /// individually.
    pub fn validate(&self, pairs: &[(String, String)]) -> Result<(), PolicyError> {
        for (key, value) in pairs {
            match self.fields.get(key) {
                Some(spec) => spec.check(key, value)?,
                None => {
                    return Err(PolicyError::InvalidParameter(format!(
                        "unknown parameter '{}'",
                        key
                    )))
                }
            }
        }
        for (name, spec) in &self.fields {
            if spec.required && !pairs.iter().any(|(key, _)| key == name) {
                return Err(PolicyError::InvalidParameter(format!(
                    "missing required parameter '{}'",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Path → schema mapping consulted by the validation middleware.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, ParamSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, path: impl Into<String>, schema: ParamSchema) -> Self {
        self.schemas.insert(path.into(), schema);
        self
    }

    pub fn get(&self, path: &str) -> Option<&ParamSchema> {
        self.schemas.get(path)
    }

    /// A ready-made pagination schema (page / size / sort_by / order), the
    /// shape most listing endpoints share.
    pub fn pagination_schema() -> ParamSchema {
        ParamSchema::new()
            .field("page", FieldSpec::int().range(1, i64::MAX))
            .field("size", FieldSpec::int().range(1, 100))
            .field(
                "sort_by",
                FieldSpec::string()
                    .pattern("^[a-zA-Z0-9_]+$")
                    .expect("static pattern"),
            )
            .field(
                "order",
                FieldSpec::string().pattern("^(asc|desc)$").expect("static pattern"),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_unknown_parameter_rejected() {
        let schema = SchemaRegistry::pagination_schema();
        let result = schema.validate(&pairs(&[("page", "1"), ("evil", "x")]));
        assert!(matches!(result, Err(PolicyError::InvalidParameter(_))));
    }

    #[test]
    fn test_valid_pagination_passes() {
        let schema = SchemaRegistry::pagination_schema();
        assert!(schema
            .validate(&pairs(&[("page", "2"), ("size", "50"), ("order", "desc")]))
            .is_ok());
    }

    #[test]
    fn test_int_range_enforced() {
        let schema = SchemaRegistry::pagination_schema();
        assert!(schema.validate(&pairs(&[("size", "500")])).is_err());
        assert!(schema.validate(&pairs(&[("size", "abc")])).is_err());
    }

    #[test]
    fn test_string_pattern_enforced() {
        let schema = SchemaRegistry::pagination_schema();
        assert!(schema.validate(&pairs(&[("order", "sideways")])).is_err());
    }

    #[test]
    fn test_required_field_missing() {
        let schema = ParamSchema::new().field("q", FieldSpec::string().required().len_range(1, 100));
        assert!(schema.validate(&pairs(&[])).is_err());
        assert!(schema.validate(&pairs(&[("q", "term")])).is_ok());
    }

    #[test]
    fn test_bool_field() {
        let schema = ParamSchema::new().field("active", FieldSpec::boolean());
        assert!(schema.validate(&pairs(&[("active", "true")])).is_ok());
        assert!(schema.validate(&pairs(&[("active", "maybe")])).is_err());
    }

    #[test]
    fn test_excluded_path_prefixes() {
        let policy = ValidationPolicy::from(&ValidationSettings::default());
        assert!(policy.is_excluded("/docs/index.html"));
        assert!(!policy.is_excluded("/auth/login"));
    }
}
