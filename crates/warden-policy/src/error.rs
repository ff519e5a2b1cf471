/// Errors produced while compiling or applying governance policy.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// A configured path pattern is not a valid regular expression.
    #[error("Invalid path pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A JSON body nests deeper than the configured maximum.
    #[error("JSON depth limit exceeded (max {max})")]
    DepthExceeded { max: usize },

    /// A request parameter failed schema validation.
    #[error("Parameter validation failed: {0}")]
    InvalidParameter(String),

    /// Parameters were presented for a path with no declared schema while
    /// strict mode is active.
    #[error("No validation schema declared for '{path}' but parameters present")]
    UndeclaredParameters { path: String },
}
