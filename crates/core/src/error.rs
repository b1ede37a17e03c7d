use thiserror::Error;

/// Errors that can occur while compiling expressions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    /// A condition or filter map carried a null value. Null stands in for the
    /// wire protocol's "undefined" and can never be bound to a value
    /// placeholder, so compilation fails before any placeholder is registered.
    #[error("Invalid expression value for field '{field}': value must not be null")]
    InvalidValue { field: String },
}

/// Result type for expression compilation.
pub type Result<T> = std::result::Result<T, ExpressionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_display() {
        let error = ExpressionError::InvalidValue {
            field: "expiresAt".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid expression value for field 'expiresAt': value must not be null"
        );
    }
}
