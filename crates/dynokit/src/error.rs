use thiserror::Error;

/// Errors surfaced by table operations.
///
/// Failures are logged once at the point of detection with the request
/// context, then propagated unchanged. Nothing is swallowed into a null
/// sentinel: a missing row is `Ok(None)`, a failed call is `Err`.
#[derive(Debug, Error)]
pub enum TableError {
    /// Expression compilation failed before any request was built.
    #[error(transparent)]
    Expression(#[from] dynokit_core::ExpressionError),

    /// The underlying service call failed (throttling, validation,
    /// connectivity). Carries the full error chain from the SDK.
    #[error("{operation} failed: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },

    /// Unprocessed batch items remained after the retry budget was spent.
    #[error("Batch write failed: unprocessed items remained after {retries} retries")]
    BatchWriteExhausted { retries: u32 },

    /// A per-record transform in the batch path failed; the remaining records
    /// of that call are aborted.
    #[error("Record transform failed: {source}")]
    Predicate {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Encoding or decoding the typed wire representation failed.
    #[error("Attribute conversion failed: {0}")]
    Convert(#[from] serde_dynamo::Error),

    /// Canonical serialization failed while deduplicating batch records.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The SDK rejected the assembled request input.
    #[error("Request build failed: {0}")]
    Build(#[from] aws_sdk_dynamodb::error::BuildError),
}

/// Result type for table operations.
pub type Result<T> = std::result::Result<T, TableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_display() {
        let error = TableError::Transport {
            operation: "Query",
            message: "throughput exceeded".to_string(),
        };
        assert_eq!(error.to_string(), "Query failed: throughput exceeded");
    }

    #[test]
    fn test_batch_write_exhausted_display() {
        let error = TableError::BatchWriteExhausted { retries: 10 };
        assert_eq!(
            error.to_string(),
            "Batch write failed: unprocessed items remained after 10 retries"
        );
    }

    #[test]
    fn test_expression_error_converts() {
        let error: TableError = dynokit_core::ExpressionError::InvalidValue {
            field: "id".to_string(),
        }
        .into();
        assert!(matches!(error, TableError::Expression(_)));
    }
}
