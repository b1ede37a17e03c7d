//! Convenience layer over DynamoDB: semantic expression types compiled to the
//! service grammar, chunked batch writes with bounded backoff, and queries
//! paginated to completion.
//!
//! The entry point is [`Table`], a handle over one table and an injected
//! [`DynamoTransport`]. The transport trait is the test seam; production code
//! uses [`AwsTransport`] over the AWS SDK client.
//!
//! Expression building lives in [`dynokit_core`] and is re-exported here, so
//! most callers only depend on this crate.

pub mod config;
pub mod error;
pub mod marshall;
pub mod stats;
pub mod table;
pub mod transport;

pub use config::{DynamoConfig, RetryMode};
pub use error::{Result, TableError};
pub use marshall::{Item, Record};
pub use stats::QueryStats;
pub use table::{
    BatchOutcome, GetParams, GetRow, QueryPagesSummary, QueryParams, QueryResults, Table,
    TransformError, UpdateParams, UpdateRow, BATCH_WRITE_RETRY_THRESHOLD, MAX_BATCH_WRITE_SIZE,
};
pub use transport::{AwsTransport, DynamoTransport};

pub use dynokit_core::{
    build_update, clean_attribute_name, compile_conditions, compile_expression_map, CompareOp,
    CompiledConditions, CompiledExpression, CondFn, Condition, ConditionKind, ConditionSet,
    ExprMap, ExpressionError, KeyCond, LogicOp, UpdateArtifacts,
};
