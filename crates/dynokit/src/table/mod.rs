//! Table-level operations: single-row reads/writes, conditional updates,
//! paginated queries and chunked batch writes over one table.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::DynamoConfig;
use crate::transport::{AwsTransport, DynamoTransport};

mod batch;
mod get;
mod query;
mod update;
mod write;

pub use batch::{BatchOutcome, TransformError, BATCH_WRITE_RETRY_THRESHOLD, MAX_BATCH_WRITE_SIZE};
pub use get::{GetParams, GetRow};
pub use query::{QueryPagesSummary, QueryParams, QueryResults};
pub use update::{UpdateParams, UpdateRow};

/// Handle to one table, carrying the transport it talks through.
///
/// The transport is injected explicitly; construct it once at startup (or use
/// a mock in tests) and share it across tables.
pub struct Table {
    transport: Arc<dyn DynamoTransport>,
    table_name: String,
}

impl Table {
    /// Create a handle over an existing transport.
    pub fn new(transport: Arc<dyn DynamoTransport>, table_name: impl Into<String>) -> Self {
        Self {
            transport,
            table_name: table_name.into(),
        }
    }

    /// Create a handle from environment configuration.
    ///
    /// Uses the AWS SDK default credential chain and reads the table name from
    /// `DYNAMODB_TABLE_NAME` (defaults to "dynokit").
    pub async fn from_env() -> Self {
        let config = DynamoConfig::from_env();
        let transport = Arc::new(AwsTransport::from_env(&config).await);
        let table_name = config.table_name;
        Self::new(transport, table_name)
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

/// Drop an empty placeholder-name table so it is omitted from the request.
fn none_if_empty(names: HashMap<String, String>) -> Option<HashMap<String, String>> {
    if names.is_empty() {
        None
    } else {
        Some(names)
    }
}
