//! Single-row reads.

use aws_sdk_dynamodb::operation::get_item::{GetItemInput, GetItemOutput};
use serde::de::DeserializeOwned;

use super::Table;
use crate::error::Result;
use crate::marshall::{self, Record};

/// Optional knobs for a single-row read.
#[derive(Debug, Clone, Default)]
pub struct GetParams {
    /// Attribute names to project; joined with `,` into a projection
    /// expression when present.
    pub projection: Option<Vec<String>>,
    pub consistent_read: Option<bool>,
}

/// A fetched row, decoded lazily.
#[derive(Debug)]
pub struct GetRow {
    output: GetItemOutput,
}

impl GetRow {
    /// The raw service response.
    pub fn raw(&self) -> &GetItemOutput {
        &self.output
    }

    /// Decode the row to a plain record; `None` when the item was absent.
    pub fn row(&self) -> Result<Option<Record>> {
        self.output
            .item()
            .map(|item| marshall::from_item(item.clone()))
            .transpose()
    }

    /// Decode the row to a caller-chosen type.
    pub fn row_as<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.output
            .item()
            .map(|item| marshall::from_item_as(item.clone()))
            .transpose()
    }
}

impl Table {
    /// Fetch one row by key.
    pub async fn get_row(&self, key: &Record, params: GetParams) -> Result<GetRow> {
        let input = GetItemInput::builder()
            .table_name(&self.table_name)
            .set_key(Some(marshall::to_item(key)?))
            .set_projection_expression(params.projection.as_ref().map(|p| p.join(",")))
            .set_consistent_read(params.consistent_read)
            .build()?;

        match self.transport.get_item(input).await {
            Ok(output) => Ok(GetRow { output }),
            Err(err) => {
                tracing::error!(table = %self.table_name, ?key, ?params, error = %err, "GetItem failed");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;
    use aws_sdk_dynamodb::types::AttributeValue;
    use serde_json::json;
    use std::sync::Arc;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_get_row_shapes_projection_and_key() {
        let transport = Arc::new(MockTransport::new());
        let table = Table::new(transport.clone(), "orders");

        table
            .get_row(
                &record(json!({ "pk": "USER#1", "sk": "ORDER#9" })),
                GetParams {
                    projection: Some(vec!["id".to_string(), "total".to_string()]),
                    consistent_read: Some(true),
                },
            )
            .await
            .unwrap();

        let inputs = transport.get_inputs.lock().unwrap();
        let input = &inputs[0];
        assert_eq!(input.table_name.as_deref(), Some("orders"));
        assert_eq!(input.projection_expression.as_deref(), Some("id,total"));
        assert_eq!(input.consistent_read, Some(true));
        let key = input.key.as_ref().unwrap();
        assert_eq!(key["pk"], AttributeValue::S("USER#1".to_string()));
        assert_eq!(key["sk"], AttributeValue::S("ORDER#9".to_string()));
    }

    #[tokio::test]
    async fn test_get_row_decodes_item() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_get(Ok(GetItemOutput::builder()
            .item("id", AttributeValue::S("abc".to_string()))
            .item("total", AttributeValue::N("12".to_string()))
            .build()));
        let table = Table::new(transport.clone(), "orders");

        let row = table
            .get_row(&record(json!({ "pk": "A" })), GetParams::default())
            .await
            .unwrap();

        assert_eq!(
            row.row().unwrap(),
            Some(record(json!({ "id": "abc", "total": 12 })))
        );
    }

    #[tokio::test]
    async fn test_get_row_absent_item_is_none() {
        let transport = Arc::new(MockTransport::new());
        let table = Table::new(transport, "orders");

        let row = table
            .get_row(&record(json!({ "pk": "A" })), GetParams::default())
            .await
            .unwrap();

        assert_eq!(row.row().unwrap(), None);
    }
}
