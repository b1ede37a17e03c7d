//! The real transport: `aws_sdk_dynamodb::Client` behind the seam.

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::operation::batch_write_item::{BatchWriteItemInput, BatchWriteItemOutput};
use aws_sdk_dynamodb::operation::delete_item::{DeleteItemInput, DeleteItemOutput};
use aws_sdk_dynamodb::operation::get_item::{GetItemInput, GetItemOutput};
use aws_sdk_dynamodb::operation::put_item::{PutItemInput, PutItemOutput};
use aws_sdk_dynamodb::operation::query::{QueryInput, QueryOutput};
use aws_sdk_dynamodb::operation::update_item::{UpdateItemInput, UpdateItemOutput};
use aws_sdk_dynamodb::Client;

use super::DynamoTransport;
use crate::config::DynamoConfig;
use crate::error::{Result, TableError};

/// Transport backed by the AWS SDK client.
///
/// Constructed once at process startup and shared; the SDK client pools
/// connections and is safe for concurrent reuse. There is no module-level
/// singleton: callers inject this (or a mock) explicitly.
#[derive(Debug, Clone)]
pub struct AwsTransport {
    client: Client,
}

impl AwsTransport {
    /// Wrap an already-configured SDK client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the default AWS credential chain, applying the
    /// retry and timeout settings from `config`.
    pub async fn from_env(config: &DynamoConfig) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .retry_config(config.retry_config())
            .timeout_config(config.timeout_config())
            .load()
            .await;
        Self::new(Client::new(&sdk_config))
    }
}

fn transport_error<E: std::error::Error>(operation: &'static str, err: E) -> TableError {
    TableError::Transport {
        operation,
        message: DisplayErrorContext(err).to_string(),
    }
}

#[async_trait]
impl DynamoTransport for AwsTransport {
    async fn get_item(&self, input: GetItemInput) -> Result<GetItemOutput> {
        self.client
            .get_item()
            .set_table_name(input.table_name)
            .set_key(input.key)
            .set_projection_expression(input.projection_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_consistent_read(input.consistent_read)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .send()
            .await
            .map_err(|e| transport_error("GetItem", e))
    }

    async fn put_item(&self, input: PutItemInput) -> Result<PutItemOutput> {
        self.client
            .put_item()
            .set_table_name(input.table_name)
            .set_item(input.item)
            .set_condition_expression(input.condition_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_return_values(input.return_values)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .send()
            .await
            .map_err(|e| transport_error("PutItem", e))
    }

    async fn delete_item(&self, input: DeleteItemInput) -> Result<DeleteItemOutput> {
        self.client
            .delete_item()
            .set_table_name(input.table_name)
            .set_key(input.key)
            .set_condition_expression(input.condition_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_return_values(input.return_values)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .send()
            .await
            .map_err(|e| transport_error("DeleteItem", e))
    }

    async fn update_item(&self, input: UpdateItemInput) -> Result<UpdateItemOutput> {
        self.client
            .update_item()
            .set_table_name(input.table_name)
            .set_key(input.key)
            .set_update_expression(input.update_expression)
            .set_condition_expression(input.condition_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_return_values(input.return_values)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .send()
            .await
            .map_err(|e| transport_error("UpdateItem", e))
    }

    async fn query(&self, input: QueryInput) -> Result<QueryOutput> {
        self.client
            .query()
            .set_table_name(input.table_name)
            .set_index_name(input.index_name)
            .set_key_condition_expression(input.key_condition_expression)
            .set_filter_expression(input.filter_expression)
            .set_projection_expression(input.projection_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_exclusive_start_key(input.exclusive_start_key)
            .set_limit(input.limit)
            .set_scan_index_forward(input.scan_index_forward)
            .set_consistent_read(input.consistent_read)
            .set_select(input.select)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .send()
            .await
            .map_err(|e| transport_error("Query", e))
    }

    async fn batch_write_item(&self, input: BatchWriteItemInput) -> Result<BatchWriteItemOutput> {
        self.client
            .batch_write_item()
            .set_request_items(input.request_items)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .send()
            .await
            .map_err(|e| transport_error("BatchWriteItem", e))
    }
}
