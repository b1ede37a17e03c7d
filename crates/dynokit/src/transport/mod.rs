//! Transport seam between request shaping and the network.
//!
//! The trait is kept as minimal and close as possible to the real
//! `aws_sdk_dynamodb::Client`, so the untestable surface stays small and a
//! mock can stand in for it under test.

use async_trait::async_trait;
use aws_sdk_dynamodb::operation::batch_write_item::{BatchWriteItemInput, BatchWriteItemOutput};
use aws_sdk_dynamodb::operation::delete_item::{DeleteItemInput, DeleteItemOutput};
use aws_sdk_dynamodb::operation::get_item::{GetItemInput, GetItemOutput};
use aws_sdk_dynamodb::operation::put_item::{PutItemInput, PutItemOutput};
use aws_sdk_dynamodb::operation::query::{QueryInput, QueryOutput};
use aws_sdk_dynamodb::operation::update_item::{UpdateItemInput, UpdateItemOutput};

use crate::error::Result;

mod aws;
#[cfg(test)]
pub(crate) mod mock;

pub use aws::AwsTransport;

/// The remote key-value service's primitive operations.
///
/// Implementations perform the network call and nothing else; request shaping,
/// pagination and batch retry policy live above this trait.
#[async_trait]
pub trait DynamoTransport: Send + Sync {
    async fn get_item(&self, input: GetItemInput) -> Result<GetItemOutput>;

    async fn put_item(&self, input: PutItemInput) -> Result<PutItemOutput>;

    async fn delete_item(&self, input: DeleteItemInput) -> Result<DeleteItemOutput>;

    async fn update_item(&self, input: UpdateItemInput) -> Result<UpdateItemOutput>;

    async fn query(&self, input: QueryInput) -> Result<QueryOutput>;

    async fn batch_write_item(&self, input: BatchWriteItemInput) -> Result<BatchWriteItemOutput>;
}
