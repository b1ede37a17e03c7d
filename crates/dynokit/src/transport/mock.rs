//! In-memory transport for tests: records every input, replays queued
//! responses in order, and falls back to empty outputs when a queue runs dry.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use aws_sdk_dynamodb::operation::batch_write_item::{BatchWriteItemInput, BatchWriteItemOutput};
use aws_sdk_dynamodb::operation::delete_item::{DeleteItemInput, DeleteItemOutput};
use aws_sdk_dynamodb::operation::get_item::{GetItemInput, GetItemOutput};
use aws_sdk_dynamodb::operation::put_item::{PutItemInput, PutItemOutput};
use aws_sdk_dynamodb::operation::query::{QueryInput, QueryOutput};
use aws_sdk_dynamodb::operation::update_item::{UpdateItemInput, UpdateItemOutput};

use super::DynamoTransport;
use crate::error::Result;

#[derive(Default)]
pub(crate) struct MockTransport {
    pub get_inputs: Mutex<Vec<GetItemInput>>,
    pub put_inputs: Mutex<Vec<PutItemInput>>,
    pub delete_inputs: Mutex<Vec<DeleteItemInput>>,
    pub update_inputs: Mutex<Vec<UpdateItemInput>>,
    pub query_inputs: Mutex<Vec<QueryInput>>,
    pub batch_inputs: Mutex<Vec<BatchWriteItemInput>>,

    pub get_responses: Mutex<VecDeque<Result<GetItemOutput>>>,
    pub query_responses: Mutex<VecDeque<Result<QueryOutput>>>,
    pub batch_responses: Mutex<VecDeque<Result<BatchWriteItemOutput>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_query(&self, response: Result<QueryOutput>) {
        self.query_responses.lock().unwrap().push_back(response);
    }

    pub fn queue_batch(&self, response: Result<BatchWriteItemOutput>) {
        self.batch_responses.lock().unwrap().push_back(response);
    }

    pub fn queue_get(&self, response: Result<GetItemOutput>) {
        self.get_responses.lock().unwrap().push_back(response);
    }

    pub fn query_calls(&self) -> usize {
        self.query_inputs.lock().unwrap().len()
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_inputs.lock().unwrap().len()
    }
}

#[async_trait]
impl DynamoTransport for MockTransport {
    async fn get_item(&self, input: GetItemInput) -> Result<GetItemOutput> {
        self.get_inputs.lock().unwrap().push(input);
        self.get_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(GetItemOutput::builder().build()))
    }

    async fn put_item(&self, input: PutItemInput) -> Result<PutItemOutput> {
        self.put_inputs.lock().unwrap().push(input);
        Ok(PutItemOutput::builder().build())
    }

    async fn delete_item(&self, input: DeleteItemInput) -> Result<DeleteItemOutput> {
        self.delete_inputs.lock().unwrap().push(input);
        Ok(DeleteItemOutput::builder().build())
    }

    async fn update_item(&self, input: UpdateItemInput) -> Result<UpdateItemOutput> {
        self.update_inputs.lock().unwrap().push(input);
        Ok(UpdateItemOutput::builder().build())
    }

    async fn query(&self, input: QueryInput) -> Result<QueryOutput> {
        self.query_inputs.lock().unwrap().push(input);
        self.query_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(QueryOutput::builder().build()))
    }

    async fn batch_write_item(&self, input: BatchWriteItemInput) -> Result<BatchWriteItemOutput> {
        self.batch_inputs.lock().unwrap().push(input);
        self.batch_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(BatchWriteItemOutput::builder().build()))
    }
}
