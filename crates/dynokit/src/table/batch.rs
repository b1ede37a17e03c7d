//! Chunked batch writes with bounded backoff on unprocessed items.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::future::Future;

use aws_sdk_dynamodb::operation::batch_write_item::{BatchWriteItemInput, BatchWriteItemOutput};
use aws_sdk_dynamodb::types::{DeleteRequest, PutRequest, WriteRequest};
use tokio::time::{sleep, Duration};

use super::Table;
use crate::error::{Result, TableError};
use crate::marshall::{self, Record};

/// DynamoDB's `BatchWriteItem` request-size ceiling.
pub const MAX_BATCH_WRITE_SIZE: usize = 25;

/// Retries granted to one chunk before unprocessed items become fatal.
pub const BATCH_WRITE_RETRY_THRESHOLD: u32 = 10;

/// Error type accepted from per-record transforms.
pub type TransformError = Box<dyn std::error::Error + Send + Sync>;

/// What a batch write accomplished.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Final service response per chunk, after any retries.
    pub responses: Vec<BatchWriteItemOutput>,
    /// Every record actually submitted, post-transform and post-dedupe.
    pub accepted: Vec<Record>,
}

#[derive(Clone, Copy)]
enum WriteMode {
    Put,
    Delete,
}

impl Table {
    /// Write `rows` in chunks of up to [`MAX_BATCH_WRITE_SIZE`].
    pub async fn batch_put(&self, rows: Vec<Record>) -> Result<BatchOutcome> {
        self.run_batch(WriteMode::Put, rows).await
    }

    /// Like [`Table::batch_put`], mapping each row through `transform` first.
    ///
    /// The transform is awaited for every row; `Ok(None)` drops the row,
    /// `Err` aborts the whole call before anything is written.
    pub async fn batch_put_with<S, F, Fut>(&self, rows: Vec<S>, transform: F) -> Result<BatchOutcome>
    where
        S: Debug + Clone,
        F: Fn(S, usize) -> Fut,
        Fut: Future<Output = std::result::Result<Option<Record>, TransformError>>,
    {
        let records = transform_rows(rows, transform).await?;
        self.run_batch(WriteMode::Put, records).await
    }

    /// Delete the rows identified by `keys`, in chunks of up to
    /// [`MAX_BATCH_WRITE_SIZE`]. Duplicate keys collapse to one request.
    pub async fn batch_delete(&self, keys: Vec<Record>) -> Result<BatchOutcome> {
        self.run_batch(WriteMode::Delete, keys).await
    }

    /// Like [`Table::batch_delete`], mapping each row through `transform` to
    /// produce the key.
    pub async fn batch_delete_with<S, F, Fut>(
        &self,
        rows: Vec<S>,
        transform: F,
    ) -> Result<BatchOutcome>
    where
        S: Debug + Clone,
        F: Fn(S, usize) -> Fut,
        Fut: Future<Output = std::result::Result<Option<Record>, TransformError>>,
    {
        let records = transform_rows(rows, transform).await?;
        self.run_batch(WriteMode::Delete, records).await
    }

    async fn run_batch(&self, mode: WriteMode, records: Vec<Record>) -> Result<BatchOutcome> {
        let records = match mode {
            WriteMode::Put => records,
            // Duplicate delete keys in one request are rejected by the
            // service, so collapse them across the whole call.
            WriteMode::Delete => dedupe_records(records)?,
        };
        if records.is_empty() {
            return Ok(BatchOutcome::default());
        }

        let mut requests = Vec::with_capacity(records.len());
        for record in &records {
            requests.push(write_request(mode, record)?);
        }

        let chunks: Vec<&[WriteRequest]> = requests.chunks(MAX_BATCH_WRITE_SIZE).collect();
        tracing::info!(
            table = %self.table_name,
            rows = records.len(),
            chunks = chunks.len(),
            "batch write"
        );

        let mut responses = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            responses.push(self.write_with_backoff(chunk.to_vec()).await?);
        }

        Ok(BatchOutcome {
            responses,
            accepted: records,
        })
    }

    /// Send one chunk, retrying its unprocessed remainder until the service
    /// accepts everything or the retry budget runs out.
    async fn write_with_backoff(&self, requests: Vec<WriteRequest>) -> Result<BatchWriteItemOutput> {
        let mut request_items = HashMap::from([(self.table_name.clone(), requests)]);
        let mut retry_count: u32 = 0;

        loop {
            let input = BatchWriteItemInput::builder()
                .set_request_items(Some(request_items.clone()))
                .build()?;

            let output = match self.transport.batch_write_item(input).await {
                Ok(output) => output,
                Err(err) => {
                    tracing::error!(table = %self.table_name, error = %err, "BatchWriteItem failed");
                    return Err(err);
                }
            };

            let unprocessed = output
                .unprocessed_items()
                .filter(|items| items.values().any(|requests| !requests.is_empty()))
                .cloned();
            match unprocessed {
                None => return Ok(output),
                Some(remainder) => {
                    if retry_count >= BATCH_WRITE_RETRY_THRESHOLD {
                        tracing::error!(
                            table = %self.table_name,
                            retries = retry_count,
                            "batch write retry budget exhausted"
                        );
                        return Err(TableError::BatchWriteExhausted {
                            retries: retry_count,
                        });
                    }
                    let delay = Duration::from_millis(2000 + 12u64.pow(retry_count));
                    tracing::debug!(
                        table = %self.table_name,
                        retry = retry_count,
                        delay_ms = delay.as_millis() as u64,
                        "retrying unprocessed batch items"
                    );
                    sleep(delay).await;
                    request_items = remainder;
                    retry_count += 1;
                }
            }
        }
    }
}

async fn transform_rows<S, F, Fut>(rows: Vec<S>, transform: F) -> Result<Vec<Record>>
where
    S: Debug + Clone,
    F: Fn(S, usize) -> Fut,
    Fut: Future<Output = std::result::Result<Option<Record>, TransformError>>,
{
    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        match transform(row.clone(), index).await {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(source) => {
                tracing::error!(?row, index, error = %source, "batch transform rejected a record");
                return Err(TableError::Predicate { source });
            }
        }
    }
    Ok(records)
}

fn dedupe_records(records: Vec<Record>) -> Result<Vec<Record>> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(records.len());
    for record in records {
        if seen.insert(serde_json::to_string(&record)?) {
            unique.push(record);
        }
    }
    Ok(unique)
}

fn write_request(mode: WriteMode, record: &Record) -> Result<WriteRequest> {
    let request = match mode {
        WriteMode::Put => WriteRequest::builder().put_request(
            PutRequest::builder()
                .set_item(Some(marshall::to_item(record)?))
                .build()?,
        ),
        WriteMode::Delete => WriteRequest::builder().delete_request(
            DeleteRequest::builder()
                .set_key(Some(marshall::to_item(record)?))
                .build()?,
        ),
    };
    Ok(request.build())
}
