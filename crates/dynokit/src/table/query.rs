//! Paginated queries.
//!
//! One logical query is driven to completion page by page, sequentially. Pages
//! concatenate in server order; usage statistics sum across pages. Streaming
//! and accumulation are separate entry points so the two modes cannot mix.

use std::collections::HashMap;
use std::future::Future;

use aws_sdk_dynamodb::operation::query::QueryInput;
use aws_sdk_dynamodb::types::ReturnConsumedCapacity;
use dynokit_core::{compile_expression_map, ExprMap};

use super::{none_if_empty, Table};
use crate::error::Result;
use crate::marshall::{self, Item, Record};
use crate::stats::QueryStats;

/// A query request in semantic form.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pub index_name: Option<String>,
    /// Compiled into `KeyConditionExpression`.
    pub key_condition: Option<ExprMap>,
    /// Compiled into `FilterExpression`.
    pub filter: Option<ExprMap>,
    /// Total result-count cap. Also sent as the page limit. Pagination stops
    /// once this many items have accumulated.
    pub limit: Option<i32>,
    pub scan_index_forward: Option<bool>,
    pub consistent_read: Option<bool>,
    /// Caller-supplied starting cursor. When present, exactly one page is
    /// fetched; auto-pagination is the library's concern only when it owns
    /// the cursor.
    pub exclusive_start_key: Option<Item>,
    pub projection: Option<Vec<String>>,
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

/// All pages of a query, concatenated in server order.
#[derive(Debug)]
pub struct QueryResults {
    pub items: Vec<Item>,
    pub last_evaluated_key: Option<Item>,
    pub stats: QueryStats,
}

impl QueryResults {
    /// Decode every accumulated item to a plain record.
    pub fn rows(&self) -> Result<Vec<Record>> {
        self.items
            .iter()
            .map(|item| marshall::from_item(item.clone()))
            .collect()
    }

    /// Decode every accumulated item, applying `transform` to each record.
    pub fn rows_with<T>(&self, transform: impl Fn(Record) -> T) -> Result<Vec<T>> {
        self.items
            .iter()
            .map(|item| marshall::from_item(item.clone()).map(&transform))
            .collect()
    }
}

/// What remains of a streamed query once every page has been handed out.
#[derive(Debug)]
pub struct QueryPagesSummary {
    pub pages: usize,
    pub last_evaluated_key: Option<Item>,
    pub stats: QueryStats,
}

impl Table {
    fn build_query_input(&self, params: &QueryParams) -> Result<QueryInput> {
        let mut names = HashMap::new();
        let mut values = HashMap::new();

        let key_condition_expression = params
            .key_condition
            .as_ref()
            .map(|map| {
                let compiled = compile_expression_map(map)?;
                names.extend(compiled.names);
                values.extend(compiled.values);
                Ok::<_, crate::error::TableError>(compiled.expression)
            })
            .transpose()?;
        let filter_expression = params
            .filter
            .as_ref()
            .map(|map| {
                let compiled = compile_expression_map(map)?;
                names.extend(compiled.names);
                values.extend(compiled.values);
                Ok::<_, crate::error::TableError>(compiled.expression)
            })
            .transpose()?;

        Ok(QueryInput::builder()
            .table_name(&self.table_name)
            .set_index_name(params.index_name.clone())
            .set_key_condition_expression(key_condition_expression)
            .set_filter_expression(filter_expression)
            .set_expression_attribute_names(none_if_empty(names))
            .set_expression_attribute_values(marshall::to_value_table(&values)?)
            .set_limit(params.limit)
            .set_scan_index_forward(params.scan_index_forward)
            .set_consistent_read(params.consistent_read)
            .set_projection_expression(params.projection.as_ref().map(|p| p.join(",")))
            .set_exclusive_start_key(params.exclusive_start_key.clone())
            .set_return_consumed_capacity(params.return_consumed_capacity.clone())
            .build()?)
    }

    /// Run a query to completion, accumulating every page in memory.
    pub async fn query(&self, params: QueryParams) -> Result<QueryResults> {
        let caller_cursor = params.exclusive_start_key.is_some();
        let limit = params.limit;
        let mut input = self.build_query_input(&params)?;

        let mut items: Vec<Item> = Vec::new();
        let mut stats = QueryStats::default();

        loop {
            let output = match self.transport.query(input.clone()).await {
                Ok(output) => output,
                Err(err) => {
                    tracing::error!(table = %self.table_name, ?input, error = %err, "Query failed");
                    return Err(err);
                }
            };

            stats.absorb(&output);
            items.extend(output.items.unwrap_or_default());
            let last_evaluated_key = output.last_evaluated_key;

            let limit_reached = limit.is_some_and(|l| items.len() as i32 >= l);
            match last_evaluated_key {
                Some(cursor) if !caller_cursor && !limit_reached => {
                    tracing::debug!(table = %self.table_name, accumulated = items.len(), "following query cursor");
                    input.exclusive_start_key = Some(cursor);
                }
                cursor => {
                    return Ok(QueryResults {
                        items,
                        last_evaluated_key: cursor,
                        stats,
                    });
                }
            }
        }
    }

    /// Run a query to completion, handing each page's raw items to `on_page`
    /// instead of accumulating them.
    pub async fn query_pages<F, Fut>(
        &self,
        params: QueryParams,
        mut on_page: F,
    ) -> Result<QueryPagesSummary>
    where
        F: FnMut(Vec<Item>) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let caller_cursor = params.exclusive_start_key.is_some();
        let mut input = self.build_query_input(&params)?;

        let mut pages = 0;
        let mut stats = QueryStats::default();

        loop {
            let output = match self.transport.query(input.clone()).await {
                Ok(output) => output,
                Err(err) => {
                    tracing::error!(table = %self.table_name, ?input, error = %err, "Query failed");
                    return Err(err);
                }
            };

            stats.absorb(&output);
            pages += 1;
            on_page(output.items.unwrap_or_default()).await?;
            let last_evaluated_key = output.last_evaluated_key;

            match last_evaluated_key {
                Some(cursor) if !caller_cursor => {
                    input.exclusive_start_key = Some(cursor);
                }
                cursor => {
                    return Ok(QueryPagesSummary {
                        pages,
                        last_evaluated_key: cursor,
                        stats,
                    });
                }
            }
        }
    }
}
