//! Cost/usage statistics accumulated across query pages.
//!
//! The service reports per-page item counts and consumed capacity; a paginated
//! query sums them field-by-field, including the per-table and per-secondary-
//! index breakdowns.

use std::collections::HashMap;

use aws_sdk_dynamodb::operation::query::QueryOutput;
use aws_sdk_dynamodb::types::{Capacity, ConsumedCapacity};

/// Usage statistics summed over every page of a paginated query.
#[derive(Debug, Clone, Default)]
pub struct QueryStats {
    pub count: i32,
    pub scanned_count: i32,
    pub consumed_capacity: Option<ConsumedCapacity>,
}

impl QueryStats {
    /// Fold one page's reported statistics into the running totals.
    pub fn absorb(&mut self, output: &QueryOutput) {
        self.count += output.count();
        self.scanned_count += output.scanned_count();

        if let Some(page) = output.consumed_capacity() {
            self.consumed_capacity = Some(match self.consumed_capacity.take() {
                Some(total) => merge_consumed_capacity(&total, page),
                None => page.clone(),
            });
        }
    }
}

fn add_units(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (None, None) => None,
        _ => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
    }
}

fn merge_consumed_capacity(a: &ConsumedCapacity, b: &ConsumedCapacity) -> ConsumedCapacity {
    ConsumedCapacity::builder()
        .set_table_name(
            a.table_name()
                .or_else(|| b.table_name())
                .map(str::to_string),
        )
        .set_capacity_units(add_units(a.capacity_units(), b.capacity_units()))
        .set_read_capacity_units(add_units(a.read_capacity_units(), b.read_capacity_units()))
        .set_write_capacity_units(add_units(
            a.write_capacity_units(),
            b.write_capacity_units(),
        ))
        .set_table(merge_capacity(a.table(), b.table()))
        .set_local_secondary_indexes(merge_index_capacities(
            a.local_secondary_indexes(),
            b.local_secondary_indexes(),
        ))
        .set_global_secondary_indexes(merge_index_capacities(
            a.global_secondary_indexes(),
            b.global_secondary_indexes(),
        ))
        .build()
}

fn merge_capacity(a: Option<&Capacity>, b: Option<&Capacity>) -> Option<Capacity> {
    match (a, b) {
        (None, None) => None,
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (Some(a), Some(b)) => Some(
            Capacity::builder()
                .set_read_capacity_units(add_units(
                    a.read_capacity_units(),
                    b.read_capacity_units(),
                ))
                .set_write_capacity_units(add_units(
                    a.write_capacity_units(),
                    b.write_capacity_units(),
                ))
                .set_capacity_units(add_units(a.capacity_units(), b.capacity_units()))
                .build(),
        ),
    }
}

fn merge_index_capacities(
    a: Option<&HashMap<String, Capacity>>,
    b: Option<&HashMap<String, Capacity>>,
) -> Option<HashMap<String, Capacity>> {
    match (a, b) {
        (None, None) => None,
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (Some(a), Some(b)) => {
            let mut merged = a.clone();
            for (index, capacity) in b {
                let combined = merge_capacity(merged.get(index), Some(capacity));
                if let Some(combined) = combined {
                    merged.insert(index.clone(), combined);
                }
            }
            Some(merged)
        }
    }
}
