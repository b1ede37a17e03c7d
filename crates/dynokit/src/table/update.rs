//! Conditional updates: raw update expressions and shallow attribute updates.

use std::collections::HashMap;

use aws_sdk_dynamodb::operation::update_item::{UpdateItemInput, UpdateItemOutput};
use aws_sdk_dynamodb::types::ReturnValue;
use dynokit_core::{build_update, ConditionSet};
use serde_json::Value;

use super::{none_if_empty, Table};
use crate::error::Result;
use crate::marshall::{self, Record};

/// A fully-specified update expression with its placeholder tables.
#[derive(Debug, Clone, Default)]
pub struct UpdateParams {
    pub update_expression: String,
    pub values: HashMap<String, Value>,
    pub names: HashMap<String, String>,
    pub condition_expression: Option<String>,
}

/// The service response for an update, decoded lazily.
#[derive(Debug)]
pub struct UpdateRow {
    output: UpdateItemOutput,
}

impl UpdateRow {
    /// The raw service response.
    pub fn raw(&self) -> &UpdateItemOutput {
        &self.output
    }

    /// Decode the returned attributes to a plain record.
    ///
    /// Empty when the request asked for no return values.
    pub fn row(&self) -> Result<Record> {
        match self.output.attributes() {
            Some(attributes) => marshall::from_item(attributes.clone()),
            None => Ok(Record::new()),
        }
    }
}

impl Table {
    /// Apply an update expression to one row.
    ///
    /// Use [`Table::shallow_update_row`] unless the update needs document
    /// paths or non-`SET` actions.
    pub async fn update_row(
        &self,
        key: &Record,
        params: UpdateParams,
        return_values: Option<ReturnValue>,
    ) -> Result<UpdateRow> {
        let input = UpdateItemInput::builder()
            .table_name(&self.table_name)
            .set_key(Some(marshall::to_item(key)?))
            .update_expression(&params.update_expression)
            .set_condition_expression(params.condition_expression.clone())
            .set_expression_attribute_names(none_if_empty(params.names.clone()))
            .set_expression_attribute_values(marshall::to_value_table(&params.values)?)
            .set_return_values(return_values)
            .build()?;

        match self.transport.update_item(input).await {
            Ok(output) => Ok(UpdateRow { output }),
            Err(err) => {
                tracing::error!(table = %self.table_name, ?key, ?params, error = %err, "UpdateItem failed");
                Err(err)
            }
        }
    }

    /// Update top-level attributes directly, without document-path support.
    ///
    /// Every field of `row` becomes a `SET` clause; `conditions` guard the
    /// write. Return values default to none.
    pub async fn shallow_update_row(
        &self,
        key: &Record,
        row: &Record,
        conditions: Option<&ConditionSet>,
        return_values: Option<ReturnValue>,
    ) -> Result<UpdateRow> {
        let artifacts = build_update(row, conditions, true)?;
        self.update_row(
            key,
            UpdateParams {
                update_expression: artifacts.update_expression,
                values: artifacts.values,
                names: artifacts.names,
                condition_expression: artifacts.condition_expression,
            },
            Some(return_values.unwrap_or(ReturnValue::None)),
        )
        .await
    }
}
