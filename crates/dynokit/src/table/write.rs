//! Single-row puts and deletes, optionally guarded by condition expressions.

use aws_sdk_dynamodb::operation::delete_item::{DeleteItemInput, DeleteItemOutput};
use aws_sdk_dynamodb::operation::put_item::{PutItemInput, PutItemOutput};
use dynokit_core::{compile_conditions, ConditionSet};

use super::{none_if_empty, Table};
use crate::error::Result;
use crate::marshall::{self, Record};

impl Table {
    /// Shape a `PutItem` request without sending it.
    ///
    /// Exposed so the compiled condition expression and the typed item can be
    /// inspected in isolation.
    pub fn build_put_input(
        &self,
        row: &Record,
        conditions: Option<&ConditionSet>,
    ) -> Result<PutItemInput> {
        let mut builder = PutItemInput::builder()
            .table_name(&self.table_name)
            .set_item(Some(marshall::to_item(row)?));

        if let Some(set) = conditions {
            let compiled = compile_conditions(set)?;
            builder = builder
                .set_condition_expression(compiled.expression)
                .set_expression_attribute_names(none_if_empty(compiled.names))
                .set_expression_attribute_values(marshall::to_value_table(&compiled.values)?);
        }

        Ok(builder.build()?)
    }

    /// Write one row, replacing any existing row with the same key.
    pub async fn put_row(
        &self,
        row: &Record,
        conditions: Option<&ConditionSet>,
    ) -> Result<PutItemOutput> {
        let input = self.build_put_input(row, conditions)?;
        match self.transport.put_item(input).await {
            Ok(output) => Ok(output),
            Err(err) => {
                tracing::error!(table = %self.table_name, ?row, error = %err, "PutItem failed");
                Err(err)
            }
        }
    }

    /// Delete one row by key.
    pub async fn delete_row(
        &self,
        key: &Record,
        conditions: Option<&ConditionSet>,
    ) -> Result<DeleteItemOutput> {
        let mut builder = DeleteItemInput::builder()
            .table_name(&self.table_name)
            .set_key(Some(marshall::to_item(key)?));

        if let Some(set) = conditions {
            let compiled = compile_conditions(set)?;
            builder = builder
                .set_condition_expression(compiled.expression)
                .set_expression_attribute_names(none_if_empty(compiled.names))
                .set_expression_attribute_values(marshall::to_value_table(&compiled.values)?);
        }

        let input = builder.build()?;
        match self.transport.delete_item(input).await {
            Ok(output) => Ok(output),
            Err(err) => {
                tracing::error!(table = %self.table_name, ?key, error = %err, "DeleteItem failed");
                Err(err)
            }
        }
    }
}
