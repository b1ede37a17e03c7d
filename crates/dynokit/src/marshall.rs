//! Wrapper over the marshalling collaborator.
//!
//! Plain records are `serde_json` maps; the wire representation is the SDK's
//! `AttributeValue` item map. Conversion in both directions is delegated to
//! `serde_dynamo`, pinned to concrete types here so call sites stay free of
//! turbofish noise. Rust has no `undefined`: a `Null` field encodes to the
//! NULL attribute type, and the expression compiler rejects `Null` wherever a
//! placeholder value is required.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde::de::DeserializeOwned;
use serde_dynamo::aws_sdk_dynamodb_1 as dynamo;
use serde_json::{Map, Value};

use crate::error::Result;

/// A typed wire item: attribute name → tagged attribute value.
pub type Item = HashMap<String, AttributeValue>;

/// A plain record: field name → plain value.
pub type Record = Map<String, Value>;

/// Encode a plain record into a typed wire item.
pub fn to_item(record: &Record) -> Result<Item> {
    let item: Item = dynamo::to_item(record)?;
    Ok(item)
}

/// Decode a typed wire item back into a plain record.
pub fn from_item(item: Item) -> Result<Record> {
    let record: Record = dynamo::from_item(item)?;
    Ok(record)
}

/// Decode a typed wire item into a caller-chosen type.
pub fn from_item_as<T: DeserializeOwned>(item: Item) -> Result<T> {
    let value: T = dynamo::from_item(item)?;
    Ok(value)
}

/// Encode a single plain value.
pub fn to_attribute_value(value: &Value) -> Result<AttributeValue> {
    let attribute: AttributeValue = dynamo::to_attribute_value(value)?;
    Ok(attribute)
}

/// Decode a single typed wire value.
pub fn from_attribute_value(value: AttributeValue) -> Result<Value> {
    let plain: Value = dynamo::from_attribute_value(value)?;
    Ok(plain)
}

/// Encode a compiled value-placeholder table, or `None` when it is empty.
///
/// Requests reject empty `ExpressionAttributeValues` maps, so an empty table
/// must be omitted rather than sent.
pub fn to_value_table(values: &HashMap<String, Value>) -> Result<Option<Item>> {
    if values.is_empty() {
        return Ok(None);
    }
    let mut table = Item::with_capacity(values.len());
    for (anchor, value) in values {
        table.insert(anchor.clone(), to_attribute_value(value)?);
    }
    Ok(Some(table))
}
