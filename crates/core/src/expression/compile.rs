//! Compilation of [`ExprMap`] into the three wire artifacts every
//! expression-based operation needs: an expression string, a name-placeholder
//! table and a value-placeholder table.
//!
//! The same algorithm serves key-condition and filter expressions; the caller
//! decides which request field the compiled string is assigned to.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{ExpressionError, Result};
use crate::expression::name::clean_attribute_name;
use crate::expression::types::{ExprMap, KeyCond};

/// A compiled expression plus its placeholder tables.
///
/// Every placeholder referenced by `expression` has an entry in exactly one of
/// the two tables. Name placeholders map back to the original, unsanitized
/// field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledExpression {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, Value>,
}

/// Compile an ordered field → condition map.
///
/// Clauses are joined with the literal ` and `. A null condition value fails
/// with [`ExpressionError::InvalidValue`] and no partial output is returned.
pub fn compile_expression_map(map: &ExprMap) -> Result<CompiledExpression> {
    let mut clauses = Vec::new();
    let mut names = HashMap::new();
    let mut values = HashMap::new();

    for (field, cond) in map.iter() {
        ensure_defined(field, cond)?;

        let key = clean_attribute_name(field);
        let attribute = format!("#{key}");
        let anchor = format!(":{key}");
        names.insert(attribute.clone(), field.clone());

        match cond {
            KeyCond::Eq(value) => {
                clauses.push(format!("{attribute} = {anchor}"));
                values.insert(anchor, value.clone());
            }
            KeyCond::Between { low, high } => {
                let low_anchor = format!(":{key}_low");
                let high_anchor = format!(":{key}_high");
                clauses.push(format!(
                    "{attribute} BETWEEN {low_anchor} AND {high_anchor}"
                ));
                values.insert(low_anchor, low.clone());
                values.insert(high_anchor, high.clone());
            }
            KeyCond::Cmp(op, value) => {
                clauses.push(format!("{attribute} {} {anchor}", op.as_str()));
                values.insert(anchor, value.clone());
            }
        }
    }

    Ok(CompiledExpression {
        expression: clauses.join(" and "),
        names,
        values,
    })
}

fn ensure_defined(field: &str, cond: &KeyCond) -> Result<()> {
    let null = match cond {
        KeyCond::Eq(v) | KeyCond::Cmp(_, v) => v.is_null(),
        KeyCond::Between { low, high } => low.is_null() || high.is_null(),
    };
    if null {
        return Err(ExpressionError::InvalidValue {
            field: field.to_string(),
        });
    }
    Ok(())
}
