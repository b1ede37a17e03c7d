//! Condition-expression and update-expression building.
//!
//! A list of discrete conditions compiles into a `ConditionExpression` string;
//! a "new values" record compiles into a `SET`-style `UpdateExpression`. Both
//! share one placeholder-table pair so a single request can carry them
//! together.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::{ExpressionError, Result};
use crate::expression::name::clean_attribute_name;
use crate::expression::types::{CompareOp, CondFn, LogicOp};

/// One discrete condition over a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub key: String,
    pub kind: ConditionKind,
    /// Trailing boolean connector. Positional, not associative: input order
    /// determines textual precedence.
    pub logic_op: Option<LogicOp>,
}

/// How a [`Condition`] renders.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionKind {
    Compare { op: CompareOp, value: Value },
    In(Vec<Value>),
    Between { low: Value, high: Value },
    Func {
        func: CondFn,
        op: Option<CompareOp>,
        value: Option<Value>,
    },
}

impl Condition {
    pub fn compare(key: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            kind: ConditionKind::Compare {
                op,
                value: value.into(),
            },
            logic_op: None,
        }
    }

    pub fn is_in(key: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            key: key.into(),
            kind: ConditionKind::In(values),
            logic_op: None,
        }
    }

    pub fn between(key: impl Into<String>, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            kind: ConditionKind::Between {
                low: low.into(),
                high: high.into(),
            },
            logic_op: None,
        }
    }

    pub fn func(key: impl Into<String>, func: CondFn) -> Self {
        Self {
            key: key.into(),
            kind: ConditionKind::Func {
                func,
                op: None,
                value: None,
            },
            logic_op: None,
        }
    }

    /// One-arg function call shape, e.g. `size(#field) > :fieldXvv`.
    pub fn func_cmp(
        key: impl Into<String>,
        func: CondFn,
        op: CompareOp,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            key: key.into(),
            kind: ConditionKind::Func {
                func,
                op: Some(op),
                value: Some(value.into()),
            },
            logic_op: None,
        }
    }

    /// Append ` AND` after this condition's clause.
    pub fn and(mut self) -> Self {
        self.logic_op = Some(LogicOp::And);
        self
    }

    /// Append ` OR` after this condition's clause.
    pub fn or(mut self) -> Self {
        self.logic_op = Some(LogicOp::Or);
        self
    }

    /// Append ` NOT` after this condition's clause.
    pub fn not(mut self) -> Self {
        self.logic_op = Some(LogicOp::Not);
        self
    }
}

/// Either a compiled condition list or a free-form expression string.
///
/// The free-form variant bypasses compilation entirely; the caller owns
/// placeholder consistency in that case.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionSet {
    Raw(String),
    List(Vec<Condition>),
}

impl From<Vec<Condition>> for ConditionSet {
    fn from(list: Vec<Condition>) -> Self {
        ConditionSet::List(list)
    }
}

impl From<&str> for ConditionSet {
    fn from(raw: &str) -> Self {
        ConditionSet::Raw(raw.to_string())
    }
}

/// A compiled `ConditionExpression` plus its placeholder tables.
///
/// `expression` is `None` when no conditions were supplied, never `Some("")`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledConditions {
    pub expression: Option<String>,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, Value>,
}

/// Compile a [`ConditionSet`] into a condition expression string.
///
/// Clauses render in input order, joined by single spaces, with each
/// condition's trailing `logic_op` (if any) appended to its clause.
pub fn compile_conditions(set: &ConditionSet) -> Result<CompiledConditions> {
    let mut expression = None;
    let mut names = HashMap::new();
    let mut values = HashMap::new();
    append_conditions(set, &mut names, &mut values, &mut |expr| {
        expression = Some(expr);
    })?;
    Ok(CompiledConditions {
        expression,
        names,
        values,
    })
}

fn append_conditions(
    set: &ConditionSet,
    names: &mut HashMap<String, String>,
    values: &mut HashMap<String, Value>,
    sink: &mut dyn FnMut(String),
) -> Result<()> {
    let conditions = match set {
        ConditionSet::Raw(raw) => {
            if !raw.is_empty() {
                sink(raw.clone());
            }
            return Ok(());
        }
        ConditionSet::List(list) => list,
    };

    let mut clauses = Vec::with_capacity(conditions.len());
    for condition in conditions {
        let key = clean_attribute_name(&condition.key);
        let attribute = format!("#{key}");

        let mut clause = match &condition.kind {
            ConditionKind::Compare { op, value } => {
                ensure_defined(&condition.key, value)?;
                values.insert(format!(":{key}Xvv"), value.clone());
                format!("{attribute} {} :{key}Xvv", op.as_str())
            }
            ConditionKind::In(list) => {
                let mut anchors = Vec::with_capacity(list.len());
                for (i, value) in list.iter().enumerate() {
                    ensure_defined(&condition.key, value)?;
                    let anchor = format!(":{key}IN-{i}");
                    values.insert(anchor.clone(), value.clone());
                    anchors.push(anchor);
                }
                format!("({attribute} IN ({}))", anchors.join(", "))
            }
            ConditionKind::Between { low, high } => {
                ensure_defined(&condition.key, low)?;
                ensure_defined(&condition.key, high)?;
                values.insert(format!(":{key}Xaa"), low.clone());
                values.insert(format!(":{key}Xbb"), high.clone());
                format!("({attribute} between :{key}Xaa and :{key}Xbb)")
            }
            ConditionKind::Func { func, op, value } => match (op, value) {
                (Some(op), Some(value)) => {
                    ensure_defined(&condition.key, value)?;
                    values.insert(format!(":{key}Xvv"), value.clone());
                    format!("{}({attribute}) {} :{key}Xvv", func.as_str(), op.as_str())
                }
                _ => format!("{}({attribute})", func.as_str()),
            },
        };
        names.insert(attribute, condition.key.clone());

        if let Some(logic_op) = condition.logic_op {
            clause.push(' ');
            clause.push_str(logic_op.as_str());
        }
        clauses.push(clause);
    }

    if !clauses.is_empty() {
        sink(clauses.join(" "));
    }
    Ok(())
}

fn ensure_defined(field: &str, value: &Value) -> Result<()> {
    if value.is_null() {
        return Err(ExpressionError::InvalidValue {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Compiled update artifacts for an `UpdateItem`-shaped request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateArtifacts {
    pub update_expression: String,
    pub condition_expression: Option<String>,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, Value>,
}

/// Build `SET` update clauses for `row`, optionally guarded by `conditions`.
///
/// With `include_all_fields` every row field becomes a `SET #name = :name`
/// clause. Without it, only row fields whose name also appears as a condition
/// key are emitted; their value placeholders are still registered from the
/// row so the compiled output stays self-consistent.
pub fn build_update(
    row: &Map<String, Value>,
    conditions: Option<&ConditionSet>,
    include_all_fields: bool,
) -> Result<UpdateArtifacts> {
    let mut out = UpdateArtifacts::default();

    if let Some(set) = conditions {
        let mut expression = None;
        append_conditions(set, &mut out.names, &mut out.values, &mut |expr| {
            expression = Some(expr);
        })?;
        out.condition_expression = expression;
    }

    let mut set_clauses = Vec::new();
    for (field, value) in row {
        let key = clean_attribute_name(field);
        let attribute = format!("#{key}");
        if !include_all_fields && !out.names.contains_key(&attribute) {
            continue;
        }
        set_clauses.push(format!("{attribute} = :{key}"));
        out.values.insert(format!(":{key}"), value.clone());
        out.names.insert(attribute, field.clone());
    }

    out.update_expression = format!("SET {}", set_clauses.join(", "));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object literal")
    }

    #[test]
    fn test_conditional_update_artifacts() {
        let conditions = ConditionSet::List(vec![
            Condition::func("id", CondFn::AttributeNotExists).or(),
            Condition::compare("id", CompareOp::Eq, "123"),
        ]);
        let artifacts =
            build_update(&row(json!({ "yo": "John" })), Some(&conditions), true).unwrap();

        assert_eq!(
            artifacts.condition_expression.as_deref(),
            Some("attribute_not_exists(#id) OR #id = :idXvv")
        );
        assert_eq!(artifacts.update_expression, "SET #yo = :yo");
        assert_eq!(artifacts.names["#id"], "id");
        assert_eq!(artifacts.names["#yo"], "yo");
        assert_eq!(artifacts.values[":idXvv"], json!("123"));
        assert_eq!(artifacts.values[":yo"], json!("John"));
        assert_eq!(artifacts.values.len(), 2);
    }

    #[test]
    fn test_bare_function_condition() {
        let compiled = compile_conditions(&ConditionSet::List(vec![Condition::func(
            "id",
            CondFn::AttributeNotExists,
        )]))
        .unwrap();

        assert_eq!(
            compiled.expression.as_deref(),
            Some("attribute_not_exists(#id)")
        );
        assert_eq!(compiled.names["#id"], "id");
        assert!(compiled.values.is_empty());
    }

    #[test]
    fn test_size_function_with_comparison() {
        let compiled = compile_conditions(&ConditionSet::List(vec![Condition::func_cmp(
            "tags",
            CondFn::Size,
            CompareOp::Gt,
            2,
        )]))
        .unwrap();

        assert_eq!(compiled.expression.as_deref(), Some("size(#tags) > :tagsXvv"));
        assert_eq!(compiled.values[":tagsXvv"], json!(2));
    }

    #[test]
    fn test_in_condition_one_placeholder_per_element() {
        let compiled = compile_conditions(&ConditionSet::List(vec![Condition::is_in(
            "status",
            vec![json!("open"), json!("held")],
        )]))
        .unwrap();

        assert_eq!(
            compiled.expression.as_deref(),
            Some("(#status IN (:statusIN-0, :statusIN-1))")
        );
        assert_eq!(compiled.values[":statusIN-0"], json!("open"));
        assert_eq!(compiled.values[":statusIN-1"], json!("held"));
    }

    #[test]
    fn test_between_condition_rendering() {
        let compiled = compile_conditions(&ConditionSet::List(vec![Condition::between(
            "age", 18, 65,
        )]))
        .unwrap();

        assert_eq!(
            compiled.expression.as_deref(),
            Some("(#age between :ageXaa and :ageXbb)")
        );
        assert_eq!(compiled.values[":ageXaa"], json!(18));
        assert_eq!(compiled.values[":ageXbb"], json!(65));
    }

    #[test]
    fn test_raw_expression_passes_through_verbatim() {
        let compiled =
            compile_conditions(&ConditionSet::Raw("attribute_exists(#pk)".to_string())).unwrap();

        assert_eq!(compiled.expression.as_deref(), Some("attribute_exists(#pk)"));
        assert!(compiled.names.is_empty());
        assert!(compiled.values.is_empty());
    }

    #[test]
    fn test_no_conditions_yields_none_not_empty_string() {
        let compiled = compile_conditions(&ConditionSet::List(Vec::new())).unwrap();
        assert_eq!(compiled.expression, None);

        let artifacts = build_update(&row(json!({ "a": 1 })), None, true).unwrap();
        assert_eq!(artifacts.condition_expression, None);
    }

    #[test]
    fn test_null_condition_value_is_rejected() {
        let result = compile_conditions(&ConditionSet::List(vec![Condition::compare(
            "id",
            CompareOp::Eq,
            Value::Null,
        )]));
        assert!(matches!(
            result,
            Err(ExpressionError::InvalidValue { field }) if field == "id"
        ));
    }

    #[test]
    fn test_filtered_mode_only_emits_condition_keys() {
        let conditions = ConditionSet::List(vec![Condition::compare(
            "state",
            CompareOp::Eq,
            "active",
        )]);
        let artifacts = build_update(
            &row(json!({ "state": "archived", "other": 1 })),
            Some(&conditions),
            false,
        )
        .unwrap();

        assert_eq!(artifacts.update_expression, "SET #state = :state");
        assert_eq!(artifacts.values[":state"], json!("archived"));
        assert_eq!(artifacts.values[":stateXvv"], json!("active"));
        assert!(!artifacts.values.contains_key(":other"));
    }

    #[test]
    fn test_sanitized_update_fields_keep_original_names() {
        let artifacts = build_update(&row(json!({ "a.b": 1 })), None, true).unwrap();

        assert_eq!(artifacts.update_expression, "SET #a_b = :a_b");
        assert_eq!(artifacts.names["#a_b"], "a.b");
        assert_eq!(artifacts.values[":a_b"], json!(1));
    }
}
