//! Semantic types fed into the expression compiler.

use serde_json::Value;

/// Comparison operators accepted by the expression grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl CompareOp {
    /// Wire spelling of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Ge => ">=",
            CompareOp::Le => "<=",
        }
    }
}

/// Boolean connectors appended after a condition clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
    Not,
}

impl LogicOp {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicOp::And => "AND",
            LogicOp::Or => "OR",
            LogicOp::Not => "NOT",
        }
    }
}

/// No-arg / one-arg condition functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CondFn {
    AttributeExists,
    AttributeNotExists,
    Size,
}

impl CondFn {
    pub fn as_str(self) -> &'static str {
        match self {
            CondFn::AttributeExists => "attribute_exists",
            CondFn::AttributeNotExists => "attribute_not_exists",
            CondFn::Size => "size",
        }
    }
}

/// A single field's condition inside an [`ExprMap`].
#[derive(Debug, Clone, PartialEq)]
pub enum KeyCond {
    /// Bare scalar, implying equality.
    Eq(Value),
    /// Explicit comparison operator.
    Cmp(CompareOp, Value),
    /// Range condition with inclusive bounds.
    Between { low: Value, high: Value },
}

/// Insertion-ordered field → condition mapping for key-condition and filter
/// expressions. Input order determines clause order in the compiled string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExprMap {
    entries: Vec<(String, KeyCond)>,
}

impl ExprMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equality on a bare scalar.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.push((field.into(), KeyCond::Eq(value.into())));
        self
    }

    /// Explicit comparison.
    pub fn cmp(mut self, field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        self.entries
            .push((field.into(), KeyCond::Cmp(op, value.into())));
        self
    }

    /// Inclusive range condition.
    pub fn between(
        mut self,
        field: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Self {
        self.entries.push((
            field.into(),
            KeyCond::Between {
                low: low.into(),
                high: high.into(),
            },
        ));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, KeyCond)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compare_op_spelling() {
        assert_eq!(CompareOp::Eq.as_str(), "=");
        assert_eq!(CompareOp::Ne.as_str(), "<>");
        assert_eq!(CompareOp::Ge.as_str(), ">=");
        assert_eq!(CompareOp::Le.as_str(), "<=");
    }

    #[test]
    fn test_expr_map_preserves_insertion_order() {
        let map = ExprMap::new()
            .eq("pk", "USER#1")
            .cmp("count", CompareOp::Gt, 3)
            .between("sk", "a", "z");

        let fields: Vec<&str> = map.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(fields, vec!["pk", "count", "sk"]);
        assert!(matches!(map.iter().next(), Some((_, KeyCond::Eq(v))) if *v == json!("USER#1")));
    }
}
