//! Pure expression-building core for dynokit.
//!
//! Everything in this crate is side-effect free and independent of the AWS SDK:
//! attribute-name sanitization, key-condition/filter compilation, and
//! condition/update expression building over plain `serde_json` values. The
//! `dynokit` crate marshals the compiled value tables into typed attribute
//! values at the request-building edge.

pub mod error;
pub mod expression;

pub use error::{ExpressionError, Result};
pub use expression::compile::{compile_expression_map, CompiledExpression};
pub use expression::condition::{
    build_update, compile_conditions, CompiledConditions, Condition, ConditionKind, ConditionSet,
    UpdateArtifacts,
};
pub use expression::name::clean_attribute_name;
pub use expression::types::{CompareOp, CondFn, ExprMap, KeyCond, LogicOp};
