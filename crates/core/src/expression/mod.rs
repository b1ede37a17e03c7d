//! Expression compilation: semantic maps and condition lists in, wire-grammar
//! strings plus placeholder tables out.

pub mod compile;
pub mod condition;
pub mod name;
pub mod types;
