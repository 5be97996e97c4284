//! Syntax-independent machinery shared by the normalizer and its consumers.

pub mod flat_to_nested;
pub mod format_stack;
pub mod ids;
pub mod label;
pub mod nested_to_flat;
