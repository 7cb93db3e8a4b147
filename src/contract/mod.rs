//! Structured-output contracts the model must honor.
//!
//! Two stages expect machine-parseable output: the planner returns a
//! [`CodingPlan`] and the coder returns a [`CodeOutput`]. Parsing is strict:
//! a missing or mistyped field is a schema violation, never a default.

mod parsing;
mod schema;
mod types;

pub use parsing::{parse_code_output, parse_coding_plan};
pub use types::{CodeOutput, CodingPlan, OutputContract};

#[cfg(test)]
mod tests;
