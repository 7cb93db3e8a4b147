use serde::{Deserialize, Serialize};

use super::schema;

/// Decomposition of a problem into subtasks plus a suggested stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodingPlan {
    pub problem: String,
    pub subtasks: Vec<String>,
    pub tech_stack: Vec<String>,
}

impl CodingPlan {
    pub fn has_subtasks(&self) -> bool {
        !self.subtasks.is_empty()
    }

    /// Look up a subtask by its exact text.
    pub fn find_subtask(&self, text: &str) -> Option<&str> {
        self.subtasks
            .iter()
            .map(String::as_str)
            .find(|subtask| *subtask == text)
    }

    /// 1-based lookup, matching how subtasks are listed to the user.
    pub fn subtask_at(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|index| self.subtasks.get(index))
            .map(String::as_str)
    }
}

/// A single generated source file with its rationale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeOutput {
    pub filename: String,
    pub code: String,
    pub explanation: String,
}

impl CodeOutput {
    /// Highlighting hint taken from the filename extension.
    pub fn language(&self) -> &str {
        match self.filename.rsplit_once('.') {
            Some((_, extension)) if !extension.is_empty() => extension,
            _ => "text",
        }
    }
}

/// Named output shapes a stage agent can require from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputContract {
    CodingPlan,
    CodeOutput,
}

impl OutputContract {
    pub fn name(self) -> &'static str {
        match self {
            OutputContract::CodingPlan => "CodingPlan",
            OutputContract::CodeOutput => "CodeOutput",
        }
    }

    /// JSON Schema sent to providers that support `json_schema` response formats.
    pub fn json_schema(self) -> serde_json::Value {
        match self {
            OutputContract::CodingPlan => schema::coding_plan(),
            OutputContract::CodeOutput => schema::code_output(),
        }
    }
}
