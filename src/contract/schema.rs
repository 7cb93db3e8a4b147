use serde_json::{Value, json};

pub(super) fn coding_plan() -> Value {
    json!({
        "type": "object",
        "properties": {
            "problem": { "type": "string" },
            "subtasks": { "type": "array", "items": { "type": "string" } },
            "tech_stack": { "type": "array", "items": { "type": "string" } }
        },
        "required": ["problem", "subtasks", "tech_stack"],
        "additionalProperties": false
    })
}

pub(super) fn code_output() -> Value {
    json!({
        "type": "object",
        "properties": {
            "filename": { "type": "string" },
            "code": { "type": "string" },
            "explanation": { "type": "string" }
        },
        "required": ["filename", "code", "explanation"],
        "additionalProperties": false
    })
}
