use super::parsing::extract_json_object;
use super::*;
use crate::error::PipelineError;

#[test]
fn parses_plan_from_bare_json() {
    let raw = r#"{"problem":"build a todo app","subtasks":["CRUD API","frontend form"],"tech_stack":["Go","React"]}"#;

    let plan = parse_coding_plan(raw).unwrap();

    assert_eq!(plan.problem, "build a todo app");
    assert_eq!(plan.subtasks, vec!["CRUD API", "frontend form"]);
    assert_eq!(plan.tech_stack, vec!["Go", "React"]);
}

#[test]
fn parses_plan_wrapped_in_fences_and_think_blocks() {
    let raw = "<think>the user wants {a plan}</think>\nHere you go:\n```json\n{\"problem\":\"p\",\"subtasks\":[],\"tech_stack\":[\"Rust\"]}\n```";

    let plan = parse_coding_plan(raw).unwrap();

    assert!(!plan.has_subtasks());
    assert_eq!(plan.tech_stack, vec!["Rust"]);
}

#[test]
fn plan_missing_field_is_schema_violation() {
    let err = parse_coding_plan(r#"{"problem":"p","subtasks":["a"]}"#).unwrap_err();

    match err {
        PipelineError::SchemaViolation { contract, reason } => {
            assert_eq!(contract, "CodingPlan");
            assert!(reason.contains("tech_stack"), "reason was: {reason}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn braces_in_prose_before_payload_are_skipped() {
    let raw = "Here is the plan as {problem, subtasks, tech_stack}:\n```json\n{\"problem\":\"todo app\",\"subtasks\":[\"CRUD API\"],\"tech_stack\":[\"Go\"]}\n```";

    let plan = parse_coding_plan(raw).unwrap();

    assert_eq!(plan.problem, "todo app");
    assert_eq!(plan.subtasks, vec!["CRUD API"]);
}

#[test]
fn shape_error_reported_over_prose_braces() {
    let raw = r#"Fields are {problem, subtasks}: {"problem":"p","subtasks":["a"]}"#;

    let err = parse_coding_plan(raw).unwrap_err();

    match err {
        PipelineError::SchemaViolation { reason, .. } => {
            assert!(reason.contains("tech_stack"), "reason was: {reason}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn plan_mistyped_field_is_schema_violation() {
    let err =
        parse_coding_plan(r#"{"problem":"p","subtasks":"a, b","tech_stack":[]}"#).unwrap_err();
    assert!(matches!(err, PipelineError::SchemaViolation { .. }));
}

#[test]
fn prose_without_json_is_schema_violation() {
    let err = parse_coding_plan("I could not come up with a plan.").unwrap_err();
    assert_eq!(
        err,
        PipelineError::schema("CodingPlan", "response did not contain a JSON object")
    );
}

#[test]
fn code_output_keeps_braces_inside_strings() {
    let raw = r#"{"filename":"main.go","code":"func main() {\n\tfmt.Println(\"}\")\n}","explanation":"prints a brace"}"#;

    let output = parse_code_output(raw).unwrap();

    assert_eq!(output.filename, "main.go");
    assert_eq!(output.code, "func main() {\n\tfmt.Println(\"}\")\n}");
    assert_eq!(output.language(), "go");
}

#[test]
fn code_output_missing_code_is_rejected() {
    let err = parse_code_output(r#"{"filename":"app.py","explanation":"x"}"#).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::SchemaViolation {
            contract: "CodeOutput",
            ..
        }
    ));
}

#[test]
fn code_output_with_blank_filename_is_rejected() {
    let err =
        parse_code_output(r#"{"filename":"  ","code":"print(1)","explanation":""}"#).unwrap_err();
    assert_eq!(err, PipelineError::schema("CodeOutput", "`filename` is empty"));
}

#[test]
fn unknown_keys_are_ignored() {
    let raw = r#"{"filename":"a.rs","code":"fn main() {}","explanation":"e","confidence":0.9}"#;
    assert!(parse_code_output(raw).is_ok());
}

#[test]
fn extract_handles_unclosed_think_block() {
    assert_eq!(extract_json_object("<think>{\"a\":1}"), None);
    assert_eq!(
        extract_json_object("noise {\"a\":{\"b\":2}} trailing {}"),
        Some("{\"a\":{\"b\":2}}".to_string())
    );
}

#[test]
fn subtask_lookup_is_one_based() {
    let plan = CodingPlan {
        problem: "p".to_string(),
        subtasks: vec!["first".to_string(), "second".to_string()],
        tech_stack: vec![],
    };

    assert_eq!(plan.subtask_at(0), None);
    assert_eq!(plan.subtask_at(2), Some("second"));
    assert_eq!(plan.subtask_at(3), None);
    assert_eq!(plan.find_subtask("first"), Some("first"));
    assert_eq!(plan.find_subtask("third"), None);
}

#[test]
fn language_falls_back_without_extension() {
    let output = CodeOutput {
        filename: "Makefile".to_string(),
        code: "all:".to_string(),
        explanation: String::new(),
    };
    assert_eq!(output.language(), "text");
}

#[test]
fn contract_schemas_require_every_field() {
    let schema = OutputContract::CodeOutput.json_schema();
    assert_eq!(
        schema["required"],
        serde_json::json!(["filename", "code", "explanation"])
    );
    assert_eq!(OutputContract::CodingPlan.name(), "CodingPlan");
}
