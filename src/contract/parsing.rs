use serde::de::DeserializeOwned;

use crate::error::PipelineError;

use super::types::{CodeOutput, CodingPlan, OutputContract};

pub fn parse_coding_plan(raw: &str) -> Result<CodingPlan, PipelineError> {
    decode(OutputContract::CodingPlan, raw)
}

pub fn parse_code_output(raw: &str) -> Result<CodeOutput, PipelineError> {
    let contract = OutputContract::CodeOutput;
    let output: CodeOutput = decode(contract, raw)?;

    if output.filename.trim().is_empty() {
        return Err(PipelineError::schema(contract.name(), "`filename` is empty"));
    }
    if output.code.trim().is_empty() {
        return Err(PipelineError::schema(contract.name(), "`code` is empty"));
    }

    Ok(output)
}

/// Decode the first `{...}` span in `raw` that fits `T`.
///
/// Prose may contain braces before the real payload, so each balanced span
/// is tried in order. When none fits, a span that was valid JSON of the
/// wrong shape is reported ahead of one that was not JSON at all.
fn decode<T: DeserializeOwned>(contract: OutputContract, raw: &str) -> Result<T, PipelineError> {
    let cleaned = strip_think_blocks(raw);
    let mut reported: Option<serde_json::Error> = None;

    for candidate in object_spans(&cleaned) {
        match serde_json::from_str(candidate) {
            Ok(value) => return Ok(value),
            Err(err) => {
                let better = match &reported {
                    None => true,
                    Some(previous) => !previous.is_data() && err.is_data(),
                };
                if better {
                    reported = Some(err);
                }
            }
        }
    }

    Err(match reported {
        Some(err) => PipelineError::schema(contract.name(), err.to_string()),
        None => PipelineError::schema(contract.name(), "response did not contain a JSON object"),
    })
}

/// Strip reasoning blocks left by some models.
fn strip_think_blocks(input: &str) -> String {
    let mut cleaned = input.to_string();

    while let Some(start) = cleaned.find("<think>") {
        match cleaned[start..].find("</think>") {
            Some(offset) => {
                let end = start + offset + "</think>".len();
                cleaned.replace_range(start..end, "");
            }
            None => {
                cleaned.truncate(start);
                break;
            }
        }
    }

    cleaned
}

/// Locate the first balanced top-level JSON object in `input`.
pub(super) fn extract_json_object(input: &str) -> Option<String> {
    let cleaned = strip_think_blocks(input);
    object_spans(&cleaned).next().map(str::to_string)
}

/// Balanced `{...}` spans of `text`, in order of their opening brace.
///
/// Braces inside string literals are skipped, so generated code carried in
/// a JSON string does not end the object early. Markdown fences are ignored
/// because spans start at a `{`.
fn object_spans(text: &str) -> impl Iterator<Item = &str> {
    text.match_indices('{')
        .filter_map(move |(start, _)| balanced_object_at(text, start))
}

fn balanced_object_at(text: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + idx]);
                }
            }
            _ => {}
        }
    }

    None
}
