use anyhow::Result;
use std::io::{self, IsTerminal, Read};

pub(crate) fn read_piped_stdin() -> Result<Option<String>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;

    if buffer.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(buffer))
    }
}

/// Problem text from positional words, falling back to piped stdin.
pub(crate) fn problem_text(words: &[String]) -> Result<Option<String>> {
    let joined = words.join(" ").trim().to_owned();
    if !joined.is_empty() {
        return Ok(Some(joined));
    }
    Ok(read_piped_stdin()?.map(|text| text.trim().to_owned()))
}

pub(crate) fn mask_api_key(key: &str) -> String {
    if key.is_empty() {
        return "(not set)".to_string();
    }

    let visible: String = key.chars().take(8).collect();
    format!("{visible}***")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_all_but_prefix() {
        assert_eq!(mask_api_key(""), "(not set)");
        assert_eq!(mask_api_key("AIzaSyD-1234567890"), "AIzaSyD-***");
        assert_eq!(mask_api_key("abc"), "abc***");
    }
}
