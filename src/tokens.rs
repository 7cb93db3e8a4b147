use crate::client::ChatMessage;

/// Tokens held back so the completion never runs into the context limit.
pub const COMPLETION_SAFETY_MARGIN: u32 = 256;

/// Generated files are rarely useful below this many tokens.
pub const MIN_COMPLETION_TOKENS: u32 = 256;

/// Rough per-message overhead for role and framing tokens.
const MESSAGE_OVERHEAD_TOKENS: u32 = 4;

/// Estimate tokens for a piece of text, erring high.
///
/// Takes the larger of a ~3 chars/token and a 1 word/token estimate.
pub fn estimate_tokens(text: &str) -> u32 {
    if text.is_empty() {
        return 0;
    }

    let by_chars = text.chars().count().div_ceil(3);
    let by_words = text.split_whitespace().count();
    u32::try_from(by_chars.max(by_words)).unwrap_or(u32::MAX)
}

pub fn estimate_prompt_tokens(messages: &[ChatMessage]) -> u32 {
    messages
        .iter()
        .map(|message| estimate_tokens(&message.content).saturating_add(MESSAGE_OVERHEAD_TOKENS))
        .fold(0u32, u32::saturating_add)
}

/// Completion budget left in a `context_limit` window after the prompt.
///
/// Never exceeds what actually fits; never returns zero.
pub fn completion_budget(context_limit: u32, messages: &[ChatMessage]) -> u32 {
    let remaining = context_limit.saturating_sub(estimate_prompt_tokens(messages));
    if remaining == 0 {
        return 1;
    }

    remaining
        .saturating_sub(COMPLETION_SAFETY_MARGIN)
        .max(MIN_COMPLETION_TOKENS)
        .min(remaining)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ChatMessage;

    #[test]
    fn estimate_is_conservative() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 1);
        assert_eq!(estimate_tokens("a b c d"), 4);
    }

    #[test]
    fn budget_reserves_margin_when_room_allows() {
        let messages = vec![ChatMessage::user("x".repeat(300))];
        // 100 content tokens + 4 overhead.
        assert_eq!(completion_budget(8192, &messages), 8192 - 104 - COMPLETION_SAFETY_MARGIN);
    }

    #[test]
    fn budget_shrinks_to_what_fits() {
        let messages = vec![ChatMessage::system("x".repeat(300))];
        assert_eq!(completion_budget(200, &messages), 96);
        assert_eq!(completion_budget(50, &messages), 1);
    }
}
