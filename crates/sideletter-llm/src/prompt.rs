//! System prompt loading and user-turn framing

use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// Instruction used when the system prompt file cannot be read
pub const FALLBACK_SYSTEM_PROMPT: &str = "You are Side Letter’s research partner for allocators.";

/// Default location of the system prompt file
pub const DEFAULT_SYSTEM_PROMPT_PATH: &str = "system_prompt.md";

/// One turn of a chat conversation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    /// "system" or "user"
    pub role: &'static str,
    /// Message text
    pub content: String,
}

/// Read the system prompt once at startup
///
/// Never fails: a missing or unreadable file degrades to
/// [`FALLBACK_SYSTEM_PROMPT`] with a warning.
pub fn load_system_prompt(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            info!("Loaded system prompt from {}", path.display());
            contents.trim().to_string()
        }
        Err(e) => {
            warn!(
                "Error loading system prompt from {}: {}; using fallback",
                path.display(),
                e
            );
            FALLBACK_SYSTEM_PROMPT.to_string()
        }
    }
}

/// Build the two-turn conversation sent to the model
pub fn build_messages(
    system_prompt: &str,
    context_block: &str,
    question: &str,
) -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            role: "system",
            content: system_prompt.to_string(),
        },
        ChatMessage {
            role: "user",
            content: user_turn(context_block, question),
        },
    ]
}

fn user_turn(context_block: &str, question: &str) -> String {
    format!(
        "Context from The Side Letter knowledge base:\n\n\
         {context_block}\n\n\
         ---\n\n\
         User Question: {question}\n\n\
         {ANSWER_INSTRUCTIONS}"
    )
}

const ANSWER_INSTRUCTIONS: &str = "Please provide a comprehensive, detailed answer based on ALL relevant information in the context above. Format your response in a clear, readable way that best presents the information. Include all relevant details, specifics, and context from the sources.";

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_build_messages_shape() {
        let messages = build_messages("sys", "[Source 1 - FundA]:\nA", "Who?");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, "sys");
        assert_eq!(messages[1].role, "user");
    }

    #[test]
    fn test_user_turn_framing() {
        let messages = build_messages("sys", "CONTEXT", "QUESTION");
        let expected = format!(
            "Context from The Side Letter knowledge base:\n\nCONTEXT\n\n---\n\nUser Question: QUESTION\n\n{}",
            ANSWER_INSTRUCTIONS
        );
        assert_eq!(messages[1].content, expected);
    }

    #[test]
    fn test_load_system_prompt_trims_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "\n  You are a careful analyst.  \n").unwrap();

        let prompt = load_system_prompt(file.path());
        assert_eq!(prompt, "You are a careful analyst.");
    }

    #[test]
    fn test_load_system_prompt_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let prompt = load_system_prompt(dir.path().join("missing.md"));
        assert_eq!(prompt, FALLBACK_SYSTEM_PROMPT);
    }
}
