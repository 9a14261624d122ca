//! Prompt templates managed through the Prompt Manager view.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The backend role a prompt template belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum PromptRole {
    Clarify,
    Chat,
    Suggestion,
}

/// The two system prompts the backend composes per role.
///
/// Field names match the wire format verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Rewrites a history-dependent user query into a self-contained question.
    pub contextualize_q_system_prompt: String,
    /// Answers the contextualized question from retrieved context.
    pub qa_system_prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_uppercase() {
        assert_eq!(
            serde_json::to_value(PromptRole::Clarify).unwrap(),
            serde_json::json!("CLARIFY")
        );
        assert_eq!(PromptRole::Suggestion.to_string(), "SUGGESTION");
        assert_eq!("chat".parse::<PromptRole>().unwrap(), PromptRole::Chat);
    }

    #[test]
    fn template_round_trips_wire_field_names() {
        let json = serde_json::json!({
            "contextualize_q_system_prompt": "rewrite",
            "qa_system_prompt": "answer",
        });
        let template: PromptTemplate = serde_json::from_value(json).unwrap();
        assert_eq!(template.contextualize_q_system_prompt, "rewrite");
        assert_eq!(template.qa_system_prompt, "answer");
    }
}
