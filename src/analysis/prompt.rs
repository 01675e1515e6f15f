//! Prompts for step feasibility classification

use crate::llm::ChatMessage;

/// System prompt establishing the assistant persona and output contract
pub const SYSTEM_PROMPT: &str =
    "You are a QA automation expert. Respond ONLY in JSON format.";

const RESPONSE_SCHEMA: &str = r#"{
  "Feasibility": "Automatable / Partially Automatable / Not Automatable",
  "Recommended Tools": ["Selenium", "Cypress", "Appium", "Manual"],
  "Recommended Primary Tool": "Select one tool name from the list above that best fits this step, considering platform compatibility, ease of setup, team skillset, and UI interaction type. Return only the tool name.",
  "Confidence Score": 0-100,
  "Rationale": "Brief explanation"
}"#;

const GUIDELINES: &str = r#"Guidelines:
- Return only valid JSON. No markdown, bullet points, or extra commentary.
- Do NOT include parentheses, qualifiers, or extra text in tool names.
- Use only the tools listed above. If multiple tools apply, include them all in "Recommended Tools".
- Choose one best-fit tool for "Recommended Primary Tool" based on platform compatibility, ease of setup, and UI interaction type."#;

/// Builds the user instruction for one step. The step text is embedded as-is;
/// quotes and braces are not escaped.
pub fn user_prompt(step_text: &str) -> String {
    format!(
        "Analyze the following test step and respond strictly in JSON format:\n\n\
         Step: \"{}\"\n\n\
         Respond with:\n{}\n\n{}\n",
        step_text, RESPONSE_SCHEMA, GUIDELINES
    )
}

/// Returns the system and user messages for classifying `step_text`.
pub fn build_step_prompt(step_text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(user_prompt(step_text)),
    ]
}
