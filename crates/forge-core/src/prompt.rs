use crate::config::DomainConfig;
use crate::history::IdeaHistory;

/// One-line example object showing every key the normalizer knows first.
const EXAMPLE_IDEA: &str = r#"{"name":"Crop Helper","name_hindi":"फसल सहायक","short_description":"AI tool for farmers","pain_point":"farmers struggle with X","opportunity":"this helps by Y","target_users":"small farmers in UP","ai_features":["image recognition","voice input"],"key_features":["feature 1","feature 2","feature 3"],"technical_approach":"uses camera and AI"}"#;

/// `- name: summary` per accepted idea, so the model can steer away from them.
pub fn existing_ideas_summary(history: &IdeaHistory) -> String {
    if history.is_empty() {
        return "No tools have been built yet.".to_string();
    }
    history
        .records()
        .iter()
        .map(|r| format!("- {}: {}", r.name, r.summary))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The fixed instruction sent to the generator for one new idea.
pub fn idea_prompt(domain: &DomainConfig, history: &IdeaHistory) -> String {
    let requirements: String = domain
        .constraints
        .iter()
        .map(|c| format!("- {c}\n"))
        .collect();
    let existing = existing_ideas_summary(history);

    format!(
        "Generate a tool idea for this domain: {domain}.\n\
         Output EXACTLY this JSON structure with your values:\n\n\
         {EXAMPLE_IDEA}\n\n\
         Requirements:\n\
         {requirements}\
         - Avoid these existing tools:\n{existing}\n\n\
         Output only the JSON object, no explanation.",
        domain = domain.description,
    )
}
