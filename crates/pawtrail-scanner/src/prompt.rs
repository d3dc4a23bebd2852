//! LLM prompt for animal / NGO extraction

/// Output format requested from the provider
pub const RESPONSE_FORMAT: &str = "json";

/// Builds the extraction prompt for one line of text
pub struct PromptBuilder {
    text: String,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        format!("System: {}\nUser: {}", EXTRACTION_INSTRUCTIONS, self.text)
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You extract structured data from short posts about animals and animal welfare groups.
Answer with a single JSON object that may contain:
- "animal": an object with the fields type, age, location, contact, drive_link
- "ngo": an object with the fields name, location, type, contact
Leave out any object or field the text does not mention.
Return only valid JSON, with special characters escaped and no markdown or commentary."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_has_system_and_user_parts() {
        let prompt = PromptBuilder::new("Injured puppy near Andheri station").build();

        assert!(prompt.starts_with("System: "));
        assert!(prompt.ends_with("\nUser: Injured puppy near Andheri station"));
    }

    #[test]
    fn test_prompt_names_every_field() {
        let prompt = PromptBuilder::new("x").build();
        for field in ["type", "age", "location", "contact", "drive_link", "name"] {
            assert!(prompt.contains(field), "prompt should mention {}", field);
        }
    }
}
