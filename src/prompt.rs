use crate::model::Candidate;
use schemars::schema_for;

const QUESTION_TEMPLATE: &str = r#"You are a subject matter expert on the topic: {topic}

Follow the instructions to create a quiz question:
1. Generate a question based on the topic provided and context as key "question"
2. Provide 4 multiple choice answers to the question as a list of key-value pairs "choices"
3. Provide the correct answer for the question from the list of answers as key "answer"
4. Provide an explanation as to why the answer is correct as key "explanation"

You must respond as a JSON object with the following structure:
{
    "question": "<question>",
    "choices": [
        {"key": "A", "value": "<choice>"},
        {"key": "B", "value": "<choice>"},
        {"key": "C", "value": "<choice>"},
        {"key": "D", "value": "<choice>"}
    ],
    "answer": "<answer key from choices list>",
    "explanation": "<explanation as to why the answer is correct>"
}

Context: {context}
"#;

/// Renders the fixed question-generation instruction.
#[derive(Debug, Clone, Default)]
pub struct PromptTemplate {
    schema_guidance: bool,
}

impl PromptTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the JSON schema of the expected payload to every prompt.
    pub fn with_schema_guidance(mut self, enabled: bool) -> Self {
        self.schema_guidance = enabled;
        self
    }

    pub fn render(&self, topic: &str, passages: &[String]) -> String {
        let context = passages.join("\n\n");
        // Substitute against the template only, never inside inserted text
        let prompt = QUESTION_TEMPLATE
            .split("{context}")
            .map(|part| part.replace("{topic}", topic))
            .collect::<Vec<_>>()
            .join(&context);

        if self.schema_guidance {
            add_schema_guidance(prompt)
        } else {
            prompt
        }
    }
}

fn add_schema_guidance(prompt: String) -> String {
    let schema = schema_for!(Candidate);
    let schema_json = serde_json::to_string_pretty(&schema)
        .unwrap_or_else(|_| "Schema serialization failed".to_string());

    format!(
        "{}\n## Response Format\nThe JSON object must match this schema:\n```json\n{}\n```",
        prompt, schema_json
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_in_inputs_are_left_alone() {
        let passages = vec!["Use {topic} as a literal.".to_string()];
        let prompt = PromptTemplate::new().render("Templates with {context}", &passages);
        assert!(prompt.contains("the topic: Templates with {context}\n"));
        assert!(prompt.contains("Context: Use {topic} as a literal."));
    }

    #[test]
    fn test_render_embeds_topic_and_context() {
        let passages = vec!["Ownership moves values.".to_string(), "Borrows are references.".to_string()];
        let prompt = PromptTemplate::new().render("Rust ownership", &passages);

        assert!(prompt.contains("subject matter expert on the topic: Rust ownership"));
        assert!(prompt.contains("Context: Ownership moves values.\n\nBorrows are references."));
        assert!(prompt.contains(r#"{"key": "D", "value": "<choice>"}"#));
        assert!(!prompt.contains("## Response Format"));
    }

    #[test]
    fn test_schema_guidance_is_opt_in() {
        let prompt = PromptTemplate::new().with_schema_guidance(true).render("Rust", &[]);
        assert!(prompt.contains("## Response Format"));
        assert!(prompt.contains("explanation"));
    }
}
