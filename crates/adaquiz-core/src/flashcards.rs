use std::sync::Arc;

use adaquiz_model::flashcard::{Flashcard, FlashcardSet};
use async_openai::types::{ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::flashcards::error::FlashcardError;
use crate::llm_config::LlmConfig;
use crate::openai::error::OpenAiError;
use crate::openai::{CallConfig, FunctionResponse, decode_entities, openai_call_function};

pub mod error;

const SYSTEM_PROMPT: &str = "You write concise study flashcards. \
Always reply by calling the provided function.";

#[async_trait]
pub trait FlashcardGenerator: Send + Sync {
    async fn generate_flashcards(&self, topic: &str, num: usize) -> Result<FlashcardSet, FlashcardError>;
}

fn render(topic: &str, num: usize) -> String {
    format!(
        "Create a set of {num} flashcards on the topic \"{topic}\".
Each flashcard has a front with a term or a short question, a back with the answer and a one sentence explanation.
Give the set a short descriptive title.
Guidelines:
1. Avoid repeating cards.
2. Keep the front short enough to memorize.
3. Cover different aspects of the topic."
    )
}

#[derive(Debug, Deserialize)]
struct FlashcardsFunctionResponse {
    #[serde(default)]
    title: String,
    #[serde(default)]
    flashcards: Vec<Flashcard>,
}

impl FunctionResponse for FlashcardsFunctionResponse {
    fn function_name() -> &'static str {
        "submit_flashcards"
    }

    fn function_description() -> &'static str {
        "Submits a titled set of flashcards."
    }

    fn function_definition() -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Short title of the flashcard set."
                },
                "flashcards": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "front": { "type": "string", "description": "Term or question." },
                            "back": { "type": "string", "description": "Answer or definition." },
                            "explanation": { "type": "string", "description": "One sentence of context." }
                        },
                        "required": ["front", "back", "explanation"]
                    }
                }
            },
            "required": ["title", "flashcards"]
        })
    }

    fn fix_escapes(&mut self) {
        decode_entities(&mut self.title);
        for card in &mut self.flashcards {
            decode_entities(&mut card.front);
            decode_entities(&mut card.back);
            decode_entities(&mut card.explanation);
        }
    }
}

impl FlashcardsFunctionResponse {
    fn into_set(self, topic: &str, num: usize) -> Result<FlashcardSet, FlashcardError> {
        let flashcards: Vec<Flashcard> = self
            .flashcards
            .into_iter()
            .filter(|card| !card.front.trim().is_empty() && !card.back.trim().is_empty())
            .take(num)
            .collect();

        if flashcards.is_empty() {
            return Err(FlashcardError::NoFlashcards);
        }

        let title = match self.title.trim() {
            "" => topic.trim().to_owned(),
            title => title.to_owned(),
        };
        Ok(FlashcardSet { title, flashcards })
    }
}

#[derive(Debug, Clone)]
pub struct LlmFlashcardGenerator {
    llm_config: Arc<LlmConfig>,
}

impl LlmFlashcardGenerator {
    #[must_use]
    pub fn new(llm_config: Arc<LlmConfig>) -> Self {
        Self { llm_config }
    }
}

#[async_trait]
impl FlashcardGenerator for LlmFlashcardGenerator {
    #[instrument(skip(self))]
    async fn generate_flashcards(&self, topic: &str, num: usize) -> Result<FlashcardSet, FlashcardError> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_PROMPT)
                .build()
                .map_err(OpenAiError::from)?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(render(topic, num))
                .build()
                .map_err(OpenAiError::from)?
                .into(),
        ];

        let response: FlashcardsFunctionResponse =
            openai_call_function(&self.llm_config, CallConfig::for_config(&self.llm_config), messages).await?;

        tracing::debug!(count = response.flashcards.len(), "received flashcards");
        response.into_set(topic, num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(value: Value) -> FlashcardsFunctionResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_fix_escapes() {
        let mut res = response(json!({
            "title": "Salt &amp; Pepper",
            "flashcards": [{ "front": "&lt;NaCl&gt;", "back": "Salt", "explanation": "It&#39;s table salt" }]
        }));
        res.fix_escapes();
        assert_eq!(res.title, "Salt & Pepper");
        assert_eq!(res.flashcards[0].front, "<NaCl>");
        assert_eq!(res.flashcards[0].explanation, "It's table salt");
    }

    #[test]
    fn test_into_set_caps_and_filters() {
        let res = response(json!({
            "title": "",
            "flashcards": [
                { "front": "H2O", "back": "Water" },
                { "front": " ", "back": "Nothing" },
                { "front": "CO2", "back": "Carbon dioxide" },
                { "front": "O2", "back": "Oxygen" }
            ]
        }));
        let set = res.into_set("Chemistry", 2).unwrap();
        assert_eq!(set.title, "Chemistry");
        assert_eq!(set.flashcards.len(), 2);
        assert_eq!(set.flashcards[1].front, "CO2");
        assert!(set.flashcards[0].explanation.is_empty());
    }

    #[test]
    fn test_into_set_empty() {
        let res = response(json!({ "title": "Empty" }));
        assert!(matches!(res.into_set("x", 5), Err(FlashcardError::NoFlashcards)));
    }

    #[test]
    fn test_prompt_mentions_topic_and_count() {
        let prompt = render("Rust ownership", 7);
        assert!(prompt.contains("7 flashcards"));
        assert!(prompt.contains("\"Rust ownership\""));
    }

    #[test]
    fn test_schema_requires_fields() {
        let schema = FlashcardsFunctionResponse::function_definition();
        assert_eq!(schema["required"], json!(["title", "flashcards"]));
        assert_eq!(FlashcardsFunctionResponse::function_name(), "submit_flashcards");
    }
}
