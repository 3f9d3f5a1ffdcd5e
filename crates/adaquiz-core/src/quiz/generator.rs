use std::sync::Arc;

use adaquiz_model::question::{AnswerChoice, Difficulty, Question};
use async_openai::types::{ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::llm_config::LlmConfig;
use crate::openai::error::OpenAiError;
use crate::openai::{CallConfig, FunctionResponse, decode_entities, openai_call_function};
use crate::quiz::error::GenerationError;
use crate::quiz::options::{label_options, resolve_answer};
use crate::quiz::prompt::{self, PromptTemplate};

/// The question a user just answered, handed to the model so it can adapt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviousAnswer {
    pub question: String,
    pub answer: String,
    pub was_correct: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionRequest {
    pub topic: String,
    pub num: usize,
    pub learning_objective: String,
    pub difficulty: Difficulty,
    pub template: PromptTemplate,
    pub context: Option<PreviousAnswer>,
}

impl QuestionRequest {
    #[must_use]
    pub fn initial(topic: &str, num: usize) -> Self {
        Self {
            topic: topic.to_owned(),
            num,
            learning_objective: learning_objective(topic),
            difficulty: Difficulty::Medium,
            template: PromptTemplate::Initial,
            context: None,
        }
    }

    #[must_use]
    pub fn adaptive(topic: &str, difficulty: Difficulty, previous: PreviousAnswer) -> Self {
        Self {
            topic: topic.to_owned(),
            num: 1,
            learning_objective: learning_objective(topic),
            difficulty,
            template: PromptTemplate::Adaptive,
            context: Some(previous),
        }
    }
}

fn learning_objective(topic: &str) -> String {
    format!("General knowledge of {topic}")
}

/// Source of raw multiple-choice questions, usually a language model.
///
/// Implementations return the questions as the model wrote them; labelling the options and resolving
/// the answer happens in [`normalize`].
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate_questions(&self, request: &QuestionRequest) -> Result<Vec<Question>, GenerationError>;
}

/// A question ready to be shown, together with its resolved answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedQuestion {
    pub question: Question,
    pub correct: AnswerChoice,
}

/// Labels the options of a raw question and resolves its answer to one of them.
///
/// The returned question carries the full labelled option as its answer.
pub fn normalize(raw: Question) -> Result<IssuedQuestion, GenerationError> {
    if raw.options.len() != 4 {
        return Err(GenerationError::InvalidOptionCount(raw.options.len()));
    }
    let options = label_options(raw.options);
    let correct =
        resolve_answer(&options, &raw.answer).ok_or_else(|| GenerationError::UnresolvedAnswer(raw.answer.clone()))?;

    Ok(IssuedQuestion {
        question: Question {
            question: raw.question.trim().to_owned(),
            options,
            answer: correct.text.clone(),
            explanation: raw.explanation,
        },
        correct,
    })
}

/// Asks the generator for a single question and normalizes it.
#[instrument(skip(generator, context))]
pub async fn generate_question(
    generator: &dyn QuestionGenerator,
    topic: &str,
    difficulty: Difficulty,
    context: Option<PreviousAnswer>,
) -> Result<IssuedQuestion, GenerationError> {
    let request = match context {
        Some(previous) => QuestionRequest::adaptive(topic, difficulty, previous),
        None => QuestionRequest {
            difficulty,
            ..QuestionRequest::initial(topic, 1)
        },
    };

    let raw = generator
        .generate_questions(&request)
        .await?
        .into_iter()
        .next()
        .ok_or(GenerationError::NoQuestions)?;

    normalize(raw).inspect_err(|error| tracing::warn!(%error, "model returned an unusable question"))
}

/// Generates a batch of questions on a topic. Malformed questions are dropped.
#[instrument(skip(generator))]
pub async fn generate_question_set(
    generator: &dyn QuestionGenerator,
    topic: &str,
    num: usize,
) -> Result<Vec<Question>, GenerationError> {
    let request = QuestionRequest::initial(topic, num);
    let questions: Vec<Question> = generator
        .generate_questions(&request)
        .await?
        .into_iter()
        .take(num)
        .filter_map(|raw| match normalize(raw) {
            Ok(issued) => Some(issued.question),
            Err(error) => {
                tracing::warn!(%error, "dropping malformed question");
                None
            }
        })
        .collect();

    if questions.is_empty() {
        return Err(GenerationError::NoQuestions);
    }
    Ok(questions)
}

#[derive(Debug, Deserialize)]
struct QuestionsFunctionResponse {
    #[serde(default)]
    questions: Vec<Question>,
}

impl FunctionResponse for QuestionsFunctionResponse {
    fn function_name() -> &'static str {
        "submit_questions"
    }

    fn function_description() -> &'static str {
        "Submits the generated multiple-choice questions."
    }

    fn function_definition() -> Value {
        json!({
            "type": "object",
            "properties": {
                "questions": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "question": {
                                "type": "string",
                                "description": "The question text without the options."
                            },
                            "options": {
                                "type": "array",
                                "items": { "type": "string" },
                                "minItems": 4,
                                "maxItems": 4,
                                "description": "Exactly four options, each prefixed with its letter, e.g. \"A. Chlorophyll\"."
                            },
                            "answer": {
                                "type": "string",
                                "description": "The letter of the correct option (A, B, C or D)."
                            },
                            "explanation": {
                                "type": "string",
                                "description": "A brief explanation of why the answer is correct."
                            }
                        },
                        "required": ["question", "options", "answer", "explanation"]
                    }
                }
            },
            "required": ["questions"]
        })
    }

    fn fix_escapes(&mut self) {
        for question in &mut self.questions {
            decode_entities(&mut question.question);
            decode_entities(&mut question.answer);
            question.options.iter_mut().for_each(decode_entities);
            if let Some(explanation) = question.explanation.as_mut() {
                decode_entities(explanation);
            }
        }
    }
}

/// [`QuestionGenerator`] backed by an OpenAI compatible chat completion endpoint.
#[derive(Debug, Clone)]
pub struct LlmQuestionGenerator {
    llm_config: Arc<LlmConfig>,
}

impl LlmQuestionGenerator {
    #[must_use]
    pub fn new(llm_config: Arc<LlmConfig>) -> Self {
        Self { llm_config }
    }
}

#[async_trait]
impl QuestionGenerator for LlmQuestionGenerator {
    #[instrument(skip_all, fields(topic = %request.topic, difficulty = %request.difficulty, num = request.num))]
    async fn generate_questions(&self, request: &QuestionRequest) -> Result<Vec<Question>, GenerationError> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(prompt::SYSTEM_PROMPT)
                .build()
                .map_err(OpenAiError::from)?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt::render(request))
                .build()
                .map_err(OpenAiError::from)?
                .into(),
        ];

        let response: QuestionsFunctionResponse =
            openai_call_function(&self.llm_config, CallConfig::for_config(&self.llm_config), messages).await?;

        tracing::debug!(count = response.questions.len(), "received questions");
        Ok(response.questions)
    }
}
