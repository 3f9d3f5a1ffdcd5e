use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use adaquiz_core::flashcards::FlashcardGenerator;
use adaquiz_core::flashcards::error::FlashcardError;
use adaquiz_core::quiz::error::GenerationError;
use adaquiz_core::quiz::generator::{QuestionGenerator, QuestionRequest};
use adaquiz_model::flashcard::{Flashcard, FlashcardSet};
use adaquiz_model::question::Question;

pub type ScriptedResult = Result<Vec<Question>, GenerationError>;

/// Generator that replays queued results instead of calling a model.
///
/// When the queue is empty every request is answered with [`sample_question`], numbered by call.
#[derive(Debug, Clone, Default)]
pub struct ScriptedGenerator {
    script: Arc<Mutex<VecDeque<ScriptedResult>>>,
    requests: Arc<Mutex<Vec<QuestionRequest>>>,
}

impl ScriptedGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_script(script: impl IntoIterator<Item = ScriptedResult>) -> Self {
        let generator = Self::new();
        for result in script {
            generator.push(result);
        }
        generator
    }

    pub fn push(&self, result: ScriptedResult) {
        self.script.lock().unwrap_or_else(PoisonError::into_inner).push_back(result);
    }

    pub fn push_question(&self, question: Question) {
        self.push(Ok(vec![question]));
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<QuestionRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn last_request(&self) -> Option<QuestionRequest> {
        self.requests().pop()
    }
}

#[async_trait::async_trait]
impl QuestionGenerator for ScriptedGenerator {
    async fn generate_questions(&self, request: &QuestionRequest) -> Result<Vec<Question>, GenerationError> {
        let call = {
            let mut requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);
            requests.push(request.clone());
            requests.len()
        };

        let scripted = self.script.lock().unwrap_or_else(PoisonError::into_inner).pop_front();
        scripted.unwrap_or_else(|| Ok((0..request.num).map(|i| sample_question(call + i)).collect()))
    }
}

#[async_trait::async_trait]
impl FlashcardGenerator for ScriptedGenerator {
    async fn generate_flashcards(&self, topic: &str, num: usize) -> Result<FlashcardSet, FlashcardError> {
        if num == 0 {
            return Err(FlashcardError::NoFlashcards);
        }
        Ok(FlashcardSet {
            title: topic.to_owned(),
            flashcards: (1..=num)
                .map(|n| Flashcard {
                    front: format!("{topic} term {n}"),
                    back: format!("{topic} definition {n}"),
                    explanation: String::new(),
                })
                .collect(),
        })
    }
}

/// An unlabelled question whose answer is option `B`, as a model might return it.
#[must_use]
pub fn sample_question(n: usize) -> Question {
    Question {
        question: format!("Sample question {n}?"),
        options: vec![
            format!("Wrong {n}"),
            format!("Right {n}"),
            format!("Other {n}"),
            format!("Last {n}"),
        ],
        answer: "B".to_owned(),
        explanation: Some(format!("Right {n} is right.")),
    }
}

/// A labelled question with a custom text and answer letter.
#[must_use]
pub fn question(text: &str, options: [&str; 4], answer: &str) -> Question {
    Question {
        question: text.to_owned(),
        options: options.iter().map(ToString::to_string).collect(),
        answer: answer.to_owned(),
        explanation: None,
    }
}
