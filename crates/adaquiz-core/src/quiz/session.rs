use adaquiz_model::question::{AnswerChoice, Question, UserResponse};
use adaquiz_model::results::{QuizResults, ResultDetail};
use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::quiz::error::{GenerationError, SessionError};
use crate::quiz::generator::{IssuedQuestion, PreviousAnswer, QuestionGenerator, generate_question};
use crate::quiz::options::leading_label;
use crate::quiz::{MAX_QUESTIONS, difficulty_for};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    NextQuestion(Question),
    /// The question cap is reached, the caller should finalize the session.
    Complete,
}

/// One answered question of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsweredQuestion {
    pub question: String,
    pub user_answer: String,
    pub correct: AnswerChoice,
}

impl AnsweredQuestion {
    /// Compares the text in front of the first `.` of the user's answer with the correct letter, exactly.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        leading_label(&self.user_answer) == self.correct.letter.to_string()
    }
}

/// State of a single quiz attempt.
///
/// Questions, user answers and correct answers are kept as one list of [`AnsweredQuestion`] so the
/// three histories can never drift apart.
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    topic: String,
    history: Vec<AnsweredQuestion>,
    pending: Option<IssuedQuestion>,
    started_at: Option<DateTime<Utc>>,
    question_count: usize,
    last_activity: DateTime<Utc>,
}

impl QuizSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_activity: Utc::now(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        match (&self.pending, self.question_count) {
            (None, _) => SessionState::Empty,
            (Some(_), count) if count >= MAX_QUESTIONS => SessionState::Completed,
            (Some(_), _) => SessionState::InProgress,
        }
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn history(&self) -> &[AnsweredQuestion] {
        &self.history
    }

    #[must_use]
    pub fn pending(&self) -> Option<&IssuedQuestion> {
        self.pending.as_ref()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// Starts the session over with a fresh medium question.
    ///
    /// The session is only reset once the question was generated, a failed start keeps the old state.
    #[instrument(skip(self, generator))]
    pub async fn start(&mut self, generator: &dyn QuestionGenerator, topic: &str) -> Result<Question, GenerationError> {
        let issued = generate_question(generator, topic, difficulty_for(true, None), None).await?;
        let now = Utc::now();

        *self = Self {
            topic: topic.to_owned(),
            history: Vec::new(),
            pending: Some(issued.clone()),
            started_at: Some(now),
            question_count: 1,
            last_activity: now,
        };

        tracing::info!(%topic, "quiz session started");
        Ok(issued.question)
    }

    /// Records the answer to the pending question and fetches the next one.
    ///
    /// Nothing is recorded when the cap is reached or the generator fails, so a failed call can be
    /// retried with the same response.
    #[instrument(skip_all, fields(question_count = self.question_count))]
    pub async fn advance(
        &mut self,
        generator: &dyn QuestionGenerator,
        response: &UserResponse,
    ) -> Result<AdvanceOutcome, SessionError> {
        let Some(pending) = &self.pending else {
            return Err(SessionError::NotStarted);
        };
        self.last_activity = Utc::now();

        if self.question_count >= MAX_QUESTIONS {
            tracing::debug!("question cap reached");
            return Ok(AdvanceOutcome::Complete);
        }

        if pending.question.question != response.previous_question {
            tracing::warn!("answered question does not match the question issued last");
        }

        let topic = if response.topic.trim().is_empty() {
            self.topic.clone()
        } else {
            response.topic.clone()
        };
        let difficulty = difficulty_for(false, Some(response.response_correct));
        let previous = PreviousAnswer {
            question: response.previous_question.clone(),
            answer: response.user_answer.clone(),
            was_correct: response.response_correct,
        };

        let next = generate_question(generator, &topic, difficulty, Some(previous)).await?;

        if let Some(answered) = self.pending.replace(next.clone()) {
            self.history.push(AnsweredQuestion {
                question: response.previous_question.clone(),
                user_answer: response.user_answer.clone(),
                correct: answered.correct,
            });
        }
        self.question_count += 1;
        self.last_activity = Utc::now();

        tracing::debug!(%difficulty, answered = self.history.len(), "issued next question");
        Ok(AdvanceOutcome::NextQuestion(next.question))
    }

    /// Scores the session and resets it.
    pub fn finalize(&mut self) -> QuizResults {
        self.finalize_at(Utc::now())
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn finalize_at(&mut self, now: DateTime<Utc>) -> QuizResults {
        let session = std::mem::replace(self, Self::new());

        let Some(started_at) = session.started_at else {
            return QuizResults::empty();
        };

        let total_questions = session.history.len();
        let correct_answers = session.history.iter().filter(|answered| answered.is_correct()).count();
        let elapsed_time = (now - started_at).num_milliseconds().max(0) as f64 / 1000.0;

        let details = session
            .history
            .into_iter()
            .map(|answered| ResultDetail {
                question: answered.question,
                correct_answer: answered.correct.text,
                user_answer: answered.user_answer,
            })
            .collect();

        QuizResults {
            total_questions,
            correct_answers,
            score: format!("{correct_answers}/{total_questions}"),
            elapsed_time,
            details,
        }
    }
}
