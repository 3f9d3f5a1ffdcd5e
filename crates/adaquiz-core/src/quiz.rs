use adaquiz_model::question::Difficulty;

pub mod error;
pub mod generator;
pub mod options;
pub mod prompt;
pub mod session;
pub mod store;

/// Number of questions a single session may issue, the first one included.
pub const MAX_QUESTIONS: usize = 6;

/// Picks the difficulty of the next question.
///
/// The first question of a session is always [`Difficulty::Medium`]. After that the quiz gets harder
/// after a correct answer and easier otherwise; an unknown outcome counts as incorrect.
#[must_use]
pub fn difficulty_for(is_first: bool, previous_was_correct: Option<bool>) -> Difficulty {
    if is_first {
        return Difficulty::Medium;
    }
    if previous_was_correct.unwrap_or(false) {
        Difficulty::Harder
    } else {
        Difficulty::Easier
    }
}
