use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Difficulty label handed to the model when asking for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, IntoStaticStr)]
pub enum Difficulty {
    Medium,
    Harder,
    Easier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
}

impl OptionLetter {
    pub const ALL: [OptionLetter; 4] = [OptionLetter::A, OptionLetter::B, OptionLetter::C, OptionLetter::D];

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The label written in front of an option, e.g. `"B. "`.
    #[must_use]
    pub fn prefix(self) -> String {
        format!("{self}. ")
    }

    /// Parses a bare label such as `"B"` or `" b "`.
    #[must_use]
    pub fn parse_label(label: &str) -> Option<Self> {
        let mut chars = label.trim().chars();
        let first = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        match first.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            _ => None,
        }
    }
}

/// The correct answer of a question, resolved against its labelled options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerChoice {
    pub letter: OptionLetter,
    /// The full labelled option, e.g. `"B. Mitochondria"`.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// What the client reports after answering the question it was shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub user_answer: String,
    pub previous_question: String,
    pub response_correct: bool,
    pub topic: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_label() {
        assert_eq!(OptionLetter::parse_label("A"), Some(OptionLetter::A));
        assert_eq!(OptionLetter::parse_label(" d "), Some(OptionLetter::D));
        assert_eq!(OptionLetter::parse_label("E"), None);
        assert_eq!(OptionLetter::parse_label("AB"), None);
        assert_eq!(OptionLetter::parse_label(""), None);
    }

    #[test]
    fn test_letter_index() {
        assert_eq!(OptionLetter::from_index(2), Some(OptionLetter::C));
        assert_eq!(OptionLetter::from_index(4), None);
        assert_eq!(OptionLetter::D.index(), 3);
        assert_eq!(OptionLetter::B.prefix(), "B. ");
    }

    #[test]
    fn test_difficulty_labels() {
        assert_eq!(Difficulty::Medium.to_string(), "Medium");
        assert_eq!("Harder".parse::<Difficulty>().ok(), Some(Difficulty::Harder));
    }

    #[test]
    fn test_question_without_explanation() {
        let question: Question = serde_json::from_value(serde_json::json!({
            "question": "What is 2 + 2?",
            "options": ["A. 3", "B. 4", "C. 5", "D. 22"],
            "answer": "B"
        }))
        .unwrap();
        assert_eq!(question.explanation, None);
        assert_eq!(question.options.len(), 4);
    }
}
