use adaquiz_model::question::{AnswerChoice, OptionLetter};

/// Returns the letter an option is labelled with, e.g. `B` for `"B. Mitochondria"`.
#[must_use]
pub fn option_letter(option: &str) -> Option<OptionLetter> {
    OptionLetter::ALL
        .into_iter()
        .find(|letter| option.starts_with(&letter.prefix()))
}

/// The option text without its label.
#[must_use]
pub fn option_body(option: &str) -> &str {
    match option_letter(option) {
        Some(_) => option[3..].trim(),
        None => option.trim(),
    }
}

/// Adds `"A. "`..`"D. "` labels to options that have none, by position.
///
/// Options that already carry a label are left untouched.
#[must_use]
pub fn label_options(options: Vec<String>) -> Vec<String> {
    options
        .into_iter()
        .enumerate()
        .map(|(index, option)| {
            if option_letter(&option).is_some() {
                return option;
            }
            match OptionLetter::from_index(index) {
                Some(letter) => format!("{}{}", letter.prefix(), option.trim()),
                None => option,
            }
        })
        .collect()
}

/// The text in front of the first `.`, or the whole answer if there is none. Not trimmed.
#[must_use]
pub fn leading_label(answer: &str) -> &str {
    answer.split_once('.').map_or(answer, |(label, _)| label)
}

/// Matches an answer against labelled options.
///
/// The answer may be a bare letter (`"B"`), a labelled option (`"B. Mitochondria"`) or the option body
/// alone (`"Mitochondria"`).
#[must_use]
pub fn resolve_answer(options: &[String], answer: &str) -> Option<AnswerChoice> {
    let by_letter = OptionLetter::parse_label(leading_label(answer))
        .and_then(|letter| options.iter().find(|option| option_letter(option) == Some(letter)));

    let by_text = || {
        let answer = answer.trim();
        options.iter().find(|option| {
            option.trim().eq_ignore_ascii_case(answer) || option_body(option).eq_ignore_ascii_case(answer)
        })
    };

    let option = by_letter.or_else(by_text)?;
    Some(AnswerChoice {
        letter: option_letter(option)?,
        text: option.clone(),
    })
}
