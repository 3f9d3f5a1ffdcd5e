pub mod flashcard;
pub mod question;
pub mod results;
pub mod status;
