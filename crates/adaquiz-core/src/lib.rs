pub mod flashcards;
pub mod llm_config;
pub mod openai;
pub mod quiz;
