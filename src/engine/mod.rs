pub mod engine;
pub mod instructions;
pub mod llm_client;
pub mod moderator;
pub mod protocol;
pub mod resolution;
pub mod speech_parser;
