//! Chat-completions backed implementations of the pipeline's classifier traits.

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
mod prompt;

pub use client::OpenAiClassifier;
pub use config::LlmConfig;
pub use error::LlmError;
