//! quizgen-providers — generative AI backend integrations.
//!
//! Implements the `TextGenerator` trait for Gemini and OpenAI-compatible
//! endpoints, allowing quizgen to build course content from multiple
//! backends.

pub mod config;
pub mod error;
pub mod gemini;
pub mod mock;
pub mod openai;

pub use config::{create_generator, load_config, ProviderConfig, QuizgenConfig};
pub use error::ProviderError;
