//! quizgen-core — Core assessment pipeline for quizgen.
//!
//! This crate defines the data model, the sanitize→build→grade pipeline
//! for AI-generated quiz content, and the orchestrating engine that the
//! provider and store crates plug into.

pub mod builder;
pub mod engine;
pub mod error;
pub mod grading;
pub mod model;
pub mod prompt;
pub mod sanitize;
pub mod traits;
