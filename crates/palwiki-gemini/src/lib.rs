//! Minimal client for the Gemini `generateContent` REST endpoint.

pub mod client;
pub mod error;
pub mod types;

pub use client::{GeminiClient, DEFAULT_BASE_URL};
pub use error::GeminiError;
