//! Text-generation seam.

use async_trait::async_trait;
use palwiki_gemini::GeminiClient;

use crate::error::SynthesisError;

/// Turns a prompt into generated text.
///
/// Callers cancel an in-flight generation by dropping the returned future.
#[async_trait]
pub trait ContentSynthesizer: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, SynthesisError>;
}

#[async_trait]
impl ContentSynthesizer for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, SynthesisError> {
        Ok(self.generate_content(prompt).await?)
    }
}
