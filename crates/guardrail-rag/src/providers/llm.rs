//! LLM provider trait for generating answers

use async_trait::async_trait;
use crate::error::Result;
use crate::generation::PromptBuilder;

/// Trait for LLM-based answer generation
///
/// Implementations:
/// - `OpenAiLlm`: OpenAI chat completions (gpt-4o-mini)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a prompt and return the model's text reply
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Answer `question` using only `context`, under the grounding contract
    async fn generate_answer(&self, question: &str, context: &str) -> Result<String> {
        let prompt = PromptBuilder::build_grounded_prompt(question, context);
        self.complete(&prompt).await
    }

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get the model being used
    fn model(&self) -> String;
}
