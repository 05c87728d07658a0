//! Answer generation: OpenAI client and grounding prompts

pub mod openai;
pub mod prompt;

pub use openai::OpenAiClient;
pub use prompt::PromptBuilder;
