pub mod types;
pub mod traits;
pub mod config;
pub mod error;
pub mod openai;
pub mod prompts;
pub mod summarizer;

pub use traits::{ChatClient, ChatRequest, ChatResponse, ChatOptions, TokenUsage};
pub use config::{OpenAIConfig, DEFAULT_MODEL};
pub use error::{LlmError, Result};
pub use openai::OpenAIClient;
pub use summarizer::{
    AuthorContext, DetailedAnalysis, OpenAISummarizer, Summarizer, Summary,
};
pub use types::Message;
