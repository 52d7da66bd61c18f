//! Language model access: the chat client and the classification and
//! interpretation prompts built on top of it.

pub mod client;
pub mod prompts;

pub use client::{ChatMessage, ChatModel, LlmConfig, OpenAiClient};
pub use prompts::{classify, interpret};
