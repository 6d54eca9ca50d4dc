//! Model client module for chat completions
//!
//! This module provides:
//! - `client`: OpenAI-compatible chat client for OpenRouter

mod client;

pub use client::{ChatClient, ChatReply, ChatRequest, MessageBuilder, TokenUsage};

// Message type callers hold conversation history in
pub use async_openai::types::ChatCompletionRequestMessage;
