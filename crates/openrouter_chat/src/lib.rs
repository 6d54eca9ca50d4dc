//! openrouter_chat: chat-completion client for the OpenRouter gateway
//!
//! This library provides:
//! - Startup settings resolved once from the environment
//!   (`OPENROUTER_API_KEY`, tolerated when absent)
//! - An OpenAI-compatible chat client addressing OpenRouter
//! - Streaming and non-streaming request paths
//!
//! # Example
//!
//! ```no_run
//! use openrouter_chat::{ChatClient, ChatRequest, LlmSettings, MessageBuilder};
//!
//! #[tokio::main]
//! async fn main() {
//!     let settings = LlmSettings::from_env();
//!     let client = ChatClient::new(&settings);
//!
//!     let request = ChatRequest::new(vec![MessageBuilder::user("Hello!")]);
//!     let reply = client.complete(request).await;
//!     println!("Reply: {:?}", reply);
//! }
//! ```

// Core modules
pub mod error;

// Configuration module
pub mod config;

// Model client
pub mod model;

// Re-export commonly used types and functions
pub use error::{ChatError, Result};

// Config re-exports
pub use config::{
    LlmSettings, API_KEY_ENV, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, OPENROUTER_BASE_URL,
};

// Model re-exports
pub use model::{
    ChatClient, ChatCompletionRequestMessage, ChatReply, ChatRequest, MessageBuilder, TokenUsage,
};
