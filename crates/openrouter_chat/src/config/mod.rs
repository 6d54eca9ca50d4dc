//! Configuration module for openrouter_chat
//!
//! This module contains:
//! - `settings`: startup settings resolved once from the environment

mod settings;

pub use settings::{
    LlmSettings, API_KEY_ENV, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, OPENROUTER_BASE_URL,
};
