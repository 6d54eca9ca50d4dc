//! Chat client for OpenRouter using the OpenAI-compatible API

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use futures::StreamExt;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::LlmSettings;
use crate::error::{ChatError, Result};

/// A chat-completion request
///
/// A request without an explicit model is served by the default model
/// from the settings the client was built with.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub messages: Vec<ChatCompletionRequestMessage>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl ChatRequest {
    /// Create a request from a list of messages
    pub fn new(messages: Vec<ChatCompletionRequestMessage>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    /// Override the model for this request
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the completion token limit
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Model serving this request: the explicit override or the default
    fn resolve_model(&self, settings: &LlmSettings) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| settings.default_model.clone())
    }
}

/// Token usage reported by the gateway
#[derive(Debug, Clone, Copy)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Reply to a chat-completion request
#[derive(Debug, Clone)]
pub struct ChatReply {
    /// Assistant message content
    pub content: String,
    /// Model that served the request (may differ from the one requested)
    pub model: String,
    /// Token usage, when the gateway reports it
    pub usage: Option<TokenUsage>,
}

/// Client for the OpenRouter chat-completions API
pub struct ChatClient {
    settings: LlmSettings,
    client: Client<OpenAIConfig>,
}

impl ChatClient {
    /// Create a new ChatClient from settings
    pub fn new(settings: &LlmSettings) -> Self {
        let client = Client::with_config(settings.client_config());

        Self {
            settings: settings.clone(),
            client,
        }
    }

    /// Settings this client was built with
    pub fn settings(&self) -> &LlmSettings {
        &self.settings
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.timeout_secs)
    }

    /// Test connection to the gateway by sending a minimal request
    pub async fn test_connection(&self) -> Result<()> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.settings.default_model)
            .max_tokens(5_u32)
            .messages(vec![ChatCompletionRequestUserMessageArgs::default()
                .content("Hi")
                .build()?
                .into()])
            .build()?;

        let response = timeout(self.request_timeout(), self.client.chat().create(request))
            .await
            .map_err(|_| ChatError::Timeout(self.request_timeout()))??;

        if response.choices.is_empty() {
            return Err(ChatError::EmptyResponse);
        }

        Ok(())
    }

    /// Send a chat-completion request and wait for the full reply
    pub async fn complete(&self, request: ChatRequest) -> Result<ChatReply> {
        if request.messages.is_empty() {
            return Err(ChatError::InvalidRequest("no messages".to_string()));
        }

        let model = request.resolve_model(&self.settings);
        debug!(model = %model, "sending chat completion request");

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&model).messages(request.messages);
        if let Some(max_tokens) = request.max_tokens {
            args.max_tokens(max_tokens);
        }
        if let Some(temperature) = request.temperature {
            args.temperature(temperature);
        }

        let response = timeout(
            self.request_timeout(),
            self.client.chat().create(args.build()?),
        )
        .await
        .map_err(|_| ChatError::Timeout(self.request_timeout()))??;

        let usage = response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(ChatError::EmptyResponse)?;

        let content = choice.message.content.unwrap_or_default();
        if content.is_empty() {
            warn!(model = %model, "model returned empty content");
        }

        Ok(ChatReply {
            content,
            model: response.model,
            usage,
        })
    }

    /// Send a chat-completion request, delivering content deltas to
    /// `on_delta` as they arrive. Returns the assembled reply.
    ///
    /// The streaming API does not report token usage.
    pub async fn stream<F>(&self, request: ChatRequest, mut on_delta: F) -> Result<ChatReply>
    where
        F: FnMut(&str),
    {
        if request.messages.is_empty() {
            return Err(ChatError::InvalidRequest("no messages".to_string()));
        }

        let model = request.resolve_model(&self.settings);
        debug!(model = %model, "sending streaming chat completion request");

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&model).messages(request.messages).stream(true);
        if let Some(max_tokens) = request.max_tokens {
            args.max_tokens(max_tokens);
        }
        if let Some(temperature) = request.temperature {
            args.temperature(temperature);
        }

        let mut stream = timeout(
            self.request_timeout(),
            self.client.chat().create_stream(args.build()?),
        )
        .await
        .map_err(|_| ChatError::Timeout(self.request_timeout()))??;

        let mut content = String::new();
        let mut served_model = model.clone();

        while let Some(result) = stream.next().await {
            let response = result?;
            served_model = response.model;
            for choice in response.choices {
                if let Some(delta) = choice.delta.content {
                    on_delta(&delta);
                    content.push_str(&delta);
                }
            }
        }

        Ok(ChatReply {
            content,
            model: served_model,
            usage: None,
        })
    }
}

/// Helper for building conversation messages
pub struct MessageBuilder;

impl MessageBuilder {
    /// Create a system message
    pub fn system(content: &str) -> ChatCompletionRequestMessage {
        ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()
            .unwrap()
            .into()
    }

    /// Create a user message
    pub fn user(content: &str) -> ChatCompletionRequestMessage {
        ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .unwrap()
            .into()
    }

    /// Create an assistant message
    pub fn assistant(content: &str) -> ChatCompletionRequestMessage {
        ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()
            .unwrap()
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_default_model() {
        let settings = LlmSettings::default();
        let request = ChatRequest::new(vec![MessageBuilder::user("hello")]);
        assert_eq!(request.resolve_model(&settings), "google/gemini-2.5-flash");
    }

    #[test]
    fn test_request_model_override() {
        let settings = LlmSettings::default();
        let request = ChatRequest::new(vec![MessageBuilder::user("hello")])
            .with_model("deepseek/deepseek-r1");
        assert_eq!(request.resolve_model(&settings), "deepseek/deepseek-r1");
    }

    #[test]
    fn test_request_builder() {
        let request = ChatRequest::new(vec![MessageBuilder::user("hello")])
            .with_max_tokens(256)
            .with_temperature(0.2);

        assert_eq!(request.max_tokens, Some(256));
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.model, None);
        assert_eq!(request.messages.len(), 1);
    }

    #[test]
    fn test_message_builder_roles() {
        assert!(matches!(
            MessageBuilder::system("s"),
            ChatCompletionRequestMessage::System(_)
        ));
        assert!(matches!(
            MessageBuilder::user("u"),
            ChatCompletionRequestMessage::User(_)
        ));
        assert!(matches!(
            MessageBuilder::assistant("a"),
            ChatCompletionRequestMessage::Assistant(_)
        ));
    }

    #[test]
    fn test_client_keeps_settings() {
        let settings = LlmSettings::default().with_api_key("test-key");
        let client = ChatClient::new(&settings);
        assert_eq!(client.settings(), &settings);
    }
}
