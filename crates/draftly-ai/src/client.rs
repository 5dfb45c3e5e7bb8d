//! Transport initiator and incremental reply assembler

use futures::StreamExt;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;

use crate::config::ChatConfig;
use crate::conversation::{Conversation, Message, Role};
use crate::error::{ChatError, Result};
use crate::sse::SseDecoder;

const DISABLE_SYSTEM_PROXY_ENV: &str = "DRAFTLY_DISABLE_SYSTEM_PROXY";

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: Vec<WireMessage<'a>>,
    #[serde(rename = "type")]
    purpose: &'a str,
}

/// Minimal `{role, content}` wire shape; local message ids are stripped.
#[derive(Serialize)]
struct WireMessage<'a> {
    role: Role,
    content: &'a str,
}

/// Client for the streaming completion endpoint.
///
/// One request per user turn, no automatic retry. The decode loop is the
/// sole reader of the response body; deltas are applied and published in
/// the exact order their frames were decoded.
pub struct ChatClient {
    client: Client,
    config: ChatConfig,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Self {
        Self {
            client: Self::build_http_client(),
            config,
        }
    }

    // A loopback mock server must stay reachable when a system proxy is
    // configured: unit tests always bypass the proxy, other processes opt
    // out via the env var.
    fn build_http_client() -> Client {
        if cfg!(test) || std::env::var_os(DISABLE_SYSTEM_PROXY_ENV).is_some() {
            Client::builder()
                .no_proxy()
                .build()
                .expect("Failed to build reqwest client")
        } else {
            Client::new()
        }
    }

    /// Open one completion request and classify the status before any body
    /// byte is read.
    async fn open_stream(&self, conversation: &Conversation, purpose: &str) -> Result<Response> {
        let body = ChatRequest {
            messages: conversation
                .messages()
                .iter()
                .map(|m| WireMessage {
                    role: m.role,
                    content: &m.content,
                })
                .collect(),
            purpose,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!("completion service rate limited this turn");
            return Err(ChatError::RateLimited {
                retry_after_secs: parse_retry_after(&response),
            });
        }
        if status == StatusCode::PAYMENT_REQUIRED {
            tracing::warn!("completion service requires payment");
            return Err(ChatError::PaymentRequired);
        }
        if !status.is_success() {
            return Err(transport_error(response).await);
        }

        Ok(response)
    }

    /// Stream one assistant reply for the conversation.
    ///
    /// `on_update` runs once per decoded delta with the updated assistant
    /// message. Resolves with the completed message when the transport
    /// signals end-of-stream. On a mid-stream read error the deltas
    /// already published stay with the caller; nothing is rolled back.
    pub async fn stream_reply<F>(
        &self,
        conversation: &Conversation,
        purpose: &str,
        mut on_update: F,
    ) -> Result<Message>
    where
        F: FnMut(&Message),
    {
        let response = self.open_stream(conversation, purpose).await?;
        tracing::debug!(status = %response.status(), "completion stream open");

        let mut reply = Message::assistant_draft();
        let mut decoder = SseDecoder::new();
        let mut body = response.bytes_stream();

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|err| ChatError::Decode(err.to_string()))?;
            for delta in decoder.push_chunk(&chunk) {
                reply.content.push_str(&delta);
                on_update(&reply);
            }
        }

        tracing::debug!(chars = reply.content.len(), "completion stream done");
        Ok(reply)
    }
}

fn parse_retry_after(response: &Response) -> Option<u64> {
    response
        .headers()
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
}

async fn transport_error(response: Response) -> ChatError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    // Truncate error body to prevent leaking large or sensitive responses.
    const MAX_ERROR_BODY: usize = 512;
    let message = match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((cut, _)) => format!("{}... [truncated]", &body[..cut]),
        None => body,
    };

    ChatError::Transport { status, message }
}
