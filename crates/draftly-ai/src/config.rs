//! Client configuration

/// Explicit configuration for the completion endpoint.
///
/// Owned by the process that starts a chat session and passed into
/// [`ChatClient::new`](crate::ChatClient::new); the client never reads
/// ambient environment state itself.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Full URL of the completion endpoint.
    pub endpoint: String,
    /// Bearer token sent with every request.
    pub api_key: String,
}

impl ChatConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}
