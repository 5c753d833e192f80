use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};

use super::types::{MarkReadRequest, Message, SendRequest};

/// Errors that can occur while talking to the chat server.
#[derive(Debug)]
pub enum ApiError {
    /// Client misconfigured (bad base URL, TLS setup). Not retryable.
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Server answered with a non-success status.
    Api { status: u16, message: String },
    /// Response body was not the expected JSON.
    Parse(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Config(msg) => write!(f, "config error: {msg}"),
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// The three calls the chat screen makes against the server.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Full message list, in the server's order (newest first).
    async fn list_messages(&self) -> Result<Vec<Message>, ApiError>;

    /// Appends a message from `sender`.
    async fn send_message(&self, sender: &str, body: &str) -> Result<(), ApiError>;

    /// Tells the server that `sender` has seen the conversation.
    async fn mark_read(&self, sender: &str) -> Result<(), ApiError>;
}

/// `ChatBackend` over HTTP + JSON.
pub struct HttpChatBackend {
    base_url: String,
    extension: Option<String>,
    client: reqwest::Client,
}

impl HttpChatBackend {
    pub fn new(
        base_url: &str,
        extension: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            extension: extension.filter(|ext| !ext.trim().is_empty()),
            client,
        })
    }

    /// `{base}/{name}` or `{base}/{name}.{ext}`.
    fn endpoint(&self, name: &str) -> String {
        match &self.extension {
            Some(ext) => format!("{}/{}.{}", self.base_url, name, ext.trim_start_matches('.')),
            None => format!("{}/{}", self.base_url, name),
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        warn!("Chat server error: {} - {}", status, message);
        Err(ApiError::Api { status, message })
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn list_messages(&self) -> Result<Vec<Message>, ApiError> {
        let url = self.endpoint("listar");
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let response = Self::check(response).await?;

        let messages: Vec<Message> = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        debug!("Listed {} messages", messages.len());
        Ok(messages)
    }

    async fn send_message(&self, sender: &str, body: &str) -> Result<(), ApiError> {
        let url = self.endpoint("enviar");
        debug!("POST {} (sender={}, len={})", url, sender, body.len());

        let response = self
            .client
            .post(&url)
            .json(&SendRequest { sender, body })
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::check(response).await?;
        Ok(())
    }

    async fn mark_read(&self, sender: &str) -> Result<(), ApiError> {
        let url = self.endpoint("marcar_lido");
        debug!("POST {} (sender={})", url, sender);

        let response = self
            .client
            .post(&url)
            .json(&MarkReadRequest { sender })
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base: &str, ext: Option<&str>) -> HttpChatBackend {
        HttpChatBackend::new(base, ext.map(String::from), Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_endpoint_without_extension() {
        let b = backend("http://host/chat/", None);
        assert_eq!(b.endpoint("listar"), "http://host/chat/listar");
    }

    #[test]
    fn test_endpoint_with_extension() {
        let b = backend("http://host/chat", Some(".php"));
        assert_eq!(b.endpoint("marcar_lido"), "http://host/chat/marcar_lido.php");
    }

    #[test]
    fn test_blank_extension_ignored() {
        let b = backend("http://host/chat", Some("  "));
        assert_eq!(b.endpoint("enviar"), "http://host/chat/enviar");
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 500): boom");
    }
}
