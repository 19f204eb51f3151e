//! Client transport to the chat proxy

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use url::Url;

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::Result;
use rave_capture::Attachment;

/// One outbound exchange, built by the composer at send time.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
    pub attachment: Option<Attachment>,
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Deliver the request and return the proxy's JSON reply.
    async fn send(&self, request: ChatRequest) -> Result<Value>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: config.proxy_url.join("api/chat")?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn build_form(request: ChatRequest, attachment: Attachment) -> Result<Form> {
        let part = Part::bytes(attachment.bytes)
            .file_name(attachment.name)
            .mime_str(&attachment.mime_type)?;

        let mut form = Form::new().text("sessionId", request.session_id);
        if !request.message.is_empty() {
            form = form.text("message", request.message);
        }
        Ok(form.part("file", part))
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, mut request: ChatRequest) -> Result<Value> {
        let builder = self.client.post(self.endpoint.clone());

        let builder = match request.attachment.take() {
            Some(attachment) => builder.multipart(Self::build_form(request, attachment)?),
            None => builder.json(&serde_json::json!({
                "message": request.message,
                "sessionId": request.session_id,
            })),
        };

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), details = %details, "Proxy reported failure");
            return Err(CoreError::Backend {
                status: status.as_u16(),
                details,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Pick the assistant's display text out of a webhook reply.
///
/// Prefers a non-empty `output` string, then a non-empty `message` string,
/// and otherwise shows the whole reply serialized.
pub fn extract_reply(reply: &Value) -> String {
    ["output", "message"]
        .iter()
        .find_map(|key| {
            reply
                .get(key)
                .and_then(Value::as_str)
                .filter(|text| !text.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| reply.to_string())
}
