//! Generative free-text backend client.

use async_trait::async_trait;
use concierge_chat::{replies, ChatError, FreeTextResponder};
use concierge_core::config::ServicesConfig;
use concierge_core::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::http::{build_client, with_api_key};

fn responder_err(e: impl std::fmt::Display) -> ChatError {
    ChatError::ResponderError(e.to_string())
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default, alias = "response")]
    reply: Option<String>,
}

/// Posts `{"message": ..}` to the responder endpoint and returns its text.
pub struct HttpFreeTextResponder {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpFreeTextResponder {
    pub fn new(config: &ServicesConfig) -> Result<Self> {
        Ok(Self {
            http: build_client(config)?,
            url: config.responder_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl FreeTextResponder for HttpFreeTextResponder {
    async fn respond(&self, utterance: &str) -> std::result::Result<String, ChatError> {
        let req = with_api_key(
            self.http.post(&self.url).json(&ChatRequest { message: utterance }),
            self.api_key.as_deref(),
        );
        let resp = req.send().await.map_err(responder_err)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChatError::ResponderError(format!(
                "responder error ({}): {}",
                status, body
            )));
        }

        let body: ChatResponse = resp.json().await.map_err(responder_err)?;
        match body.reply.filter(|r| !r.trim().is_empty()) {
            Some(reply) => Ok(reply),
            None => {
                debug!("Responder returned no text");
                Ok(replies::RESPONDER_EMPTY.to_string())
            }
        }
    }
}
