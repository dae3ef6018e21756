//! Profile document service client.

use async_trait::async_trait;
use concierge_chat::{ChatError, ProfileLookup};
use concierge_core::config::ServicesConfig;
use concierge_core::{Identity, ProfileRecord, Result};
use reqwest::StatusCode;
use tracing::debug;

use crate::http::{build_client, with_api_key};

fn lookup_err(e: impl std::fmt::Display) -> ChatError {
    ChatError::LookupError(e.to_string())
}

/// Reads `GET {base}/profiles/{identity}`.
///
/// A 404 means the user has no profile yet and maps to `Ok(None)`.
pub struct HttpProfileLookup {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpProfileLookup {
    pub fn new(config: &ServicesConfig) -> Result<Self> {
        Ok(Self {
            http: build_client(config)?,
            base_url: config.profile_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn profile_url(&self, identity: &Identity) -> String {
        format!(
            "{}/profiles/{}",
            self.base_url,
            urlencoding::encode(identity.as_str())
        )
    }
}

#[async_trait]
impl ProfileLookup for HttpProfileLookup {
    async fn lookup(
        &self,
        identity: &Identity,
    ) -> std::result::Result<Option<ProfileRecord>, ChatError> {
        let req = with_api_key(
            self.http.get(self.profile_url(identity)),
            self.api_key.as_deref(),
        );
        let resp = req.send().await.map_err(lookup_err)?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            debug!(%identity, "No profile document");
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChatError::LookupError(format!(
                "profile service error ({}): {}",
                status, body
            )));
        }

        resp.json::<ProfileRecord>()
            .await
            .map(Some)
            .map_err(lookup_err)
    }
}
