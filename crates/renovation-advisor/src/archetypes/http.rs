use std::future::Future;

use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::debug;

use super::domain::{ArchetypeKey, ArchetypeRecord};
use super::payload::ArchetypePayload;
use super::source::{ArchetypeSource, SourceError};
use crate::config::ArchetypeServiceConfig;

/// reqwest-backed client for the archetype-data service.
#[derive(Debug, Clone)]
pub struct HttpArchetypeSource {
    client: Client,
    base_url: Url,
}

impl HttpArchetypeSource {
    pub fn new(config: &ArchetypeServiceConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| SourceError::Transport(err.to_string()))?;

        Ok(Self::with_client(client, config.base_url.clone()))
    }

    pub fn with_client(client: Client, mut base_url: Url) -> Self {
        // `Url::join` replaces the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { client, base_url }
    }

    pub fn listing_url(&self) -> Result<Url, SourceError> {
        self.endpoint("archetypes")
    }

    pub fn detail_url(&self, key: &ArchetypeKey) -> Result<Url, SourceError> {
        let mut url = self.endpoint("archetypes/detail")?;
        url.query_pairs_mut()
            .append_pair("category", &key.category)
            .append_pair("country", &key.country)
            .append_pair("name", &key.name);
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> Result<Url, SourceError> {
        self.base_url
            .join(path)
            .map_err(|err| SourceError::Transport(format!("invalid endpoint '{path}': {err}")))
    }

    async fn get_json(&self, url: Url) -> Result<Value, SourceError> {
        debug!(%url, "requesting archetype data");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_transport)?;

        match response.status() {
            status if status.is_success() => response.json::<Value>().await.map_err(map_transport),
            StatusCode::NOT_FOUND => Err(SourceError::NotFound),
            status => Err(SourceError::Status {
                status: status.as_u16(),
            }),
        }
    }
}

fn map_transport(err: reqwest::Error) -> SourceError {
    if err.is_decode() {
        SourceError::Decode(err.to_string())
    } else {
        SourceError::Transport(err.to_string())
    }
}

impl ArchetypeSource for HttpArchetypeSource {
    fn list_archetypes(
        &self,
    ) -> impl Future<Output = Result<Vec<ArchetypeRecord>, SourceError>> + Send {
        async move {
            let body = self.get_json(self.listing_url()?).await?;
            serde_json::from_value(body)
                .map_err(|err| SourceError::Decode(format!("archetype listing: {err}")))
        }
    }

    fn fetch_archetype(
        &self,
        key: &ArchetypeKey,
    ) -> impl Future<Output = Result<ArchetypePayload, SourceError>> + Send {
        async move {
            let body = self.get_json(self.detail_url(key)?).await?;
            ArchetypePayload::ingest(body)
        }
    }
}
