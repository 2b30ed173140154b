use crate::config::OmdbConfig;
use crate::http::HttpClient;
use crate::models::{MovieDetail, SearchResponse, SearchResultItem};
use crate::source::{LookupError, MovieSource};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, instrument};

pub struct OmdbClient {
    http: HttpClient,
    config: OmdbConfig,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Search", default)]
    search: Vec<SearchResultItem>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl From<SearchEnvelope> for SearchResponse {
    fn from(envelope: SearchEnvelope) -> Self {
        // Anything other than "True" counts as no match.
        if envelope.response == "True" {
            SearchResponse::Found(envelope.search)
        } else {
            SearchResponse::NotFound {
                reason: envelope.error,
            }
        }
    }
}

impl OmdbClient {
    pub fn new(http: HttpClient, config: OmdbConfig) -> Self {
        Self { http, config }
    }

    fn endpoint(&self, param: &str, value: &str) -> String {
        let separator = if self.config.base_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}apikey={}&{}={}",
            self.config.base_url,
            separator,
            urlencoding::encode(&self.config.api_key),
            param,
            urlencoding::encode(value)
        )
    }
}

#[async_trait]
impl MovieSource for OmdbClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<SearchResponse, LookupError> {
        let url = self.endpoint("s", query);
        let envelope: SearchEnvelope = self.http.get_json(&url).await?;
        let response = SearchResponse::from(envelope);

        match &response {
            SearchResponse::Found(items) => info!("Search returned {} movies", items.len()),
            SearchResponse::NotFound { reason } => info!("Search found nothing: {:?}", reason),
        }

        Ok(response)
    }

    #[instrument(skip(self))]
    async fn details(&self, id: &str) -> Result<MovieDetail, LookupError> {
        let url = self.endpoint("i", id);
        let detail: MovieDetail = self.http.get_json(&url).await?;
        info!("Loaded details for {} ({})", detail.title, id);
        Ok(detail)
    }
}
