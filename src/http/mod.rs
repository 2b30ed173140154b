use crate::source::LookupError;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, instrument};

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Without a timeout a hung request stays pending until it is cancelled.
    pub fn new(timeout: Option<Duration>, user_agent: Option<&str>) -> Result<Self, LookupError> {
        let mut builder = Client::builder()
            .user_agent(user_agent.unwrap_or(concat!("popcorn/", env!("CARGO_PKG_VERSION"))));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    #[instrument(skip(self), fields(url = %redact(url)))]
    pub async fn get(&self, url: &str) -> Result<Response, LookupError> {
        debug!("Making GET request");
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            error!("HTTP request failed with status: {}", response.status());
            return Err(LookupError::Status(response.status()));
        }

        Ok(response)
    }

    #[instrument(skip(self), fields(url = %redact(url)))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, LookupError> {
        let response = self.get(url).await?;
        let body = response.text().await?;
        debug!("Received {} bytes", body.len());
        Ok(serde_json::from_str(&body)?)
    }
}

/// Hides the api key value in logged URLs.
fn redact(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(mut parsed) => {
            let pairs: Vec<(String, String)> = parsed
                .query_pairs()
                .map(|(k, v)| {
                    let v = if k == "apikey" { "***".to_string() } else { v.into_owned() };
                    (k.into_owned(), v)
                })
                .collect();
            if !pairs.is_empty() {
                parsed.query_pairs_mut().clear().extend_pairs(pairs);
            }
            parsed.to_string()
        }
        Err(_) => url.to_string(),
    }
}
