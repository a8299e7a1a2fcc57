use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    WeatherError,
    interpret::{ApiEnvelope, decode_envelope},
    query::ObservationQuery,
};

use super::{ClientConfig, ObservationClient};

/// Client for the KMA ultra short-term nowcast endpoint.
#[derive(Debug, Clone)]
pub struct KmaClient {
    endpoint: String,
    http: Client,
}

impl KmaClient {
    pub fn new(config: &ClientConfig) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { endpoint: config.endpoint.clone(), http })
    }
}

#[async_trait]
impl ObservationClient for KmaClient {
    #[instrument(skip(self, query), fields(nx = query.nx, ny = query.ny, base_date = %query.base_date, base_time = %query.base_time))]
    async fn fetch(&self, query: &ObservationQuery) -> Result<ApiEnvelope, WeatherError> {
        debug!(endpoint = %self.endpoint, "Requesting nowcast observations");

        let res = self.http.get(&self.endpoint).query(&query.query_pairs()).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Transport(format!(
                "HTTP {status}: {}",
                truncate_body(&body)
            )));
        }

        decode_envelope(&body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
