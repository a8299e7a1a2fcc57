use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::{WeatherError, interpret::ApiEnvelope, query::ObservationQuery};

pub mod kma;

pub use kma::KmaClient;

pub const DEFAULT_ENDPOINT: &str =
    "https://apis.data.go.kr/1360000/VilageFcstInfoService_2.0/getUltraSrtNcst";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings handed explicitly to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub endpoint: String,
    pub service_key: String,
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(service_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            service_key: service_key.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// Performs the single network call of the pipeline.
#[async_trait]
pub trait ObservationClient: Send + Sync + Debug {
    async fn fetch(&self, query: &ObservationQuery) -> Result<ApiEnvelope, WeatherError>;
}
