//! HTTP client for the ETL backend.

use std::future::Future;
use std::time::Duration;

use ledgerview_core::{
    ApiEnvelope, HealthStatus, IntegrationStarted, IntegrationStatus, ProfitLossDataset,
};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::de::DeserializeOwned;

use crate::error::{EtlError, EtlResult};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

pub const INTEGRATE_PATH: &str = "/etl/integrate";
pub const STATUS_PATH: &str = "/etl/integration-status";
pub const PROFIT_LOSS_PATH: &str = "/etl/profit-loss-data";
pub const HEALTH_PATH: &str = "/health-check";

/// Operations the dashboard needs from the ETL service.
///
/// `Err` means the request itself failed (no response or non-2xx). An
/// envelope with `success: false` is returned as `Ok`.
pub trait EtlApi: Send + Sync {
    fn trigger_integration(
        &self,
    ) -> impl Future<Output = EtlResult<ApiEnvelope<IntegrationStarted>>> + Send;

    fn integration_status(
        &self,
    ) -> impl Future<Output = EtlResult<ApiEnvelope<IntegrationStatus>>> + Send;

    fn profit_loss_data(
        &self,
    ) -> impl Future<Output = EtlResult<ApiEnvelope<ProfitLossDataset>>> + Send;

    fn health_check(&self) -> impl Future<Output = EtlResult<ApiEnvelope<HealthStatus>>> + Send;
}

#[derive(Debug, Clone)]
pub struct EtlClient {
    http: reqwest::Client,
    base_url: String,
}

impl EtlClient {
    pub fn new(base_url: &str) -> EtlResult<Self> {
        Self::with_timeout(base_url, None)
    }

    /// Without a timeout, requests wait as long as the transport allows.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> EtlResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(EtlError::InvalidBaseUrl(base_url.to_string()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }

        Ok(Self {
            http: builder.build().map_err(EtlError::Client)?,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &'static str) -> EtlResult<ApiEnvelope<T>> {
        tracing::debug!("GET {}", path);
        let resp = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|source| EtlError::Transport {
                endpoint: path,
                source,
            })?;
        decode(path, resp).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &'static str) -> EtlResult<ApiEnvelope<T>> {
        tracing::debug!("POST {}", path);
        let resp = self
            .http
            .post(self.url(path))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|source| EtlError::Transport {
                endpoint: path,
                source,
            })?;
        decode(path, resp).await
    }
}

async fn decode<T: DeserializeOwned>(
    path: &'static str,
    resp: reqwest::Response,
) -> EtlResult<ApiEnvelope<T>> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(EtlError::Http {
            status: status.as_u16(),
            body,
        });
    }

    resp.json::<ApiEnvelope<T>>()
        .await
        .map_err(|source| EtlError::Decode {
            endpoint: path,
            source,
        })
}

impl EtlApi for EtlClient {
    async fn trigger_integration(&self) -> EtlResult<ApiEnvelope<IntegrationStarted>> {
        self.post(INTEGRATE_PATH).await
    }

    async fn integration_status(&self) -> EtlResult<ApiEnvelope<IntegrationStatus>> {
        self.get(STATUS_PATH).await
    }

    async fn profit_loss_data(&self) -> EtlResult<ApiEnvelope<ProfitLossDataset>> {
        self.get(PROFIT_LOSS_PATH).await
    }

    async fn health_check(&self) -> EtlResult<ApiEnvelope<HealthStatus>> {
        self.get(HEALTH_PATH).await
    }
}
