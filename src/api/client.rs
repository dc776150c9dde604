//! HTTP client for the replenishment backend.

use super::types::{
    BatchResultDto, ForecastBatchRequest, ForecastsBySupplier, OrderBatchRequest,
    PurchaseOrderSummary,
};
use crate::abstractions::ReplenishmentApi;
use crate::alerts::types::Alert;
use crate::config::ApiConfig;
use crate::error::{RestockError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

const ALERTS_ENDPOINT: &str = "alertas/dashboard";
const FORECASTS_ENDPOINT: &str = "pronosticos/lote";
const ORDERS_ENDPOINT: &str = "ordenes/generar-lote";
const ORDER_SUMMARIES_ENDPOINT: &str = "ordenes/resumen";

#[derive(Debug)]
pub struct HttpReplenishmentClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpReplenishmentClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| RestockError::Config(format!("invalid api.base_url: {e}")))?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RestockError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
        })
    }

    fn endpoint(&self, path: &'static str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| RestockError::Config(format!("invalid endpoint path {path}: {e}")))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &'static str) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!(%url, "GET");
        let response = self.authorize(self.client.get(url)).send().await?;
        Self::decode(path, response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &'static str,
        body: &B,
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");
        let response = self
            .authorize(self.client.post(url))
            .json(body)
            .send()
            .await?;
        Self::decode(path, response).await
    }

    async fn decode<T: DeserializeOwned>(path: &'static str, response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            return Err(RestockError::api(path, Some(status.as_u16()), snippet));
        }
        response
            .json()
            .await
            .map_err(|e| RestockError::decode(path, e.to_string()))
    }
}

#[async_trait]
impl ReplenishmentApi for HttpReplenishmentClient {
    async fn fetch_alerts(&self) -> Result<Vec<Alert>> {
        self.get_json(ALERTS_ENDPOINT).await
    }

    async fn generate_forecasts(
        &self,
        request: &ForecastBatchRequest,
    ) -> Result<ForecastsBySupplier> {
        self.post_json(FORECASTS_ENDPOINT, request).await
    }

    async fn generate_orders(&self, request: &OrderBatchRequest) -> Result<BatchResultDto> {
        self.post_json(ORDERS_ENDPOINT, request).await
    }

    async fn fetch_order_summaries(&self, order_ids: &[i64]) -> Result<Vec<PurchaseOrderSummary>> {
        self.post_json(ORDER_SUMMARIES_ENDPOINT, order_ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(base_url: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(5),
            token: None,
        }
    }

    #[test]
    fn endpoints_join_onto_the_base_url() {
        let client = HttpReplenishmentClient::new(&config("https://host/api/")).unwrap();
        assert_eq!(
            client.endpoint(ORDERS_ENDPOINT).unwrap().as_str(),
            "https://host/api/ordenes/generar-lote"
        );
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let err = HttpReplenishmentClient::new(&config("not a url")).unwrap_err();
        assert!(matches!(err, RestockError::Config(_)));
    }
}
