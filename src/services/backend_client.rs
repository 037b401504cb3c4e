//! REST client for the travel backend.
//!
//! The backend owns places, vehicles, tour guides, drivers and custom
//! inquiries. This service only reads catalogs and creates inquiries; every
//! call is a single JSON request with an optional bearer token.

use std::time::Duration;

use log::{debug, error};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    config::AppConfig,
    error::BackendError,
    models::{
        catalog::{Driver, TourGuide, Vehicle},
        inquiry::{InquiryPayload, InquiryRecord},
        place::{Place, PlaceQuery},
    },
};

/// Read access to the catalogs a custom trip is assembled from.
#[allow(async_fn_in_trait)]
pub trait CatalogSource {
    async fn get_places(&self, query: &PlaceQuery) -> Result<Vec<Place>, BackendError>;
    async fn get_vehicles(&self) -> Result<Vec<Vehicle>, BackendError>;
    async fn get_tour_guides(&self) -> Result<Vec<TourGuide>, BackendError>;
    async fn get_drivers(&self) -> Result<Vec<Driver>, BackendError>;
}

/// The inquiry-creation endpoint.
#[allow(async_fn_in_trait)]
pub trait InquirySink {
    async fn create_custom_inquiry(
        &self,
        payload: &InquiryPayload,
        bearer_token: Option<&str>,
    ) -> Result<InquiryRecord, BackendError>;
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    http_client: reqwest::Client,
    base_url: Url,
    service_token: Option<String>,
}

impl BackendClient {
    pub fn new(config: &AppConfig) -> Result<Self, BackendError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.backend_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.backend_url.clone(),
            service_token: config.backend_token.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.base_url.join(path)?)
    }

    fn authorize(&self, request: RequestBuilder, bearer_token: Option<&str>) -> RequestBuilder {
        match bearer_token.or(self.service_token.as_deref()) {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<Vec<T>, BackendError> {
        let url = self.endpoint(path)?;
        debug!("GET {} {:?}", url, query);

        let request = self.authorize(self.http_client.get(url).query(query), None);
        let response = check_status(request.send().await?).await?;
        Ok(response.json::<Vec<T>>().await?)
    }

    /// Lightweight reachability probe used by the health check.
    pub async fn ping(&self) -> Result<u16, BackendError> {
        let response = self.http_client.get(self.base_url.clone()).send().await?;
        Ok(response.status().as_u16())
    }
}

async fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .or_else(|| value.get("error"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or(body);

    error!("Backend responded with {}: {}", status, message);
    Err(BackendError::Status {
        status: status.as_u16(),
        message,
    })
}

impl CatalogSource for BackendClient {
    async fn get_places(&self, query: &PlaceQuery) -> Result<Vec<Place>, BackendError> {
        self.get_list("places", &query.query_pairs()).await
    }

    async fn get_vehicles(&self) -> Result<Vec<Vehicle>, BackendError> {
        self.get_list("vehicles", &[]).await
    }

    async fn get_tour_guides(&self) -> Result<Vec<TourGuide>, BackendError> {
        self.get_list("tour-guides", &[]).await
    }

    async fn get_drivers(&self) -> Result<Vec<Driver>, BackendError> {
        self.get_list("drivers", &[]).await
    }
}

impl InquirySink for BackendClient {
    async fn create_custom_inquiry(
        &self,
        payload: &InquiryPayload,
        bearer_token: Option<&str>,
    ) -> Result<InquiryRecord, BackendError> {
        let url = self.endpoint("custom-inquiries")?;
        debug!("POST {}", url);

        let request = self.authorize(self.http_client.post(url).json(payload), bearer_token);
        let response = check_status(request.send().await?).await?;
        Ok(response.json::<InquiryRecord>().await?)
    }
}
