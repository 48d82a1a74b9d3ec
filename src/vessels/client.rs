//! HTTP client for the vessel statistics service

use std::time::Duration;

use serde::Deserialize;

use super::chokepoint::Chokepoint;
use super::summary::{DailyVesselCount, DateRange};
use crate::chat::transport::endpoint_url;
use crate::error::{Result, SeeseaError};

/// Path prefix of the vessel statistics endpoint
pub const VESSELS_PATH: &str = "/api/v1/vessels";

#[derive(Debug, Deserialize)]
struct VesselResponse {
    #[serde(default)]
    data: Option<Vec<DailyVesselCount>>,
}

/// Client for `GET /api/v1/vessels/{chokepoint}`
#[derive(Debug, Clone)]
pub struct VesselClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl VesselClient {
    /// Build a client for the service rooted at `base_url`
    ///
    /// # Errors
    ///
    /// Returns [`SeeseaError::Config`] for an unusable base URL or
    /// [`SeeseaError::Http`] if the client cannot be built.
    pub fn new(base_url: &str, connect_timeout: Duration) -> Result<Self> {
        endpoint_url(base_url, VESSELS_PATH)?;
        let http_client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(SeeseaError::Http)?;

        Ok(Self {
            http_client,
            base_url: base_url.to_string(),
        })
    }

    /// Fetch daily counts for `chokepoint` over `range`
    ///
    /// A response with a missing, null or empty `data` array means "no data
    /// for this range" and yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`SeeseaError::VesselApi`] if the request fails, the service
    /// answers with a non-success status, or the body is not valid JSON.
    pub async fn fetch_daily(
        &self,
        chokepoint: Chokepoint,
        range: &DateRange,
    ) -> Result<Vec<DailyVesselCount>> {
        let url = endpoint_url(
            &self.base_url,
            &format!("{}/{}", VESSELS_PATH, chokepoint.id()),
        )?;

        tracing::info!(chokepoint = chokepoint.id(), range = %range, "Fetching vessel data");

        let response = self
            .http_client
            .get(url)
            .query(&range.query_pairs())
            .send()
            .await
            .map_err(|e| SeeseaError::VesselApi(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SeeseaError::VesselApi(format!(
                "status {} for {}",
                status.as_u16(),
                chokepoint.id()
            ))
            .into());
        }

        let body: VesselResponse = response
            .json()
            .await
            .map_err(|e| SeeseaError::VesselApi(format!("invalid response body: {}", e)))?;

        let records = body.data.unwrap_or_default();
        tracing::debug!("Received {} daily records", records.len());
        Ok(records)
    }
}
