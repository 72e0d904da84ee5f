use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::types::{Position, Tag, Vehicle};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("decode error: {0}")]
    Decode(String),
}

/// The three lookups the locator chains together.
#[allow(async_fn_in_trait)]
pub trait VehicleApi {
    async fn search_vehicles(&self, term: &str) -> Result<Vec<Vehicle>, ApiError>;

    /// `Ok(None)` when the vehicle has no tag assigned.
    async fn vehicle_tag(&self, vehicle_id: i64) -> Result<Option<Tag>, ApiError>;

    async fn latest_position(&self, tag_id: i64) -> Result<Position, ApiError>;
}

pub fn search_url(base: &str, term: &str) -> String {
    format!("{base}/api/vehiculos/buscar?termino={}", urlencoding::encode(term))
}

pub fn tag_url(base: &str, vehicle_id: i64) -> String {
    format!("{base}/api/vehiculos/{vehicle_id}/tag")
}

pub fn latest_position_url(base: &str, tag_id: i64) -> String {
    format!("{base}/api/posiciones/tag/{tag_id}/ultima")
}

/// Reads a tag lookup body. An empty body, `null`, or an object without
/// `id` (the API's "no tag" error object) all mean no tag.
pub fn parse_tag_body(body: &str) -> Result<Option<Tag>, ApiError> {
    let body = body.trim();
    if body.is_empty() {
        return Ok(None);
    }
    let tag: Option<Tag> =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(tag.filter(|t| t.id.is_some()))
}

/// `gloo-net` client against the workshop API.
#[derive(Debug, Clone)]
pub struct HttpApi {
    base: String,
}

impl HttpApi {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    async fn get(&self, url: &str) -> Result<Response, ApiError> {
        log::debug!("[api] GET {url}");
        Request::get(url)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let resp = self.get(url).await?;
        if !resp.ok() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: resp.status(),
            });
        }
        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl VehicleApi for HttpApi {
    async fn search_vehicles(&self, term: &str) -> Result<Vec<Vehicle>, ApiError> {
        self.get_json(&search_url(&self.base, term)).await
    }

    async fn vehicle_tag(&self, vehicle_id: i64) -> Result<Option<Tag>, ApiError> {
        let url = tag_url(&self.base, vehicle_id);
        let resp = self.get(&url).await?;
        if resp.status() == 404 {
            return Ok(None);
        }
        if !resp.ok() {
            return Err(ApiError::Status {
                url,
                status: resp.status(),
            });
        }
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        parse_tag_body(&body)
    }

    async fn latest_position(&self, tag_id: i64) -> Result<Position, ApiError> {
        self.get_json(&latest_position_url(&self.base, tag_id)).await
    }
}
