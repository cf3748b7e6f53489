//! Request extractors shared by the API handlers

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, OriginalUri, Request};
use axum::http::request::Parts;
use serde_json::{Map, Value};
use std::convert::Infallible;

use crate::AppError;

/// Where the request was addressed, for building absolute URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// `scheme://host`
    pub base_url: String,
    /// Path as sent by the client, before nesting or normalization
    pub path: String,
    /// Raw query string
    pub query: Option<String>,
}

impl RequestContext {
    /// Absolute URL for a server path
    pub fn absolute(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Absolute URL of this request's path with a new query string
    ///
    /// The path always carries its trailing slash.
    pub fn with_query(&self, query: &str) -> String {
        let slash = if self.path.ends_with('/') { "" } else { "/" };
        if query.is_empty() {
            format!("{}{}{}", self.base_url, self.path, slash)
        } else {
            format!("{}{}{}?{}", self.base_url, self.path, slash, query)
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| parts.uri.clone());

        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };
        let scheme = header("x-forwarded-proto").unwrap_or_else(|| "http".to_string());
        let host = header("host")
            .or_else(|| uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| "localhost".to_string());

        Ok(Self {
            base_url: format!("{scheme}://{host}"),
            path: uri.path().to_string(),
            query: uri.query().map(str::to_owned),
        })
    }
}

/// Request body parsed as JSON, whatever the content type
///
/// An empty body reads as `{}` so validation reports the missing fields.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

impl<S: Send + Sync> FromRequest<S> for JsonBody {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::invalid(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(Value::Object(Map::new())));
        }
        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| AppError::invalid(format!("JSON parse error - {e}")))
    }
}
