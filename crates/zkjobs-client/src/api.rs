//! Typed API client on top of a [`Transport`].

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use zkjobs_models::{ApiEnvelope, PageMeta, QueryParams};

use crate::config::ClientConfig;
use crate::error::{TransportError, TransportResult};
use crate::transport::{build_transport, ApiRequest, RawResponse, Transport};

/// Longest error body kept in a [`TransportError::Http`].
const MAX_ERROR_BODY: usize = 512;

/// Decoded success envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub data: T,
    pub meta: Option<PageMeta>,
}

/// Sends requests through a transport and decodes the JSON envelope.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Client using the transport selected by `config`.
    pub fn from_config(config: &ClientConfig) -> TransportResult<Self> {
        Ok(Self::new(build_transport(config)?))
    }

    /// Issue one request and decode its envelope.
    ///
    /// Non-2xx statuses become `http:<status>`, unreadable bodies and
    /// envelopes without data become `decode`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: &QueryParams,
    ) -> TransportResult<ApiResponse<T>> {
        let request = ApiRequest::new(method, path).with_query(params.clone());
        request.validate()?;

        let raw = self.transport.execute(&request).await?;
        decode_envelope(raw)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &QueryParams,
    ) -> TransportResult<ApiResponse<T>> {
        self.request(Method::GET, path, params).await
    }
}

fn decode_envelope<T: DeserializeOwned>(raw: RawResponse) -> TransportResult<ApiResponse<T>> {
    if !raw.is_success() {
        return Err(TransportError::Http {
            status: raw.status,
            body: truncate(raw.body, MAX_ERROR_BODY),
        });
    }

    let envelope: ApiEnvelope<T> = serde_json::from_str(&raw.body)
        .map_err(|e| TransportError::decode(format!("malformed response body: {}", e)))?;

    if !envelope.success {
        return Err(TransportError::decode(format!(
            "response reported failure: {}",
            envelope.error.as_deref().unwrap_or("no error message")
        )));
    }

    let data = envelope
        .data
        .ok_or_else(|| TransportError::decode("response has no data"))?;

    Ok(ApiResponse {
        status: raw.status,
        data,
        meta: envelope.meta,
    })
}

fn truncate(mut body: String, max: usize) -> String {
    if body.len() > max {
        let mut cut = max;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}
