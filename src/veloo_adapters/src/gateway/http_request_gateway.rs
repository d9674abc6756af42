use std::collections::HashMap;

use reqwest::{Client, StatusCode, Url};
use veloo_core::{Encoding, Endpoint, GatewayError, GatewayRequest, Method, RequestGateway};

use crate::config::constants::{REGISTRATION_PATH, VERIFY_EMAIL_OTP_PATH};

/// [`RequestGateway`] talking to the seller API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRequestGateway {
    http_client: Client,
    base_url: String,
    paths: HashMap<Endpoint, String>,
}

impl HttpRequestGateway {
    /// Gateway using the standard endpoint paths under `base_url`.
    pub fn new(base_url: String, http_client: Client) -> Self {
        let paths = HashMap::from([
            (Endpoint::Registration, REGISTRATION_PATH.to_string()),
            (Endpoint::VerifyEmailOtp, VERIFY_EMAIL_OTP_PATH.to_string()),
        ]);
        Self {
            http_client,
            base_url,
            paths,
        }
    }

    pub fn with_path(mut self, endpoint: Endpoint, path: impl Into<String>) -> Self {
        self.paths.insert(endpoint, path.into());
        self
    }

    /// `path` is appended to the base URL as is, keeping any path the base
    /// already has.
    pub fn url_for(&self, endpoint: Endpoint) -> Result<Url, GatewayError> {
        let path = self
            .paths
            .get(&endpoint)
            .ok_or_else(|| GatewayError::InvalidRequest(format!("No path for {endpoint:?}")))?;
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&url).map_err(|e| GatewayError::InvalidRequest(e.to_string()))
    }
}

#[async_trait::async_trait]
impl RequestGateway for HttpRequestGateway {
    #[tracing::instrument(
        name = "HttpRequestGateway::request",
        skip_all,
        fields(method = request.method.as_str(), endpoint = ?request.endpoint)
    )]
    async fn request(&self, request: GatewayRequest) -> Result<(), GatewayError> {
        let url = self.url_for(request.endpoint)?;

        let builder = match (request.method, request.encoding) {
            (Method::Get, _) => self.http_client.get(url).query(&request.payload),
            (Method::Post, Encoding::UrlEncoded) => {
                self.http_client.post(url).form(&request.payload)
            }
            (Method::Post, Encoding::Json) => self.http_client.post(url).json(&request.payload),
        };

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Request could not be completed");
            GatewayError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = rejection_message(status, &body);
        tracing::warn!(status = status.as_u16(), %message, "Request rejected");
        Err(GatewayError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

// Prefers the API's `{"message": ..}` body, then the raw body, then the status text.
fn rejection_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(str::to_string));

    from_json
        .or_else(|| {
            let body = body.trim();
            (!body.is_empty()).then(|| body.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
}
