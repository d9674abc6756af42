use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use veloo_core::{Endpoint, GatewayError, GatewayRequest, RequestGateway};

/// Gateway that records every request and answers from a script.
///
/// Once the script runs out every request succeeds.
#[derive(Debug, Clone, Default)]
pub struct MockRequestGateway {
    script: Arc<Mutex<VecDeque<Result<(), GatewayError>>>>,
    requests: Arc<Mutex<Vec<GatewayRequest>>>,
    latency: Duration,
}

impl MockRequestGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcomes(outcomes: impl IntoIterator<Item = Result<(), GatewayError>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(outcomes.into_iter().collect())),
            ..Self::default()
        }
    }

    /// Delay before each answer, to keep requests in flight for a while.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub async fn push_outcome(&self, outcome: Result<(), GatewayError>) {
        self.script.lock().await.push_back(outcome);
    }

    pub async fn requests(&self) -> Vec<GatewayRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn endpoints(&self) -> Vec<Endpoint> {
        self.requests
            .lock()
            .await
            .iter()
            .map(|request| request.endpoint)
            .collect()
    }
}

#[async_trait::async_trait]
impl RequestGateway for MockRequestGateway {
    async fn request(&self, request: GatewayRequest) -> Result<(), GatewayError> {
        tracing::debug!(endpoint = ?request.endpoint, "Mock gateway request");
        self.requests.lock().await.push(request);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.script.lock().await.pop_front().unwrap_or(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veloo_core::Payload;

    #[tokio::test]
    async fn test_answers_from_script_then_succeeds() {
        let gateway =
            MockRequestGateway::with_outcomes([Err(GatewayError::Transport("offline".into()))]);
        let request = GatewayRequest::post_form(Endpoint::Registration, Payload::new());

        assert!(gateway.request(request.clone()).await.is_err());
        assert_eq!(gateway.request(request.clone()).await, Ok(()));
        assert_eq!(gateway.requests().await, vec![request.clone(), request.clone()]);

        gateway
            .push_outcome(Err(GatewayError::Rejected {
                status: 429,
                message: "Too many requests".into(),
            }))
            .await;
        assert!(matches!(
            gateway.request(request).await,
            Err(GatewayError::Rejected { status: 429, .. })
        ));
        assert_eq!(gateway.endpoints().await, vec![Endpoint::Registration; 3]);
    }
}
