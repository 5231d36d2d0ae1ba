//! RPC client: dispatcher seam plus timeout and retry layering.

use crate::{RetryPolicy, RpcContext};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use svckit_config::RpcConfig;
use svckit_core::{SvcError, SvcResult};
use tracing::{debug, warn};

/// One outgoing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcRequest {
    /// Target service name.
    pub service: String,
    /// Method on the target service.
    pub method: String,
    /// JSON-encoded request body.
    pub body: String,
    /// Context attachments propagated with the call.
    pub attachments: BTreeMap<String, String>,
}

/// Transport seam for RPC calls.
///
/// Implementations resolve the target and move bytes; the client layers
/// context propagation, timeouts and retry on top.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RpcDispatcher: Send + Sync {
    /// Performs one attempt of a call and returns the JSON response body.
    async fn dispatch(&self, request: RpcRequest) -> SvcResult<String>;
}

/// RPC client with timeout, retry and context propagation.
pub struct RpcClient {
    dispatcher: Arc<dyn RpcDispatcher>,
    read_timeout: Duration,
    retry: RetryPolicy,
}

impl RpcClient {
    /// Creates a client over a dispatcher using the configured timeouts
    /// and retry policy.
    #[must_use]
    pub fn new(dispatcher: Arc<dyn RpcDispatcher>, config: &RpcConfig) -> Self {
        Self {
            dispatcher,
            read_timeout: config.read_timeout(),
            retry: RetryPolicy::from_config(config),
        }
    }

    /// Creates a client with explicit timeout and retry settings.
    #[must_use]
    pub fn with_settings(
        dispatcher: Arc<dyn RpcDispatcher>,
        read_timeout: Duration,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            dispatcher,
            read_timeout,
            retry,
        }
    }

    /// Calls a method on a service, propagating the context attachments.
    ///
    /// Each attempt is bounded by the read timeout. Timeouts and system
    /// errors are retried per the policy; business errors are terminal
    /// since the call reached the remote service and was rejected there.
    pub async fn call<Req, Resp>(
        &self,
        ctx: &RpcContext,
        service: &str,
        method: &str,
        body: &Req,
    ) -> SvcResult<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let body = serde_json::to_string(body)
            .map_err(|e| SvcError::system(format!("failed to serialize rpc request: {e}")))?;
        let request = RpcRequest {
            service: service.to_string(),
            method: method.to_string(),
            body,
            attachments: ctx.attachments().clone(),
        };

        let raw = self.call_raw(request).await?;
        serde_json::from_str(&raw)
            .map_err(|e| SvcError::system(format!("failed to deserialize rpc response: {e}")))
    }

    async fn call_raw(&self, request: RpcRequest) -> SvcResult<String> {
        let mut last_error = SvcError::system(format!(
            "rpc call to {}.{} was never attempted",
            request.service, request.method
        ));

        for attempt in 0..self.retry.max_attempts.max(1) {
            if attempt > 0 {
                let delay = self.retry.delay_for_attempt(attempt);
                debug!(
                    "Retrying rpc call to {}.{} (attempt {}) after {:?}",
                    request.service,
                    request.method,
                    attempt + 1,
                    delay
                );
                tokio::time::sleep(delay).await;
            }

            let attempt_result = tokio::time::timeout(
                self.read_timeout,
                self.dispatcher.dispatch(request.clone()),
            )
            .await;

            match attempt_result {
                Ok(Ok(response)) => return Ok(response),
                Ok(Err(e)) if e.is_business() => return Err(e),
                Ok(Err(e)) => {
                    warn!(
                        "Rpc call to {}.{} failed: {}",
                        request.service, request.method, e
                    );
                    last_error = e;
                }
                Err(_) => {
                    warn!(
                        "Rpc call to {}.{} timed out after {:?}",
                        request.service, request.method, self.read_timeout
                    );
                    last_error = SvcError::system(format!(
                        "rpc call to {}.{} timed out after {:?}",
                        request.service, request.method, self.read_timeout
                    ));
                }
            }
        }

        Err(last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client_with(
        mock: MockRpcDispatcher,
        max_attempts: u32,
        read_timeout: Duration,
    ) -> RpcClient {
        let retry = RetryPolicy {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            jitter: false,
            ..Default::default()
        };
        RpcClient::with_settings(Arc::new(mock), read_timeout, retry)
    }

    #[tokio::test]
    async fn call_propagates_context_attachments() {
        let mut mock = MockRpcDispatcher::new();
        mock.expect_dispatch()
            .withf(|req| {
                req.service == "billing"
                    && req.method == "charge"
                    && req.attachments.get("traceId").map(String::as_str) == Some("t-1")
            })
            .times(1)
            .returning(|_| Ok(r#"{"ok":true}"#.to_string()));

        let client = client_with(mock, 1, Duration::from_secs(1));
        let ctx = RpcContext::new().with_trace_id("t-1");
        let resp: serde_json::Value = client
            .call(&ctx, "billing", "charge", &json!({"amount": 10}))
            .await
            .unwrap();
        assert_eq!(resp["ok"], true);
    }

    #[tokio::test]
    async fn system_errors_are_retried() {
        let mut mock = MockRpcDispatcher::new();
        let mut calls = 0u32;
        mock.expect_dispatch().times(3).returning(move |_| {
            calls += 1;
            if calls < 3 {
                Err(SvcError::system("connection refused"))
            } else {
                Ok("1".to_string())
            }
        });

        let client = client_with(mock, 5, Duration::from_secs(1));
        let resp: i32 = client
            .call(&RpcContext::new(), "billing", "ping", &())
            .await
            .unwrap();
        assert_eq!(resp, 1);
    }

    #[tokio::test]
    async fn business_errors_are_terminal() {
        let mut mock = MockRpcDispatcher::new();
        mock.expect_dispatch()
            .times(1)
            .returning(|_| Err(SvcError::business_code(40001, "insufficient funds")));

        let client = client_with(mock, 5, Duration::from_secs(1));
        let result: SvcResult<i32> = client
            .call(&RpcContext::new(), "billing", "charge", &())
            .await;
        let error = result.unwrap_err();
        assert!(error.is_business());
        assert_eq!(error.code(), 40001);
    }

    #[tokio::test]
    async fn exhausted_retries_return_last_error() {
        let mut mock = MockRpcDispatcher::new();
        mock.expect_dispatch()
            .times(2)
            .returning(|_| Err(SvcError::system("unreachable")));

        let client = client_with(mock, 2, Duration::from_secs(1));
        let result: SvcResult<i32> = client.call(&RpcContext::new(), "billing", "ping", &()).await;
        assert!(result.unwrap_err().is_system());
    }

    struct HangingDispatcher;

    #[async_trait]
    impl RpcDispatcher for HangingDispatcher {
        async fn dispatch(&self, _request: RpcRequest) -> SvcResult<String> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn timeouts_count_as_failed_attempts() {
        let retry = RetryPolicy {
            max_attempts: 2,
            initial_delay: Duration::from_millis(1),
            jitter: false,
            ..Default::default()
        };
        let client = RpcClient::with_settings(
            Arc::new(HangingDispatcher),
            Duration::from_millis(10),
            retry,
        );
        let result: SvcResult<i32> = client.call(&RpcContext::new(), "billing", "ping", &()).await;
        let error = result.unwrap_err();
        assert!(error.is_system());
        assert!(error.message().contains("timed out"));
    }
}
