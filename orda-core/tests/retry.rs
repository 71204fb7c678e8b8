use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use orda_core::{LlmRequest, LlmResponse, Message, OrdaError, Runnable, RunnableExt};

/// Fails with `error` for the first `failures` calls, then answers.
struct ScriptedModel {
    failures: usize,
    error: fn() -> OrdaError,
    calls: Arc<AtomicUsize>,
}

impl ScriptedModel {
    fn new(failures: usize, error: fn() -> OrdaError) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let model = Self {
            failures,
            error,
            calls: calls.clone(),
        };
        (model, calls)
    }
}

#[async_trait::async_trait]
impl Runnable<LlmRequest, LlmResponse> for ScriptedModel {
    async fn invoke(&self, input: LlmRequest) -> Result<LlmResponse, OrdaError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.failures {
            return Err((self.error)());
        }
        Ok(LlmResponse {
            content: format!("{} 응답", input.messages[0].content),
        })
    }
}

fn request() -> LlmRequest {
    LlmRequest::new("gpt-4o-mini", vec![Message::user("환율")])
}

fn rate_limited() -> OrdaError {
    OrdaError::LlmProvider("429 Too Many Requests".to_string())
}

fn timed_out() -> OrdaError {
    OrdaError::Timeout(Duration::from_secs(60))
}

fn bad_key() -> OrdaError {
    OrdaError::InvalidConfig("401: invalid api key".to_string())
}

#[tokio::test]
async fn transient_failures_are_retried() {
    let (model, calls) = ScriptedModel::new(2, rate_limited);
    let response = model.with_retries(3).invoke(request()).await.unwrap();

    assert_eq!(response.content, "환율 응답");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn timeouts_exhaust_attempts() {
    let (model, calls) = ScriptedModel::new(10, timed_out);
    let err = model.with_retries(2).invoke(request()).await.unwrap_err();

    assert!(matches!(err, OrdaError::MaxRetriesExceeded { max: 2 }));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn zero_attempts_never_calls_the_model() {
    let (model, calls) = ScriptedModel::new(0, rate_limited);
    let err = model.with_retries(0).invoke(request()).await.unwrap_err();

    assert!(matches!(err, OrdaError::MaxRetriesExceeded { max: 0 }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn configuration_errors_fail_fast() {
    let (model, calls) = ScriptedModel::new(1, bad_key);
    let err = model.with_retries(3).invoke(request()).await.unwrap_err();

    assert!(matches!(err, OrdaError::InvalidConfig(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
