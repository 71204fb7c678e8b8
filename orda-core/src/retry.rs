use crate::{OrdaError, Runnable};

/// Re-invokes the inner step while it fails with a transient error.
///
/// Parse and configuration errors are returned at once. When the attempts
/// run out the caller sees [`OrdaError::MaxRetriesExceeded`].
pub struct Retrying<R> {
    inner: R,
    max_attempts: usize,
}

impl<R> Retrying<R> {
    pub fn new(inner: R, max_attempts: usize) -> Self {
        Self {
            inner,
            max_attempts,
        }
    }
}

/// Provider failures and timeouts are worth another attempt.
pub fn is_retryable(error: &OrdaError) -> bool {
    matches!(error, OrdaError::LlmProvider(_) | OrdaError::Timeout(_))
}

#[async_trait::async_trait]
impl<In, Out, R> Runnable<In, Out> for Retrying<R>
where
    In: Clone + Send + Sync + 'static,
    Out: Send + 'static,
    R: Runnable<In, Out> + Send + Sync,
{
    async fn invoke(&self, input: In) -> Result<Out, OrdaError> {
        let max = self.max_attempts;
        let mut attempt = 0;
        while attempt < max {
            attempt += 1;
            match self.inner.invoke(input.clone()).await {
                Ok(output) => return Ok(output),
                Err(err) if is_retryable(&err) => {
                    tracing::warn!(attempt, max, error = %err, "transient failure");
                }
                Err(err) => return Err(err),
            }
        }
        Err(OrdaError::MaxRetriesExceeded { max })
    }
}
