use std::sync::Arc;

use async_trait::async_trait;

use crate::OrdaError;

/// One async step from `Input` to `Output`.
///
/// Prompt templates, chat models and output parsers implement it, and so do
/// the fakes used in tests, which is how services stay testable without a
/// network.
#[async_trait]
pub trait Runnable<Input: Send + 'static, Output: Send + 'static> {
    async fn invoke(&self, input: Input) -> Result<Output, OrdaError>;
}

/// Lets services hold `Arc<dyn Runnable<..>>` and still compose it.
#[async_trait]
impl<Input, Output, R> Runnable<Input, Output> for Arc<R>
where
    Input: Send + 'static,
    Output: Send + 'static,
    R: Runnable<Input, Output> + Send + Sync + ?Sized,
{
    async fn invoke(&self, input: Input) -> Result<Output, OrdaError> {
        (**self).invoke(input).await
    }
}
