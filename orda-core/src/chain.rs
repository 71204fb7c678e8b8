use std::marker::PhantomData;

use crate::{OrdaError, Retrying, Runnable};

/// `first` followed by `second`, with `Mid` passed between them.
///
/// Built with [`RunnableExt::then`]; the prompt → model → parser pipelines
/// of the analysis services are nested chains.
pub struct Chain<First, Second, Mid> {
    first: First,
    second: Second,
    _mid: PhantomData<fn() -> Mid>,
}

impl<First, Second, Mid> Chain<First, Second, Mid> {
    pub fn new(first: First, second: Second) -> Self {
        Self {
            first,
            second,
            _mid: PhantomData,
        }
    }
}

#[async_trait::async_trait]
impl<In, Mid, Out, First, Second> Runnable<In, Out> for Chain<First, Second, Mid>
where
    In: Send + 'static,
    Mid: Send + 'static,
    Out: Send + 'static,
    First: Runnable<In, Mid> + Send + Sync,
    Second: Runnable<Mid, Out> + Send + Sync,
{
    async fn invoke(&self, input: In) -> Result<Out, OrdaError> {
        let handoff = self.first.invoke(input).await?;
        self.second.invoke(handoff).await
    }
}

/// Composition helpers available on every [`Runnable`].
pub trait RunnableExt<In: Send + 'static, Out: Send + 'static>: Runnable<In, Out> + Sized {
    fn then<Next, NextOut>(self, next: Next) -> Chain<Self, Next, Out>
    where
        Next: Runnable<Out, NextOut> + Send + Sync,
        NextOut: Send + 'static,
    {
        Chain::new(self, next)
    }

    /// Retries transient failures, see [`Retrying`].
    fn with_retries(self, max_attempts: usize) -> Retrying<Self> {
        Retrying::new(self, max_attempts)
    }
}

impl<In, Out, R> RunnableExt<In, Out> for R
where
    In: Send + 'static,
    Out: Send + 'static,
    R: Runnable<In, Out> + Sized,
{
}
