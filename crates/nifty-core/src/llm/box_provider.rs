//! Type-erased LLM provider.
//!
//! [`LlmProvider`] returns `impl Future`, so it cannot be a trait object.
//! [`ErasedProvider`] boxes the future and is implemented for every provider;
//! [`BoxLlmProvider`] owns one behind a `Box` and is itself an `LlmProvider`.

use std::future::Future;
use std::pin::Pin;

use nifty_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use super::provider::LlmProvider;

type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>>;

/// Object-safe mirror of [`LlmProvider`].
pub trait ErasedProvider: Send + Sync {
    fn erased_name(&self) -> &str;

    fn erased_complete<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a>;
}

impl<P: LlmProvider> ErasedProvider for P {
    fn erased_name(&self) -> &str {
        self.name()
    }

    fn erased_complete<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a> {
        Box::pin(self.complete(request))
    }
}

/// A provider chosen at runtime (the OpenAI client in production, scripted
/// doubles in tests).
pub struct BoxLlmProvider {
    inner: Box<dyn ErasedProvider>,
}

impl BoxLlmProvider {
    pub fn new<P: LlmProvider + 'static>(provider: P) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }
}

impl LlmProvider for BoxLlmProvider {
    fn name(&self) -> &str {
        self.inner.erased_name()
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.inner.erased_complete(request).await
    }
}
