//! Request-scoped context passed as the first parameter of every lifecycle call
//!
//! A Context identifies one host invocation. It carries a request id and the
//! operation name, and builds the tracing span every call runs inside.

use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct Context {
    inner: Arc<ContextInner>,
}

#[derive(Debug)]
struct ContextInner {
    request_id: Uuid,
    operation: String,
}

impl Context {
    pub fn new() -> Self {
        Self::for_operation("unspecified")
    }

    pub fn for_operation(operation: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                request_id: Uuid::new_v4(),
                operation: operation.into(),
            }),
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.inner.request_id
    }

    pub fn operation(&self) -> &str {
        &self.inner.operation
    }

    pub fn span(&self) -> tracing::Span {
        tracing::info_span!(
            "tfplug",
            request_id = %self.inner.request_id,
            operation = %self.inner.operation
        )
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
