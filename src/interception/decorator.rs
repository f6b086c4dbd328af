//! Decorators for capability-marked interfaces.
//!
//! An interface opts into interception by implementing [`Interceptable`] for
//! its trait object type and supplying a decorator that forwards every method
//! through an [`Intercepted`] wrapper:
//!
//! ```
//! use std::sync::Arc;
//! use service_logging::interception::{Interceptable, Intercepted, LoggingInterceptor};
//! use service_logging::logging::TargetType;
//!
//! pub trait Greeter: Send + Sync {
//!     fn greet(&self, name: &str) -> Result<String, String>;
//! }
//!
//! struct LoggedGreeter(Intercepted<dyn Greeter>);
//!
//! impl Greeter for LoggedGreeter {
//!     fn greet(&self, name: &str) -> Result<String, String> {
//!         self.0.call("greet", |inner| inner.greet(name))
//!     }
//! }
//!
//! impl Interceptable for dyn Greeter {
//!     fn decorate(target: Arc<Self>, interceptor: LoggingInterceptor, implementation: TargetType) -> Arc<Self> {
//!         Arc::new(LoggedGreeter(Intercepted::new(target, interceptor, implementation)))
//!     }
//! }
//! ```

use std::future::Future;
use std::sync::Arc;

use crate::interception::interceptor::{LoggingInterceptor, Outcome};
use crate::interception::invocation::Invocation;
use crate::logging::TargetType;

/// Capability marker for interface types whose implementations are wrapped.
///
/// Implemented on the trait object type (`impl Interceptable for dyn Api`).
pub trait Interceptable: Send + Sync + 'static {
    /// Wrap `target` in a decorator implementing the same interface.
    ///
    /// `implementation` names the concrete type behind `target`; it selects
    /// the logger the decorator writes to.
    fn decorate(
        target: Arc<Self>,
        interceptor: LoggingInterceptor,
        implementation: TargetType,
    ) -> Arc<Self>;
}

/// Forwarding core shared by every decorator.
pub struct Intercepted<T: ?Sized> {
    target: Arc<T>,
    interceptor: LoggingInterceptor,
    implementation: TargetType,
}

impl<T: ?Sized> Intercepted<T> {
    pub fn new(target: Arc<T>, interceptor: LoggingInterceptor, implementation: TargetType) -> Self {
        Self {
            target,
            interceptor,
            implementation,
        }
    }

    /// The wrapped implementation.
    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn interceptor(&self) -> &LoggingInterceptor {
        &self.interceptor
    }

    pub fn implementation(&self) -> TargetType {
        self.implementation
    }

    pub fn invocation(&self, method: &'static str) -> Invocation {
        Invocation::new(self.implementation, method)
    }

    pub fn call<R, F>(&self, method: &'static str, f: F) -> R
    where
        R: Outcome,
        F: FnOnce(&T) -> R,
    {
        self.interceptor
            .intercept(&self.invocation(method), || f(self.target()))
    }

    /// Like [`Intercepted::call`] with a parameter snapshot on the start entry.
    pub fn call_with<R, F>(&self, method: &'static str, parameters: String, f: F) -> R
    where
        R: Outcome,
        F: FnOnce(&T) -> R,
    {
        let invocation = self.invocation(method).with_parameters(parameters);
        self.interceptor.intercept(&invocation, || f(self.target()))
    }

    /// For methods returning a plain value; the finish entry always follows.
    pub fn call_value<V, F>(&self, method: &'static str, f: F) -> V
    where
        F: FnOnce(&T) -> V,
    {
        self.interceptor
            .intercept_value(&self.invocation(method), || f(self.target()))
    }

    pub async fn call_async<'a, F, Fut, E>(&'a self, method: &'static str, f: F) -> Result<(), E>
    where
        F: FnOnce(&'a T) -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        let invocation = self.invocation(method);
        self.interceptor
            .intercept_async(&invocation, move || f(self.target()))
            .await
    }

    pub async fn call_async_with_result<'a, F, Fut, V, E>(
        &'a self,
        method: &'static str,
        f: F,
    ) -> Result<V, E>
    where
        F: FnOnce(&'a T) -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let invocation = self.invocation(method);
        self.interceptor
            .intercept_async_with_result(&invocation, move || f(self.target()))
            .await
    }

    /// Async counterpart of [`Intercepted::call_value`].
    pub async fn call_async_value<'a, F, Fut>(&'a self, method: &'static str, f: F) -> Fut::Output
    where
        F: FnOnce(&'a T) -> Fut,
        Fut: Future,
    {
        let invocation = self.invocation(method);
        self.interceptor
            .intercept_async_value(&invocation, move || f(self.target()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::source::{MemoryConfig, FINISH_LOG_LEVEL_KEY, START_LOG_LEVEL_KEY};
    use crate::logging::{LevelResolver, LoggerRegistry, MemorySink};
    use futures_util::future::BoxFuture;
    use std::sync::Mutex;

    trait Store: Send + Sync {
        fn fetch(&self) -> BoxFuture<'_, Result<u32, String>>;
        fn count(&self) -> usize;
        fn total(&self) -> BoxFuture<'_, u64>;
    }

    /// Records what the sink held at the moment each method body ran.
    struct Recording {
        sink: MemorySink,
        seen: Mutex<Vec<Vec<String>>>,
    }

    impl Recording {
        fn record(&self) {
            self.seen.lock().unwrap().push(self.sink.messages());
        }
    }

    impl Store for Recording {
        fn fetch(&self) -> BoxFuture<'_, Result<u32, String>> {
            self.record();
            Box::pin(async { Ok(7) })
        }

        fn count(&self) -> usize {
            self.record();
            3
        }

        fn total(&self) -> BoxFuture<'_, u64> {
            self.record();
            Box::pin(async { 120 })
        }
    }

    fn wrapped() -> (Intercepted<dyn Store>, Arc<Recording>, MemorySink) {
        let sink = MemorySink::new();
        let registry = Arc::new(LoggerRegistry::with_sink(Arc::new(sink.clone())));
        let config = MemoryConfig::new()
            .with(START_LOG_LEVEL_KEY, "Information")
            .with(FINISH_LOG_LEVEL_KEY, "Information");
        let interceptor = LoggingInterceptor::new(registry, LevelResolver::new(Arc::new(config)));
        let target = Arc::new(Recording {
            sink: sink.clone(),
            seen: Mutex::new(Vec::new()),
        });
        let store: Arc<dyn Store> = target.clone();
        (
            Intercepted::new(store, interceptor, TargetType::of::<Recording>()),
            target,
            sink,
        )
    }

    #[tokio::test]
    async fn test_async_method_body_runs_after_start_entry() {
        let (store, target, sink) = wrapped();

        let value = store.call_async_with_result("fetch", |inner| inner.fetch()).await;

        assert_eq!(value, Ok(7));
        assert_eq!(*target.seen.lock().unwrap(), vec![vec!["fetch called".to_string()]]);
        assert_eq!(sink.messages(), vec!["fetch called", "fetch completed"]);
    }

    #[test]
    fn test_sync_value_method() {
        let (store, target, sink) = wrapped();

        assert_eq!(store.call_value("count", |inner| inner.count()), 3);
        assert_eq!(*target.seen.lock().unwrap(), vec![vec!["count called".to_string()]]);
        assert_eq!(sink.messages(), vec!["count called", "count completed"]);
    }

    #[tokio::test]
    async fn test_async_value_method() {
        let (store, target, sink) = wrapped();

        assert_eq!(store.call_async_value("total", |inner| inner.total()).await, 120);
        assert_eq!(*target.seen.lock().unwrap(), vec![vec!["total called".to_string()]]);
        assert_eq!(sink.messages(), vec!["total called", "total completed"]);
    }
}
