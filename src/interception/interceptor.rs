//! Start/finish logging around one call.
//!
//! # Responsibilities
//! - PRE: resolve the target's logger, emit the start entry
//! - INVOKE: run the wrapped call (sync, future, or future with a value);
//!   async calls get a closure so the future is built after PRE
//! - POST: emit the finish entry only when the call succeeded; plain
//!   (non-`Result`) values always count as success
//!
//! # Design Decisions
//! - Failures are returned to the caller untouched and get no finish entry
//! - Panics unwind straight through; nothing is caught
//! - Dropping an async interception drops the inner future with it, so
//!   cancellation is exactly the wrapped operation's cancellation
//! - Holds no per-call state; clones share the registry

use std::future::Future;
use std::sync::Arc;

use crate::interception::invocation::Invocation;
use crate::logging::{LevelResolver, LoggerHandle, LoggerRegistry};

/// How the interceptor tells a completed call from a failed one.
pub trait Outcome {
    fn is_success(&self) -> bool;
}

impl Outcome for () {
    fn is_success(&self) -> bool {
        true
    }
}

impl<T, E> Outcome for Result<T, E> {
    fn is_success(&self) -> bool {
        self.is_ok()
    }
}

/// A plain return value: the call cannot fail short of panicking.
struct Completed<T>(T);

impl<T> Outcome for Completed<T> {
    fn is_success(&self) -> bool {
        true
    }
}

/// Wraps calls with uniform start/finish logging.
#[derive(Clone, Debug)]
pub struct LoggingInterceptor {
    registry: Arc<LoggerRegistry>,
    levels: LevelResolver,
}

impl LoggingInterceptor {
    pub fn new(registry: Arc<LoggerRegistry>, levels: LevelResolver) -> Self {
        Self { registry, levels }
    }

    pub fn registry(&self) -> &Arc<LoggerRegistry> {
        &self.registry
    }

    pub fn levels(&self) -> &LevelResolver {
        &self.levels
    }

    /// Synchronous call: `proceed` runs to completion before POST.
    pub fn intercept<R, F>(&self, invocation: &Invocation, proceed: F) -> R
    where
        R: Outcome,
        F: FnOnce() -> R,
    {
        let logger = self.before(invocation);
        let outcome = proceed();
        self.after(&logger, invocation, &outcome);
        outcome
    }

    /// Synchronous call returning a plain value; POST always follows.
    pub fn intercept_value<T, F>(&self, invocation: &Invocation, proceed: F) -> T
    where
        F: FnOnce() -> T,
    {
        self.intercept(invocation, || Completed(proceed())).0
    }

    /// Asynchronous call with no value.
    ///
    /// `proceed` builds the inner future and is only called after the start
    /// entry is written.
    pub async fn intercept_async<F, Fut, E>(&self, invocation: &Invocation, proceed: F) -> Result<(), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        self.around(invocation, proceed).await
    }

    /// Asynchronous call producing a value, which is returned unchanged.
    pub async fn intercept_async_with_result<F, Fut, T, E>(
        &self,
        invocation: &Invocation,
        proceed: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.around(invocation, proceed).await
    }

    /// Asynchronous call whose output is not a `Result`; POST always follows.
    pub async fn intercept_async_value<F, Fut>(&self, invocation: &Invocation, proceed: F) -> Fut::Output
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        self.around(invocation, || async move { Completed(proceed().await) })
            .await
            .0
    }

    async fn around<F, Fut>(&self, invocation: &Invocation, proceed: F) -> Fut::Output
    where
        F: FnOnce() -> Fut,
        Fut: Future,
        Fut::Output: Outcome,
    {
        let logger = self.before(invocation);
        let outcome = proceed().await;
        self.after(&logger, invocation, &outcome);
        outcome
    }

    fn before(&self, invocation: &Invocation) -> LoggerHandle {
        let logger = self.registry.get(invocation.target());
        logger.log_method_started(
            self.levels.start_level(),
            invocation.method(),
            invocation.parameters(),
        );
        logger
    }

    fn after<R: Outcome>(&self, logger: &LoggerHandle, invocation: &Invocation, outcome: &R) {
        if outcome.is_success() {
            logger.log_method_completed(self.levels.finish_level(), invocation.method(), None);
        }
    }
}
