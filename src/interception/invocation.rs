//! A captured call crossing the interception boundary.

use std::borrow::Cow;

use crate::logging::TargetType;

/// The identity of one intercepted call: which implementation, which
/// method, and optionally a snapshot of its arguments.
///
/// The return slot is the value the interceptor hands back to the caller.
#[derive(Debug, Clone)]
pub struct Invocation {
    target: TargetType,
    method: Cow<'static, str>,
    parameters: Option<String>,
}

impl Invocation {
    pub fn new(target: TargetType, method: impl Into<Cow<'static, str>>) -> Self {
        Self {
            target,
            method: method.into(),
            parameters: None,
        }
    }

    /// Invocation on implementation type `T`.
    pub fn of<T: ?Sized + 'static>(method: impl Into<Cow<'static, str>>) -> Self {
        Self::new(TargetType::of::<T>(), method)
    }

    pub fn with_parameters(mut self, parameters: impl Into<String>) -> Self {
        self.parameters = Some(parameters.into());
        self
    }

    pub fn target(&self) -> TargetType {
        self.target
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn parameters(&self) -> Option<&str> {
        self.parameters.as_deref()
    }
}
