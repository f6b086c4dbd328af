//! Resolution errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no registration for service {0}")]
    NotRegistered(&'static str),

    #[error("registered instance is not a {0}")]
    TypeMismatch(&'static str),

    #[error("scoped service {0} cannot be resolved outside a scope")]
    ScopedFromRoot(&'static str),

    #[error("failed to construct {service}: {reason}")]
    Activation { service: &'static str, reason: String },
}

impl ResolveError {
    /// Wrap a constructor failure for `S`.
    pub fn activation<S: ?Sized>(reason: impl std::fmt::Display) -> Self {
        ResolveError::Activation {
            service: std::any::type_name::<S>(),
            reason: reason.to_string(),
        }
    }
}
