//! Method interception subsystem.
//!
//! # Data Flow
//! ```text
//! caller
//!     → decorator (implements the same interface as the target)
//!     → Intercepted::call* (builds the Invocation)
//!     → LoggingInterceptor (PRE → INVOKE → POST)
//!     → wrapped implementation
//! ```
//!
//! # Design Decisions
//! - No runtime proxies: each capability interface ships an explicit decorator
//! - One generic wrapper covers sync, future, and future-with-value calls
//! - Method names are passed by the decorator, not inferred

pub mod decorator;
pub mod endpoint;
pub mod interceptor;
pub mod invocation;

pub use decorator::{Interceptable, Intercepted};
pub use endpoint::{EndpointLogging, EndpointLoggingLayer};
pub use interceptor::{LoggingInterceptor, Outcome};
pub use invocation::Invocation;
