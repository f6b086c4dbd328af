//! Composition root support.
//!
//! # Data Flow
//! ```text
//! startup:
//!     ServiceCollection (registrations, in order)
//!     → rewriter.rs (capability-marked entries → decorator factories)
//!     → ServiceProvider (frozen table + singleton cache)
//!
//! per request:
//!     ServiceProvider::create_scope()
//!     → ServiceScope::get::<dyn Api>() (decorator around the implementation)
//! ```
//!
//! # Design Decisions
//! - Registrations are explicit; interfaces declare the marker at registration
//! - Rewriting happens once, before the provider is built

pub mod collection;
pub mod descriptor;
pub mod error;
pub mod provider;
pub mod rewriter;

pub use collection::ServiceCollection;
pub use descriptor::{Implementation, Lifetime, ServiceDescriptor, ServiceType};
pub use error::ResolveError;
pub use provider::{Resolver, ServiceProvider, ServiceScope};
pub use rewriter::{is_interceptable, rewrite_registrations};
