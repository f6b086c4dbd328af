//! Lifecycle management for the demo host.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     broadcast → server stops accepting → drains → exits
//!                → config watcher task exits
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
