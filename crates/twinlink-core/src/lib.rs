//! Core types for the Twinlink digital twin backend.
//!
//! This crate holds the collaborators the placeholder engine builds on:
//!
//! - **Identifiers**: `namespace:name` entity ids ([`id`])
//! - **Headers**: immutable, case-insensitive header lookups ([`headers`])
//! - **Topic paths**: protocol topic addressing ([`topic`])
//! - **Configuration**: defaults and environment overrides ([`config`])
//! - **Logging**: `tracing` subscriber setup ([`logging`])

pub mod config;
pub mod error;
pub mod headers;
pub mod id;
pub mod logging;
pub mod topic;

pub use error::{Error, ErrorResponse, Result};
pub use headers::{HeaderLookup, Headers};
pub use id::{IdError, NamespacedId, ThingId};
pub use topic::{TopicChannel, TopicPath};

/// Re-exports commonly used types.
pub mod prelude {
    pub use crate::config::{env_vars, placeholder, PlaceholderConfig};
    pub use crate::error::{Error, ErrorResponse, Result};
    pub use crate::headers::{HeaderLookup, Headers};
    pub use crate::id::{IdError, NamespacedId, ThingId};
    pub use crate::topic::{TopicChannel, TopicPath};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
