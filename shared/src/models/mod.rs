//! Data models
//!
//! Row shapes of the hosted backend tables, shared between the storefront
//! core and the REST client. IDs are opaque strings assigned by the backend.

pub mod collection;
pub mod metrics;
pub mod product;
pub mod site_config;

// Re-exports
pub use collection::*;
pub use metrics::*;
pub use product::*;
pub use site_config::*;
