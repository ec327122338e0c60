//! Shared types for the storefront workspace
//!
//! Domain models, ordering capabilities, store contracts and the unified
//! error system used by both the storefront core and the backend client.

pub mod error;
pub mod models;
pub mod ordering;
pub mod store;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use ordering::{DisplayOrderPatch, ListOrder, Orderable, Searchable, SortKey};
pub use store::{
    CatalogStore, Editable, EntityStore, ImageFolder, ImageStore, MetricsStore, SiteConfigStore,
    StoreError, StoreResult,
};
