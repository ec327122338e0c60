//! Storefront Client - hosted backend access
//!
//! Talks to a PostgREST-style REST API (tables) and its object storage
//! (product and collection images). Tables, the site config row and the
//! image bucket are exposed through the `shared` store contracts
//! ([`shared::CatalogStore`], [`shared::MetricsStore`], [`shared::ImageStore`]
//! and friends) so the storefront core never sees HTTP.
//!
//! # Example
//!
//! ```ignore
//! use storefront_client::{ClientConfig, RestClient, RestTable};
//! use shared::models::Product;
//!
//! let client = RestClient::new(ClientConfig::new("https://xyz.backend.io", "anon-key"))?;
//! let products: RestTable<Product> = RestTable::products(client.clone());
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod storage;

pub use client::{RestClient, RestMetrics, RestTable};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use storage::StorageClient;
