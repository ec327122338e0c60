//! Store contracts
//!
//! The hosted backend is reached only through these traits. The REST client
//! and the in-memory backend both implement them.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::error::{AppError, ErrorCode};
use crate::models::{
    Collection, CollectionCreate, CollectionUpdate, Counter, PageVisitRow, Product,
    ProductCreate, ProductUpdate, ProductViewRow, SiteConfig, SiteConfigUpdate, WhatsappClickRow,
};
use crate::ordering::{DisplayOrderPatch, ListOrder, Orderable};

/// Store error types
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rejected by backend ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let code = match &err {
            StoreError::NotFound(_) => ErrorCode::NotFound,
            StoreError::Rejected { status, .. } => http::StatusCode::from_u16(*status)
                .map(ErrorCode::from_http_status)
                .unwrap_or(ErrorCode::DatabaseError),
            StoreError::Transport(_) => ErrorCode::NetworkError,
            StoreError::Decode(_) => ErrorCode::InvalidFormat,
        };
        AppError::with_message(code, err.to_string())
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Read/update access to one orderable table
#[async_trait]
pub trait EntityStore<T: Orderable>: Send + Sync {
    /// Full listing in the requested order
    async fn list(&self, order: &ListOrder) -> StoreResult<Vec<T>>;

    /// Write a new rank for one entity, addressed by id
    async fn update_display_order(&self, id: &T::Id, patch: DisplayOrderPatch)
    -> StoreResult<()>;
}

/// Entity kinds the admin creates, edits and deletes
pub trait Editable: Orderable {
    /// Insert payload
    type Create: Serialize + Send + Sync;
    /// Partial update payload, unset fields untouched
    type Update: Serialize + Send + Sync;

    /// Singular noun used in messages
    const KIND: &'static str;
    /// Code reported when an id does not resolve
    const NOT_FOUND: ErrorCode;
}

impl Editable for Product {
    type Create = ProductCreate;
    type Update = ProductUpdate;

    const KIND: &'static str = "product";
    const NOT_FOUND: ErrorCode = ErrorCode::ProductNotFound;
}

impl Editable for Collection {
    type Create = CollectionCreate;
    type Update = CollectionUpdate;

    const KIND: &'static str = "collection";
    const NOT_FOUND: ErrorCode = ErrorCode::CollectionNotFound;
}

/// Full create/read/update/delete access to one table
#[async_trait]
pub trait CatalogStore<T: Editable>: EntityStore<T> {
    async fn find_by_id(&self, id: &T::Id) -> StoreResult<Option<T>>;

    /// Insert one row and return it as stored
    async fn create(&self, data: &T::Create) -> StoreResult<T>;

    /// Apply a partial update; `NotFound` when the id does not exist
    async fn update(&self, id: &T::Id, data: &T::Update) -> StoreResult<T>;

    /// Remove one row; `NotFound` when the id does not exist
    async fn delete(&self, id: &T::Id) -> StoreResult<()>;
}

/// Single-row site configuration table
#[async_trait]
pub trait SiteConfigStore: Send + Sync {
    /// `None` when the row has not been created yet
    async fn site_config(&self) -> StoreResult<Option<SiteConfig>>;

    async fn update_site_config(&self, update: &SiteConfigUpdate) -> StoreResult<SiteConfig>;
}

/// Top-level folder inside the image bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFolder {
    Products,
    Collections,
}

impl ImageFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFolder::Products => "products",
            ImageFolder::Collections => "collections",
        }
    }
}

/// Public image storage
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store the bytes and return the public URL
    async fn upload_image(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        folder: ImageFolder,
    ) -> StoreResult<String>;

    /// Remove the object behind a public URL
    async fn delete_image(&self, url: &str) -> StoreResult<()>;
}

/// Daily counter tables
///
/// Counters follow read-then-write: look up today's row, then update it or
/// insert a fresh one. There is no atomic increment on the backend.
#[async_trait]
pub trait MetricsStore: Send + Sync {
    /// Current value of a counter for one day, `None` when no row exists
    async fn find_count(&self, counter: &Counter, date: NaiveDate) -> StoreResult<Option<u64>>;

    async fn insert_count(&self, counter: &Counter, date: NaiveDate, value: u64)
    -> StoreResult<()>;

    async fn update_count(&self, counter: &Counter, date: NaiveDate, value: u64)
    -> StoreResult<()>;

    async fn page_visits(&self) -> StoreResult<Vec<PageVisitRow>>;

    async fn product_views(&self) -> StoreResult<Vec<ProductViewRow>>;

    async fn whatsapp_clicks(&self) -> StoreResult<Vec<WhatsappClickRow>>;
}
