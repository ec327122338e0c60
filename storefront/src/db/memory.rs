//! In-memory backend
//!
//! Holds every table behind `parking_lot::RwLock`. Implements the same store
//! contracts as the REST client, so managers and services run unchanged
//! against it. Failures can be injected per product/collection id, for all
//! metrics calls or for all image calls.

use std::path::Path;

use std::cmp::Ordering;
use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use shared::models::{
    Collection, CollectionCreate, CollectionUpdate, Counter, PageVisitRow, Product,
    ProductCreate, ProductUpdate, ProductViewRow, SiteConfig, SiteConfigUpdate, WhatsappClickRow,
};
use shared::{
    CatalogStore, DisplayOrderPatch, EntityStore, ImageFolder, ImageStore, ListOrder,
    MetricsStore, Orderable, SiteConfigStore, StoreError, StoreResult,
};

/// URL prefix of images held by the memory backend
pub const MEMORY_IMAGE_PREFIX: &str = "memory://images/";

/// Field comparison used to honour `ListOrder` in memory
trait SortFields {
    fn cmp_field(&self, other: &Self, field: &str) -> Ordering;
}

impl SortFields for Product {
    fn cmp_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "display_order" => self.display_order.cmp(&other.display_order),
            "created_at" => self.created_at.cmp(&other.created_at),
            "name" => self.name.cmp(&other.name),
            "price" => self.price.cmp(&other.price),
            _ => Ordering::Equal,
        }
    }
}

impl SortFields for Collection {
    fn cmp_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "display_order" => self.display_order.cmp(&other.display_order),
            "created_at" => self.created_at.cmp(&other.created_at),
            "name" => self.name.cmp(&other.name),
            _ => Ordering::Equal,
        }
    }
}

fn sorted<T: SortFields + Clone>(rows: &[T], order: &ListOrder) -> Vec<T> {
    let mut rows = rows.to_vec();
    rows.sort_by(|a, b| {
        order.keys().iter().fold(Ordering::Equal, |acc, key| {
            acc.then_with(|| {
                let ord = a.cmp_field(b, &key.field);
                if key.ascending { ord } else { ord.reverse() }
            })
        })
    });
    rows
}

fn injected(id: &str) -> StoreError {
    StoreError::Rejected {
        status: 503,
        message: format!("injected failure for {id}"),
    }
}

#[derive(Debug, Default)]
struct MetricsTables {
    page_visits: Vec<PageVisitRow>,
    product_views: Vec<ProductViewRow>,
    whatsapp_clicks: Vec<WhatsappClickRow>,
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    products: RwLock<Vec<Product>>,
    collections: RwLock<Vec<Collection>>,
    site_config: RwLock<SiteConfig>,
    metrics: RwLock<MetricsTables>,
    images: RwLock<HashSet<String>>,
    failing_ids: RwLock<HashSet<String>>,
    failing_metrics: RwLock<bool>,
    failing_images: RwLock<bool>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Seeding ==========

    /// Insert a product with a fresh id, appended after existing ranks
    pub fn insert_product(&self, data: ProductCreate) -> Product {
        let mut products = self.products.write();
        let now = Utc::now();
        let product = Product {
            id: uuid::Uuid::new_v4().to_string(),
            name: data.name,
            description: data.description,
            price: data.price,
            images: data.images,
            category: data.category,
            stock: data.stock,
            featured: data.featured,
            display_order: data.display_order.unwrap_or(products.len() as u32),
            created_at: Some(now),
            updated_at: Some(now),
        };
        products.push(product.clone());
        tracing::debug!(id = %product.id, name = %product.name, "Product inserted");
        product
    }

    pub fn insert_collection(&self, data: CollectionCreate) -> Collection {
        let mut collections = self.collections.write();
        let now = Utc::now();
        let collection = Collection {
            id: uuid::Uuid::new_v4().to_string(),
            name: data.name,
            description: data.description,
            image: data.image,
            product_ids: data.product_ids,
            display_order: data.display_order.unwrap_or(collections.len() as u32),
            created_at: Some(now),
            updated_at: Some(now),
        };
        collections.push(collection.clone());
        tracing::debug!(id = %collection.id, name = %collection.name, "Collection inserted");
        collection
    }

    /// Replace the product table wholesale
    pub fn set_products(&self, products: Vec<Product>) {
        *self.products.write() = products;
    }

    pub fn products(&self) -> Vec<Product> {
        self.products.read().clone()
    }

    pub fn collections(&self) -> Vec<Collection> {
        self.collections.read().clone()
    }

    /// Public URLs of every stored image
    pub fn images(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.images.read().iter().cloned().collect();
        urls.sort();
        urls
    }

    // ========== Failure injection ==========

    /// Make every write addressed to `id` fail
    pub fn fail_updates_for(&self, id: impl Into<String>) {
        self.failing_ids.write().insert(id.into());
    }

    pub fn clear_failures(&self) {
        self.failing_ids.write().clear();
        *self.failing_metrics.write() = false;
        *self.failing_images.write() = false;
    }

    /// Make every metrics call fail
    pub fn fail_metrics(&self, fail: bool) {
        *self.failing_metrics.write() = fail;
    }

    /// Make every image upload and delete fail
    pub fn fail_images(&self, fail: bool) {
        *self.failing_images.write() = fail;
    }

    fn check_id(&self, id: &str) -> StoreResult<()> {
        if self.failing_ids.read().contains(id) {
            return Err(injected(id));
        }
        Ok(())
    }

    fn check_metrics(&self, table: &str) -> StoreResult<()> {
        if *self.failing_metrics.read() {
            return Err(injected(table));
        }
        Ok(())
    }

    fn check_images(&self, what: &str) -> StoreResult<()> {
        if *self.failing_images.read() {
            return Err(injected(what));
        }
        Ok(())
    }
}

fn patch_rank<T: Orderable<Id = String>>(
    rows: &mut [T],
    id: &str,
    patch: DisplayOrderPatch,
) -> StoreResult<()> {
    let row = rows
        .iter_mut()
        .find(|row| row.id() == id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    row.set_display_order(patch.display_order);
    Ok(())
}

#[async_trait]
impl EntityStore<Product> for MemoryBackend {
    async fn list(&self, order: &ListOrder) -> StoreResult<Vec<Product>> {
        Ok(sorted(&self.products.read(), order))
    }

    async fn update_display_order(&self, id: &String, patch: DisplayOrderPatch) -> StoreResult<()> {
        self.check_id(id)?;
        let mut products = self.products.write();
        patch_rank(&mut products, id, patch)?;
        if let Some(p) = products.iter_mut().find(|p| &p.id == id) {
            p.updated_at = Some(Utc::now());
        }
        Ok(())
    }
}

#[async_trait]
impl EntityStore<Collection> for MemoryBackend {
    async fn list(&self, order: &ListOrder) -> StoreResult<Vec<Collection>> {
        Ok(sorted(&self.collections.read(), order))
    }

    async fn update_display_order(&self, id: &String, patch: DisplayOrderPatch) -> StoreResult<()> {
        self.check_id(id)?;
        let mut collections = self.collections.write();
        patch_rank(&mut collections, id, patch)?;
        if let Some(c) = collections.iter_mut().find(|c| &c.id == id) {
            c.updated_at = Some(Utc::now());
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore<Product> for MemoryBackend {
    async fn find_by_id(&self, id: &String) -> StoreResult<Option<Product>> {
        Ok(self.products.read().iter().find(|p| &p.id == id).cloned())
    }

    async fn create(&self, data: &ProductCreate) -> StoreResult<Product> {
        Ok(self.insert_product(data.clone()))
    }

    async fn update(&self, id: &String, data: &ProductUpdate) -> StoreResult<Product> {
        self.check_id(id)?;
        let mut products = self.products.write();
        let product = products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("products {id}")))?;
        product.apply(data.clone());
        product.updated_at = Some(Utc::now());
        Ok(product.clone())
    }

    async fn delete(&self, id: &String) -> StoreResult<()> {
        self.check_id(id)?;
        let mut products = self.products.write();
        let before = products.len();
        products.retain(|p| &p.id != id);
        if products.len() == before {
            return Err(StoreError::NotFound(format!("products {id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore<Collection> for MemoryBackend {
    async fn find_by_id(&self, id: &String) -> StoreResult<Option<Collection>> {
        Ok(self.collections.read().iter().find(|c| &c.id == id).cloned())
    }

    async fn create(&self, data: &CollectionCreate) -> StoreResult<Collection> {
        Ok(self.insert_collection(data.clone()))
    }

    async fn update(&self, id: &String, data: &CollectionUpdate) -> StoreResult<Collection> {
        self.check_id(id)?;
        let mut collections = self.collections.write();
        let collection = collections
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("collections {id}")))?;
        collection.apply(data.clone());
        collection.updated_at = Some(Utc::now());
        Ok(collection.clone())
    }

    async fn delete(&self, id: &String) -> StoreResult<()> {
        self.check_id(id)?;
        let mut collections = self.collections.write();
        let before = collections.len();
        collections.retain(|c| &c.id != id);
        if collections.len() == before {
            return Err(StoreError::NotFound(format!("collections {id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl SiteConfigStore for MemoryBackend {
    async fn site_config(&self) -> StoreResult<Option<SiteConfig>> {
        Ok(Some(self.site_config.read().clone()))
    }

    async fn update_site_config(&self, update: &SiteConfigUpdate) -> StoreResult<SiteConfig> {
        let mut config = self.site_config.write();
        config.apply(update.clone());
        Ok(config.clone())
    }
}

#[async_trait]
impl ImageStore for MemoryBackend {
    async fn upload_image(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        folder: ImageFolder,
    ) -> StoreResult<String> {
        self.check_images(file_name)?;
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin")
            .to_ascii_lowercase();
        let url = format!(
            "{MEMORY_IMAGE_PREFIX}{}/{}.{ext}",
            folder.as_str(),
            uuid::Uuid::new_v4()
        );
        tracing::debug!(url = %url, size = bytes.len(), "Image stored");
        self.images.write().insert(url.clone());
        Ok(url)
    }

    async fn delete_image(&self, url: &str) -> StoreResult<()> {
        self.check_images(url)?;
        if !self.images.write().remove(url) {
            return Err(StoreError::NotFound(url.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MetricsStore for MemoryBackend {
    async fn find_count(&self, counter: &Counter, date: NaiveDate) -> StoreResult<Option<u64>> {
        self.check_metrics(counter.table())?;
        let tables = self.metrics.read();
        let value = match counter {
            Counter::PageVisits => tables
                .page_visits
                .iter()
                .find(|r| r.date == date)
                .map(|r| r.visits),
            Counter::ProductViews(id) => tables
                .product_views
                .iter()
                .find(|r| r.date == date && &r.product_id == id)
                .map(|r| r.views),
            Counter::WhatsappClicks(id) => tables
                .whatsapp_clicks
                .iter()
                .find(|r| r.date == date && &r.product_id == id)
                .map(|r| r.clicks),
        };
        Ok(value)
    }

    async fn insert_count(
        &self,
        counter: &Counter,
        date: NaiveDate,
        value: u64,
    ) -> StoreResult<()> {
        self.check_metrics(counter.table())?;
        let mut tables = self.metrics.write();
        match counter {
            Counter::PageVisits => tables.page_visits.push(PageVisitRow {
                date,
                visits: value,
            }),
            Counter::ProductViews(id) => tables.product_views.push(ProductViewRow {
                product_id: id.clone(),
                date,
                views: value,
            }),
            Counter::WhatsappClicks(id) => tables.whatsapp_clicks.push(WhatsappClickRow {
                product_id: id.clone(),
                date,
                clicks: value,
            }),
        }
        Ok(())
    }

    async fn update_count(
        &self,
        counter: &Counter,
        date: NaiveDate,
        value: u64,
    ) -> StoreResult<()> {
        self.check_metrics(counter.table())?;
        let mut tables = self.metrics.write();
        let slot = match counter {
            Counter::PageVisits => tables
                .page_visits
                .iter_mut()
                .find(|r| r.date == date)
                .map(|r| &mut r.visits),
            Counter::ProductViews(id) => tables
                .product_views
                .iter_mut()
                .find(|r| r.date == date && &r.product_id == id)
                .map(|r| &mut r.views),
            Counter::WhatsappClicks(id) => tables
                .whatsapp_clicks
                .iter_mut()
                .find(|r| r.date == date && &r.product_id == id)
                .map(|r| &mut r.clicks),
        };
        match slot {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("{} row for {date}", counter.table()))),
        }
    }

    async fn page_visits(&self) -> StoreResult<Vec<PageVisitRow>> {
        self.check_metrics("page_visits")?;
        Ok(self.metrics.read().page_visits.clone())
    }

    async fn product_views(&self) -> StoreResult<Vec<ProductViewRow>> {
        self.check_metrics("product_views")?;
        Ok(self.metrics.read().product_views.clone())
    }

    async fn whatsapp_clicks(&self) -> StoreResult<Vec<WhatsappClickRow>> {
        self.check_metrics("whatsapp_clicks")?;
        Ok(self.metrics.read().whatsapp_clicks.clone())
    }
}
