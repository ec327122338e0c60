//! Admin editing service
//!
//! Forms are validated before anything reaches the store. Store failures
//! come back as [`AppError`]; an id that does not resolve is reported with
//! the entity's own not-found code.

use std::sync::Arc;

use shared::models::{
    Collection, CollectionUpdate, Product, ProductUpdate, SiteConfig, SiteConfigUpdate,
};
use shared::{
    CatalogStore, Editable, ImageFolder, ImageStore, Orderable, SiteConfigStore, StoreError,
};

use crate::utils::validation::{
    CollectionForm, ProductForm, validate_image_upload, validate_site_config,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Map a store failure for one entity kind, logging it with its category
fn catalog_error<T: Editable>(
    action: &'static str,
    id: Option<&T::Id>,
    err: StoreError,
) -> AppError {
    let app = match (err, id) {
        (StoreError::NotFound(_), Some(id)) => {
            AppError::with_message(T::NOT_FOUND, format!("{} {id} not found", T::KIND))
                .with_detail("id", id.to_string())
        }
        (other, _) => other.into(),
    };
    log_failure(T::KIND, action, &app);
    app
}

fn log_failure(kind: &'static str, action: &'static str, err: &AppError) {
    tracing::error!(
        kind,
        action,
        code = %err.code,
        category = err.code.category().name(),
        error = %err.message,
        "Admin operation failed"
    );
}

fn storage_error(action: &'static str, err: StoreError) -> AppError {
    let app = AppError::with_message(ErrorCode::StorageError, err.to_string());
    log_failure("image", action, &app);
    app
}

async fn fetch<T: Editable>(store: &dyn CatalogStore<T>, id: &T::Id) -> AppResult<T> {
    match store.find_by_id(id).await {
        Ok(Some(row)) => Ok(row),
        Ok(None) => Err(catalog_error::<T>(
            "fetch",
            Some(id),
            StoreError::NotFound(id.to_string()),
        )),
        Err(e) => Err(catalog_error::<T>("fetch", Some(id), e)),
    }
}

async fn create<T: Editable>(store: &dyn CatalogStore<T>, data: &T::Create) -> AppResult<T> {
    let row = store
        .create(data)
        .await
        .map_err(|e| catalog_error::<T>("create", None, e))?;
    tracing::info!(kind = T::KIND, id = %row.id(), "Created");
    Ok(row)
}

async fn update<T: Editable>(
    store: &dyn CatalogStore<T>,
    id: &T::Id,
    data: &T::Update,
) -> AppResult<T> {
    let row = store
        .update(id, data)
        .await
        .map_err(|e| catalog_error::<T>("update", Some(id), e))?;
    tracing::info!(kind = T::KIND, id = %id, "Updated");
    Ok(row)
}

async fn delete<T: Editable>(store: &dyn CatalogStore<T>, id: &T::Id) -> AppResult<()> {
    store
        .delete(id)
        .await
        .map_err(|e| catalog_error::<T>("delete", Some(id), e))?;
    tracing::info!(kind = T::KIND, id = %id, "Deleted");
    Ok(())
}

/// Create, edit and delete for everything the admin manages
#[derive(Clone)]
pub struct AdminService {
    products: Arc<dyn CatalogStore<Product>>,
    collections: Arc<dyn CatalogStore<Collection>>,
    site: Arc<dyn SiteConfigStore>,
    images: Arc<dyn ImageStore>,
}

impl AdminService {
    pub fn new(
        products: Arc<dyn CatalogStore<Product>>,
        collections: Arc<dyn CatalogStore<Collection>>,
        site: Arc<dyn SiteConfigStore>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            products,
            collections,
            site,
            images,
        }
    }

    // ========== Products ==========

    pub async fn product(&self, id: &str) -> AppResult<Product> {
        fetch(self.products.as_ref(), &id.to_string()).await
    }

    /// Validate the form and insert a new product
    pub async fn create_product(&self, form: &ProductForm) -> AppResult<Product> {
        let data = form.validate()?;
        create(self.products.as_ref(), &data).await
    }

    /// Validate the full edit form and overwrite every field but the rank
    pub async fn update_product(&self, id: &str, form: &ProductForm) -> AppResult<Product> {
        let data = ProductUpdate::from(form.validate()?);
        update(self.products.as_ref(), &id.to_string(), &data).await
    }

    /// Unvalidated partial update (stock, featured toggle)
    pub async fn patch_product(&self, id: &str, data: &ProductUpdate) -> AppResult<Product> {
        update(self.products.as_ref(), &id.to_string(), data).await
    }

    pub async fn delete_product(&self, id: &str) -> AppResult<()> {
        delete(self.products.as_ref(), &id.to_string()).await
    }

    // ========== Collections ==========

    pub async fn collection(&self, id: &str) -> AppResult<Collection> {
        fetch(self.collections.as_ref(), &id.to_string()).await
    }

    pub async fn create_collection(&self, form: &CollectionForm) -> AppResult<Collection> {
        let data = form.validate()?;
        create(self.collections.as_ref(), &data).await
    }

    pub async fn update_collection(
        &self,
        id: &str,
        form: &CollectionForm,
    ) -> AppResult<Collection> {
        let data = CollectionUpdate::from(form.validate()?);
        update(self.collections.as_ref(), &id.to_string(), &data).await
    }

    pub async fn delete_collection(&self, id: &str) -> AppResult<()> {
        delete(self.collections.as_ref(), &id.to_string()).await
    }

    // ========== Site config ==========

    /// Stored configuration, or the defaults when no row exists yet
    pub async fn site_config(&self) -> AppResult<SiteConfig> {
        Ok(self.site.site_config().await?.unwrap_or_default())
    }

    /// Validate the merged result before writing the partial update
    pub async fn update_site_config(&self, update: &SiteConfigUpdate) -> AppResult<SiteConfig> {
        let mut merged = self.site_config().await?;
        merged.apply(update.clone());
        validate_site_config(&merged)?;

        let saved = self.site.update_site_config(update).await?;
        tracing::info!(store_name = %saved.store_name, "Site config updated");
        Ok(saved)
    }

    // ========== Images ==========

    /// Check and upload one image, returning its public URL
    ///
    /// `existing` is how many images the entity already has.
    pub async fn upload_image(
        &self,
        folder: ImageFolder,
        file_name: &str,
        bytes: Vec<u8>,
        existing: usize,
    ) -> AppResult<String> {
        validate_image_upload(file_name, bytes.len() as u64, existing)?;
        let url = self
            .images
            .upload_image(bytes, file_name, folder)
            .await
            .map_err(|e| storage_error("upload", e))?;
        tracing::info!(url = %url, "Image uploaded");
        Ok(url)
    }

    pub async fn delete_image(&self, url: &str) -> AppResult<()> {
        self.images
            .delete_image(url)
            .await
            .map_err(|e| storage_error("delete", e))
    }
}
