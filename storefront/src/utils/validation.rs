//! Input validation helpers
//!
//! Admin form rules for products, collections, site configuration and image
//! uploads. Form validators collect every failing field at once, keyed by
//! field name, so the form can highlight all of them together.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use shared::models::{CollectionCreate, ProductCreate, SiteConfig};
use thiserror::Error;

use crate::utils::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, collection, category, store name
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions and free text (business hours, store description)
pub const MAX_NOTE_LEN: usize = 2000;

/// Short identifiers: phone, social handles
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Image limits ────────────────────────────────────────────────────

/// Images per product
pub const MAX_IMAGES_PER_PRODUCT: usize = 5;

/// Upload size limit (2 MB)
pub const MAX_IMAGE_BYTES: u64 = 2 * 1024 * 1024;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        ));
    }
    validate_max_len(value, field, max_len)
}

fn validate_max_len(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        )));
    }
    Ok(())
}

/// Field-keyed validation failures
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("validation failed: {}", .0.keys().cloned().collect::<Vec<_>>().join(", "))]
pub struct ValidationErrors(pub BTreeMap<&'static str, String>);

impl ValidationErrors {
    fn check(&mut self, field: &'static str, result: Result<(), AppError>) {
        if let Err(e) = result {
            self.0.entry(field).or_insert(e.message);
        }
    }

    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let message = errors.to_string();
        errors
            .0
            .into_iter()
            .fold(AppError::validation(message), |err, (field, msg)| {
                err.with_detail(field, msg)
            })
    }
}

/// Raw product form input, as typed by the admin
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub stock: String,
    pub images: Vec<String>,
    pub featured: bool,
}

impl ProductForm {
    /// Check every field and build the create payload
    pub fn validate(&self) -> Result<ProductCreate, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.check("name", validate_required_text(&self.name, "name", MAX_NAME_LEN));
        errors.check(
            "description",
            validate_required_text(&self.description, "description", MAX_NOTE_LEN),
        );
        errors.check(
            "category",
            validate_required_text(&self.category, "category", MAX_NAME_LEN),
        );

        let price = parse_price(&self.price);
        if let Err(msg) = &price {
            errors.add("price", msg.clone());
        }
        let stock = parse_stock(&self.stock);
        if let Err(msg) = &stock {
            errors.add("stock", msg.clone());
        }

        if self.images.len() > MAX_IMAGES_PER_PRODUCT {
            errors.add(
                "images",
                format!("at most {MAX_IMAGES_PER_PRODUCT} images per product"),
            );
        }
        for url in &self.images {
            errors.check("images", validate_max_len(url, "image url", MAX_URL_LEN));
        }

        match (price, stock) {
            (Ok(price), Ok(stock)) => errors.into_result(ProductCreate {
                name: self.name.trim().to_string(),
                description: self.description.trim().to_string(),
                price,
                images: self.images.clone(),
                category: self.category.trim().to_string(),
                stock,
                featured: self.featured,
                display_order: None,
            }),
            _ => Err(errors),
        }
    }
}

fn parse_price(raw: &str) -> Result<Decimal, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("price must not be empty".into());
    }
    match Decimal::from_str(raw) {
        Ok(price) if price > Decimal::ZERO => Ok(price),
        _ => Err("price must be a positive number".into()),
    }
}

fn parse_stock(raw: &str) -> Result<u32, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("stock must not be empty".into());
    }
    raw.parse::<u32>()
        .map_err(|_| "stock must be a non-negative whole number".to_string())
}

/// Raw collection form input
#[derive(Debug, Clone, Default)]
pub struct CollectionForm {
    pub name: String,
    pub description: String,
    pub image: String,
    pub product_ids: Vec<String>,
}

impl CollectionForm {
    pub fn validate(&self) -> Result<CollectionCreate, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.check("name", validate_required_text(&self.name, "name", MAX_NAME_LEN));
        errors.check(
            "description",
            validate_required_text(&self.description, "description", MAX_NOTE_LEN),
        );
        errors.check("image", validate_max_len(&self.image, "image url", MAX_URL_LEN));

        let mut product_ids = self.product_ids.clone();
        product_ids.dedup();

        errors.into_result(CollectionCreate {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            image: self.image.clone(),
            product_ids,
            display_order: None,
        })
    }
}

/// Site configuration rules
pub fn validate_site_config(config: &SiteConfig) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    errors.check(
        "store_name",
        validate_required_text(&config.store_name, "store name", MAX_NAME_LEN),
    );
    errors.check(
        "store_description",
        validate_max_len(&config.store_description, "store description", MAX_NOTE_LEN),
    );
    errors.check(
        "contact_email",
        validate_required_text(&config.contact_email, "contact email", MAX_EMAIL_LEN),
    );
    if !config.contact_email.trim().is_empty() && !looks_like_email(&config.contact_email) {
        errors.add("contact_email", "contact email is not a valid address");
    }
    errors.check(
        "contact_phone",
        validate_max_len(&config.contact_phone, "contact phone", MAX_SHORT_TEXT_LEN),
    );
    errors.check(
        "address",
        validate_max_len(&config.address, "address", MAX_ADDRESS_LEN),
    );
    errors.check(
        "business_hours",
        validate_max_len(&config.business_hours, "business hours", MAX_NOTE_LEN),
    );
    let social = &config.social_media;
    for (field, handle) in [
        ("instagram", &social.instagram),
        ("facebook", &social.facebook),
        ("twitter", &social.twitter),
        ("pinterest", &social.pinterest),
    ] {
        errors.check(field, validate_max_len(handle, field, MAX_SHORT_TEXT_LEN));
    }
    errors.into_result(())
}

fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && domain.contains('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Check an image before upload
///
/// `existing` is the number of images the product already has.
pub fn validate_image_upload(file_name: &str, size: u64, existing: usize) -> Result<(), AppError> {
    if existing >= MAX_IMAGES_PER_PRODUCT {
        return Err(AppError::with_message(
            ErrorCode::ImageLimitReached,
            format!("at most {MAX_IMAGES_PER_PRODUCT} images per product"),
        ));
    }
    let is_image = mime_guess::from_path(file_name)
        .first()
        .is_some_and(|mime| mime.type_().as_str() == "image");
    if !is_image {
        return Err(AppError::with_message(
            ErrorCode::ImageInvalidType,
            format!("{file_name} is not a valid image"),
        ));
    }
    if size > MAX_IMAGE_BYTES {
        return Err(AppError::with_message(
            ErrorCode::ImageTooLarge,
            format!("{file_name} exceeds 2MB"),
        )
        .with_detail("size", size));
    }
    Ok(())
}
