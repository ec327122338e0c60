//! Product Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ordering::{Orderable, Searchable};

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit price in store currency
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Public image URLs, first one is the cover
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub display_order: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Cover image, if any
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, update: ProductUpdate) {
        if let Some(v) = update.name {
            self.name = v;
        }
        if let Some(v) = update.description {
            self.description = v;
        }
        if let Some(v) = update.price {
            self.price = v;
        }
        if let Some(v) = update.images {
            self.images = v;
        }
        if let Some(v) = update.category {
            self.category = v;
        }
        if let Some(v) = update.stock {
            self.stock = v;
        }
        if let Some(v) = update.featured {
            self.featured = v;
        }
        if let Some(v) = update.display_order {
            self.display_order = v;
        }
    }
}

impl Orderable for Product {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }

    fn display_order(&self) -> u32 {
        self.display_order
    }

    fn set_display_order(&mut self, order: u32) {
        self.display_order = order;
    }
}

impl Searchable for Product {
    fn search_name(&self) -> &str {
        &self.name
    }

    fn search_secondary(&self) -> &str {
        &self.category
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: String,
    pub stock: u32,
    #[serde(default)]
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<u32>,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<u32>,
}

impl From<ProductCreate> for ProductUpdate {
    /// Full-form edit: every field set except the rank
    fn from(data: ProductCreate) -> Self {
        Self {
            name: Some(data.name),
            description: Some(data.description),
            price: Some(data.price),
            images: Some(data.images),
            category: Some(data.category),
            stock: Some(data.stock),
            featured: Some(data.featured),
            display_order: data.display_order,
        }
    }
}
