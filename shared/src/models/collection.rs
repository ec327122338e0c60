//! Collection Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ordering::{Orderable, Searchable};

/// Curated group of products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Cover image URL
    #[serde(default)]
    pub image: String,
    /// Member product ids
    #[serde(default)]
    pub product_ids: Vec<String>,
    #[serde(default)]
    pub display_order: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Collection {
    pub fn product_count(&self) -> usize {
        self.product_ids.len()
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.product_ids.iter().any(|id| id == product_id)
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, update: CollectionUpdate) {
        if let Some(v) = update.name {
            self.name = v;
        }
        if let Some(v) = update.description {
            self.description = v;
        }
        if let Some(v) = update.image {
            self.image = v;
        }
        if let Some(v) = update.product_ids {
            self.product_ids = v;
        }
        if let Some(v) = update.display_order {
            self.display_order = v;
        }
    }
}

impl Orderable for Collection {
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

impl Searchable for Collection {
    fn search_name(&self) -> &str {
        &self.name
    }

    fn search_secondary(&self) -> &str {
        &self.description
    }
}

/// Create collection payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionCreate {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub product_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<u32>,
}

/// Update collection payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<u32>,
}

impl From<CollectionCreate> for CollectionUpdate {
    /// Full-form edit: every field set except the rank
    fn from(data: CollectionCreate) -> Self {
        Self {
            name: Some(data.name),
            description: Some(data.description),
            image: Some(data.image),
            product_ids: Some(data.product_ids),
            display_order: data.display_order,
        }
    }
}
