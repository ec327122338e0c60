//! Metrics rows
//!
//! Counters are stored as one row per day (and per product where relevant);
//! totals are computed by summing rows client-side.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Daily page visit counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageVisitRow {
    pub date: NaiveDate,
    pub visits: u64,
}

/// Daily view counter for one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductViewRow {
    pub product_id: String,
    pub date: NaiveDate,
    pub views: u64,
}

/// Daily WhatsApp click counter
///
/// A row with `product_id == None` is the day's overall total; product rows
/// count clicks attributed to a single product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhatsappClickRow {
    #[serde(default)]
    pub product_id: Option<String>,
    pub date: NaiveDate,
    pub clicks: u64,
}

/// Aggregated id/count pair for ranking tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCount {
    pub id: String,
    pub count: u64,
}

/// WhatsApp click totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhatsappClicks {
    pub total: u64,
    pub by_product: BTreeMap<String, u64>,
}

/// Dashboard metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub page_visits: u64,
    pub whatsapp_clicks: WhatsappClicks,
    pub product_views: BTreeMap<String, u64>,
}

/// Addressable daily counter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Counter {
    PageVisits,
    ProductViews(String),
    /// `None` is the overall daily total
    WhatsappClicks(Option<String>),
}

impl Counter {
    /// Backend table holding this counter
    pub fn table(&self) -> &'static str {
        match self {
            Counter::PageVisits => "page_visits",
            Counter::ProductViews(_) => "product_views",
            Counter::WhatsappClicks(_) => "whatsapp_clicks",
        }
    }

    /// Column holding the count
    pub fn value_column(&self) -> &'static str {
        match self {
            Counter::PageVisits => "visits",
            Counter::ProductViews(_) => "views",
            Counter::WhatsappClicks(_) => "clicks",
        }
    }

    /// Product dimension, if the table has one
    pub fn product_id(&self) -> Option<&str> {
        match self {
            Counter::PageVisits => None,
            Counter::ProductViews(id) => Some(id),
            Counter::WhatsappClicks(id) => id.as_deref(),
        }
    }

    pub fn has_product_dimension(&self) -> bool {
        !matches!(self, Counter::PageVisits)
    }
}
