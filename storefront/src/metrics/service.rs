//! Metrics service
//!
//! | Counter | Table | Row key |
//! |---------|-------|---------|
//! | page visits | `page_visits` | date |
//! | product views | `product_views` | product_id + date |
//! | WhatsApp clicks | `whatsapp_clicks` | product_id (nullable) + date |
//!
//! Increments read today's row then update it or insert a new one. Two
//! concurrent increments can lose a count; the backend offers nothing better.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use shared::models::{Counter, MetricsSummary, RankedCount, WhatsappClicks};
use shared::{MetricsStore, StoreResult};

/// Ranking size used by the dashboard summary
pub const DEFAULT_TOP_LIMIT: usize = 5;

/// Counts sorted descending, ties by id, truncated to `limit`
pub fn rank(totals: BTreeMap<String, u64>, limit: usize) -> Vec<RankedCount> {
    let mut ranked: Vec<RankedCount> = totals
        .into_iter()
        .map(|(id, count)| RankedCount { id, count })
        .collect();
    // BTreeMap already yields ids ascending; a stable sort keeps that for ties
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

#[derive(Clone)]
pub struct MetricsService {
    store: Arc<dyn MetricsStore>,
}

impl MetricsService {
    pub fn new(store: Arc<dyn MetricsStore>) -> Self {
        Self { store }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    // ========== Increments ==========

    pub async fn increment_page_visits(&self) -> StoreResult<u64> {
        self.increment_on(&Counter::PageVisits, Self::today()).await
    }

    pub async fn increment_product_views(&self, product_id: &str) -> StoreResult<u64> {
        self.increment_on(&Counter::ProductViews(product_id.to_string()), Self::today())
            .await
    }

    /// `None` counts toward the overall daily total
    pub async fn increment_whatsapp_clicks(&self, product_id: Option<&str>) -> StoreResult<u64> {
        self.increment_on(
            &Counter::WhatsappClicks(product_id.map(str::to_string)),
            Self::today(),
        )
        .await
    }

    /// Add one to `counter` for `date`, returning the new value
    pub async fn increment_on(&self, counter: &Counter, date: NaiveDate) -> StoreResult<u64> {
        let result = match self.store.find_count(counter, date).await {
            Ok(Some(current)) => {
                let next = current.saturating_add(1);
                self.store
                    .update_count(counter, date, next)
                    .await
                    .map(|_| next)
            }
            Ok(None) => self.store.insert_count(counter, date, 1).await.map(|_| 1),
            Err(e) => Err(e),
        };

        match &result {
            Ok(value) => tracing::debug!(
                table = counter.table(),
                product_id = ?counter.product_id(),
                %date,
                value,
                "Counter incremented"
            ),
            Err(e) => tracing::error!(
                table = counter.table(),
                product_id = ?counter.product_id(),
                %date,
                error = %e,
                "Failed to increment counter"
            ),
        }
        result
    }

    // ========== Aggregation ==========

    pub async fn page_visits_total(&self) -> StoreResult<u64> {
        let rows = self.store.page_visits().await?;
        Ok(rows.iter().map(|r| r.visits).sum())
    }

    /// Sum of the daily total rows (no product attribution)
    pub async fn whatsapp_clicks_total(&self) -> StoreResult<u64> {
        let rows = self.store.whatsapp_clicks().await?;
        Ok(rows
            .iter()
            .filter(|r| r.product_id.is_none())
            .map(|r| r.clicks)
            .sum())
    }

    pub async fn product_view_totals(&self) -> StoreResult<BTreeMap<String, u64>> {
        let rows = self.store.product_views().await?;
        let mut totals = BTreeMap::new();
        for row in rows {
            *totals.entry(row.product_id).or_insert(0) += row.views;
        }
        Ok(totals)
    }

    pub async fn whatsapp_product_totals(&self) -> StoreResult<BTreeMap<String, u64>> {
        let rows = self.store.whatsapp_clicks().await?;
        let mut totals = BTreeMap::new();
        for row in rows {
            if let Some(id) = row.product_id {
                *totals.entry(id).or_insert(0) += row.clicks;
            }
        }
        Ok(totals)
    }

    pub async fn top_viewed_products(&self, limit: usize) -> StoreResult<Vec<RankedCount>> {
        Ok(rank(self.product_view_totals().await?, limit))
    }

    pub async fn top_whatsapp_products(&self, limit: usize) -> StoreResult<Vec<RankedCount>> {
        Ok(rank(self.whatsapp_product_totals().await?, limit))
    }

    /// Dashboard summary with the top five products per ranking
    pub async fn summary(&self) -> StoreResult<MetricsSummary> {
        let (page_visits, total, top_whatsapp, top_viewed) = futures::try_join!(
            self.page_visits_total(),
            self.whatsapp_clicks_total(),
            self.top_whatsapp_products(DEFAULT_TOP_LIMIT),
            self.top_viewed_products(DEFAULT_TOP_LIMIT),
        )?;

        Ok(MetricsSummary {
            page_visits,
            whatsapp_clicks: WhatsappClicks {
                total,
                by_product: top_whatsapp.into_iter().map(|r| (r.id, r.count)).collect(),
            },
            product_views: top_viewed.into_iter().map(|r| (r.id, r.count)).collect(),
        })
    }
}
