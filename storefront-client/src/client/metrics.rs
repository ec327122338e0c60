//! Daily counter tables over REST

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Map, Value};
use shared::models::{Counter, PageVisitRow, ProductViewRow, WhatsappClickRow};
use shared::{MetricsStore, StoreResult};

use super::{Query, QueryPair, RestClient, eq, is_null};

/// [`MetricsStore`] backed by the `page_visits`, `product_views` and
/// `whatsapp_clicks` tables
#[derive(Debug, Clone)]
pub struct RestMetrics {
    client: RestClient,
}

impl RestMetrics {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

/// Filters addressing one counter row
fn row_filters(counter: &Counter, date: NaiveDate) -> Query {
    let mut filters = vec![eq("date", date)];
    if counter.has_product_dimension() {
        filters.push(match counter.product_id() {
            Some(id) => eq("product_id", id),
            None => is_null("product_id"),
        });
    }
    filters
}

fn counter_row(counter: &Counter, date: NaiveDate, value: u64) -> Value {
    let mut row = Map::new();
    row.insert("date".into(), Value::String(date.to_string()));
    row.insert(counter.value_column().into(), Value::from(value));
    if let Some(id) = counter.product_id() {
        row.insert("product_id".into(), Value::String(id.to_string()));
    }
    Value::Object(row)
}

fn ordered_by_date() -> QueryPair {
    ("order".into(), "date.desc".into())
}

#[async_trait]
impl MetricsStore for RestMetrics {
    async fn find_count(&self, counter: &Counter, date: NaiveDate) -> StoreResult<Option<u64>> {
        let mut query = row_filters(counter, date);
        query.push(("select".into(), counter.value_column().into()));
        query.push(("limit".into(), "1".into()));
        let rows: Vec<Map<String, Value>> = self.client.select(counter.table(), &query).await?;
        Ok(rows
            .first()
            .and_then(|row| row.get(counter.value_column()))
            .and_then(Value::as_u64))
    }

    async fn insert_count(
        &self,
        counter: &Counter,
        date: NaiveDate,
        value: u64,
    ) -> StoreResult<()> {
        let _: Vec<Value> = self
            .client
            .insert(counter.table(), &[counter_row(counter, date, value)])
            .await?;
        Ok(())
    }

    async fn update_count(
        &self,
        counter: &Counter,
        date: NaiveDate,
        value: u64,
    ) -> StoreResult<()> {
        let mut body = Map::new();
        body.insert(counter.value_column().into(), Value::from(value));
        let _: Vec<Value> = self
            .client
            .update(counter.table(), &row_filters(counter, date), &body)
            .await?;
        Ok(())
    }

    async fn page_visits(&self) -> StoreResult<Vec<PageVisitRow>> {
        let query: Query = vec![("select".into(), "date,visits".into()), ordered_by_date()];
        Ok(self.client.select("page_visits", &query).await?)
    }

    async fn product_views(&self) -> StoreResult<Vec<ProductViewRow>> {
        let query: Query = vec![
            ("select".into(), "product_id,date,views".into()),
            ordered_by_date(),
        ];
        Ok(self.client.select("product_views", &query).await?)
    }

    async fn whatsapp_clicks(&self) -> StoreResult<Vec<WhatsappClickRow>> {
        let query: Query = vec![
            ("select".into(), "product_id,date,clicks".into()),
            ordered_by_date(),
        ];
        Ok(self.client.select("whatsapp_clicks", &query).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_total_click_row_filters_on_null_product() {
        let filters = row_filters(&Counter::WhatsappClicks(None), day());
        assert_eq!(
            filters,
            vec![eq("date", "2024-05-01"), is_null("product_id")]
        );
    }

    #[test]
    fn test_page_visit_row_has_no_product_column() {
        let row = counter_row(&Counter::PageVisits, day(), 1);
        assert_eq!(row, serde_json::json!({ "date": "2024-05-01", "visits": 1 }));
        assert_eq!(row_filters(&Counter::PageVisits, day()).len(), 1);
    }

    #[test]
    fn test_product_view_row_carries_product() {
        let row = counter_row(&Counter::ProductViews("p-9".into()), day(), 7);
        assert_eq!(
            row,
            serde_json::json!({ "date": "2024-05-01", "views": 7, "product_id": "p-9" })
        );
    }
}
