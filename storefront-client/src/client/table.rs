//! Typed table access

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use shared::models::{Collection, Product};
use shared::{
    CatalogStore, DisplayOrderPatch, Editable, EntityStore, ListOrder, Orderable, StoreResult,
};

use super::{Query, QueryPair, RestClient, eq};
use crate::{ClientError, ClientResult};

const PRODUCTS_TABLE: &str = "products";
const COLLECTIONS_TABLE: &str = "collections";

/// One backend table of `T` rows
pub struct RestTable<T> {
    client: RestClient,
    table: &'static str,
    _row: PhantomData<fn() -> T>,
}

impl<T> Clone for RestTable<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            table: self.table,
            _row: PhantomData,
        }
    }
}

impl RestTable<Product> {
    pub fn products(client: RestClient) -> Self {
        Self::new(client, PRODUCTS_TABLE)
    }
}

impl RestTable<Collection> {
    pub fn collections(client: RestClient) -> Self {
        Self::new(client, COLLECTIONS_TABLE)
    }
}

/// `select=id` keeps write responses small when only the match count matters
fn select_id() -> QueryPair {
    ("select".into(), "id".into())
}

impl<T: DeserializeOwned> RestTable<T> {
    pub fn new(client: RestClient, table: &'static str) -> Self {
        Self {
            client,
            table,
            _row: PhantomData,
        }
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    fn missing(&self, id: &str) -> ClientError {
        ClientError::NotFound(format!("{} {}", self.table, id))
    }

    /// All rows in the given order
    pub async fn find_all(&self, order: &ListOrder) -> ClientResult<Vec<T>> {
        let mut query: Query = vec![("select".into(), "*".into())];
        if !order.keys().is_empty() {
            query.push(("order".into(), order.to_query_param()));
        }
        self.client.select(self.table, &query).await
    }

    pub async fn find_by_id(&self, id: &str) -> ClientResult<Option<T>> {
        let query = [
            ("select".into(), "*".into()),
            eq("id", id),
            ("limit".into(), "1".into()),
        ];
        let rows: Vec<T> = self.client.select(self.table, &query).await?;
        Ok(rows.into_iter().next())
    }

    /// Insert one row and return it as stored
    pub async fn create<C: Serialize + Sync>(&self, payload: &C) -> ClientResult<T> {
        let rows: Vec<T> = self.client.insert(self.table, &[payload]).await?;
        rows.into_iter().next().ok_or_else(|| {
            ClientError::InvalidResponse(format!("insert into {} returned no row", self.table))
        })
    }

    /// Partial update addressed by id
    pub async fn update<U: Serialize + Sync>(&self, id: &str, payload: &U) -> ClientResult<T> {
        let rows: Vec<T> = self.client.update(self.table, &[eq("id", id)], payload).await?;
        rows.into_iter().next().ok_or_else(|| self.missing(id))
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        let rows: Vec<IgnoredAny> = self
            .client
            .delete(self.table, &[eq("id", id), select_id()])
            .await?;
        if rows.is_empty() {
            return Err(self.missing(id));
        }
        Ok(())
    }
}

#[async_trait]
impl<T> EntityStore<T> for RestTable<T>
where
    T: Orderable + DeserializeOwned + 'static,
{
    async fn list(&self, order: &ListOrder) -> StoreResult<Vec<T>> {
        Ok(self.find_all(order).await?)
    }

    async fn update_display_order(&self, id: &T::Id, patch: DisplayOrderPatch) -> StoreResult<()> {
        let filters = [eq("id", id), select_id()];
        let rows: Vec<IgnoredAny> = self.client.update(self.table, &filters, &patch).await?;
        if rows.is_empty() {
            return Err(self.missing(&id.to_string()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl<T> CatalogStore<T> for RestTable<T>
where
    T: Editable + DeserializeOwned + 'static,
{
    async fn find_by_id(&self, id: &T::Id) -> StoreResult<Option<T>> {
        Ok(RestTable::find_by_id(self, &id.to_string()).await?)
    }

    async fn create(&self, data: &T::Create) -> StoreResult<T> {
        Ok(RestTable::create(self, data).await?)
    }

    async fn update(&self, id: &T::Id, data: &T::Update) -> StoreResult<T> {
        Ok(RestTable::update(self, &id.to_string(), data).await?)
    }

    async fn delete(&self, id: &T::Id) -> StoreResult<()> {
        Ok(RestTable::delete(self, &id.to_string()).await?)
    }
}
