//! Site configuration row

use async_trait::async_trait;
use shared::models::{SITE_CONFIG_ID, SiteConfig, SiteConfigUpdate};
use shared::{SiteConfigStore, StoreResult};

use super::{Query, RestClient, eq};
use crate::{ClientError, ClientResult};

const TABLE: &str = "site_config";

impl RestClient {
    /// Read the configuration row, `None` when it has not been created yet
    pub async fn site_config(&self) -> ClientResult<Option<SiteConfig>> {
        let query: Query = vec![("select".into(), "*".into()), eq("id", SITE_CONFIG_ID)];
        let rows: Vec<SiteConfig> = self.select(TABLE, &query).await?;
        Ok(rows.into_iter().next())
    }

    /// Apply a partial update to the configuration row
    pub async fn update_site_config(&self, update: &SiteConfigUpdate) -> ClientResult<SiteConfig> {
        let rows: Vec<SiteConfig> = self.update(TABLE, &[eq("id", SITE_CONFIG_ID)], update).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ClientError::NotFound(format!("{TABLE} {SITE_CONFIG_ID}")))
    }
}

#[async_trait]
impl SiteConfigStore for RestClient {
    async fn site_config(&self) -> StoreResult<Option<SiteConfig>> {
        Ok(RestClient::site_config(self).await?)
    }

    async fn update_site_config(&self, update: &SiteConfigUpdate) -> StoreResult<SiteConfig> {
        Ok(RestClient::update_site_config(self, update).await?)
    }
}
