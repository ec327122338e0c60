//! REST client for the hosted backend
//!
//! Table access follows PostgREST conventions: `/rest/v1/<table>` with
//! `column=op.value` filters, `order=` sort keys and `Prefer` headers to
//! control what writes return.

mod metrics;
mod site_config;
mod table;

pub use metrics::RestMetrics;
pub use table::RestTable;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{ClientConfig, ClientError, ClientResult};

/// One query string pair: a filter, `select`, `order` or `limit`
pub type QueryPair = (String, String);

/// Owned query string under construction
pub type Query = Vec<QueryPair>;

/// 服务端返回的错误响应格式
#[derive(serde::Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// Backend HTTP client, cheap to clone
#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    config: Arc<ClientConfig>,
}

impl RestClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(ClientError::Invalid("base_url must not be empty".into()));
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.base(), table)
    }

    pub(crate) fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.config.api_key)
            .bearer_auth(self.config.bearer())
    }

    /// `GET /rest/v1/<table>`
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[QueryPair],
    ) -> ClientResult<Vec<T>> {
        tracing::debug!(table, ?query, "select");
        let req = self.authorize(self.http.get(self.rest_url(table))).query(query);
        let response = req.send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// `POST /rest/v1/<table>` returning the inserted rows
    pub async fn insert<T, B>(&self, table: &str, body: &B) -> ClientResult<Vec<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        tracing::debug!(table, "insert");
        let req = self
            .authorize(self.http.post(self.rest_url(table)))
            .header("Prefer", "return=representation")
            .json(body);
        let response = check_status(req.send().await?).await?;
        Ok(response.json().await?)
    }

    /// `PATCH /rest/v1/<table>?<filters>` returning the matched rows
    pub async fn update<T, B>(
        &self,
        table: &str,
        filters: &[QueryPair],
        body: &B,
    ) -> ClientResult<Vec<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        tracing::debug!(table, ?filters, "update");
        let req = self
            .authorize(self.http.patch(self.rest_url(table)))
            .query(filters)
            .header("Prefer", "return=representation")
            .json(body);
        let response = check_status(req.send().await?).await?;
        Ok(response.json().await?)
    }

    /// `DELETE /rest/v1/<table>?<filters>` returning the removed rows
    pub async fn delete<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[QueryPair],
    ) -> ClientResult<Vec<T>> {
        tracing::debug!(table, ?filters, "delete");
        let req = self
            .authorize(self.http.delete(self.rest_url(table)))
            .query(filters)
            .header("Prefer", "return=representation");
        let response = check_status(req.send().await?).await?;
        Ok(response.json().await?)
    }
}

/// `column=eq.value`
pub fn eq(column: &str, value: impl ToString) -> QueryPair {
    (column.to_string(), format!("eq.{}", value.to_string()))
}

/// `column=is.null`
pub fn is_null(column: &str) -> QueryPair {
    (column.to_string(), "is.null".to_string())
}

/// `column=not.is.null`
pub fn not_null(column: &str) -> QueryPair {
    (column.to_string(), "not.is.null".to_string())
}

/// Turn a non-success response into [`ClientError::Api`]
pub(crate) async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await?;
    Err(ClientError::Api {
        status: status.as_u16(),
        message: error_message(&text),
    })
}

fn error_message(body: &str) -> String {
    // 尝试解析为 API 错误响应
    if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(body) {
        let base = api_err.message.or(api_err.error);
        if let Some(message) = base {
            return match api_err.hint {
                Some(hint) => format!("{message} ({hint})"),
                None => message,
            };
        }
    }
    // 降级到原始响应体
    body.to_string()
}
