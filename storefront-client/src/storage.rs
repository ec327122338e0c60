//! Image storage
//!
//! Uploads go to `<bucket>/<folder>/<millis>-<random>.<ext>` and are served
//! from the bucket's public URL. Deletion works backwards from that URL.

use std::path::Path;

use async_trait::async_trait;
use rand::Rng;
use rand::distributions::Alphanumeric;
use shared::{ImageFolder, ImageStore, StoreResult};

use crate::client::{RestClient, check_status};
use crate::{ClientError, ClientResult};

const CACHE_CONTROL_SECS: u32 = 3600;
const RANDOM_SUFFIX_LEN: usize = 11;

/// Object storage access for product and collection images
#[derive(Debug, Clone)]
pub struct StorageClient {
    client: RestClient,
}

impl StorageClient {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    fn bucket(&self) -> &str {
        &self.client.config().bucket
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.client.config().base(),
            self.bucket(),
            path
        )
    }

    /// Public URL an uploaded object is served from
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.client.config().base(),
            self.bucket(),
            path
        )
    }

    /// Object path inside the bucket for a public URL
    pub fn object_path_from_url(&self, url: &str) -> Option<String> {
        let without_query = url.split(['?', '#']).next().unwrap_or(url);
        let marker = format!("/{}/", self.bucket());
        let (_, path) = without_query.split_once(&marker)?;
        (!path.is_empty()).then(|| path.to_string())
    }

    /// Upload image bytes and return the public URL
    pub async fn upload_image(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        folder: ImageFolder,
    ) -> ClientResult<String> {
        if bytes.is_empty() {
            return Err(ClientError::Invalid(format!("{file_name} is empty")));
        }
        let path = object_name(folder, file_name, chrono::Utc::now().timestamp_millis())?;
        let content_type = mime_guess::from_path(file_name).first_or_octet_stream();

        tracing::info!(path = %path, size = bytes.len(), "Uploading image");
        let req = self
            .client
            .authorize(self.client.http().post(self.object_url(&path)))
            .header(reqwest::header::CONTENT_TYPE, content_type.essence_str())
            .header(reqwest::header::CACHE_CONTROL, format!("max-age={CACHE_CONTROL_SECS}"))
            .header("x-upsert", "false")
            .body(bytes);
        check_status(req.send().await?)
            .await
            .map_err(ClientError::into_storage)?;

        Ok(self.public_url(&path))
    }

    /// Remove the object behind a public URL
    pub async fn delete_image(&self, url: &str) -> ClientResult<()> {
        let path = self
            .object_path_from_url(url)
            .ok_or_else(|| ClientError::Invalid(format!("not a {} URL: {url}", self.bucket())))?;

        tracing::info!(path = %path, "Deleting image");
        let req = self
            .client
            .authorize(self.client.http().delete(format!(
                "{}/storage/v1/object/{}",
                self.client.config().base(),
                self.bucket()
            )))
            .json(&serde_json::json!({ "prefixes": [path] }));
        check_status(req.send().await?)
            .await
            .map_err(ClientError::into_storage)?;
        Ok(())
    }
}

#[async_trait]
impl ImageStore for StorageClient {
    async fn upload_image(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        folder: ImageFolder,
    ) -> StoreResult<String> {
        Ok(StorageClient::upload_image(self, bytes, file_name, folder).await?)
    }

    async fn delete_image(&self, url: &str) -> StoreResult<()> {
        Ok(StorageClient::delete_image(self, url).await?)
    }
}

/// `<folder>/<millis>-<random>.<ext>`
fn object_name(folder: ImageFolder, file_name: &str, millis: i64) -> ClientResult<String> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ClientError::Invalid(format!("{file_name} has no extension")))?;
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    Ok(format!(
        "{}/{millis}-{suffix}.{}",
        folder.as_str(),
        ext.to_ascii_lowercase()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientConfig;

    fn storage() -> StorageClient {
        let client = RestClient::new(ClientConfig::new("https://api.example.com", "key")).unwrap();
        StorageClient::new(client)
    }

    #[test]
    fn test_object_name_layout() {
        let name = object_name(ImageFolder::Products, "Plato.JPG", 1714564800000).unwrap();
        assert!(name.starts_with("products/1714564800000-"));
        assert!(name.ends_with(".jpg"));
        let suffix = name
            .trim_start_matches("products/1714564800000-")
            .trim_end_matches(".jpg");
        assert_eq!(suffix.len(), RANDOM_SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_object_name_requires_extension() {
        assert!(object_name(ImageFolder::Collections, "README", 0).is_err());
    }

    #[test]
    fn test_public_url_round_trips_to_path() {
        let storage = storage();
        let url = storage.public_url("collections/1-abc.png");
        assert_eq!(
            url,
            "https://api.example.com/storage/v1/object/public/images/collections/1-abc.png"
        );
        assert_eq!(
            storage.object_path_from_url(&format!("{url}?v=2")).as_deref(),
            Some("collections/1-abc.png")
        );
    }

    #[test]
    fn test_foreign_url_has_no_path() {
        assert_eq!(storage().object_path_from_url("https://cdn.other.com/x.png"), None);
    }
}
