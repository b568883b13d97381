use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::{errors::StorageError, repositories::storage::ObjectStorage, settings::AppConfig};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the hosted storage REST API.
#[derive(Clone)]
pub struct SupabaseStorage {
    client: Client,
    base_url: Option<Url>,
    bucket: String,
    service_key: String,
}

impl SupabaseStorage {
    pub fn new(config: &AppConfig) -> Result<Self, StorageError> {
        let base_url = if config.storage_url.is_empty() {
            None
        } else {
            Some(Url::parse(&config.storage_url)?)
        };

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(SupabaseStorage {
            client,
            base_url,
            bucket: config.storage_bucket.clone(),
            service_key: config.storage_service_key.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    fn bucket_endpoint(&self, base: &Url) -> Result<Url, StorageError> {
        let endpoint = base.join(&format!("storage/v1/object/{}", self.bucket))?;
        Ok(endpoint)
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn remove_object(&self, file_url: &str) -> Result<(), StorageError> {
        let Some(base) = &self.base_url else {
            tracing::warn!("Storage is not configured, skipping removal of {}", file_url);
            return Ok(());
        };

        let Some(path) = object_path_from_url(file_url) else {
            tracing::warn!("Cannot derive a storage path from {}", file_url);
            return Ok(());
        };

        let response = self.client
            .delete(self.bucket_endpoint(base)?)
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .json(&serde_json::json!({ "prefixes": [path] }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected { status: status.as_u16(), body });
        }

        tracing::info!("Removed stored object {}", path);
        Ok(())
    }
}

impl std::fmt::Debug for SupabaseStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseStorage")
            .field("base_url", &self.base_url.as_ref().map(Url::as_str))
            .field("bucket", &self.bucket)
            .field("service_key", &"[REDACTED]")
            .finish()
    }
}

/// Objects are stored as `<owner>/<file name>`, which are the last two
/// path segments of the public URL.
pub fn object_path_from_url(file_url: &str) -> Option<String> {
    let url = Url::parse(file_url).ok()?;
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        [.., owner, file] => Some(format!("{owner}/{file}")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_path_keeps_owner_and_file() {
        let url = "https://abc.supabase.co/storage/v1/object/public/screenshots/7d2f/1700000000-boat.png";
        assert_eq!(object_path_from_url(url).as_deref(), Some("7d2f/1700000000-boat.png"));
    }

    #[test]
    fn object_path_rejects_short_or_invalid_urls() {
        assert_eq!(object_path_from_url("https://abc.supabase.co/boat.png"), None);
        assert_eq!(object_path_from_url("not a url"), None);
    }
}
