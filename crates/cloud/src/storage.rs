//! S3-compatible object storage.

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use kindquest_core::storage_keys;

/// Default public URL template for path-style buckets.
const DEFAULT_PUBLIC_URL_TEMPLATE: &str = "http://localhost:9000/{bucket}/{key}";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object storage request failed: {0}")]
    Backend(String),
}

/// Object storage operations used by the API.
///
/// Keys are produced by [`kindquest_core::storage_keys`]; implementations
/// only move bytes and render URLs.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` under `key` with the given content type.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError>;

    /// Remove the object at `key`. Missing objects are not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Public URL for a stored key.
    fn public_url(&self, key: &str) -> String;

    /// Public URLs for several keys, in order.
    fn public_urls(&self, keys: &[String]) -> Vec<String> {
        keys.iter().map(|k| self.public_url(k)).collect()
    }
}

/// Storage connection settings.
///
/// | Env var                  | Default |
/// |--------------------------|---------|
/// | `S3_ENDPOINT`            | (unset: AWS endpoint for the region) |
/// | `S3_BUCKET`              | `kindquest` |
/// | `S3_ACCESS_KEY_ID`       | `""` |
/// | `S3_SECRET_ACCESS_KEY`   | `""` |
/// | `S3_REGION`              | `us-east-1` |
/// | `S3_PUBLIC_URL_TEMPLATE` | `http://localhost:9000/{bucket}/{key}` |
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub endpoint: Option<String>,
    pub bucket: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub public_url_template: String,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            endpoint: std::env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
            bucket: std::env::var("S3_BUCKET").unwrap_or_else(|_| "kindquest".into()),
            access_key_id: std::env::var("S3_ACCESS_KEY_ID").unwrap_or_default(),
            secret_access_key: std::env::var("S3_SECRET_ACCESS_KEY").unwrap_or_default(),
            region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
            public_url_template: std::env::var("S3_PUBLIC_URL_TEMPLATE")
                .unwrap_or_else(|_| DEFAULT_PUBLIC_URL_TEMPLATE.into()),
        }
    }
}

/// [`ObjectStorage`] backed by the AWS SDK. Works against AWS S3 and
/// path-style compatible servers such as MinIO.
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_url_template: String,
}

impl S3Storage {
    pub async fn connect(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "kindquest-env",
        );
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config).force_path_style(true);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            public_url_template: config.public_url_template.clone(),
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(key, error = %DisplayErrorContext(&e), "S3 put_object failed");
                StorageError::Backend(DisplayErrorContext(&e).to_string())
            })?;
        tracing::debug!(key, size, "Stored object");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Backend(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        storage_keys::public_url(&self.public_url_template, &self.bucket, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn public_urls_follow_the_template() {
        let config = StorageConfig {
            endpoint: Some("http://localhost:9000".into()),
            bucket: "kq".into(),
            access_key_id: "minio".into(),
            secret_access_key: "minio-secret".into(),
            region: "us-east-1".into(),
            public_url_template: "https://{bucket}.cdn.test/{key}".into(),
        };
        let storage = S3Storage::connect(&config).await;

        let keys = vec!["avatars/1.png".to_string(), "organizations/7/2.jpg".to_string()];
        assert_eq!(
            storage.public_urls(&keys),
            vec![
                "https://kq.cdn.test/avatars/1.png",
                "https://kq.cdn.test/organizations/7/2.jpg",
            ]
        );
    }
}
