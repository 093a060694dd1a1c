use std::path::Path;

use anyhow::{anyhow, Context, Result};
use aws_sdk_s3::{Client, config::Region, config::Credentials, config::BehaviorVersion};
use aws_sdk_s3::config::Builder;
use aws_sdk_s3::primitives::ByteStream;
use tracing::info;
use url::Url;

#[derive(Clone)]
pub struct StorageService {
    client: Client,
    endpoint: Url,
}

impl StorageService {
    pub async fn new(endpoint: &str, access_key: &str, secret_key: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint).context("invalid storage endpoint URL")?;
        let credentials = Credentials::new(access_key, secret_key, None, None, "static");

        let config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .endpoint_url(endpoint.as_str())
            .credentials_provider(credentials)
            .force_path_style(true) // Required for MinIO
            .build();

        let client = Client::from_conf(config);

        info!("✅ Connected to S3 (MinIO)");

        Ok(Self { client, endpoint })
    }

    /// Upload a local file under `key`. The put carries `If-None-Match: *`,
    /// so an existing object at the same key fails the call instead of being
    /// silently replaced.
    pub async fn put_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<()> {
        let body = ByteStream::from_path(path)
            .await
            .with_context(|| format!("failed to read {} for upload", path.display()))?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .cache_control("max-age=3600")
            .if_none_match("*")
            .send()
            .await
            .map_err(|e| anyhow!("failed to upload {}/{}: {}", bucket, key, e))?;

        Ok(())
    }

    /// Public URL of an object, resolved against the configured endpoint.
    /// MinIO is used in path style, so the bucket is a path segment.
    pub fn public_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint.as_str().trim_end_matches('/'),
            bucket,
            key
        )
    }
}
