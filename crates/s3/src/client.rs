//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from s5-core.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::timeout::TimeoutConfig;

use s5_core::{
    ConnectionConfig, Error, ListOptions, ListResult, Location, ObjectInfo, ObjectStore, Result,
};

/// Region where S3 rejects an explicit location constraint
const DEFAULT_REGION: &str = "us-east-1";

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
}

impl S3Client {
    /// Create a new S3 client from connection settings
    ///
    /// Credentials are resolved by the AWS default provider chain.
    pub async fn new(connection: &ConnectionConfig) -> Result<Self> {
        let timeouts = TimeoutConfig::builder()
            .connect_timeout(Duration::from_millis(connection.connect_timeout_ms))
            .read_timeout(Duration::from_millis(connection.read_timeout_ms))
            .build();

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(connection.region.clone()))
            .timeout_config(timeouts);

        if let Some(profile) = &connection.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint) = &connection.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(connection.force_path_style())
            .build();

        tracing::debug!(
            region = %connection.region,
            endpoint = ?connection.endpoint,
            path_style = connection.force_path_style(),
            "created S3 client"
        );

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
        })
    }
}

/// Map an SDK failure onto the shared error kinds
///
/// `missing` names what a not-found answer refers to.
fn classify<E>(err: SdkError<E, HttpResponse>, missing: impl FnOnce() -> String) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let message = DisplayErrorContext(&err).to_string();
    if matches!(
        err,
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_)
    ) {
        return Error::Network(message);
    }

    let status = err.raw_response().map(|r| r.status().as_u16());
    error_kind(err.code(), status, message, missing)
}

fn error_kind(
    code: Option<&str>,
    status: Option<u16>,
    message: String,
    missing: impl FnOnce() -> String,
) -> Error {
    match (code, status) {
        (Some("NoSuchBucket" | "NoSuchKey" | "NotFound"), _) | (None, Some(404)) => {
            Error::NotFound(missing())
        }
        (
            Some("AccessDenied" | "InvalidAccessKeyId" | "SignatureDoesNotMatch" | "ExpiredToken"),
            _,
        )
        | (None, Some(401 | 403)) => Error::Auth(message),
        (Some("BucketAlreadyExists" | "BucketAlreadyOwnedByYou" | "BucketNotEmpty"), _) => {
            Error::Conflict(message)
        }
        (Some("SlowDown" | "ServiceUnavailable" | "InternalError" | "RequestTimeout"), _)
        | (None, Some(500..=599)) => Error::Network(message),
        _ => Error::Backend(message),
    }
}

fn to_timestamp(dt: &aws_smithy_types::DateTime) -> Option<jiff::Timestamp> {
    jiff::Timestamp::new(dt.secs(), dt.subsec_nanos() as i32).ok()
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn list_buckets(&self) -> Result<Vec<ObjectInfo>> {
        let response = self
            .inner
            .list_buckets()
            .send()
            .await
            .map_err(|e| classify(e, || "buckets".to_string()))?;

        let buckets = response
            .buckets()
            .iter()
            .map(|b| {
                let mut info = ObjectInfo::bucket(b.name().unwrap_or_default());
                info.last_modified = b.creation_date().and_then(to_timestamp);
                info
            })
            .collect();

        Ok(buckets)
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        tracing::debug!(bucket, "head bucket");
        match self.inner.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) => match classify(e, || bucket.to_string()) {
                Error::NotFound(_) => Ok(false),
                other => Err(other),
            },
        }
    }

    async fn list_objects(&self, bucket: &str, options: ListOptions) -> Result<ListResult> {
        let mut request = self.inner.list_objects_v2().bucket(bucket);

        if let Some(prefix) = &options.prefix {
            request = request.prefix(prefix);
        }

        // Set delimiter (for non-recursive listing)
        if !options.recursive {
            request = request.delimiter(options.delimiter.as_deref().unwrap_or("/"));
        }

        if let Some(max) = options.max_keys {
            request = request.max_keys(max);
        }

        if let Some(token) = &options.continuation_token {
            request = request.continuation_token(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify(e, || format!("Bucket not found: {bucket}")))?;

        let mut items = Vec::new();

        // Common prefixes (directories) first, then objects
        for prefix in response.common_prefixes() {
            if let Some(p) = prefix.prefix() {
                items.push(ObjectInfo::dir(p));
            }
        }

        for object in response.contents() {
            let key = object.key().unwrap_or_default();
            let mut info = ObjectInfo::file(key, object.size().unwrap_or(0));
            info.last_modified = object.last_modified().and_then(to_timestamp);
            info.storage_class = object.storage_class().map(|sc| sc.as_str().to_string());
            items.push(info);
        }

        Ok(ListResult {
            items,
            truncated: response.is_truncated().unwrap_or(false),
            continuation_token: response.next_continuation_token().map(|s| s.to_string()),
        })
    }

    async fn create_bucket(&self, bucket: &str, region: Option<String>) -> Result<()> {
        let mut request = self.inner.create_bucket().bucket(bucket);

        if let Some(region) = region.filter(|r| r != DEFAULT_REGION) {
            let configuration = CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(region.as_str()))
                .build();
            request = request.create_bucket_configuration(configuration);
        }

        request
            .send()
            .await
            .map_err(|e| classify(e, || bucket.to_string()))?;

        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        self.inner
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| classify(e, || format!("Bucket not found: {bucket}")))?;

        Ok(())
    }

    async fn put_object(
        &self,
        location: &Location,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectInfo> {
        let size = data.len() as i64;

        let mut request = self
            .inner
            .put_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .body(ByteStream::from(data));

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        request
            .send()
            .await
            .map_err(|e| classify(e, || format!("Bucket not found: {}", location.bucket)))?;

        let mut info = ObjectInfo::file(&location.key, size);
        info.last_modified = Some(jiff::Timestamp::now());

        Ok(info)
    }

    async fn get_object(&self, location: &Location) -> Result<Vec<u8>> {
        let response = self
            .inner
            .get_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .send()
            .await
            .map_err(|e| classify(e, || location.to_string()))?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Network(e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(data)
    }

    async fn delete_object(&self, location: &Location) -> Result<()> {
        self.inner
            .delete_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .send()
            .await
            .map_err(|e| classify(e, || location.to_string()))?;

        Ok(())
    }

    async fn copy_object(&self, src: &Location, dst: &Location) -> Result<()> {
        // Build copy source: bucket/key
        let copy_source = format!("{}/{}", src.bucket, src.key);

        self.inner
            .copy_object()
            .copy_source(&copy_source)
            .bucket(&dst.bucket)
            .key(&dst.key)
            .send()
            .await
            .map_err(|e| classify(e, || src.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(code: Option<&str>, status: Option<u16>) -> Error {
        error_kind(code, status, "boom".to_string(), || "/b/k".to_string())
    }

    #[test]
    fn test_not_found_codes() {
        assert!(matches!(kind(Some("NoSuchKey"), Some(404)), Error::NotFound(ref m) if m == "/b/k"));
        assert!(matches!(kind(Some("NoSuchBucket"), None), Error::NotFound(_)));
        // HeadBucket answers 404 without an error body
        assert!(matches!(kind(None, Some(404)), Error::NotFound(_)));
    }

    #[test]
    fn test_auth_codes() {
        assert!(matches!(kind(Some("AccessDenied"), Some(403)), Error::Auth(_)));
        assert!(matches!(kind(None, Some(403)), Error::Auth(_)));
    }

    #[test]
    fn test_conflict_codes() {
        assert!(matches!(kind(Some("BucketNotEmpty"), Some(409)), Error::Conflict(_)));
        assert!(matches!(kind(Some("BucketAlreadyOwnedByYou"), Some(409)), Error::Conflict(_)));
    }

    #[test]
    fn test_transient_and_other_codes() {
        assert!(kind(Some("SlowDown"), Some(503)).is_retryable());
        assert!(kind(None, Some(502)).is_retryable());
        assert!(matches!(kind(Some("InvalidBucketName"), Some(400)), Error::Backend(_)));
    }

    #[test]
    fn test_timestamp_conversion() {
        let dt = aws_smithy_types::DateTime::from_secs(1_700_000_000);
        let ts = to_timestamp(&dt).unwrap();
        assert_eq!(ts.as_second(), 1_700_000_000);
    }
}
