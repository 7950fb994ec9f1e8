//! ObjectStore trait definition
//!
//! This trait is the only view the navigation core has of the backing store.
//! It is implemented by the S3 adapter, by the in-memory store, and mocked
//! in tests.

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::path::Location;

/// Default number of keys requested per listing page
pub const DEFAULT_PAGE_SIZE: i32 = 1000;

/// Metadata for an object, common prefix or bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// Object key, common prefix or bucket name
    pub key: String,

    /// Size in bytes (None for prefixes and buckets)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<i64>,

    /// Human-readable size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_human: Option<String>,

    /// Last modified timestamp (creation date for buckets)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<jiff::Timestamp>,

    /// Storage class
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,

    /// Whether this is a common prefix rather than an object
    pub is_dir: bool,
}

impl ObjectInfo {
    /// Create a new ObjectInfo for an object
    pub fn file(key: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            size_bytes: Some(size),
            size_human: Some(humansize::format_size(size.max(0) as u64, humansize::BINARY)),
            last_modified: None,
            storage_class: None,
            is_dir: false,
        }
    }

    /// Create a new ObjectInfo for a common prefix
    pub fn dir(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size_bytes: None,
            size_human: None,
            last_modified: None,
            storage_class: None,
            is_dir: true,
        }
    }

    /// Create a new ObjectInfo for a bucket
    pub fn bucket(name: impl Into<String>) -> Self {
        Self::dir(name)
    }
}

/// One page of a list operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListResult {
    /// Common prefixes (`is_dir`) followed by objects, in backend order
    pub items: Vec<ObjectInfo>,

    /// Whether the result is truncated (more items available)
    pub truncated: bool,

    /// Continuation token for pagination
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
}

/// Options for list operations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Maximum number of keys to return per request
    pub max_keys: Option<i32>,

    /// Delimiter for grouping (defaults to "/" when not recursive)
    pub delimiter: Option<String>,

    /// Prefix to filter by
    pub prefix: Option<String>,

    /// Continuation token for pagination
    pub continuation_token: Option<String>,

    /// Whether to list recursively (ignore delimiter)
    pub recursive: bool,
}

impl ListOptions {
    /// Delimiter-aware listing of the direct children under `prefix`
    pub fn children(prefix: impl Into<String>, page_size: i32) -> Self {
        Self {
            max_keys: Some(page_size),
            prefix: Some(prefix.into()).filter(|p: &String| !p.is_empty()),
            ..Default::default()
        }
    }

    /// Flat listing of every key under `prefix`
    pub fn recursive(prefix: impl Into<String>, page_size: i32) -> Self {
        Self {
            recursive: true,
            ..Self::children(prefix, page_size)
        }
    }
}

/// Trait for S3-compatible storage operations
///
/// This trait is implemented by the S3 adapter and can be mocked for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List buckets
    async fn list_buckets(&self) -> Result<Vec<ObjectInfo>>;

    /// Check if a bucket exists
    ///
    /// `Ok(false)` means the backend confirmed the bucket is absent. Any
    /// failure to find out is an error.
    async fn bucket_exists(&self, bucket: &str) -> Result<bool>;

    /// List one page of objects in a bucket
    async fn list_objects(&self, bucket: &str, options: ListOptions) -> Result<ListResult>;

    /// Create a bucket, optionally pinned to a region
    async fn create_bucket(&self, bucket: &str, region: Option<String>) -> Result<()>;

    /// Delete an empty bucket
    async fn delete_bucket(&self, bucket: &str) -> Result<()>;

    /// Write an object; an empty body under a `/`-terminated key is a folder marker
    async fn put_object(
        &self,
        location: &Location,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectInfo>;

    /// Get object content as bytes
    async fn get_object(&self, location: &Location) -> Result<Vec<u8>>;

    /// Delete a single object
    async fn delete_object(&self, location: &Location) -> Result<()>;

    /// Server-side copy of a single object
    async fn copy_object(&self, src: &Location, dst: &Location) -> Result<()>;
}

/// Lazily page through a listing, following continuation tokens
///
/// Each item is one backend page, so callers can stop early without
/// enumerating the whole bucket.
pub fn list_pages<'a>(
    store: &'a dyn ObjectStore,
    bucket: &'a str,
    options: ListOptions,
) -> impl Stream<Item = Result<ListResult>> + Send + 'a {
    futures::stream::try_unfold(Some(options), move |state| async move {
        let Some(options) = state else {
            return Ok(None);
        };

        tracing::debug!(
            bucket,
            prefix = ?options.prefix,
            recursive = options.recursive,
            "listing page"
        );
        let page = store.list_objects(bucket, options.clone()).await?;

        let next = match (page.truncated, &page.continuation_token) {
            (true, Some(token)) => Some(ListOptions {
                continuation_token: Some(token.clone()),
                ..options
            }),
            _ => None,
        };

        Ok::<_, Error>(Some((page, next)))
    })
}
