//! Existence validation against the backing store
//!
//! A folder has no native representation in the store. It exists when a
//! zero-byte marker `folder/` exists, or implicitly when any key lives under
//! `folder/`. Both count as evidence here.

use std::pin::pin;

use futures::TryStreamExt;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::path::{SEPARATOR, folder_prefix};
use crate::traits::{ListOptions, ObjectStore, list_pages};

/// How `object_exists` decides whether a key is present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExistenceCheck {
    /// The key itself, its folder marker, or any key below it
    #[default]
    Path,
    /// Any key in the bucket containing the target as a substring
    Substring,
}

/// Whether `candidate` is `key`, its folder marker, or lies below it
pub fn matches_path(candidate: &str, key: &str) -> bool {
    candidate
        .strip_prefix(key)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(SEPARATOR))
}

/// Confirms buckets and keys exist before an operation touches them
pub struct ExistenceValidator<'a> {
    store: &'a dyn ObjectStore,
    check: ExistenceCheck,
    page_size: i32,
}

impl<'a> ExistenceValidator<'a> {
    pub fn new(store: &'a dyn ObjectStore, check: ExistenceCheck, page_size: i32) -> Self {
        Self {
            store,
            check,
            page_size,
        }
    }

    /// Probe a bucket
    ///
    /// `Ok(false)` is a confirmed absence. A failed probe is returned as the
    /// backend error so it is never mistaken for a missing bucket.
    pub async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        match self.store.bucket_exists(bucket).await {
            Ok(true) => Ok(true),
            Ok(false) => {
                tracing::warn!(bucket, "bucket does not exist");
                Ok(false)
            }
            Err(e) => {
                tracing::warn!(bucket, error = %e, "could not determine whether bucket exists");
                Err(e)
            }
        }
    }

    /// Check whether a key, or a folder at that key, exists in `bucket`
    ///
    /// The empty key is the bucket root and always exists.
    pub async fn object_exists(&self, bucket: &str, key: &str) -> Result<bool> {
        let key = key.trim_matches(SEPARATOR);
        if key.is_empty() {
            return Ok(true);
        }

        let found = match self.check {
            ExistenceCheck::Path => self.any_key(bucket, key, |k| matches_path(k, key)).await?,
            ExistenceCheck::Substring => self.any_key(bucket, "", |k| k.contains(key)).await?,
        };

        if !found {
            tracing::warn!(bucket, key, "object (folder or file) does not exist");
        }
        Ok(found)
    }

    /// Keys stored verbatim at `key` and at its folder marker `key/`
    ///
    /// Callers get both so they can act on the object and on the marker
    /// independently. Implicit folders yield nothing.
    pub async fn exact_keys(&self, bucket: &str, key: &str) -> Result<Vec<String>> {
        let key = key.trim_matches(SEPARATOR);
        let marker = folder_prefix(key);
        let mut found = Vec::new();

        let mut pages = pin!(list_pages(
            self.store,
            bucket,
            ListOptions::recursive(key, self.page_size)
        ));
        'pages: while let Some(page) = pages.try_next().await? {
            for item in page.items {
                // Listings are sorted, nothing past the marker can match
                if item.key > marker {
                    break 'pages;
                }
                if item.key == key || item.key == marker {
                    found.push(item.key);
                }
            }
        }
        Ok(found)
    }

    async fn any_key(
        &self,
        bucket: &str,
        prefix: &str,
        matches: impl Fn(&str) -> bool,
    ) -> Result<bool> {
        let mut pages = pin!(list_pages(
            self.store,
            bucket,
            ListOptions::recursive(prefix, self.page_size)
        ));
        while let Some(page) = pages.try_next().await? {
            if page.items.iter().any(|item| matches(&item.key)) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
