//! In-memory object store
//!
//! A `BTreeMap`-backed `ObjectStore` that follows S3 listing semantics
//! closely enough to exercise navigation without a server: keys are sorted
//! byte-wise, delimiter listings collapse common prefixes, and pages are cut
//! at `max_keys` with the last returned name as continuation token.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::path::{Location, SEPARATOR};
use crate::traits::{DEFAULT_PAGE_SIZE, ListOptions, ListResult, ObjectInfo, ObjectStore};

const STORAGE_CLASS: &str = "STANDARD";

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    last_modified: jiff::Timestamp,
}

#[derive(Debug, Clone)]
struct Bucket {
    created: jiff::Timestamp,
    objects: BTreeMap<String, StoredObject>,
}

impl Bucket {
    fn new() -> Self {
        Self {
            created: jiff::Timestamp::now(),
            objects: BTreeMap::new(),
        }
    }
}

/// Object store kept entirely in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    buckets: Arc<Mutex<BTreeMap<String, Bucket>>>,
}

impl MemoryStore {
    /// Create an empty store with no buckets
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty bucket
    pub fn with_bucket(self, bucket: &str) -> Self {
        self.lock()
            .entry(bucket.to_string())
            .or_insert_with(Bucket::new);
        self
    }

    /// Add an object, creating its bucket if needed
    pub fn with_object(self, bucket: &str, key: &str, data: impl Into<Vec<u8>>) -> Self {
        self.insert(bucket, key, data.into());
        self
    }

    /// Keys currently stored in `bucket`, sorted
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.lock()
            .get(bucket)
            .map(|b| b.objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Names of all buckets, sorted
    pub fn bucket_names(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    fn insert(&self, bucket: &str, key: &str, data: Vec<u8>) {
        self.lock()
            .entry(bucket.to_string())
            .or_insert_with(Bucket::new)
            .objects
            .insert(
                key.to_string(),
                StoredObject {
                    data,
                    last_modified: jiff::Timestamp::now(),
                },
            );
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Bucket>> {
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn no_such_bucket(bucket: &str) -> Error {
    Error::NotFound(format!("Bucket not found: {bucket}"))
}

fn object_info(key: &str, object: &StoredObject) -> ObjectInfo {
    let mut info = ObjectInfo::file(key, object.data.len() as i64);
    info.last_modified = Some(object.last_modified);
    info.storage_class = Some(STORAGE_CLASS.to_string());
    info
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_buckets(&self) -> Result<Vec<ObjectInfo>> {
        Ok(self
            .lock()
            .iter()
            .map(|(name, bucket)| {
                let mut info = ObjectInfo::bucket(name);
                info.last_modified = Some(bucket.created);
                info
            })
            .collect())
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        Ok(self.lock().contains_key(bucket))
    }

    async fn list_objects(&self, bucket: &str, options: ListOptions) -> Result<ListResult> {
        let buckets = self.lock();
        let objects = &buckets.get(bucket).ok_or_else(|| no_such_bucket(bucket))?.objects;

        let prefix = options.prefix.clone().unwrap_or_default();
        let delimiter = (!options.recursive).then(|| {
            options
                .delimiter
                .clone()
                .unwrap_or_else(|| SEPARATOR.to_string())
        });
        let max_keys = options.max_keys.unwrap_or(DEFAULT_PAGE_SIZE).max(1) as usize;

        let mut entries: Vec<ObjectInfo> = Vec::new();
        for (key, object) in objects.range(prefix.clone()..) {
            if !key.starts_with(&prefix) {
                break;
            }

            let common_prefix = delimiter.as_deref().and_then(|d| {
                key[prefix.len()..]
                    .find(d)
                    .map(|pos| key[..prefix.len() + pos + d.len()].to_string())
            });
            let name = common_prefix.as_deref().unwrap_or(key.as_str());

            if let Some(token) = &options.continuation_token {
                if name <= token.as_str() {
                    continue;
                }
            }

            match common_prefix {
                Some(cp) => {
                    // Keys sharing a common prefix are contiguous in sorted order
                    if entries.last().is_some_and(|e| e.is_dir && e.key == cp) {
                        continue;
                    }
                    entries.push(ObjectInfo::dir(cp));
                }
                None => entries.push(object_info(key, object)),
            }

            if entries.len() > max_keys {
                break;
            }
        }

        let truncated = entries.len() > max_keys;
        entries.truncate(max_keys);
        let continuation_token = truncated
            .then(|| entries.last().map(|e| e.key.clone()))
            .flatten();

        let (mut items, files): (Vec<_>, Vec<_>) = entries.into_iter().partition(|e| e.is_dir);
        items.extend(files);

        Ok(ListResult {
            items,
            truncated,
            continuation_token,
        })
    }

    async fn create_bucket(&self, bucket: &str, _region: Option<String>) -> Result<()> {
        let mut buckets = self.lock();
        if buckets.contains_key(bucket) {
            return Err(Error::Conflict(format!("Bucket already exists: {bucket}")));
        }
        buckets.insert(bucket.to_string(), Bucket::new());
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        let mut buckets = self.lock();
        let empty = buckets
            .get(bucket)
            .map(|b| b.objects.is_empty())
            .ok_or_else(|| no_such_bucket(bucket))?;
        if !empty {
            return Err(Error::Conflict(format!("Bucket not empty: {bucket}")));
        }
        buckets.remove(bucket);
        Ok(())
    }

    async fn put_object(
        &self,
        location: &Location,
        data: Vec<u8>,
        _content_type: Option<String>,
    ) -> Result<ObjectInfo> {
        if !self.lock().contains_key(&location.bucket) {
            return Err(no_such_bucket(&location.bucket));
        }
        let size = data.len() as i64;
        self.insert(&location.bucket, &location.key, data);

        let mut info = ObjectInfo::file(&location.key, size);
        info.last_modified = Some(jiff::Timestamp::now());
        Ok(info)
    }

    async fn get_object(&self, location: &Location) -> Result<Vec<u8>> {
        let buckets = self.lock();
        let bucket = buckets
            .get(&location.bucket)
            .ok_or_else(|| no_such_bucket(&location.bucket))?;
        bucket
            .objects
            .get(&location.key)
            .map(|o| o.data.clone())
            .ok_or_else(|| Error::NotFound(location.to_string()))
    }

    async fn delete_object(&self, location: &Location) -> Result<()> {
        let mut buckets = self.lock();
        let bucket = buckets
            .get_mut(&location.bucket)
            .ok_or_else(|| no_such_bucket(&location.bucket))?;
        // Deleting a missing key succeeds, as it does on S3
        bucket.objects.remove(&location.key);
        Ok(())
    }

    async fn copy_object(&self, src: &Location, dst: &Location) -> Result<()> {
        let data = self.get_object(src).await?;
        if !self.lock().contains_key(&dst.bucket) {
            return Err(no_such_bucket(&dst.bucket));
        }
        self.insert(&dst.bucket, &dst.key, data);
        Ok(())
    }
}
