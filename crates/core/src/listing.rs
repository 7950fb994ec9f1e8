//! Folder listing emulation
//!
//! Reconstructs a directory view from a flat key space with one
//! delimiter-aware enumeration per folder.

use std::pin::pin;

use futures::TryStreamExt;
use serde::Serialize;

use crate::error::Result;
use crate::path::{SEPARATOR, folder_prefix};
use crate::traits::{ListOptions, ObjectInfo, ObjectStore, list_pages};

/// Size and storage details shown by a verbose listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDetail {
    pub size_bytes: i64,
    pub size_human: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<jiff::Timestamp>,
}

impl From<&ObjectInfo> for FileDetail {
    fn from(info: &ObjectInfo) -> Self {
        let size_bytes = info.size_bytes.unwrap_or_default();
        Self {
            size_bytes,
            size_human: info.size_human.clone().unwrap_or_else(|| {
                humansize::format_size(size_bytes.max(0) as u64, humansize::BINARY)
            }),
            storage_class: info.storage_class.clone(),
            last_modified: info.last_modified,
        }
    }
}

/// One line of a listing, named relative to the listed folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ListingEntry {
    Bucket {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        created: Option<jiff::Timestamp>,
    },
    SubFolder {
        name: String,
    },
    File {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<FileDetail>,
    },
}

impl ListingEntry {
    pub fn name(&self) -> &str {
        match self {
            Self::Bucket { name, .. } | Self::SubFolder { name } | Self::File { name, .. } => name,
        }
    }

    pub fn is_folder(&self) -> bool {
        !matches!(self, Self::File { .. })
    }
}

/// Lists buckets and folder contents
pub struct ListingEngine<'a> {
    store: &'a dyn ObjectStore,
    page_size: i32,
}

impl<'a> ListingEngine<'a> {
    pub fn new(store: &'a dyn ObjectStore, page_size: i32) -> Self {
        Self { store, page_size }
    }

    /// Every bucket visible to the caller
    pub async fn list_buckets(&self, verbose: bool) -> Result<Vec<ListingEntry>> {
        let buckets = self.store.list_buckets().await?;
        Ok(buckets
            .into_iter()
            .map(|b| ListingEntry::Bucket {
                name: b.key,
                created: b.last_modified.filter(|_| verbose),
            })
            .collect())
    }

    /// Direct children of the folder at `prefix` in `bucket`
    ///
    /// Sub-folders come first, then files, each in the order the store
    /// returned them. The folder's own marker is never listed.
    pub async fn list(&self, bucket: &str, prefix: &str, verbose: bool) -> Result<Vec<ListingEntry>> {
        let prefix = folder_prefix(prefix.trim_matches(SEPARATOR));
        let mut folders = Vec::new();
        let mut files = Vec::new();

        let mut pages = pin!(list_pages(
            self.store,
            bucket,
            ListOptions::children(prefix.as_str(), self.page_size)
        ));
        while let Some(page) = pages.try_next().await? {
            for item in page.items {
                let Some(name) = item.key.strip_prefix(prefix.as_str()) else {
                    tracing::debug!(key = %item.key, prefix = %prefix, "skipping key outside prefix");
                    continue;
                };
                if name.is_empty() {
                    continue;
                }

                if item.is_dir {
                    folders.push(ListingEntry::SubFolder {
                        name: name.trim_end_matches(SEPARATOR).to_string(),
                    });
                } else {
                    files.push(ListingEntry::File {
                        name: name.to_string(),
                        detail: verbose.then(|| FileDetail::from(&item)),
                    });
                }
            }
        }

        tracing::debug!(
            bucket,
            prefix = %prefix,
            folders = folders.len(),
            files = files.len(),
            "listed folder"
        );
        folders.extend(files);
        Ok(folders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::memory::MemoryStore;
    use crate::traits::{ListResult, MockObjectStore};

    fn names(entries: &[ListingEntry]) -> Vec<&str> {
        entries.iter().map(ListingEntry::name).collect()
    }

    #[tokio::test]
    async fn test_partitions_folders_and_files() {
        let store = MemoryStore::new()
            .with_object("b", "a/", "")
            .with_object("b", "a/f1", "one")
            .with_object("b", "a/b/f2", "two");
        let engine = ListingEngine::new(&store, 100);

        let entries = engine.list("b", "a", false).await.unwrap();
        assert_eq!(
            entries,
            vec![
                ListingEntry::SubFolder { name: "b".into() },
                ListingEntry::File {
                    name: "f1".into(),
                    detail: None
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_bucket_root_shows_implicit_folders() {
        let store = MemoryStore::new()
            .with_object("b", "top.txt", "x")
            .with_object("b", "docs/", "")
            .with_object("b", "logs/2024/app.log", "x");
        let engine = ListingEngine::new(&store, 100);

        let entries = engine.list("b", "", false).await.unwrap();
        assert_eq!(names(&entries), vec!["docs", "logs", "top.txt"]);
        assert!(entries[0].is_folder());
        assert!(!entries[2].is_folder());
    }

    #[tokio::test]
    async fn test_folders_first_across_pages() {
        let store = MemoryStore::new()
            .with_object("b", "d/a.txt", "x")
            .with_object("b", "d/m/", "")
            .with_object("b", "d/z.txt", "x")
            .with_object("b", "d/zz/f", "x");
        let engine = ListingEngine::new(&store, 1);

        let entries = engine.list("b", "/d/", false).await.unwrap();
        assert_eq!(names(&entries), vec!["m", "zz", "a.txt", "z.txt"]);
    }

    #[tokio::test]
    async fn test_verbose_includes_detail() {
        let store = MemoryStore::new().with_object("b", "f.bin", vec![0u8; 2048]);
        let engine = ListingEngine::new(&store, 100);

        let entries = engine.list("b", "", true).await.unwrap();
        let ListingEntry::File {
            detail: Some(detail),
            ..
        } = &entries[0]
        else {
            panic!("expected file with detail, got {entries:?}");
        };
        assert_eq!(detail.size_bytes, 2048);
        assert_eq!(detail.storage_class.as_deref(), Some("STANDARD"));
        assert!(detail.last_modified.is_some());
    }

    #[tokio::test]
    async fn test_list_buckets() {
        let store = MemoryStore::new().with_bucket("beta").with_bucket("alpha");
        let engine = ListingEngine::new(&store, 100);

        let entries = engine.list_buckets(false).await.unwrap();
        assert_eq!(names(&entries), vec!["alpha", "beta"]);
        assert!(matches!(entries[0], ListingEntry::Bucket { created: None, .. }));

        let entries = engine.list_buckets(true).await.unwrap();
        assert!(matches!(
            entries[0],
            ListingEntry::Bucket {
                created: Some(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_own_marker_is_suppressed() {
        let mut store = MockObjectStore::new();
        store.expect_list_objects().returning(|_, _| {
            Ok(ListResult {
                items: vec![
                    ObjectInfo::file("docs/", 0),
                    ObjectInfo::file("docs/readme.md", 5),
                ],
                truncated: false,
                continuation_token: None,
            })
        });
        let engine = ListingEngine::new(&store, 100);

        let entries = engine.list("b", "docs", false).await.unwrap();
        assert_eq!(names(&entries), vec!["readme.md"]);
    }

    #[tokio::test]
    async fn test_backend_error_propagates() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .returning(|_, _| Err(Error::Auth("denied".into())));
        let engine = ListingEngine::new(&store, 100);

        let err = engine.list("b", "", false).await.unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }

    #[test]
    fn test_entry_serializes_with_type_tag() {
        let json = serde_json::to_value(ListingEntry::SubFolder { name: "x".into() }).unwrap();
        assert_eq!(json["type"], "sub_folder");
        assert_eq!(json["name"], "x");
    }
}
