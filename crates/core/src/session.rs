//! Interactive session context
//!
//! A `Session` bundles the store handle, the navigation state and the
//! options that shape validation and listing. Commands receive it by
//! reference instead of reaching for global state.

use std::sync::Arc;

use crate::config::NavigationConfig;
use crate::error::Result;
use crate::listing::{ListingEngine, ListingEntry};
use crate::nav::{NavCommand, NavigationState};
use crate::path::{Location, is_absolute, normalize};
use crate::resolve::PathResolver;
use crate::traits::{DEFAULT_PAGE_SIZE, ObjectStore};
use crate::validate::{ExistenceCheck, ExistenceValidator};

/// Tunables for validation and listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub existence_check: ExistenceCheck,
    pub page_size: i32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            existence_check: ExistenceCheck::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl From<&NavigationConfig> for SessionOptions {
    fn from(config: &NavigationConfig) -> Self {
        Self {
            existence_check: config.existence_check,
            page_size: config.page_size,
        }
    }
}

/// One user's view of the store
pub struct Session {
    store: Arc<dyn ObjectStore>,
    nav: NavigationState,
    options: SessionOptions,
}

impl Session {
    /// Start a session at the root
    pub fn new(store: Arc<dyn ObjectStore>, options: SessionOptions) -> Self {
        Self {
            store,
            nav: NavigationState::root(),
            options,
        }
    }

    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.nav
    }

    pub fn validator(&self) -> ExistenceValidator<'_> {
        ExistenceValidator::new(
            self.store.as_ref(),
            self.options.existence_check,
            self.options.page_size,
        )
    }

    pub fn resolver(&self) -> PathResolver<'_> {
        PathResolver::new(self.validator())
    }

    pub fn listing(&self) -> ListingEngine<'_> {
        ListingEngine::new(self.store.as_ref(), self.options.page_size)
    }

    /// Resolve a raw path against the current location
    pub async fn resolve(&self, raw: &str, require_validation: bool) -> Result<Location> {
        self.resolver()
            .resolve(raw, &self.nav, require_validation)
            .await
    }

    /// Move to `target`, or to the root when `None`
    pub async fn change_location(&mut self, target: Option<&str>) -> Result<()> {
        let command = NavCommand::parse(target);
        let resolver = PathResolver::new(ExistenceValidator::new(
            self.store.as_ref(),
            self.options.existence_check,
            self.options.page_size,
        ));
        self.nav.apply(&command, &resolver).await
    }

    /// Whether `raw` climbs back to the root above every bucket
    fn names_root(&self, raw: &str) -> bool {
        let raw = raw.trim();
        if raw.is_empty() {
            return false;
        }
        let segments = if is_absolute(raw) {
            normalize::<&str>(&[], raw)
        } else {
            normalize(&self.nav.segments(), raw)
        };
        segments.is_empty()
    }

    /// The current location as a virtual path
    pub fn cwd(&self) -> String {
        self.nav.to_string()
    }

    /// List `target`, or the current location when `None`
    ///
    /// At the root with no target this lists buckets.
    pub async fn list(&self, target: Option<&str>, verbose: bool) -> Result<Vec<ListingEntry>> {
        let location = match target {
            Some(raw) if self.names_root(raw) => None,
            Some(raw) => Some(self.resolve(raw, true).await?),
            None => self.nav.location(),
        };

        match location {
            None => self.listing().list_buckets(verbose).await,
            Some(location) => {
                self.listing()
                    .list(&location.bucket, &location.folder_prefix(), verbose)
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::memory::MemoryStore;

    fn session() -> Session {
        let store = MemoryStore::new()
            .with_object("bucket1", "docs/", "")
            .with_object("bucket1", "docs/guide.md", "guide")
            .with_object("bucket1", "docs/api/index.html", "<html>")
            .with_object("bucket1", "readme.txt", "hello")
            .with_bucket("bucket2");
        Session::new(Arc::new(store), SessionOptions::default())
    }

    fn names(entries: &[ListingEntry]) -> Vec<&str> {
        entries.iter().map(ListingEntry::name).collect()
    }

    #[test]
    fn test_options_from_config() {
        let config = NavigationConfig {
            existence_check: ExistenceCheck::Substring,
            page_size: 50,
        };
        let options = SessionOptions::from(&config);
        assert_eq!(options.existence_check, ExistenceCheck::Substring);
        assert_eq!(options.page_size, 50);
    }

    #[tokio::test]
    async fn test_navigate_and_list() {
        let mut session = session();
        assert_eq!(session.cwd(), "/");

        let buckets = session.list(None, false).await.unwrap();
        assert_eq!(names(&buckets), vec!["bucket1", "bucket2"]);

        session.change_location(Some("/bucket1/docs")).await.unwrap();
        assert_eq!(session.cwd(), "/bucket1/docs");
        assert_eq!(session.navigation().current_bucket(), Some("bucket1"));
        assert_eq!(session.navigation().current_prefix(), "docs");

        let entries = session.list(None, false).await.unwrap();
        assert_eq!(names(&entries), vec!["api", "guide.md"]);

        session.change_location(Some("..")).await.unwrap();
        assert_eq!(session.cwd(), "/bucket1");
        assert_eq!(session.navigation().current_prefix(), "");

        session.change_location(None).await.unwrap();
        assert!(session.navigation().is_root());
    }

    #[tokio::test]
    async fn test_list_target_relative_and_absolute() {
        let mut session = session();
        session.change_location(Some("bucket1")).await.unwrap();

        let entries = session.list(Some("docs"), false).await.unwrap();
        assert_eq!(names(&entries), vec!["api", "guide.md"]);

        let entries = session.list(Some("/bucket1/docs/api"), false).await.unwrap();
        assert_eq!(names(&entries), vec!["index.html"]);

        let err = session.list(Some("missing"), false).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_root_lists_buckets() {
        let mut session = session();
        let entries = session.list(Some("/"), false).await.unwrap();
        assert_eq!(names(&entries), vec!["bucket1", "bucket2"]);

        session.change_location(Some("/bucket1/docs")).await.unwrap();
        for target in ["/", "/bucket1/..", "../.."] {
            let entries = session.list(Some(target), false).await.unwrap();
            assert_eq!(names(&entries), vec!["bucket1", "bucket2"], "ls {target}");
        }
        assert_eq!(session.cwd(), "/bucket1/docs");
    }

    #[tokio::test]
    async fn test_cd_absolute_parent_of_bucket_is_root() {
        let mut session = session();
        session.change_location(Some("/bucket1/docs")).await.unwrap();
        session.change_location(Some("/bucket1/..")).await.unwrap();
        assert!(session.navigation().is_root());

        session.change_location(Some("/bucket1/docs")).await.unwrap();
        session.change_location(Some("/bucket1/docs/../..")).await.unwrap();
        assert_eq!(session.cwd(), "/");
    }

    #[tokio::test]
    async fn test_failed_cd_keeps_location() {
        let mut session = session();
        session.change_location(Some("/bucket1/docs")).await.unwrap();

        let err = session.change_location(Some("/bucket3")).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(session.cwd(), "/bucket1/docs");
    }
}
