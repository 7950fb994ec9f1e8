//! Path resolution
//!
//! Turns user-typed paths into locations. Absolute paths name their bucket
//! in the first segment; relative paths are applied to the current
//! navigation state.
//!
//! Validation is optional per call: creating a folder must resolve a path
//! that does not exist yet, while listing or downloading must reject one.

use crate::error::{Error, Result};
use crate::nav::NavigationState;
use crate::path::{Location, is_absolute, join_segments, normalize, to_location};
use crate::validate::ExistenceValidator;

/// Resolves raw paths against a navigation state
pub struct PathResolver<'a> {
    validator: ExistenceValidator<'a>,
}

impl<'a> PathResolver<'a> {
    pub fn new(validator: ExistenceValidator<'a>) -> Self {
        Self { validator }
    }

    /// Resolve `raw` to a location, optionally confirming it exists
    pub async fn resolve(
        &self,
        raw: &str,
        nav: &NavigationState,
        require_validation: bool,
    ) -> Result<Location> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(Error::InvalidArgument("path cannot be empty".into()));
        }

        if is_absolute(raw) {
            self.resolve_absolute(raw, require_validation).await
        } else {
            self.resolve_relative(raw, nav, require_validation).await
        }
    }

    /// Resolve a path whose first segment is the bucket
    ///
    /// The bucket is always probed. Without validation a missing or
    /// unreachable bucket is only reported and resolution carries on.
    pub async fn resolve_absolute(&self, raw: &str, require_validation: bool) -> Result<Location> {
        let segments = normalize::<&str>(&[], raw);
        let location = to_location(&segments).ok_or_else(|| {
            Error::InvalidArgument(format!("'{raw}' is the root, not a bucket or object"))
        })?;

        match self.validator.bucket_exists(&location.bucket).await {
            Ok(true) => {}
            Ok(false) if require_validation => {
                return Err(Error::NotFound(format!(
                    "Bucket does not exist: {}",
                    location.bucket
                )));
            }
            Err(e) if require_validation => return Err(e),
            Ok(false) | Err(_) => {
                tracing::warn!(bucket = %location.bucket, "continuing with an unvalidated bucket");
            }
        }

        if require_validation {
            self.validate_key(&location).await?;
        }
        Ok(location)
    }

    async fn resolve_relative(
        &self,
        raw: &str,
        nav: &NavigationState,
        require_validation: bool,
    ) -> Result<Location> {
        let bucket = nav.current_bucket().ok_or_else(|| {
            Error::NotFound(format!(
                "{raw}: no current location to resolve against"
            ))
        })?;

        let segments = normalize(&nav.segments(), raw);
        let location = match to_location(&segments) {
            Some(location) if location.bucket == bucket => location,
            _ => {
                return Err(Error::InvalidArgument(format!(
                    "'{raw}' leaves bucket '{bucket}'; use an absolute path such as /{}",
                    join_segments(&segments)
                )));
            }
        };

        if require_validation {
            self.validate_key(&location).await?;
        }
        Ok(location)
    }

    async fn validate_key(&self, location: &Location) -> Result<()> {
        if self
            .validator
            .object_exists(&location.bucket, &location.key)
            .await?
        {
            Ok(())
        } else {
            Err(Error::NotFound(location.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::traits::MockObjectStore;
    use crate::validate::ExistenceCheck;

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_object("b", "x/y", "data")
            .with_object("b", "docs/", "")
            .with_bucket("other")
    }

    fn resolver(store: &MemoryStore) -> PathResolver<'_> {
        PathResolver::new(ExistenceValidator::new(store, ExistenceCheck::Path, 100))
    }

    fn in_bucket(bucket: &str, prefix: &str) -> NavigationState {
        let mut nav = NavigationState::root();
        nav.set(Location::new(bucket, prefix));
        nav
    }

    #[tokio::test]
    async fn test_absolute_ignores_navigation_state() {
        let store = store();
        let resolver = resolver(&store);

        for nav in [
            NavigationState::root(),
            in_bucket("other", ""),
            in_bucket("b", "docs"),
        ] {
            let loc = resolver.resolve("/b/x/y", &nav, true).await.unwrap();
            assert_eq!(loc, Location::new("b", "x/y"));
        }
    }

    #[tokio::test]
    async fn test_absolute_bucket_only() {
        let store = store();
        let loc = resolver(&store).resolve("/b/", &NavigationState::root(), true).await.unwrap();
        assert!(loc.is_bucket_root());
    }

    #[tokio::test]
    async fn test_absolute_missing_bucket() {
        let store = store();
        let resolver = resolver(&store);
        let nav = NavigationState::root();

        let err = resolver.resolve("/nope/a", &nav, true).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        // Without validation the missing bucket is reported, not fatal
        let loc = resolver.resolve("/nope/a", &nav, false).await.unwrap();
        assert_eq!(loc, Location::new("nope", "a"));
    }

    #[tokio::test]
    async fn test_absolute_missing_key() {
        let store = store();
        let err = resolver(&store)
            .resolve("/b/x/z", &NavigationState::root(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(ref m) if m == "/b/x/z"));
    }

    #[tokio::test]
    async fn test_root_is_not_a_location() {
        let store = store();
        let err = resolver(&store)
            .resolve("/", &NavigationState::root(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_relative_requires_current_bucket() {
        let store = store();
        let err = resolver(&store)
            .resolve("x", &NavigationState::root(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_relative_appends_to_prefix() {
        let store = store();
        let resolver = resolver(&store);

        let loc = resolver
            .resolve("y", &in_bucket("b", "x"), true)
            .await
            .unwrap();
        assert_eq!(loc, Location::new("b", "x/y"));

        let loc = resolver
            .resolve("x//y/", &in_bucket("b", ""), true)
            .await
            .unwrap();
        assert_eq!(loc, Location::new("b", "x/y"));
    }

    #[tokio::test]
    async fn test_relative_without_validation_allows_new_paths() {
        let store = store();
        let resolver = resolver(&store);
        let nav = in_bucket("b", "docs");

        let loc = resolver.resolve("new/folder", &nav, false).await.unwrap();
        assert_eq!(loc, Location::new("b", "docs/new/folder"));

        let err = resolver.resolve("new/folder", &nav, true).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_relative_cannot_escape_bucket() {
        let store = store();
        let err = resolver(&store)
            .resolve("../../other", &in_bucket("b", "x"), false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_backend_failure_is_not_reported_as_missing() {
        let mut mock = MockObjectStore::new();
        mock.expect_bucket_exists()
            .returning(|_| Err(Error::Auth("access denied".into())));
        let resolver = PathResolver::new(ExistenceValidator::new(&mock, ExistenceCheck::Path, 100));

        let err = resolver
            .resolve("/b/x", &NavigationState::root(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }
}
