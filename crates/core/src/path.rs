//! Virtual path codec
//!
//! Converts between user-facing virtual paths (`/bucket/folder/file`) and
//! concrete bucket/key locations. Everything here is pure; nothing touches
//! the backing store.

use serde::Serialize;

/// Separator used both in virtual paths and as the cosmetic key delimiter
pub const SEPARATOR: char = '/';

/// A bucket/key pair a virtual path resolves to
///
/// The key never carries a leading separator. An empty key is the bucket root.
/// Resolving a path yields a `Location`, but whether the target exists is a
/// separate question answered by the existence validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Bucket name
    pub bucket: String,
    /// Object key (empty for bucket root)
    pub key: String,
}

impl Location {
    /// Create a new Location
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Whether this location is the root of its bucket
    pub fn is_bucket_root(&self) -> bool {
        self.key.is_empty()
    }

    /// Last key segment, or the bucket name at the bucket root
    pub fn basename(&self) -> &str {
        self.key
            .trim_end_matches(SEPARATOR)
            .rsplit(SEPARATOR)
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(self.bucket.as_str())
    }

    /// Treat this location as a folder and place `name` inside it
    pub fn child(&self, name: &str) -> Self {
        let base = self.key.trim_end_matches(SEPARATOR);
        let key = if base.is_empty() {
            name.to_string()
        } else {
            format!("{base}{SEPARATOR}{name}")
        };
        Self {
            bucket: self.bucket.clone(),
            key,
        }
    }

    /// Key prefix that selects this folder's children (`""` at bucket root)
    pub fn folder_prefix(&self) -> String {
        folder_prefix(&self.key)
    }

    /// Key of the zero-byte marker object representing this folder
    pub fn marker_key(&self) -> String {
        format!("{}{SEPARATOR}", self.key.trim_end_matches(SEPARATOR))
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.key.is_empty() {
            write!(f, "/{}", self.bucket)
        } else {
            write!(f, "/{}/{}", self.bucket, self.key)
        }
    }
}

/// Whether a raw path is absolute (its first segment names a bucket)
pub fn is_absolute(path: &str) -> bool {
    path.starts_with(SEPARATOR)
}

/// Split a path on `/`, dropping empty segments and keeping order
pub fn split_segments(path: &str) -> Vec<String> {
    path.split(SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Join segments back into a key with `/`
pub fn join_segments<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<&str>>()
        .join("/")
}

/// Build a location from path segments
///
/// The first segment is the bucket and the rest form the key. Returns `None`
/// for an empty segment list, which denotes the root above all buckets.
pub fn to_location<S: AsRef<str>>(segments: &[S]) -> Option<Location> {
    let (bucket, rest) = segments.split_first()?;
    Some(Location::new(bucket.as_ref(), join_segments(rest)))
}

/// Apply a path to a base segment list
///
/// `.` is ignored and `..` drops the previous segment. Walking above the
/// first segment leaves an empty list rather than failing.
pub fn normalize<S: AsRef<str>>(base: &[S], path: &str) -> Vec<String> {
    let mut segments: Vec<String> = base.iter().map(|s| s.as_ref().to_string()).collect();
    for segment in path.split(SEPARATOR) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment.to_string()),
        }
    }
    segments
}

/// Prefix selecting the children of the folder at `key`
pub fn folder_prefix(key: &str) -> String {
    let key = key.trim_matches(SEPARATOR);
    if key.is_empty() {
        String::new()
    } else {
        format!("{key}{SEPARATOR}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_segments_drops_empty() {
        assert_eq!(split_segments("/b//x/y/"), vec!["b", "x", "y"]);
        assert!(split_segments("").is_empty());
        assert!(split_segments("///").is_empty());
    }

    #[test]
    fn test_split_join_round_trip() {
        let cases: [&[&str]; 4] = [
            &["a"],
            &["a", "b"],
            &["bucket", "docs", "2024", "q1.pdf"],
            &[],
        ];
        for segments in cases {
            assert_eq!(split_segments(&join_segments(segments)), segments);
        }
    }

    #[test]
    fn test_to_location() {
        let loc = to_location(&["b", "x", "y"]).unwrap();
        assert_eq!(loc, Location::new("b", "x/y"));

        let loc = to_location(&["b"]).unwrap();
        assert_eq!(loc.key, "");
        assert!(loc.is_bucket_root());

        assert!(to_location::<&str>(&[]).is_none());
    }

    #[test]
    fn test_normalize_parent_segments() {
        assert_eq!(normalize(&["b", "docs"], ".."), vec!["b"]);
        assert_eq!(
            normalize(&["b", "docs"], "../img/./raw"),
            vec!["b", "img", "raw"]
        );
        assert!(normalize(&["b"], "../..").is_empty());
        assert!(normalize::<&str>(&[], "..").is_empty());
    }

    #[test]
    fn test_basename() {
        assert_eq!(Location::new("b1", "x/report.txt").basename(), "report.txt");
        assert_eq!(Location::new("b1", "x/dir/").basename(), "dir");
        assert_eq!(Location::new("b1", "").basename(), "b1");
    }

    #[test]
    fn test_child_treats_location_as_folder() {
        let dst = Location::new("b2", "archive");
        assert_eq!(
            dst.child("report.txt"),
            Location::new("b2", "archive/report.txt")
        );

        let root = Location::new("b2", "");
        assert_eq!(root.child("report.txt").key, "report.txt");
    }

    #[test]
    fn test_folder_prefix_and_marker() {
        assert_eq!(folder_prefix(""), "");
        assert_eq!(folder_prefix("a"), "a/");
        assert_eq!(folder_prefix("a/b/"), "a/b/");
        assert_eq!(Location::new("b", "docs").marker_key(), "docs/");
    }

    #[test]
    fn test_location_display() {
        assert_eq!(Location::new("b", "").to_string(), "/b");
        assert_eq!(Location::new("b", "x/y").to_string(), "/b/x/y");
        assert!(is_absolute("/b"));
        assert!(!is_absolute("b"));
    }
}
