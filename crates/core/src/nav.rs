//! Navigation state machine
//!
//! Tracks the current bucket and folder prefix and implements `cd`-style
//! movement. The state is either Root (no bucket selected) or inside a
//! bucket at some prefix. Failed transitions leave it untouched.

use serde::Serialize;

use crate::error::Result;
use crate::path::{Location, SEPARATOR, join_segments, normalize, split_segments};
use crate::resolve::PathResolver;

/// Current location of a session
///
/// The prefix is kept without leading or trailing separators and is empty
/// whenever no bucket is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    bucket: Option<String>,
    prefix: String,
}

impl NavigationState {
    /// The root above all buckets
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.bucket.is_none()
    }

    pub fn current_bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    pub fn current_prefix(&self) -> &str {
        &self.prefix
    }

    /// The current folder as a location, `None` at Root
    pub fn location(&self) -> Option<Location> {
        self.bucket
            .as_ref()
            .map(|bucket| Location::new(bucket, &self.prefix))
    }

    /// Full path segments, bucket first
    pub fn segments(&self) -> Vec<String> {
        match &self.bucket {
            None => Vec::new(),
            Some(bucket) => std::iter::once(bucket.clone())
                .chain(split_segments(&self.prefix))
                .collect(),
        }
    }

    pub(crate) fn set(&mut self, location: Location) {
        self.prefix = join_segments(&split_segments(&location.key));
        self.bucket = Some(location.bucket);
    }

    fn set_segments(&mut self, segments: &[String]) {
        match segments.split_first() {
            None => self.reset(),
            Some((bucket, rest)) => {
                self.bucket = Some(bucket.clone());
                self.prefix = join_segments(rest);
            }
        }
    }

    fn reset(&mut self) {
        self.bucket = None;
        self.prefix.clear();
    }

    /// Apply a navigation command
    ///
    /// Moves toward the root never touch the store. Anything that descends
    /// is resolved with validation first, and the state only changes once
    /// that succeeds.
    pub async fn apply(&mut self, command: &NavCommand, resolver: &PathResolver<'_>) -> Result<()> {
        match command {
            NavCommand::Root => self.reset(),
            NavCommand::UpTwo => {
                let segments = normalize(&self.segments(), "../..");
                self.set_segments(&segments);
            }
            NavCommand::Parent(path) => {
                let segments = normalize(&self.segments(), path);
                if descends(path) && !segments.is_empty() {
                    let target = format!("{SEPARATOR}{}", join_segments(&segments));
                    let location = resolver.resolve_absolute(&target, true).await?;
                    self.set(location);
                } else {
                    self.set_segments(&segments);
                }
            }
            // `/b/..` and friends climb back above every bucket
            NavCommand::Absolute(path) if normalize::<&str>(&[], path).is_empty() => self.reset(),
            NavCommand::Absolute(path) => {
                let location = resolver.resolve_absolute(path, true).await?;
                self.set(location);
            }
            NavCommand::Relative(path) => {
                // At Root the first segment of a relative path names a bucket
                let location = if self.is_root() {
                    resolver
                        .resolve_absolute(&format!("{SEPARATOR}{path}"), true)
                        .await?
                } else {
                    resolver.resolve(path, self, true).await?
                };
                self.set(location);
            }
        }

        tracing::debug!(state = %self, "navigation state changed");
        Ok(())
    }
}

impl std::fmt::Display for NavigationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.bucket {
            None => write!(f, "/"),
            Some(bucket) if self.prefix.is_empty() => write!(f, "/{bucket}"),
            Some(bucket) => write!(f, "/{bucket}/{}", self.prefix),
        }
    }
}

/// A parsed `cd` argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavCommand {
    /// No argument, `~` or `/`
    Root,
    /// `../..`
    UpTwo,
    /// A relative path containing `..`, applied segment by segment
    Parent(String),
    /// A path starting with `/`
    Absolute(String),
    /// Any other relative path
    Relative(String),
}

impl NavCommand {
    pub fn parse(arg: Option<&str>) -> Self {
        let arg = arg.map(str::trim).unwrap_or_default();
        match arg {
            "" | "~" | "/" => Self::Root,
            _ if arg.trim_end_matches(SEPARATOR) == "../.." => Self::UpTwo,
            _ if arg.starts_with(SEPARATOR) => Self::Absolute(arg.to_string()),
            _ if arg.split(SEPARATOR).any(|s| s == "..") => Self::Parent(arg.to_string()),
            _ => Self::Relative(arg.to_string()),
        }
    }
}

/// Whether a path names any segment beyond `.` and `..`
fn descends(path: &str) -> bool {
    path.split(SEPARATOR)
        .any(|s| !matches!(s, "" | "." | ".."))
}
