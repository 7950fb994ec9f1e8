//! s5-core: Core library for the s5 S3 shell
//!
//! This crate provides the core functionality for s5, including:
//! - Configuration management
//! - Virtual path codec and resolution
//! - Navigation state and `cd` transitions
//! - Existence validation and folder listing over a flat key space
//! - ObjectStore trait for S3 operations, with an in-memory implementation
//!
//! This crate is designed to be independent of any specific S3 SDK,
//! allowing for easy testing and potential future support for other backends.

pub mod config;
pub mod error;
pub mod listing;
pub mod memory;
pub mod nav;
pub mod path;
pub mod resolve;
pub mod session;
pub mod traits;
pub mod validate;

pub use config::{Config, ConfigManager, ConnectionConfig, NavigationConfig};
pub use error::{Error, Result};
pub use listing::{FileDetail, ListingEngine, ListingEntry};
pub use memory::MemoryStore;
pub use nav::{NavCommand, NavigationState};
pub use path::Location;
pub use resolve::PathResolver;
pub use session::{Session, SessionOptions};
pub use traits::{ListOptions, ListResult, ObjectInfo, ObjectStore, list_pages};
pub use validate::{ExistenceCheck, ExistenceValidator};
