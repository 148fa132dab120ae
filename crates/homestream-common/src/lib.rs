//! Homestream-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across homestream:
//!
//! - **Typed IDs**: Type-safe UUID wrappers for content and episodes
//! - **Core Types**: Enums for content kinds and uploaded asset kinds
//! - **Path Utilities**: MIME derivation, filename sanitising, stored extensions
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use homestream_common::{ContentId, ContentKind, Error, Result};
//! use homestream_common::paths::is_safe_file_name;
//!
//! let id = ContentId::new();
//! let kind: ContentKind = "series".parse().unwrap();
//!
//! assert!(is_safe_file_name("movie.mp4"));
//! assert!(!is_safe_file_name("../movie.mp4"));
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("Content"))
//! }
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
