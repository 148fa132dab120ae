//! Video streaming module.
//!
//! Serves files from the videos directory over HTTP with byte-range support,
//! so browsers can seek without downloading the whole file.
//!
//! # Routes
//!
//! - `GET /stream/{filename}` - Full file (200) or a single byte range (206)
//!
//! A request goes through three steps:
//!
//! 1. [`target::resolve`] maps the file name to a regular file in the videos
//!    directory and stats it.
//! 2. [`range::parse_range_header`] validates the `Range` header against the
//!    current size.
//! 3. [`direct::serve`] opens the file, seeks, and streams exactly the
//!    selected bytes in bounded chunks.

pub mod body;
pub mod direct;
pub mod range;
pub mod target;

pub use direct::{serve, stream_video, StreamError, StreamSettings, DEFAULT_CHUNK_SIZE};
pub use range::{parse_range_header, ByteRange, RangeError};
pub use target::{resolve, StreamTarget};

use axum::{routing::get, Router};

use crate::server::AppContext;

/// Create the streaming router, nested under `/stream`.
pub fn stream_router() -> Router<AppContext> {
    Router::new().route("/:filename", get(stream_video))
}
