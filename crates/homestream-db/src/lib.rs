//! Homestream-DB: Catalog schema, migrations, and query operations
//!
//! This crate provides the catalog store for homestream using SQLite
//! with rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations
//!
//! # Example
//!
//! ```no_run
//! use homestream_common::ContentKind;
//! use homestream_db::models::NewContent;
//! use homestream_db::pool::{init_pool, get_conn};
//! use homestream_db::queries::content;
//!
//! let pool = init_pool("/var/lib/homestream/homestream.db").unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let movie = content::create_content(&conn, &NewContent::new("Big Buck Bunny", ContentKind::Movie)).unwrap();
//! println!("Created content: {}", movie.id);
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
