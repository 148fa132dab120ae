//! HomeStream - Self-hosted media catalog and streaming server
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod server;
pub mod storage;
pub mod streaming;
