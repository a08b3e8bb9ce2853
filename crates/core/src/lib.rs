//! Core types and shared functionality for docpdf.
//!
//! This crate provides:
//! - On-disk PDF cache with TTL-based expiry
//! - Filename sanitization for downloaded documents
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod filename;

pub use cache::{CacheStore, EntryStatus};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use filename::{CleanName, clean_filename};
