//! Storage layer for layoutctl
//!
//! Handles the persisted tool configuration (unit sizes, TOML on disk).

use crate::error::StorageError;

pub mod config;

type Result<T> = std::result::Result<T, StorageError>;
