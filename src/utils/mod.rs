//! Utils module - Shared utilities and helpers

/// Verbose logging helpers
pub mod logging;
