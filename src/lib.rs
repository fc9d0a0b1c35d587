pub use error::AppError;

/// Main architecture layers (dependency flow: CLI → Layout core → Storage)
pub mod cli; // Command-line interface
pub mod layout; // Layout interpreter, data model, serializer
pub mod storage; // Configuration persistence

/// Support modules (used across layers)
pub mod display; // Output formatting
pub mod error; // Error handling
pub mod utils; // Shared utilities and helpers

pub type Result<T> = std::result::Result<T, AppError>;
