use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("ParseError: {0}")]
    Parse(#[from] ParseError),
    #[error("CliError: {0}")]
    Cli(#[from] CliError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
    #[error("DisplayError: {0}")]
    Display(#[from] DisplayError),
}

/// Failures produced by the layout interpreter. Every variant carries the
/// 1-based source line of the offending statement.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("line {line}: unknown panel property '{field}'")]
    UnknownProperty { field: String, line: usize },
    #[error("line {line}: writeConfig on '{handle}' before any currentConfigGroup")]
    NoActiveGroup { handle: String, line: usize },
    #[error("line {line}: invalid value '{value}' for '{field}'")]
    InvalidValue {
        field: String,
        value: String,
        line: usize,
    },
    #[error("line {line}: unknown unit constant '{name}'")]
    UnresolvedUnit { name: String, line: usize },
    #[error("line {line}: {message}")]
    Syntax { message: String, line: usize },
}

impl ParseError {
    /// Source line the error was reported on.
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnknownProperty { line, .. }
            | ParseError::NoActiveGroup { line, .. }
            | ParseError::InvalidValue { line, .. }
            | ParseError::UnresolvedUnit { line, .. }
            | ParseError::Syntax { line, .. } => *line,
        }
    }
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Configuration save failed")]
    ConfigSaveFailed,
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
    #[error("Unknown configuration key: {key}")]
    UnknownKey { key: String },
    #[error("Invalid configuration value for '{key}': {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Table formatting failed: {0}")]
    TableFormat(String),
    #[error("Serialization failed: {0}")]
    Serialization(String),
}
