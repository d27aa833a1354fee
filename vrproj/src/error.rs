use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised while setting up the character.
///
/// Per-frame failures (missed traces, failed navigation projection, missing
/// haptics) are expected outcomes and never surface here.
#[derive(Debug)]
pub enum VrError {
    /// Configuration file could not be parsed
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O failure while reading configuration
    Io { path: PathBuf, source: io::Error },

    /// A configuration value is out of range
    Validation { item: String, reason: String },

    /// The input binding table is inconsistent
    Binding { name: String, reason: String },
}

impl fmt::Display for VrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VrError::Config { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
            VrError::Io { path, source } => {
                write!(f, "Failed to read '{}': {}", path.display(), source)
            }
            VrError::Validation { item, reason } => {
                write!(f, "Invalid value for '{}': {}", item, reason)
            }
            VrError::Binding { name, reason } => {
                write!(f, "Input binding '{}' rejected: {}", name, reason)
            }
        }
    }
}

impl std::error::Error for VrError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VrError::Config { source, .. } => Some(source),
            VrError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl VrError {
    pub fn validation(item: &str, reason: impl Into<String>) -> Self {
        VrError::Validation {
            item: item.to_string(),
            reason: reason.into(),
        }
    }
}

pub type VrResult<T> = Result<T, VrError>;
