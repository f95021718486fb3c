// src/error.rs
//! Error types for the speed limit display

use std::fmt;

pub type Result<T> = std::result::Result<T, SpeedLimitError>;

#[derive(Debug)]
pub enum SpeedLimitError {
    Io(std::io::Error),
    Serial(tokio_serial::Error),
    Json(serde_json::Error),
    Connection(String),
    /// Zone table file missing or unreadable
    ZoneTableIo(String),
    /// Zone table present but not a usable feature collection
    ZoneTableFormat(String),
    Display(String),
    Other(String),
}

impl SpeedLimitError {
    /// True for the startup failures that must halt the process
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SpeedLimitError::ZoneTableIo(_) | SpeedLimitError::ZoneTableFormat(_)
        )
    }

    /// Short message shown on the screen before halting
    pub fn screen_message(&self) -> &'static str {
        match self {
            SpeedLimitError::ZoneTableIo(_) => "SD Error!",
            SpeedLimitError::ZoneTableFormat(_) => "JSON Error!",
            _ => "Error!",
        }
    }
}

impl fmt::Display for SpeedLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedLimitError::Io(e) => write!(f, "IO error: {}", e),
            SpeedLimitError::Serial(e) => write!(f, "Serial error: {}", e),
            SpeedLimitError::Json(e) => write!(f, "JSON error: {}", e),
            SpeedLimitError::Connection(msg) => write!(f, "Connection error: {}", msg),
            SpeedLimitError::ZoneTableIo(msg) => write!(f, "Error loading zone table: {}", msg),
            SpeedLimitError::ZoneTableFormat(msg) => write!(f, "Error parsing zone table: {}", msg),
            SpeedLimitError::Display(msg) => write!(f, "Display error: {}", msg),
            SpeedLimitError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for SpeedLimitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpeedLimitError::Io(e) => Some(e),
            SpeedLimitError::Serial(e) => Some(e),
            SpeedLimitError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SpeedLimitError {
    fn from(error: std::io::Error) -> Self {
        SpeedLimitError::Io(error)
    }
}

impl From<tokio_serial::Error> for SpeedLimitError {
    fn from(error: tokio_serial::Error) -> Self {
        SpeedLimitError::Serial(error)
    }
}

impl From<serde_json::Error> for SpeedLimitError {
    fn from(error: serde_json::Error) -> Self {
        SpeedLimitError::Json(error)
    }
}
