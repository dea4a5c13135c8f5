//! Global error handling for ctxpack
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project.

use std::io;
use thiserror::Error;

/// Global error type for ctxpack operations
#[derive(Error, Debug)]
pub enum CtxPackError {
    /// Git-related errors
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Ignore pattern compilation errors
    #[error("Pattern error: {0}")]
    Pattern(#[from] ignore::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Scanner errors
    #[error("Scanner error: {0}")]
    Scanner(String),

    /// Signature extraction errors
    #[error("Signature error: {0}")]
    Signature(String),

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// Unexpected error
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Specialized Result type for ctxpack operations
pub type Result<T> = std::result::Result<T, CtxPackError>;

/// Creates a CtxPackError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::CtxPackError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for adding context to errors
pub trait ResultExt<T, E> {
    /// Add additional context to an error
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E: std::error::Error + 'static> ResultExt<T, E> for std::result::Result<T, E> {
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|e| {
            let context = f();
            CtxPackError::Unexpected(format!("{}: {}", context, e))
        })
    }
}

// The binary's main returns io::Result
impl From<CtxPackError> for io::Error {
    fn from(err: CtxPackError) -> Self {
        match err {
            CtxPackError::Io(e) => e,
            CtxPackError::PathNotFound(msg) => io::Error::new(io::ErrorKind::NotFound, msg),
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_positive(n: i32) -> Result<i32> {
        crate::ensure!(n > 0, Config, "expected a positive number, got {}", n);
        Ok(n)
    }

    #[test]
    fn test_ensure_macro() {
        assert_eq!(check_positive(3).unwrap(), 3);
        let err = check_positive(-1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: expected a positive number, got -1"
        );
    }

    #[test]
    fn test_with_context() {
        let res: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::Other, "boom"));
        let err = res.with_context(|| "reading list").unwrap_err();
        assert_eq!(err.to_string(), "Unexpected error: reading list: boom");
    }

    #[test]
    fn test_into_io_error_keeps_not_found() {
        let err: io::Error = crate::error!(PathNotFound, "/nope").into();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
