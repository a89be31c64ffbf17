//! Application-level error carried back to `main`.
//!
//! Library modules return their own `thiserror` enums (`SolveError`,
//! `ConfigError`); everything is folded into `AppError` at the command
//! boundary so the binary can pick an exit code.

use crate::config::ConfigError;
use crate::solver::SolveError;

/// Bad input, usage or configuration.
pub const EXIT_INPUT: u8 = 2;
/// The solver rejected the input (e.g. zero length).
pub const EXIT_DOMAIN: u8 = 3;
/// I/O, terminal or other runtime failure.
pub const EXIT_RUNTIME: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(EXIT_INPUT, message)
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(EXIT_RUNTIME, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<SolveError> for AppError {
    fn from(err: SolveError) -> Self {
        AppError::new(EXIT_DOMAIN, err.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(EXIT_INPUT, err.to_string())
    }
}
