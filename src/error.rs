//! Application error type.
//!
//! Every fallible operation outside the analytics core returns `AppError`, which
//! carries the process exit code alongside a human-readable message:
//!
//! - `2`: usage / configuration problems (missing env, bad CLI value, unwritable path)
//! - `3`: data problems (invalid mandatory values, CSV schema mismatch)
//! - `4`: runtime failures in collaborators (HTTP, I/O)

#[derive(Clone, PartialEq, Eq)]
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

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    pub fn data(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(4, message)
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
