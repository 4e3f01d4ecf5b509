// SPDX-License-Identifier: PMPL-1.0-or-later
//! Error types for wcag-engine

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, EngineError>;

/// Main error type for wcag-engine
///
/// Well-formed but inaccessible data (a 1:1 contrast pair, a page full of
/// violations) is never an error. These variants cover malformed input and
/// the I/O around the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Color format error: {input:?} ({reason})")]
    ColorFormat { input: String, reason: String },

    #[error("Violation {violation} references unknown criterion {criterion}")]
    InvalidCriterionReference { violation: String, criterion: String },

    #[error("Invalid criterion id: {0}")]
    InvalidCriterionId(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl EngineError {
    /// Build a color format error for the given raw input
    pub fn color(input: &str, reason: impl Into<String>) -> Self {
        EngineError::ColorFormat {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
