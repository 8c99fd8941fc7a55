//! Error Types
//!
//! This module defines the recoverable error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`StrataError`] covers failures that can originate
//! from loosely structured input or from scene visitors:
//! - Malformed flag override objects
//! - Settings / override JSON decoding errors
//! - Unknown geometry references and traversals aborted by a visitor
//!
//! Contract violations on the flag stack (popping the baseline, reading
//! before `reset()`) are programming errors and panic instead of returning
//! an error.
//!
//! # Usage
//!
//! ```rust,ignore
//! use strata::errors::{StrataError, Result};
//!
//! fn load_settings(json: &str) -> Result<RendererSettings> {
//!     RendererSettings::from_json_str(json)
//! }
//! ```

use thiserror::Error;

/// The main error type for the crate.
#[derive(Error, Debug)]
pub enum StrataError {
    // ========================================================================
    // Override & Configuration Errors
    // ========================================================================
    /// A flag override description was not a key/value object.
    #[error("Invalid flag overrides: {0}")]
    InvalidOverrides(String),

    /// A known flag was given a value that is neither a boolean nor null.
    #[error("Invalid value for flag '{flag}': expected bool or null, found {found}")]
    InvalidFlagValue {
        /// Configuration name of the flag
        flag: &'static str,
        /// Rendered form of the rejected value
        found: String,
    },

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ========================================================================
    // Traversal Errors
    // ========================================================================
    /// A node references geometry the renderer does not know.
    #[error("Unknown geometry {geometry}")]
    UnknownGeometry {
        /// The unregistered geometry id
        geometry: u32,
    },

    /// A visitor rejected a node.
    #[error("Visitor error: {0}")]
    Visitor(String),

    /// The traversal was aborted part-way; the flag stack has been reset.
    #[error("Traversal aborted at depth {depth}: {source}")]
    TraversalAborted {
        /// Flag stack depth at the moment of the abort
        depth: usize,
        /// The error that caused the abort
        #[source]
        source: Box<StrataError>,
    },
}

/// Alias for `Result<T, StrataError>`.
pub type Result<T> = std::result::Result<T, StrataError>;
