// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Error types for catalog database operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for catalog database operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during catalog database operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to open database with context
    #[error("Failed to open database at '{path}': {source}")]
    DatabaseOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Database file not found
    #[error("Database not found at: {0}")]
    DatabaseNotFound(PathBuf),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, found {found}")]
    SchemaVersionMismatch { expected: i32, found: i32 },

    /// Compile command exceeds the stored token bounds
    #[error("Command line too long: {reason}")]
    CommandLineTooLong { reason: String },

    /// A package tree without exactly one root node
    #[error("No root {tree} for package {package}: found {found} root nodes")]
    MissingRoot {
        tree: &'static str,
        package: i64,
        found: usize,
    },

    /// A parent chain that loops or leaves its package
    #[error("Corrupt {tree} tree at node {node}")]
    CorruptTree { tree: &'static str, node: i64 },
}
