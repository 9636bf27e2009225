// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! SQLite database interface for the C++ package catalog.
//!
//! This crate stores analyzed C++ packages: their file trees, compile
//! commands, declaration trees and the immutability analysis attached to
//! methods, fields and records.
//!
//! # Key Features
//!
//! - Full schema with cascading deletes along ownership edges
//! - Read-only, immutable access for serving
//! - Declarations as a tagged union ([`DeclKind`])
//! - Breadcrumb construction for both trees ([`TreeContext`])
//! - In-memory database and write helpers for testing and ingestion
//!
//! # Example
//!
//! ```ignore
//! use cppdoc_store_db::{StoreDb, TreeContext, FileDescriptor};
//!
//! let db = StoreDb::open_readonly("cppdoc.sqlite3")?;
//! if let Some((name, package)) = db.query_package_by_slug("ninja", "1.7.2")? {
//!     let ctx: TreeContext<FileDescriptor> = TreeContext::build(&db, package.id, None)?;
//!     println!("{name} {}: {} children", package.version, db.query_file_children(ctx.node.id)?.len());
//! }
//! ```

mod analysis;
mod connection;
mod decls;
mod error;
mod query;
mod schema;
mod tree;
mod types;
mod write;

pub use connection::{OpenMode, StoreDb};
pub use error::{Error, Result};
pub use schema::SCHEMA_VERSION;
pub use tree::{TreeContext, TreeNode, TreeSource, ancestors, find_root};
pub use types::*;
pub use write::*;
