// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Database connection management.

use std::path::Path;

use percent_encoding::{AsciiSet, CONTROLS, percent_encode};
use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::error::{Error, Result};
use crate::schema::{ANALYSIS_SCHEMA_SQL, DECL_SCHEMA_SQL, SCHEMA_SQL, SCHEMA_VERSION};

/// Bytes of a file path that SQLite would otherwise read as URI syntax.
const URI_PATH: &AsciiSet = &CONTROLS.add(b' ').add(b'#').add(b'%').add(b'?');

/// Database open mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Read-only access (for serving)
    ReadOnly,
    /// Read-write access (for ingestion and tests)
    ReadWrite,
    /// Create new database if it doesn't exist
    Create,
}

/// SQLite database connection for the package catalog.
#[derive(Debug)]
pub struct StoreDb {
    pub(crate) conn: Connection,
}

impl StoreDb {
    /// Open a catalog database for serving.
    ///
    /// Opens in read-only mode with the immutable flag and checks that the
    /// schema version matches.
    pub fn open_readonly<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::DatabaseNotFound(path.to_owned()));
        }

        let uri = format!(
            "file:{}?immutable=1",
            percent_encode(path.as_os_str().as_encoded_bytes(), URI_PATH)
        );
        let conn = Connection::open_with_flags(
            &uri,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
        )
        .map_err(|e| Error::DatabaseOpen {
            path: path.to_owned(),
            source: e,
        })?;
        let db = Self { conn };
        db.check_schema_version()?;

        debug!("Opened catalog database at {} (immutable)", path.display());
        Ok(db)
    }

    /// Open or create a database at a custom path.
    ///
    /// A newly created database gets the full schema.
    pub fn open<P: AsRef<Path>>(path: P, mode: OpenMode) -> Result<Self> {
        let path = path.as_ref();
        let flags = match mode {
            OpenMode::ReadOnly => {
                if !path.exists() {
                    return Err(Error::DatabaseNotFound(path.to_owned()));
                }
                OpenFlags::SQLITE_OPEN_READ_ONLY
            }
            OpenMode::ReadWrite => {
                if !path.exists() {
                    return Err(Error::DatabaseNotFound(path.to_owned()));
                }
                OpenFlags::SQLITE_OPEN_READ_WRITE
            }
            OpenMode::Create => OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        };

        let conn = Connection::open_with_flags(path, flags).map_err(|e| Error::DatabaseOpen {
            path: path.to_owned(),
            source: e,
        })?;
        let db = Self { conn };

        match mode {
            OpenMode::Create => {
                db.configure_pragmas()?;
                if !db.has_schema()? {
                    db.create_schema()?;
                }
            }
            OpenMode::ReadWrite => db.conn.execute_batch("PRAGMA foreign_keys = ON;")?,
            OpenMode::ReadOnly => {}
        }
        db.check_schema_version()?;

        debug!("Opened database at {} ({:?})", path.display(), mode);
        Ok(db)
    }

    /// Create an in-memory database (for testing).
    ///
    /// The database is initialized with the full schema.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.configure_pragmas()?;
        db.create_schema()?;
        debug!("Created in-memory database");
        Ok(db)
    }

    /// Configure SQLite pragmas for optimal performance.
    fn configure_pragmas(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
            "#,
        )?;
        Ok(())
    }

    /// Create the database schema (core + declarations + analysis tables).
    pub fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA_SQL)?;
        self.conn.execute_batch(DECL_SCHEMA_SQL)?;
        self.conn.execute_batch(ANALYSIS_SCHEMA_SQL)?;
        self.conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        debug!("Created database schema (version {SCHEMA_VERSION})");
        Ok(())
    }

    /// Get raw connection (for advanced usage).
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Check if the database has the catalog tables.
    pub fn has_schema(&self) -> Result<bool> {
        let count: i32 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='Packages'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Check if the database has the immutability analysis tables.
    pub fn has_analysis_schema(&self) -> Result<bool> {
        let count: i32 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='MethodChecks'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Schema version recorded in the database file.
    pub fn user_version(&self) -> Result<i32> {
        let version = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;
        Ok(version)
    }

    fn check_schema_version(&self) -> Result<()> {
        let found = self.user_version()?;
        if found != SCHEMA_VERSION {
            return Err(Error::SchemaVersionMismatch {
                expected: SCHEMA_VERSION,
                found,
            });
        }
        Ok(())
    }
}
