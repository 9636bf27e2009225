// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Write operations for the catalog database.
//!
//! The catalog is populated by an offline ingestion process; these helpers
//! are what that process and the tests use to register rows.

use rusqlite::{params, params_from_iter};

use crate::connection::StoreDb;
use crate::error::{Error, Result};
use crate::types::{DeclKind, FieldCheck, MethodCheck, MethodCheckResult, RecordCounts};

/// Maximum number of tokens stored per command line.
pub const MAX_COMMAND_LINE_ARGS: usize = 256;

/// Maximum length of a single command line token.
pub const MAX_COMMAND_LINE_ARG_LEN: usize = 256;

/// Parameters for registering a compile command.
#[derive(Debug, Clone, Default)]
pub struct CompileCommandParams {
    pub package_id: i64,
    /// Working directory of the invocation
    pub directory_id: i64,
    pub file_id: i64,
    pub output_id: Option<i64>,
    pub command_line: Vec<String>,
}

/// Parameters for registering a declaration.
#[derive(Debug, Clone)]
pub struct DeclParams {
    pub package_id: i64,
    /// `None` registers the tree root
    pub parent_id: Option<i64>,
    /// Fully qualified name
    pub path: String,
    pub name: String,
    pub presumed_loc_id: Option<i64>,
    pub kind: DeclKind,
}

impl Default for DeclParams {
    fn default() -> Self {
        Self {
            package_id: 0,
            parent_id: None,
            path: String::new(),
            name: String::new(),
            presumed_loc_id: None,
            kind: DeclKind::Unspecified,
        }
    }
}

fn check_command_line(command_line: &[String]) -> Result<()> {
    if command_line.len() > MAX_COMMAND_LINE_ARGS {
        return Err(Error::CommandLineTooLong {
            reason: format!(
                "{} tokens, at most {MAX_COMMAND_LINE_ARGS} allowed",
                command_line.len()
            ),
        });
    }
    if let Some(arg) = command_line
        .iter()
        .find(|arg| arg.chars().count() > MAX_COMMAND_LINE_ARG_LEN)
    {
        return Err(Error::CommandLineTooLong {
            reason: format!(
                "token of {} characters, at most {MAX_COMMAND_LINE_ARG_LEN} allowed",
                arg.chars().count()
            ),
        });
    }
    Ok(())
}

impl StoreDb {
    /// Register a package identity.
    ///
    /// Returns the database ID of the new row.
    pub fn insert_package_name(&self, name: &str, slug: &str) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO PackageNames (name, slug) VALUES (?1, ?2)",
            params![name, slug],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Register a version of a package identity.
    pub fn insert_package(&self, package_name_id: i64, version: &str) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO Packages (packageName, version) VALUES (?1, ?2)",
            params![package_name_id, version],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Register a file tree node. A `parent_id` of `None` registers the root.
    pub fn insert_file(
        &self,
        package_id: i64,
        parent_id: Option<i64>,
        name: &str,
        path: &str,
    ) -> Result<i64> {
        self.conn.execute(
            r#"
            INSERT INTO FileDescriptors (package, parent, name, path)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![package_id, parent_id, name, path],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Register a compile command and its command line tokens.
    pub fn insert_compile_command(&mut self, params: &CompileCommandParams) -> Result<i64> {
        check_command_line(&params.command_line)?;

        let tx = self.conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO CompileCommands (package, directory, file, output)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                params.package_id,
                params.directory_id,
                params.file_id,
                params.output_id,
            ],
        )?;
        let id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO CompileCommandArgs (command, position, arg) VALUES (?1, ?2, ?3)",
            )?;
            for (position, arg) in params.command_line.iter().enumerate() {
                stmt.execute(params![id, position as i64, arg])?;
            }
        }

        tx.commit()?;
        Ok(id)
    }

    /// Register a link step.
    pub fn insert_linkage(&self, package_id: i64, file_id: i64, output_id: i64) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO Linkages (package, file, output) VALUES (?1, ?2, ?3)",
            params![package_id, file_id, output_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Register a presumed source location.
    pub fn insert_presumed_loc(&self, file_id: i64, line: u32, col: u32) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO PresumedLocs (file, line, col) VALUES (?1, ?2, ?3)",
            params![file_id, line, col],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Register a declaration together with its kind payload.
    pub fn insert_decl(&mut self, params: &DeclParams) -> Result<i64> {
        let tx = self.conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO Decls (package, parent, path, name, presumedLoc, kind)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                params.package_id,
                params.parent_id,
                params.path,
                params.name,
                params.presumed_loc_id,
                params.kind.tag(),
            ],
        )?;
        let id = tx.last_insert_rowid();

        match &params.kind {
            DeclKind::Record(record) => {
                tx.execute(
                    "INSERT INTO RecordDecls (decl, isAbstract, isDependent) VALUES (?1, ?2, ?3)",
                    params![id, record.is_abstract, record.is_dependent],
                )?;
            }
            DeclKind::Method(method) => {
                tx.execute(
                    r#"
                    INSERT INTO MethodDecls (decl, isConst, isPure, access, mangledName)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                    params![
                        id,
                        method.is_const,
                        method.is_pure,
                        method.access,
                        method.mangled_name,
                    ],
                )?;
            }
            DeclKind::Field(field) => {
                tx.execute(
                    "INSERT INTO FieldDecls (decl, isMutable, access) VALUES (?1, ?2, ?3)",
                    params![id, field.is_mutable, field.access],
                )?;
            }
            DeclKind::Unspecified | DeclKind::Namespace | DeclKind::Function => {}
        }

        tx.commit()?;
        Ok(id)
    }

    /// Record the immutability classification of a method.
    pub fn insert_method_check(&self, check: &MethodCheck) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT OR REPLACE INTO MethodChecks (method, mutateResult, returnResult)
            VALUES (?1, ?2, ?3)
            "#,
            params![check.method_id, check.mutate_result, check.return_result],
        )?;
        Ok(())
    }

    /// Record the const verdict of a method.
    pub fn insert_method_check_result(&self, result: &MethodCheckResult) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO MethodCheckResults (method, shouldBeConst) VALUES (?1, ?2)",
            params![result.method_id, result.should_be_const],
        )?;
        Ok(())
    }

    /// Record that `method_id` depends on `callee_id`.
    pub fn insert_method_dependence(&self, method_id: i64, callee_id: i64) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO MethodDependencies (method, callee) VALUES (?1, ?2)",
            params![method_id, callee_id],
        )?;
        Ok(())
    }

    /// Record the immutability classification of a field.
    pub fn insert_field_check(&self, check: &FieldCheck) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT OR REPLACE INTO FieldChecks (field, isTransitive, isExplicit)
            VALUES (?1, ?2, ?3)
            "#,
            params![check.field_id, check.is_transitive, check.is_explicit],
        )?;
        Ok(())
    }

    /// Record the aggregate statistics of a record.
    pub fn insert_record_counts(&self, counts: &RecordCounts) -> Result<()> {
        let columns = RecordCounts::COLUMNS;
        let placeholders = (2..=columns.len() + 1)
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT OR REPLACE INTO RecordCounts (record, {}) VALUES (?1, {placeholders})",
            columns.join(", ")
        );

        let values = std::iter::once(counts.record_id)
            .chain(counts.values().into_iter().map(i64::from));
        self.conn.execute(&sql, params_from_iter(values))?;
        Ok(())
    }

    /// Mark a declaration as part of a record's public interface.
    pub fn insert_public_view(&self, record_id: i64, decl_id: Option<i64>) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO PublicViews (record, decl) VALUES (?1, ?2)",
            params![record_id, decl_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Delete a package version.
    ///
    /// This cascades to its files, commands, declarations and analysis rows.
    pub fn delete_package(&self, package_id: i64) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM Packages WHERE id = ?1", params![package_id])?;
        Ok(rows > 0)
    }
}
