// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Read query operations for the declaration tree.

use rusqlite::{OptionalExtension, Row, params};

use crate::connection::StoreDb;
use crate::error::Result;
use crate::types::{Decl, DeclKind, DeclKindTag, FieldDecl, MethodDecl, RecordDecl};

/// Declaration columns joined with every kind payload table.
macro_rules! decl_select {
    () => {
        r#"
        SELECT d.id, d.package, d.parent, d.path, d.name, d.presumedLoc, d.kind,
               r.isAbstract, r.isDependent,
               m.isConst, m.isPure, m.access, m.mangledName,
               f.isMutable, f.access
        FROM Decls d
        LEFT JOIN RecordDecls r ON r.decl = d.id
        LEFT JOIN MethodDecls m ON m.decl = d.id
        LEFT JOIN FieldDecls f ON f.decl = d.id
        "#
    };
}
pub(crate) use decl_select;

/// Build a [`Decl`] from a row of [`decl_select!`].
///
/// A kind whose payload row is missing fails the conversion.
pub(crate) fn decl_from_row(row: &Row<'_>) -> rusqlite::Result<Decl> {
    let kind = match row.get::<_, DeclKindTag>(6)? {
        DeclKindTag::Unspecified => DeclKind::Unspecified,
        DeclKindTag::Namespace => DeclKind::Namespace,
        DeclKindTag::Record => DeclKind::Record(RecordDecl {
            is_abstract: row.get(7)?,
            is_dependent: row.get(8)?,
        }),
        DeclKindTag::Method => DeclKind::Method(MethodDecl {
            is_const: row.get(9)?,
            is_pure: row.get(10)?,
            access: row.get(11)?,
            mangled_name: row.get(12)?,
        }),
        DeclKindTag::Field => DeclKind::Field(FieldDecl {
            is_mutable: row.get(13)?,
            access: row.get(14)?,
        }),
        DeclKindTag::Function => DeclKind::Function,
    };

    Ok(Decl {
        id: row.get(0)?,
        package_id: row.get(1)?,
        parent_id: row.get(2)?,
        path: row.get(3)?,
        name: row.get(4)?,
        presumed_loc_id: row.get(5)?,
        kind,
    })
}

impl StoreDb {
    /// Query a declaration by database ID, regardless of package.
    pub fn query_decl(&self, id: i64) -> Result<Option<Decl>> {
        let mut stmt = self
            .conn
            .prepare_cached(concat!(decl_select!(), "WHERE d.id = ?1"))?;
        Ok(stmt.query_row(params![id], decl_from_row).optional()?)
    }

    /// Query a declaration scoped to a package.
    ///
    /// Returns `None` when the declaration belongs to another package.
    pub fn query_package_decl(&self, package_id: i64, id: i64) -> Result<Option<Decl>> {
        let mut stmt = self
            .conn
            .prepare_cached(concat!(decl_select!(), "WHERE d.id = ?1 AND d.package = ?2"))?;
        Ok(stmt
            .query_row(params![id, package_id], decl_from_row)
            .optional()?)
    }

    /// Query a declaration by its fully qualified path within a package.
    pub fn query_decl_by_path(&self, package_id: i64, path: &str) -> Result<Option<Decl>> {
        let mut stmt = self
            .conn
            .prepare_cached(concat!(decl_select!(), "WHERE d.package = ?1 AND d.path = ?2"))?;
        Ok(stmt
            .query_row(params![package_id, path], decl_from_row)
            .optional()?)
    }

    /// All parentless declarations of a package.
    ///
    /// A well-formed package has exactly one.
    pub fn query_decl_roots(&self, package_id: i64) -> Result<Vec<Decl>> {
        let mut stmt = self.conn.prepare_cached(concat!(
            decl_select!(),
            "WHERE d.package = ?1 AND d.parent IS NULL ORDER BY d.id"
        ))?;
        let roots = stmt
            .query_map(params![package_id], decl_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(roots)
    }

    /// Direct children of a declaration, ordered by path.
    pub fn query_decl_children(&self, id: i64) -> Result<Vec<Decl>> {
        let mut stmt = self
            .conn
            .prepare_cached(concat!(decl_select!(), "WHERE d.parent = ?1 ORDER BY d.path"))?;
        let children = stmt
            .query_map(params![id], decl_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(children)
    }

    /// Direct children of a declaration with the given kind, ordered by path.
    pub fn query_decl_children_of_kind(&self, id: i64, kind: DeclKindTag) -> Result<Vec<Decl>> {
        let mut stmt = self.conn.prepare_cached(concat!(
            decl_select!(),
            "WHERE d.parent = ?1 AND d.kind = ?2 ORDER BY d.path"
        ))?;
        let children = stmt
            .query_map(params![id, kind], decl_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(children)
    }

    /// Namespaces declared directly inside a declaration.
    pub fn query_namespaces(&self, id: i64) -> Result<Vec<Decl>> {
        self.query_decl_children_of_kind(id, DeclKindTag::Namespace)
    }

    /// Records declared directly inside a declaration.
    pub fn query_records(&self, id: i64) -> Result<Vec<Decl>> {
        self.query_decl_children_of_kind(id, DeclKindTag::Record)
    }

    /// Methods declared directly inside a declaration.
    pub fn query_methods(&self, id: i64) -> Result<Vec<Decl>> {
        self.query_decl_children_of_kind(id, DeclKindTag::Method)
    }

    /// Fields declared directly inside a declaration.
    pub fn query_fields(&self, id: i64) -> Result<Vec<Decl>> {
        self.query_decl_children_of_kind(id, DeclKindTag::Field)
    }

    /// Declarations whose presumed location is in the given file.
    pub fn query_file_decls(&self, file_id: i64) -> Result<Vec<Decl>> {
        let mut stmt = self.conn.prepare_cached(concat!(
            decl_select!(),
            "JOIN PresumedLocs l ON d.presumedLoc = l.id WHERE l.file = ?1 ORDER BY l.line, l.col, d.path"
        ))?;
        let decls = stmt
            .query_map(params![file_id], decl_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(decls)
    }

    /// Count the declarations of a package.
    pub fn count_decls(&self, package_id: i64) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM Decls WHERE package = ?1",
            params![package_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
