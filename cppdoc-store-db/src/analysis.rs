// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Read queries for immutability analysis results.

use rusqlite::{OptionalExtension, params};

use crate::connection::StoreDb;
use crate::decls::{decl_from_row, decl_select};
use crate::error::Result;
use crate::types::{Decl, DeclKindTag, FieldCheck, MethodCheck, MethodCheckResult, RecordCounts};

impl StoreDb {
    /// Immutability classification of a method.
    pub fn query_method_check(&self, method_id: i64) -> Result<Option<MethodCheck>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT method, mutateResult, returnResult FROM MethodChecks WHERE method = ?1",
        )?;
        Ok(stmt
            .query_row(params![method_id], |row| {
                Ok(MethodCheck {
                    method_id: row.get(0)?,
                    mutate_result: row.get(1)?,
                    return_result: row.get(2)?,
                })
            })
            .optional()?)
    }

    /// Final const verdict of a method.
    pub fn query_method_check_result(&self, method_id: i64) -> Result<Option<MethodCheckResult>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT method, shouldBeConst FROM MethodCheckResults WHERE method = ?1",
        )?;
        Ok(stmt
            .query_row(params![method_id], |row| {
                Ok(MethodCheckResult {
                    method_id: row.get(0)?,
                    should_be_const: row.get(1)?,
                })
            })
            .optional()?)
    }

    /// Immutability classification of a field.
    pub fn query_field_check(&self, field_id: i64) -> Result<Option<FieldCheck>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT field, isTransitive, isExplicit FROM FieldChecks WHERE field = ?1",
        )?;
        Ok(stmt
            .query_row(params![field_id], |row| {
                Ok(FieldCheck {
                    field_id: row.get(0)?,
                    is_transitive: row.get(1)?,
                    is_explicit: row.get(2)?,
                })
            })
            .optional()?)
    }

    /// Methods the given method depends on, ordered by path.
    pub fn query_method_callees(&self, method_id: i64) -> Result<Vec<Decl>> {
        let mut stmt = self.conn.prepare_cached(concat!(
            decl_select!(),
            "JOIN MethodDependencies dep ON dep.callee = d.id WHERE dep.method = ?1 ORDER BY d.path"
        ))?;
        let callees = stmt
            .query_map(params![method_id], decl_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(callees)
    }

    /// Methods that depend on the given method, ordered by path.
    pub fn query_method_callers(&self, method_id: i64) -> Result<Vec<Decl>> {
        let mut stmt = self.conn.prepare_cached(concat!(
            decl_select!(),
            "JOIN MethodDependencies dep ON dep.method = d.id WHERE dep.callee = ?1 ORDER BY d.path"
        ))?;
        let callers = stmt
            .query_map(params![method_id], decl_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(callers)
    }

    /// Aggregate statistics of a record.
    pub fn query_record_counts(&self, record_id: i64) -> Result<Option<RecordCounts>> {
        let sql = format!(
            "SELECT record, {} FROM RecordCounts WHERE record = ?1",
            RecordCounts::COLUMNS.join(", ")
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        Ok(stmt
            .query_row(params![record_id], RecordCounts::from_row)
            .optional()?)
    }

    /// Methods in a record's public interface, ordered by path.
    pub fn query_public_view_methods(&self, record_id: i64) -> Result<Vec<Decl>> {
        self.public_view_of_kind(record_id, DeclKindTag::Method)
    }

    /// Fields in a record's public interface, ordered by path.
    pub fn query_public_view_fields(&self, record_id: i64) -> Result<Vec<Decl>> {
        self.public_view_of_kind(record_id, DeclKindTag::Field)
    }

    fn public_view_of_kind(&self, record_id: i64, kind: DeclKindTag) -> Result<Vec<Decl>> {
        let mut stmt = self.conn.prepare_cached(concat!(
            decl_select!(),
            "JOIN PublicViews v ON v.decl = d.id WHERE v.record = ?1 AND d.kind = ?2 ORDER BY d.path"
        ))?;
        let decls = stmt
            .query_map(params![record_id, kind], decl_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(decls)
    }
}
