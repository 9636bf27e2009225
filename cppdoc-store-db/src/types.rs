// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Database row types for the package catalog.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

/// Implements SQLite conversion for a `#[repr(u8)]` code enumeration.
macro_rules! sql_code_enum {
    ($ty:ty) => {
        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let code = i64::column_result(value)?;
                u8::try_from(code)
                    .ok()
                    .and_then(|c| <$ty>::try_from(c).ok())
                    .ok_or(FromSqlError::OutOfRange(code))
            }
        }

        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(i64::from(u8::from(*self))))
            }
        }
    };
}

/// A package identity (one entry per upstream project).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageName {
    /// Database row ID
    pub id: i64,
    /// Human readable name
    pub name: String,
    /// URL slug, also the key of the permalink table
    pub slug: String,
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One indexed version of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub id: i64,
    pub package_name_id: i64,
    pub version: String,
}

/// A node of a package's file tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub id: i64,
    pub package_id: i64,
    /// `None` for the tree root
    pub parent_id: Option<i64>,
    pub name: String,
    /// Path relative to the package source root
    pub path: String,
}

impl FileDescriptor {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl fmt::Display for FileDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("Files")
        } else {
            f.write_str(&self.path)
        }
    }
}

/// A compiler invocation recorded for one translation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileCommand {
    pub id: i64,
    pub package_id: i64,
    /// Working directory of the invocation
    pub directory_id: i64,
    pub file_id: i64,
    pub output_id: Option<i64>,
    /// Command line tokens, in order
    pub command_line: Vec<String>,
}

impl fmt::Display for CompileCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line.join(" "))
    }
}

/// A link step from an input file to an output artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linkage {
    pub id: i64,
    pub package_id: i64,
    pub file_id: i64,
    pub output_id: i64,
}

/// A compiler-reported source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresumedLoc {
    pub id: i64,
    pub file_id: i64,
    pub line: u32,
    pub col: u32,
}

/// A presumed location joined with everything needed to build a permalink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub loc_id: i64,
    pub file_id: i64,
    pub slug: String,
    pub version: String,
    pub path: String,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.line, self.col)
    }
}

/// C++ member access level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Access {
    Public = 0,
    Protected = 1,
    Private = 2,
    None = 3,
}

sql_code_enum!(Access);

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Access::Public => "Public",
            Access::Protected => "Protected",
            Access::Private => "Private",
            Access::None => "None",
        })
    }
}

/// Payload of a record (class/struct/union) declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDecl {
    pub is_abstract: bool,
    pub is_dependent: bool,
}

/// Payload of a method declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub is_const: bool,
    pub is_pure: bool,
    pub access: Access,
    pub mangled_name: String,
}

/// Payload of a field declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub is_mutable: bool,
    pub access: Access,
}

/// Stored tag of a declaration kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum DeclKindTag {
    Unspecified = 0,
    Namespace = 1,
    Record = 2,
    Method = 3,
    Field = 4,
    Function = 5,
}

sql_code_enum!(DeclKindTag);

/// What a declaration is, with the attributes only that kind carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
    /// Tree root or a context the front end did not classify
    Unspecified,
    Namespace,
    Record(RecordDecl),
    Method(MethodDecl),
    Field(FieldDecl),
    Function,
}

impl DeclKind {
    pub fn tag(&self) -> DeclKindTag {
        match self {
            DeclKind::Unspecified => DeclKindTag::Unspecified,
            DeclKind::Namespace => DeclKindTag::Namespace,
            DeclKind::Record(_) => DeclKindTag::Record,
            DeclKind::Method(_) => DeclKindTag::Method,
            DeclKind::Field(_) => DeclKindTag::Field,
            DeclKind::Function => DeclKindTag::Function,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeclKind::Unspecified => "Declaration",
            DeclKind::Namespace => "Namespace",
            DeclKind::Record(_) => "Record",
            DeclKind::Method(_) => "Method",
            DeclKind::Field(_) => "Field",
            DeclKind::Function => "Function",
        }
    }
}

/// A node of a package's declaration tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decl {
    pub id: i64,
    pub package_id: i64,
    /// `None` for the tree root
    pub parent_id: Option<i64>,
    /// Fully qualified name, used for ordering
    pub path: String,
    pub name: String,
    pub presumed_loc_id: Option<i64>,
    pub kind: DeclKind,
}

impl Decl {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Short name shown in listings and breadcrumbs.
    pub fn display_name(&self) -> &str {
        if self.is_root() {
            "Declarations"
        } else if self.name.is_empty() {
            "(anonymous)"
        } else {
            &self.name
        }
    }
}

impl fmt::Display for Decl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("Declarations")
        } else {
            f.write_str(&self.path)
        }
    }
}

/// Whether a method may mutate object state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum MutateResult {
    No = 1,
    Maybe = 2,
}

sql_code_enum!(MutateResult);

impl fmt::Display for MutateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MutateResult::No => "No",
            MutateResult::Maybe => "Maybe",
        })
    }
}

/// What a method's return value exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ReturnResult {
    Noop = 1,
    FieldTransitive = 2,
    FieldNonTransitive = 3,
    Other = 4,
}

sql_code_enum!(ReturnResult);

impl fmt::Display for ReturnResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReturnResult::Noop => "Noop",
            ReturnResult::FieldTransitive => "Field (Transitive)",
            ReturnResult::FieldNonTransitive => "Field (Non-transitive)",
            ReturnResult::Other => "Other",
        })
    }
}

/// Immutability classification of one method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodCheck {
    pub method_id: i64,
    pub mutate_result: MutateResult,
    pub return_result: ReturnResult,
}

/// Final const verdict of one method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodCheckResult {
    pub method_id: i64,
    pub should_be_const: bool,
}

/// Immutability classification of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldCheck {
    pub field_id: i64,
    pub is_transitive: bool,
    pub is_explicit: bool,
}

macro_rules! record_counts {
    ($($field:ident => $column:literal,)*) => {
        /// Precomputed immutability statistics for one record.
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct RecordCounts {
            pub record_id: i64,
            $(pub $field: u32,)*
        }

        impl RecordCounts {
            pub(crate) const COLUMNS: &'static [&'static str] = &[$($column),*];

            pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
                Ok(Self {
                    record_id: row.get("record")?,
                    $($field: row.get($column)?,)*
                })
            }

            /// Counter values in schema column order.
            pub(crate) fn values(&self) -> Vec<u32> {
                vec![$(self.$field),*]
            }

            /// `(counter name, value)` pairs in schema column order.
            pub fn entries(&self) -> Vec<(&'static str, u32)> {
                vec![$((stringify!($field), self.$field)),*]
            }
        }
    };
}

record_counts! {
    num_methods => "numMethods",
    num_mutable_methods => "numMutableMethods",
    num_mutable_no_easy => "numMutableNoEasy",
    num_mutable_no_easy_non_stub => "numMutableNoEasyNonStub",
    num_mutable_no_odd => "numMutableNoOdd",
    num_mutable_maybe => "numMutableMaybe",
    num_mutable_no_ret_noop => "numMutableNoRetNoop",
    num_mutable_no_ret_field_t => "numMutableNoRetFieldT",
    num_mutable_no_ret_field_nt => "numMutableNoRetFieldNt",
    num_mutable_no_ret_other => "numMutableNoRetOther",
    num_mutable_maybe_ret_noop => "numMutableMaybeRetNoop",
    num_mutable_maybe_ret_field_t => "numMutableMaybeRetFieldT",
    num_mutable_maybe_ret_field_nt => "numMutableMaybeRetFieldNt",
    num_mutable_maybe_ret_other => "numMutableMaybeRetOther",
    num_const_methods => "numConstMethods",
    num_const_no_easy => "numConstNoEasy",
    num_const_no_odd => "numConstNoOdd",
    num_const_maybe => "numConstMaybe",
    num_const_no_ret_noop => "numConstNoRetNoop",
    num_const_no_ret_field_t => "numConstNoRetFieldT",
    num_const_no_ret_field_nt => "numConstNoRetFieldNt",
    num_const_no_ret_other => "numConstNoRetOther",
    num_const_maybe_ret_noop => "numConstMaybeRetNoop",
    num_const_maybe_ret_field_t => "numConstMaybeRetFieldT",
    num_const_maybe_ret_field_nt => "numConstMaybeRetFieldNt",
    num_const_maybe_ret_other => "numConstMaybeRetOther",
    num_fields => "numFields",
    num_mutable_fields => "numMutableFields",
    num_explicit_fields => "numExplicitFields",
    num_transitive_fields => "numTransitiveFields",
    num_only_explicit_fields => "numOnlyExplicitFields",
    num_only_transitive_fields => "numOnlyTransitiveFields",
    num_neither_explicit_transitive_fields => "numNeitherExplicitTransitiveFields",
    num_both_explicit_transitive_fields => "numBothExplicitTransitiveFields",
}
