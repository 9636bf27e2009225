// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Read query operations for packages, file trees and build steps.

use rusqlite::{OptionalExtension, Row, params};

use crate::connection::StoreDb;
use crate::error::Result;
use crate::types::{
    CompileCommand, FileDescriptor, Linkage, Package, PackageName, PresumedLoc, SourceLocation,
};

fn package_name_from_row(row: &Row<'_>) -> rusqlite::Result<PackageName> {
    Ok(PackageName {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
    })
}

fn package_from_row(row: &Row<'_>) -> rusqlite::Result<Package> {
    Ok(Package {
        id: row.get(0)?,
        package_name_id: row.get(1)?,
        version: row.get(2)?,
    })
}

pub(crate) fn file_from_row(row: &Row<'_>) -> rusqlite::Result<FileDescriptor> {
    Ok(FileDescriptor {
        id: row.get(0)?,
        package_id: row.get(1)?,
        parent_id: row.get(2)?,
        name: row.get(3)?,
        path: row.get(4)?,
    })
}

fn linkage_from_row(row: &Row<'_>) -> rusqlite::Result<Linkage> {
    Ok(Linkage {
        id: row.get(0)?,
        package_id: row.get(1)?,
        file_id: row.get(2)?,
        output_id: row.get(3)?,
    })
}

impl StoreDb {
    /// All package identities, ordered by name.
    pub fn query_package_names(&self) -> Result<Vec<PackageName>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name, slug FROM PackageNames ORDER BY name, id")?;
        let names = stmt
            .query_map([], package_name_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    /// Look up a package identity by its URL slug.
    ///
    /// Returns `None` if no package uses the slug.
    pub fn query_package_name(&self, slug: &str) -> Result<Option<PackageName>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT id, name, slug
            FROM PackageNames
            WHERE slug = ?1
            ORDER BY id
            LIMIT 1
            "#,
        )?;
        Ok(stmt
            .query_row(params![slug], package_name_from_row)
            .optional()?)
    }

    /// All indexed versions of one package identity, ordered by version.
    pub fn query_packages(&self, package_name_id: i64) -> Result<Vec<Package>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT id, packageName, version
            FROM Packages
            WHERE packageName = ?1
            ORDER BY version
            "#,
        )?;
        let packages = stmt
            .query_map(params![package_name_id], package_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(packages)
    }

    /// Every package version, ordered by package name then version.
    pub fn query_all_packages(&self) -> Result<Vec<Package>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT p.id, p.packageName, p.version
            FROM Packages p
            JOIN PackageNames n ON p.packageName = n.id
            ORDER BY n.name, p.version
            "#,
        )?;
        let packages = stmt
            .query_map([], package_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(packages)
    }

    /// Look up one version of a package identity.
    pub fn query_package(&self, package_name_id: i64, version: &str) -> Result<Option<Package>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT id, packageName, version
            FROM Packages
            WHERE packageName = ?1 AND version = ?2
            "#,
        )?;
        Ok(stmt
            .query_row(params![package_name_id, version], package_from_row)
            .optional()?)
    }

    /// Resolve a `(slug, version)` pair to its package identity and version.
    pub fn query_package_by_slug(
        &self,
        slug: &str,
        version: &str,
    ) -> Result<Option<(PackageName, Package)>> {
        let Some(package_name) = self.query_package_name(slug)? else {
            return Ok(None);
        };
        Ok(self
            .query_package(package_name.id, version)?
            .map(|package| (package_name, package)))
    }

    /// Count the number of package versions.
    pub fn count_packages(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM Packages", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Query a file tree node by database ID, regardless of package.
    pub fn query_file(&self, id: i64) -> Result<Option<FileDescriptor>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, package, parent, name, path FROM FileDescriptors WHERE id = ?1",
        )?;
        Ok(stmt.query_row(params![id], file_from_row).optional()?)
    }

    /// Query a file tree node scoped to a package.
    ///
    /// Returns `None` when the node belongs to another package.
    pub fn query_package_file(&self, package_id: i64, id: i64) -> Result<Option<FileDescriptor>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT id, package, parent, name, path
            FROM FileDescriptors
            WHERE id = ?1 AND package = ?2
            "#,
        )?;
        Ok(stmt
            .query_row(params![id, package_id], file_from_row)
            .optional()?)
    }

    /// Query a file tree node by its path within a package.
    pub fn query_file_by_path(&self, package_id: i64, path: &str) -> Result<Option<FileDescriptor>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT id, package, parent, name, path
            FROM FileDescriptors
            WHERE package = ?1 AND path = ?2 AND parent IS NOT NULL
            ORDER BY id
            LIMIT 1
            "#,
        )?;
        Ok(stmt
            .query_row(params![package_id, path], file_from_row)
            .optional()?)
    }

    /// All parentless file nodes of a package.
    ///
    /// A well-formed package has exactly one.
    pub fn query_file_roots(&self, package_id: i64) -> Result<Vec<FileDescriptor>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT id, package, parent, name, path
            FROM FileDescriptors
            WHERE package = ?1 AND parent IS NULL
            ORDER BY id
            "#,
        )?;
        let roots = stmt
            .query_map(params![package_id], file_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(roots)
    }

    /// Direct children of a file tree node, ordered by path.
    pub fn query_file_children(&self, id: i64) -> Result<Vec<FileDescriptor>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT id, package, parent, name, path
            FROM FileDescriptors
            WHERE parent = ?1
            ORDER BY path
            "#,
        )?;
        let children = stmt
            .query_map(params![id], file_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(children)
    }

    /// Count the file tree nodes of a package.
    pub fn count_files(&self, package_id: i64) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM FileDescriptors WHERE package = ?1",
            params![package_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// All compile commands of a package.
    pub fn query_compile_commands(&self, package_id: i64) -> Result<Vec<CompileCommand>> {
        self.compile_commands_where("package = ?1", package_id)
    }

    /// Compile commands whose input is the given file.
    pub fn query_file_compile_commands(&self, file_id: i64) -> Result<Vec<CompileCommand>> {
        self.compile_commands_where("file = ?1", file_id)
    }

    fn compile_commands_where(&self, filter: &str, key: i64) -> Result<Vec<CompileCommand>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            r#"
            SELECT id, package, directory, file, output
            FROM CompileCommands
            WHERE {filter}
            ORDER BY id
            "#
        ))?;
        let mut commands = Vec::new();
        let mut rows = stmt.query(params![key])?;
        while let Some(row) = rows.next()? {
            commands.push(CompileCommand {
                id: row.get(0)?,
                package_id: row.get(1)?,
                directory_id: row.get(2)?,
                file_id: row.get(3)?,
                output_id: row.get(4)?,
                command_line: Vec::new(),
            });
        }

        for command in &mut commands {
            command.command_line = self.query_command_line(command.id)?;
        }
        Ok(commands)
    }

    fn query_command_line(&self, command_id: i64) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT arg
            FROM CompileCommandArgs
            WHERE command = ?1
            ORDER BY position
            "#,
        )?;
        let args = stmt
            .query_map(params![command_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(args)
    }

    /// All link steps of a package.
    pub fn query_linkages(&self, package_id: i64) -> Result<Vec<Linkage>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT id, package, file, output
            FROM Linkages
            WHERE package = ?1
            ORDER BY id
            "#,
        )?;
        let linkages = stmt
            .query_map(params![package_id], linkage_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(linkages)
    }

    /// Link steps producing the given output file.
    pub fn query_output_linkages(&self, output_id: i64) -> Result<Vec<Linkage>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT id, package, file, output
            FROM Linkages
            WHERE output = ?1
            ORDER BY id
            "#,
        )?;
        let linkages = stmt
            .query_map(params![output_id], linkage_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(linkages)
    }

    /// Query a presumed location by database ID.
    pub fn query_presumed_loc(&self, id: i64) -> Result<Option<PresumedLoc>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, file, line, col FROM PresumedLocs WHERE id = ?1")?;
        Ok(stmt
            .query_row(params![id], |row| {
                Ok(PresumedLoc {
                    id: row.get(0)?,
                    file_id: row.get(1)?,
                    line: row.get(2)?,
                    col: row.get(3)?,
                })
            })
            .optional()?)
    }

    /// Join a presumed location with its file and owning package.
    pub fn query_source_location(&self, loc_id: i64) -> Result<Option<SourceLocation>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT l.id, f.id, n.slug, p.version, f.path, l.line, l.col
            FROM PresumedLocs l
            JOIN FileDescriptors f ON l.file = f.id
            JOIN Packages p ON f.package = p.id
            JOIN PackageNames n ON p.packageName = n.id
            WHERE l.id = ?1
            "#,
        )?;
        Ok(stmt
            .query_row(params![loc_id], |row| {
                Ok(SourceLocation {
                    loc_id: row.get(0)?,
                    file_id: row.get(1)?,
                    slug: row.get(2)?,
                    version: row.get(3)?,
                    path: row.get(4)?,
                    line: row.get(5)?,
                    col: row.get(6)?,
                })
            })
            .optional()?)
    }
}
