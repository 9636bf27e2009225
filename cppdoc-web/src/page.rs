//! Data gathered for each page family.
//!
//! Every lookup is scoped to the package named in the URL: an unknown slug,
//! version or node id, or a node id that belongs to another package, is
//! reported as [`CatalogError::NotFound`].

use cppdoc_permalink::Resolver;
use cppdoc_store_db::{
    CompileCommand, Decl, DeclKind, DeclKindTag, FieldCheck, FileDescriptor, Linkage,
    MethodCheck, MethodCheckResult, Package, PackageName, RecordCounts, SourceLocation, StoreDb,
    TreeContext,
};
use url::Url;

use crate::error::{CatalogError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageVersions {
    pub name: PackageName,
    pub packages: Vec<Package>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDetail {
    pub name: PackageName,
    pub package: Package,
    pub file_count: u64,
    pub decl_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePage {
    pub name: PackageName,
    pub package: Package,
    pub tree: TreeContext<FileDescriptor>,
    pub children: Vec<FileDescriptor>,
    /// Commands compiling this file
    pub compile_commands: Vec<CompileCommand>,
    /// Link steps producing this file, with their input when known
    pub linkages: Vec<(Linkage, Option<FileDescriptor>)>,
    /// Declarations located in this file
    pub decls: Vec<Decl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclPage {
    pub name: PackageName,
    pub package: Package,
    pub tree: TreeContext<Decl>,
    pub namespaces: Vec<Decl>,
    pub records: Vec<Decl>,
    pub methods: Vec<Decl>,
    pub fields: Vec<Decl>,
    /// Children of any other kind
    pub others: Vec<Decl>,
    pub location: Option<SourceLocation>,
    pub permalink: Option<Url>,
    pub analysis: DeclAnalysis,
}

/// Immutability analysis of the shown declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclAnalysis {
    None,
    Method {
        check: Option<MethodCheck>,
        result: Option<MethodCheckResult>,
        callees: Vec<Decl>,
        callers: Vec<Decl>,
    },
    Field {
        check: Option<FieldCheck>,
    },
    Record {
        counts: Option<RecordCounts>,
        public_methods: Vec<Decl>,
        public_fields: Vec<Decl>,
    },
}

/// All package identities.
pub fn package_names(db: &StoreDb) -> Result<Vec<PackageName>> {
    Ok(db.query_package_names()?)
}

/// The versions of the package identity `slug`.
pub fn package_versions(db: &StoreDb, slug: &str) -> Result<PackageVersions> {
    let name = db
        .query_package_name(slug)?
        .ok_or_else(|| CatalogError::not_found(format!("package {slug}")))?;
    let packages = db.query_packages(name.id)?;
    Ok(PackageVersions { name, packages })
}

fn resolve_package(db: &StoreDb, slug: &str, version: &str) -> Result<(PackageName, Package)> {
    db.query_package_by_slug(slug, version)?
        .ok_or_else(|| CatalogError::not_found(format!("package {slug} {version}")))
}

pub fn package_detail(db: &StoreDb, slug: &str, version: &str) -> Result<PackageDetail> {
    let (name, package) = resolve_package(db, slug, version)?;
    Ok(PackageDetail {
        file_count: db.count_files(package.id)?,
        decl_count: db.count_decls(package.id)?,
        name,
        package,
    })
}

/// A node of the file tree; `None` shows the root.
pub fn file_page(db: &StoreDb, slug: &str, version: &str, id: Option<i64>) -> Result<FilePage> {
    let (name, package) = resolve_package(db, slug, version)?;
    let node = match id {
        Some(id) => Some(
            db.query_package_file(package.id, id)?
                .ok_or_else(|| CatalogError::not_found(format!("file {id}")))?,
        ),
        None => None,
    };
    let tree = TreeContext::build(db, package.id, node)?;

    let node_id = tree.node.id;
    let mut linkages = Vec::new();
    for linkage in db.query_output_linkages(node_id)? {
        let input = db.query_file(linkage.file_id)?;
        linkages.push((linkage, input));
    }

    Ok(FilePage {
        children: db.query_file_children(node_id)?,
        compile_commands: db.query_file_compile_commands(node_id)?,
        linkages,
        decls: db.query_file_decls(node_id)?,
        name,
        package,
        tree,
    })
}

/// A node of the declaration tree; `None` shows the root.
pub fn decl_page(
    db: &StoreDb,
    resolver: &Resolver,
    slug: &str,
    version: &str,
    id: Option<i64>,
) -> Result<DeclPage> {
    let (name, package) = resolve_package(db, slug, version)?;
    let node = match id {
        Some(id) => Some(
            db.query_package_decl(package.id, id)?
                .ok_or_else(|| CatalogError::not_found(format!("declaration {id}")))?,
        ),
        None => None,
    };
    let tree = TreeContext::build(db, package.id, node)?;
    let decl = &tree.node;

    let others = db
        .query_decl_children(decl.id)?
        .into_iter()
        .filter(|child| {
            !matches!(
                child.kind.tag(),
                DeclKindTag::Namespace
                    | DeclKindTag::Record
                    | DeclKindTag::Method
                    | DeclKindTag::Field
            )
        })
        .collect();

    let location = match decl.presumed_loc_id {
        Some(loc_id) => db.query_source_location(loc_id)?,
        None => None,
    };
    let permalink = location
        .as_ref()
        .and_then(|loc| resolver.resolve(&loc.slug, &loc.version, &loc.path, loc.line));

    let analysis = match decl.kind {
        DeclKind::Method(_) => DeclAnalysis::Method {
            check: db.query_method_check(decl.id)?,
            result: db.query_method_check_result(decl.id)?,
            callees: db.query_method_callees(decl.id)?,
            callers: db.query_method_callers(decl.id)?,
        },
        DeclKind::Field(_) => DeclAnalysis::Field {
            check: db.query_field_check(decl.id)?,
        },
        DeclKind::Record(_) => DeclAnalysis::Record {
            counts: db.query_record_counts(decl.id)?,
            public_methods: db.query_public_view_methods(decl.id)?,
            public_fields: db.query_public_view_fields(decl.id)?,
        },
        DeclKind::Unspecified | DeclKind::Namespace | DeclKind::Function => DeclAnalysis::None,
    };

    Ok(DeclPage {
        namespaces: db.query_namespaces(decl.id)?,
        records: db.query_records(decl.id)?,
        methods: db.query_methods(decl.id)?,
        fields: db.query_fields(decl.id)?,
        others,
        location,
        permalink,
        analysis,
        name,
        package,
        tree,
    })
}
