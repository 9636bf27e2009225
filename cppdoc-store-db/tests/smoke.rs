// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Smoke tests for cppdoc-store-db.
//!
//! These tests verify the schema and basic operations work correctly
//! using an in-memory database.

use cppdoc_store_db::{
    Access, CompileCommandParams, Decl, DeclKind, DeclKindTag, DeclParams, Error, FieldCheck,
    FieldDecl, FileDescriptor, MethodCheck, MethodCheckResult, MethodDecl, MutateResult, OpenMode,
    RecordCounts, RecordDecl, ReturnResult, SCHEMA_VERSION, StoreDb, TreeContext,
};
use rstest::rstest;

/// Ids of the rows registered by [`sample`].
struct Sample {
    package: i64,
    other_package: i64,
    src: i64,
    build_cc: i64,
    other_file: i64,
    ns: i64,
    record: i64,
    method: i64,
    helper: i64,
    field: i64,
    other_decl: i64,
}

fn method_kind(name: &str, is_const: bool) -> DeclKind {
    DeclKind::Method(MethodDecl {
        is_const,
        is_pure: false,
        access: Access::Public,
        mangled_name: format!("_ZN5ninja5State{}{name}Ev", name.len()),
    })
}

/// A ninja 1.7.2 package with a small file and declaration tree, plus a
/// second package that owns one file and one decl.
fn sample() -> (StoreDb, Sample) {
    let mut db = StoreDb::open_memory().unwrap();

    let ninja = db.insert_package_name("Ninja", "ninja").unwrap();
    let package = db.insert_package(ninja, "1.7.2").unwrap();

    let root = db.insert_file(package, None, "", "").unwrap();
    let src = db.insert_file(package, Some(root), "src", "src").unwrap();
    let build_cc = db
        .insert_file(package, Some(src), "build.cc", "src/build.cc")
        .unwrap();
    let state_h = db
        .insert_file(package, Some(src), "state.h", "src/state.h")
        .unwrap();
    let build_o = db
        .insert_file(package, Some(root), "build.o", "build.o")
        .unwrap();

    db.insert_compile_command(&CompileCommandParams {
        package_id: package,
        directory_id: root,
        file_id: build_cc,
        output_id: Some(build_o),
        command_line: ["c++", "-c", "src/build.cc", "-o", "build.o"]
            .map(String::from)
            .to_vec(),
    })
    .unwrap();
    db.insert_linkage(package, build_o, build_o).unwrap();

    let loc = db.insert_presumed_loc(state_h, 42, 7).unwrap();

    let decl_root = db
        .insert_decl(&DeclParams {
            package_id: package,
            ..Default::default()
        })
        .unwrap();
    let ns = db
        .insert_decl(&DeclParams {
            package_id: package,
            parent_id: Some(decl_root),
            path: "ninja".into(),
            name: "ninja".into(),
            kind: DeclKind::Namespace,
            ..Default::default()
        })
        .unwrap();
    let record = db
        .insert_decl(&DeclParams {
            package_id: package,
            parent_id: Some(ns),
            path: "ninja::State".into(),
            name: "State".into(),
            presumed_loc_id: Some(loc),
            kind: DeclKind::Record(RecordDecl {
                is_abstract: false,
                is_dependent: false,
            }),
        })
        .unwrap();
    let method = db
        .insert_decl(&DeclParams {
            package_id: package,
            parent_id: Some(record),
            path: "ninja::State::Reset".into(),
            name: "Reset".into(),
            kind: method_kind("Reset", false),
            ..Default::default()
        })
        .unwrap();
    let helper = db
        .insert_decl(&DeclParams {
            package_id: package,
            parent_id: Some(record),
            path: "ninja::State::Dump".into(),
            name: "Dump".into(),
            kind: method_kind("Dump", true),
            ..Default::default()
        })
        .unwrap();
    let field = db
        .insert_decl(&DeclParams {
            package_id: package,
            parent_id: Some(record),
            path: "ninja::State::paths_".into(),
            name: "paths_".into(),
            kind: DeclKind::Field(FieldDecl {
                is_mutable: false,
                access: Access::Private,
            }),
            ..Default::default()
        })
        .unwrap();

    let mosh = db.insert_package_name("Mosh", "mosh").unwrap();
    let other_package = db.insert_package(mosh, "1.3.2").unwrap();
    let other_root = db.insert_file(other_package, None, "", "").unwrap();
    let other_file = db
        .insert_file(other_package, Some(other_root), "src", "src")
        .unwrap();
    let other_decl_root = db
        .insert_decl(&DeclParams {
            package_id: other_package,
            ..Default::default()
        })
        .unwrap();
    let other_decl = db
        .insert_decl(&DeclParams {
            package_id: other_package,
            parent_id: Some(other_decl_root),
            path: "Network".into(),
            name: "Network".into(),
            kind: DeclKind::Namespace,
            ..Default::default()
        })
        .unwrap();

    (
        db,
        Sample {
            package,
            other_package,
            src,
            build_cc,
            other_file,
            ns,
            record,
            method,
            helper,
            field,
            other_decl,
        },
    )
}

fn names(decls: &[Decl]) -> Vec<&str> {
    decls.iter().map(|d| d.name.as_str()).collect()
}

/// Verify schema creation and empty queries work.
#[test]
fn test_schema_creation() {
    let db = StoreDb::open_memory().unwrap();
    assert!(db.has_schema().unwrap());
    assert!(db.has_analysis_schema().unwrap());
    assert_eq!(db.user_version().unwrap(), SCHEMA_VERSION);
    assert_eq!(db.count_packages().unwrap(), 0);
    assert!(db.query_package_names().unwrap().is_empty());
}

/// Verify an on-disk database can be reopened read-only.
#[test]
fn test_reopen_readonly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.sqlite3");

    {
        let db = StoreDb::open(&path, OpenMode::Create).unwrap();
        let name = db.insert_package_name("Ninja", "ninja").unwrap();
        db.insert_package(name, "1.7.2").unwrap();
    }

    let db = StoreDb::open_readonly(&path).unwrap();
    let (name, package) = db.query_package_by_slug("ninja", "1.7.2").unwrap().unwrap();
    assert_eq!(name.name, "Ninja");
    assert_eq!(package.version, "1.7.2");

    assert!(matches!(
        StoreDb::open_readonly(dir.path().join("missing.sqlite3")),
        Err(Error::DatabaseNotFound(_))
    ));
}

/// Verify read-only opens address the exact file even with URI syntax in its path.
#[rstest]
#[case::query("what?mode=rw")]
#[case::fragment("issue#12")]
#[case::percent("100%25")]
#[case::space("my catalogs")]
fn test_reopen_readonly_odd_path(#[case] dir_name: &str) {
    let dir = tempfile::tempdir().unwrap();
    let parent = dir.path().join(dir_name);
    std::fs::create_dir(&parent).unwrap();
    let path = parent.join("catalog.sqlite3");

    {
        let db = StoreDb::open(&path, OpenMode::Create).unwrap();
        let name = db.insert_package_name("Mosh", "mosh").unwrap();
        db.insert_package(name, "1.3.2").unwrap();
    }

    let db = StoreDb::open_readonly(&path).unwrap();
    assert!(db.query_package_by_slug("mosh", "1.3.2").unwrap().is_some());
}

/// Verify package listings are ordered by name and version.
#[test]
fn test_package_listing_order() {
    let db = StoreDb::open_memory().unwrap();
    let protobuf = db.insert_package_name("protobuf", "protobuf").unwrap();
    let bitcoin = db.insert_package_name("bitcoin", "bitcoin").unwrap();
    db.insert_package(protobuf, "3.3.0").unwrap();
    db.insert_package(bitcoin, "0.15.1").unwrap();
    db.insert_package(bitcoin, "0.14.2").unwrap();

    let names: Vec<_> = db
        .query_package_names()
        .unwrap()
        .into_iter()
        .map(|n| n.slug)
        .collect();
    assert_eq!(names, vec!["bitcoin", "protobuf"]);

    let versions: Vec<_> = db
        .query_packages(bitcoin)
        .unwrap()
        .into_iter()
        .map(|p| p.version)
        .collect();
    assert_eq!(versions, vec!["0.14.2", "0.15.1"]);

    let all: Vec<_> = db
        .query_all_packages()
        .unwrap()
        .into_iter()
        .map(|p| p.version)
        .collect();
    assert_eq!(all, vec!["0.14.2", "0.15.1", "3.3.0"]);

    // (name, version) is unique
    assert!(db.insert_package(bitcoin, "0.14.2").is_err());
}

/// Verify file tree lookups are scoped to their package.
#[test]
fn test_file_tree() {
    let (db, s) = sample();

    let children = db.query_file_children(s.src).unwrap();
    let paths: Vec<_> = children.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["src/build.cc", "src/state.h"]);

    assert!(db.query_package_file(s.package, s.build_cc).unwrap().is_some());
    assert!(db.query_package_file(s.other_package, s.build_cc).unwrap().is_none());
    assert!(db.query_package_file(s.package, s.other_file).unwrap().is_none());

    let found = db.query_file_by_path(s.package, "src/build.cc").unwrap().unwrap();
    assert_eq!(found.id, s.build_cc);
    assert_eq!(db.count_files(s.package).unwrap(), 5);

    // siblings must have distinct names
    assert!(db.insert_file(s.package, Some(s.src), "build.cc", "dup").is_err());
}

/// Verify the file breadcrumb of a nested node.
#[test]
fn test_file_tree_context() {
    let (db, s) = sample();

    let node = db.query_file(s.build_cc).unwrap();
    let ctx: TreeContext<FileDescriptor> = TreeContext::build(&db, s.package, node).unwrap();
    assert_eq!(ctx.root.to_string(), "Files");
    let crumbs: Vec<_> = ctx.ancestors.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(crumbs, vec!["src"]);

    let ctx: TreeContext<FileDescriptor> = TreeContext::build(&db, s.package, None).unwrap();
    assert!(ctx.node.is_root());
    assert!(ctx.ancestors.is_empty());
}

/// Verify a package with zero or two roots has no tree context.
#[test]
fn test_tree_requires_single_root() {
    let (db, s) = sample();
    let name = db.insert_package_name("Fish", "fish").unwrap();
    let rootless = db.insert_package(name, "2.6.0").unwrap();
    assert!(matches!(
        TreeContext::<Decl>::build(&db, rootless, None),
        Err(Error::MissingRoot { found: 0, .. })
    ));

    db.insert_file(s.package, None, "second", "").unwrap();
    assert!(matches!(
        TreeContext::<FileDescriptor>::build(&db, s.package, None),
        Err(Error::MissingRoot { found: 2, .. })
    ));
}

/// Verify compile commands keep their token order.
#[test]
fn test_compile_commands() {
    let (mut db, s) = sample();

    let commands = db.query_file_compile_commands(s.build_cc).unwrap();
    assert_eq!(commands.len(), 1);
    assert_eq!(
        commands[0].command_line,
        vec!["c++", "-c", "src/build.cc", "-o", "build.o"]
    );
    assert_eq!(commands[0].to_string(), "c++ -c src/build.cc -o build.o");
    assert_eq!(db.query_compile_commands(s.package).unwrap(), commands);

    let too_long = CompileCommandParams {
        package_id: s.package,
        directory_id: s.src,
        file_id: s.src,
        command_line: vec!["-DX".into(); 257],
        ..Default::default()
    };
    assert!(matches!(
        db.insert_compile_command(&too_long),
        Err(Error::CommandLineTooLong { .. })
    ));
    assert_eq!(db.query_file_compile_commands(s.src).unwrap().len(), 0);
}

/// Verify declarations come back with their kind payload.
#[test]
fn test_decl_kinds() {
    let (db, s) = sample();

    let record = db.query_package_decl(s.package, s.record).unwrap().unwrap();
    assert_eq!(
        record.kind,
        DeclKind::Record(RecordDecl {
            is_abstract: false,
            is_dependent: false,
        })
    );
    assert_eq!(record.to_string(), "ninja::State");

    let field = db.query_decl(s.field).unwrap().unwrap();
    match field.kind {
        DeclKind::Field(FieldDecl { is_mutable, access }) => {
            assert!(!is_mutable);
            assert_eq!(access, Access::Private);
        }
        other => panic!("expected a field, got {other:?}"),
    }

    let dump = db.query_decl_by_path(s.package, "ninja::State::Dump").unwrap().unwrap();
    assert!(matches!(dump.kind, DeclKind::Method(MethodDecl { is_const: true, .. })));

    assert!(db.query_package_decl(s.package, s.other_decl).unwrap().is_none());
    assert_eq!(db.count_decls(s.package).unwrap(), 6);
}

/// Verify the kind filters over a declaration's children.
#[rstest]
#[case::methods(DeclKindTag::Method, vec!["Dump", "Reset"])]
#[case::fields(DeclKindTag::Field, vec!["paths_"])]
#[case::records(DeclKindTag::Record, vec![])]
#[case::namespaces(DeclKindTag::Namespace, vec![])]
fn test_decl_filters(#[case] kind: DeclKindTag, #[case] expected: Vec<&str>) {
    let (db, s) = sample();
    let decls = db.query_decl_children_of_kind(s.record, kind).unwrap();
    assert_eq!(names(&decls), expected);
    assert_eq!(db.query_decl_children(s.record).unwrap().len(), 3);
}

/// Verify the declaration breadcrumb and the records filter of a namespace.
#[test]
fn test_decl_tree_context() {
    let (db, s) = sample();

    assert_eq!(names(&db.query_records(s.ns).unwrap()), vec!["State"]);

    let node = db.query_decl(s.method).unwrap();
    let ctx: TreeContext<Decl> = TreeContext::build(&db, s.package, node).unwrap();
    assert_eq!(ctx.root.display_name(), "Declarations");
    assert_eq!(names(&ctx.ancestors), vec!["ninja", "State"]);
}

/// Verify presumed locations join to their package.
#[test]
fn test_source_location() {
    let (db, s) = sample();

    let record = db.query_decl(s.record).unwrap().unwrap();
    let loc_id = record.presumed_loc_id.unwrap();
    let loc = db.query_source_location(loc_id).unwrap().unwrap();
    assert_eq!(loc.slug, "ninja");
    assert_eq!(loc.version, "1.7.2");
    assert_eq!(loc.to_string(), "src/state.h:42:7");

    let presumed = db.query_presumed_loc(loc_id).unwrap().unwrap();
    assert_eq!(presumed.file_id, loc.file_id);
    assert_eq!((presumed.line, presumed.col), (42, 7));
    assert!(db.query_presumed_loc(loc_id + 1000).unwrap().is_none());

    let decls = db.query_file_decls(loc.file_id).unwrap();
    assert_eq!(names(&decls), vec!["State"]);

    // (file, line, col) is unique
    assert!(db.insert_presumed_loc(loc.file_id, 42, 7).is_err());
}

/// Verify immutability analysis rows.
#[test]
fn test_analysis() {
    let (db, s) = sample();

    db.insert_method_check(&MethodCheck {
        method_id: s.method,
        mutate_result: MutateResult::Maybe,
        return_result: ReturnResult::FieldNonTransitive,
    })
    .unwrap();
    db.insert_method_check_result(&MethodCheckResult {
        method_id: s.method,
        should_be_const: false,
    })
    .unwrap();
    db.insert_method_dependence(s.method, s.helper).unwrap();
    db.insert_method_dependence(s.method, s.helper).unwrap();
    db.insert_field_check(&FieldCheck {
        field_id: s.field,
        is_transitive: true,
        is_explicit: false,
    })
    .unwrap();
    db.insert_record_counts(&RecordCounts {
        record_id: s.record,
        num_methods: 2,
        num_const_methods: 1,
        num_fields: 1,
        num_transitive_fields: 1,
        ..Default::default()
    })
    .unwrap();
    db.insert_public_view(s.record, Some(s.helper)).unwrap();
    db.insert_public_view(s.record, Some(s.field)).unwrap();

    let check = db.query_method_check(s.method).unwrap().unwrap();
    assert_eq!(check.mutate_result, MutateResult::Maybe);
    assert_eq!(check.return_result, ReturnResult::FieldNonTransitive);
    assert!(!db
        .query_method_check_result(s.method)
        .unwrap()
        .unwrap()
        .should_be_const);
    assert!(db.query_method_check(s.helper).unwrap().is_none());

    assert_eq!(names(&db.query_method_callees(s.method).unwrap()), vec!["Dump"]);
    assert_eq!(names(&db.query_method_callers(s.helper).unwrap()), vec!["Reset"]);

    let field_check = db.query_field_check(s.field).unwrap().unwrap();
    assert!(field_check.is_transitive);

    let counts = db.query_record_counts(s.record).unwrap().unwrap();
    assert_eq!(counts.num_methods, 2);
    assert_eq!(counts.num_const_methods, 1);
    assert_eq!(counts.num_mutable_methods, 0);
    assert!(counts.entries().contains(&("num_transitive_fields", 1)));

    assert_eq!(names(&db.query_public_view_methods(s.record).unwrap()), vec!["Dump"]);
    assert_eq!(names(&db.query_public_view_fields(s.record).unwrap()), vec!["paths_"]);
}

/// Verify deleting a package cascades through everything it owns.
#[test]
fn test_delete_package_cascade() {
    let (db, s) = sample();
    db.insert_method_check(&MethodCheck {
        method_id: s.method,
        mutate_result: MutateResult::No,
        return_result: ReturnResult::Noop,
    })
    .unwrap();

    assert!(db.delete_package(s.package).unwrap());
    assert!(!db.delete_package(s.package).unwrap());

    assert!(db.query_file(s.build_cc).unwrap().is_none());
    assert!(db.query_decl(s.record).unwrap().is_none());
    assert!(db.query_method_check(s.method).unwrap().is_none());
    assert!(db.query_compile_commands(s.package).unwrap().is_empty());
    assert!(db.query_linkages(s.package).unwrap().is_empty());

    // the other package is untouched
    assert!(db.query_file(s.other_file).unwrap().is_some());
    assert!(db.query_decl(s.other_decl).unwrap().is_some());
    assert_eq!(db.count_packages().unwrap(), 1);
}
