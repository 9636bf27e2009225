// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Database schema definitions for the package catalog.
//!
//! Ownership edges cascade on delete: a package owns its file tree, compile
//! commands, linkages and declaration tree; a declaration owns its children,
//! its kind payload and its analysis rows.

/// Core schema SQL (packages, file tree, build steps, locations).
pub const SCHEMA_SQL: &str = r#"
create table if not exists PackageNames (
    id   integer primary key autoincrement not null,
    name text not null,
    slug text not null
);

create index if not exists IndexPackageNamesSlug on PackageNames(slug);

create table if not exists Packages (
    id          integer primary key autoincrement not null,
    packageName integer not null,
    version     text not null,
    unique (packageName, version),
    foreign key (packageName) references PackageNames(id) on delete cascade
);

create table if not exists FileDescriptors (
    id      integer primary key autoincrement not null,
    package integer not null,
    parent  integer,
    name    text not null,
    path    text not null,
    unique (package, parent, name),
    foreign key (package) references Packages(id) on delete cascade,
    foreign key (parent) references FileDescriptors(id) on delete cascade
);

create index if not exists IndexFileDescriptorsParent on FileDescriptors(parent);
create index if not exists IndexFileDescriptorsPath on FileDescriptors(package, path);

create table if not exists CompileCommands (
    id        integer primary key autoincrement not null,
    package   integer not null,
    directory integer not null,
    file      integer not null,
    output    integer,
    unique (package, file, output),
    foreign key (package) references Packages(id) on delete cascade,
    foreign key (directory) references FileDescriptors(id) on delete cascade,
    foreign key (file) references FileDescriptors(id) on delete cascade,
    foreign key (output) references FileDescriptors(id) on delete cascade
);

create index if not exists IndexCompileCommandsFile on CompileCommands(file);

create table if not exists CompileCommandArgs (
    command  integer not null,
    position integer not null,
    arg      text not null,
    primary key (command, position),
    foreign key (command) references CompileCommands(id) on delete cascade
);

create table if not exists Linkages (
    id      integer primary key autoincrement not null,
    package integer not null,
    file    integer not null,
    output  integer not null,
    unique (package, file, output),
    foreign key (package) references Packages(id) on delete cascade,
    foreign key (file) references FileDescriptors(id) on delete cascade,
    foreign key (output) references FileDescriptors(id) on delete cascade
);

create index if not exists IndexLinkagesOutput on Linkages(output);

create table if not exists PresumedLocs (
    id   integer primary key autoincrement not null,
    file integer not null,
    line integer not null,
    col  integer not null,
    unique (file, line, col),
    foreign key (file) references FileDescriptors(id) on delete cascade
);
"#;

/// Declaration tree schema (decls and their kind payloads).
///
/// `kind` is the variant tag of the declaration; kinds that carry data keep
/// it in a payload table keyed by the declaration id.
pub const DECL_SCHEMA_SQL: &str = r#"
create table if not exists Decls (
    id          integer primary key autoincrement not null,
    package     integer not null,
    parent      integer,
    path        text not null,
    name        text not null,
    presumedLoc integer,
    kind        integer not null default 0 check (kind between 0 and 5),
    unique (package, path),
    foreign key (package) references Packages(id) on delete cascade,
    foreign key (parent) references Decls(id) on delete cascade,
    foreign key (presumedLoc) references PresumedLocs(id) on delete cascade
);

create index if not exists IndexDeclsParent on Decls(parent, kind);
create index if not exists IndexDeclsPresumedLoc on Decls(presumedLoc);

create table if not exists RecordDecls (
    decl        integer primary key not null,
    isAbstract  integer not null,
    isDependent integer not null,
    foreign key (decl) references Decls(id) on delete cascade
);

create table if not exists MethodDecls (
    decl        integer primary key not null,
    isConst     integer not null,
    isPure      integer not null,
    access      integer not null,
    mangledName text not null,
    foreign key (decl) references Decls(id) on delete cascade
);

create table if not exists FieldDecls (
    decl      integer primary key not null,
    isMutable integer not null,
    access    integer not null,
    foreign key (decl) references Decls(id) on delete cascade
);
"#;

/// Immutability analysis schema (checks, dependencies, aggregate counts).
pub const ANALYSIS_SCHEMA_SQL: &str = r#"
create table if not exists MethodChecks (
    method       integer primary key not null,
    mutateResult integer not null,
    returnResult integer not null,
    foreign key (method) references MethodDecls(decl) on delete cascade
);

create table if not exists MethodCheckResults (
    method        integer primary key not null,
    shouldBeConst integer not null,
    foreign key (method) references MethodDecls(decl) on delete cascade
);

create table if not exists MethodDependencies (
    method integer not null,
    callee integer not null,
    primary key (method, callee),
    foreign key (method) references MethodDecls(decl) on delete cascade,
    foreign key (callee) references MethodDecls(decl) on delete cascade
);

create index if not exists IndexMethodDependenciesCallee on MethodDependencies(callee);

create table if not exists FieldChecks (
    field        integer primary key not null,
    isTransitive integer not null,
    isExplicit   integer not null,
    foreign key (field) references FieldDecls(decl) on delete cascade
);

create table if not exists RecordCounts (
    record                             integer primary key not null,
    numMethods                         integer not null,
    numMutableMethods                  integer not null,
    numMutableNoEasy                   integer not null,
    numMutableNoEasyNonStub            integer not null,
    numMutableNoOdd                    integer not null,
    numMutableMaybe                    integer not null,
    numMutableNoRetNoop                integer not null,
    numMutableNoRetFieldT              integer not null,
    numMutableNoRetFieldNt             integer not null,
    numMutableNoRetOther               integer not null,
    numMutableMaybeRetNoop             integer not null,
    numMutableMaybeRetFieldT           integer not null,
    numMutableMaybeRetFieldNt          integer not null,
    numMutableMaybeRetOther            integer not null,
    numConstMethods                    integer not null,
    numConstNoEasy                     integer not null,
    numConstNoOdd                      integer not null,
    numConstMaybe                      integer not null,
    numConstNoRetNoop                  integer not null,
    numConstNoRetFieldT                integer not null,
    numConstNoRetFieldNt               integer not null,
    numConstNoRetOther                 integer not null,
    numConstMaybeRetNoop               integer not null,
    numConstMaybeRetFieldT             integer not null,
    numConstMaybeRetFieldNt            integer not null,
    numConstMaybeRetOther              integer not null,
    numFields                          integer not null,
    numMutableFields                   integer not null,
    numExplicitFields                  integer not null,
    numTransitiveFields                integer not null,
    numOnlyExplicitFields              integer not null,
    numOnlyTransitiveFields            integer not null,
    numNeitherExplicitTransitiveFields integer not null,
    numBothExplicitTransitiveFields    integer not null,
    foreign key (record) references RecordDecls(decl) on delete cascade
);

create table if not exists PublicViews (
    id     integer primary key autoincrement not null,
    record integer not null,
    decl   integer,
    unique (record, decl),
    foreign key (record) references RecordDecls(decl) on delete cascade,
    foreign key (decl) references Decls(id) on delete cascade
);
"#;

/// Schema version, stored in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i32 = 3;
