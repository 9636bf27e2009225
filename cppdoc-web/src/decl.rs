use actix_web::web;
use cppdoc_store_db::{Decl, DeclKind};

use crate::config::Config;
use crate::page::{self, DeclAnalysis, DeclPage};
use crate::package::crumbs;
use crate::template::{breadcrumb, detail, escape, href, render_page, row, section, table};
use crate::{ServerResult, html_response};

pub(crate) async fn root(
    path: web::Path<(String, String)>,
    config: web::Data<Config>,
) -> ServerResult {
    let (slug, version) = path.into_inner();
    show(config, slug, version, None).await
}

pub(crate) async fn get(
    path: web::Path<(String, String, i64)>,
    config: web::Data<Config>,
) -> ServerResult {
    let (slug, version, id) = path.into_inner();
    show(config, slug, version, Some(id)).await
}

async fn show(
    config: web::Data<Config>,
    slug: String,
    version: String,
    id: Option<i64>,
) -> ServerResult {
    let shared = config.clone();
    let page = config
        .store
        .run(move |db| page::decl_page(db, &shared.resolver, &slug, &version, id))
        .await?;
    Ok(html_response(render(&page)))
}

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

/// Kind specific attributes of a declaration.
fn attributes(decl: &Decl) -> Vec<(&'static str, String)> {
    let mut entries = vec![("Kind", decl.kind.label().to_string())];
    match &decl.kind {
        DeclKind::Record(record) => {
            entries.push(("Abstract", yes_no(record.is_abstract).into()));
            entries.push(("Dependent", yes_no(record.is_dependent).into()));
        }
        DeclKind::Method(method) => {
            entries.push(("Access", method.access.to_string()));
            entries.push(("Const", yes_no(method.is_const).into()));
            entries.push(("Pure", yes_no(method.is_pure).into()));
            entries.push(("Mangled name", method.mangled_name.clone()));
        }
        DeclKind::Field(field) => {
            entries.push(("Access", field.access.to_string()));
            entries.push(("Mutable", yes_no(field.is_mutable).into()));
        }
        DeclKind::Unspecified | DeclKind::Namespace | DeclKind::Function => {}
    }
    entries
}

fn render(page: &DeclPage) -> String {
    let slug = page.name.slug.as_str();
    let version = page.package.version.as_str();
    let decl_href =
        |id: i64| href(&["package", slug, version, "decl", id.to_string().as_str()]);
    let decl_rows = |decls: &[Decl]| -> Vec<String> {
        decls
            .iter()
            .map(|d| row(&decl_href(d.id), d.display_name(), ""))
            .collect()
    };

    let mut links = crumbs(&page.name, Some(&page.package));
    links.push((href(&["package", slug, version, "decl"]), "Declarations".into()));
    for decl in &page.tree.ancestors {
        links.push((decl_href(decl.id), decl.display_name().to_string()));
    }
    let node = &page.tree.node;
    if !node.is_root() {
        links.push((decl_href(node.id), node.display_name().to_string()));
    }

    let mut summary = String::new();
    if let Some(location) = &page.location {
        let file_href = href(&[
            "package",
            slug,
            version,
            "file",
            location.file_id.to_string().as_str(),
        ]);
        summary.push_str(&format!(
            "<p>Declared at <a href=\"{file_href}\"><code>{}</code></a>",
            escape(&location.to_string())
        ));
        if let Some(permalink) = &page.permalink {
            summary.push_str(&format!(
                " &middot; <a class=\"permalink\" href=\"{permalink}\">view source</a>"
            ));
        }
        summary.push_str("</p>\n");
    }
    if !node.is_root() {
        summary.push_str(&table("Attributes", &attributes(node)));
    }

    let mut sections = Vec::new();
    for (heading, decls) in [
        ("Namespaces", &page.namespaces),
        ("Records", &page.records),
        ("Methods", &page.methods),
        ("Fields", &page.fields),
    ] {
        if !decls.is_empty() {
            sections.push(section(heading, &decl_rows(decls.as_slice())));
        }
    }
    if !page.others.is_empty() {
        let rows: Vec<_> = page
            .others
            .iter()
            .map(|d| row(&decl_href(d.id), d.display_name(), d.kind.label()))
            .collect();
        sections.push(section("Other declarations", &rows));
    }

    match &page.analysis {
        DeclAnalysis::Method {
            check,
            result,
            callees,
            callers,
        } => {
            let mut entries = Vec::new();
            if let Some(check) = check {
                entries.push(("Mutates object", check.mutate_result.to_string()));
                entries.push(("Returns", check.return_result.to_string()));
            }
            if let Some(result) = result {
                entries.push(("Should be const", yes_no(result.should_be_const).to_string()));
            }
            if !entries.is_empty() {
                sections.push(table("Immutability", &entries));
            }
            sections.push(section("Calls", &decl_rows(callees.as_slice())));
            sections.push(section("Called by", &decl_rows(callers.as_slice())));
        }
        DeclAnalysis::Field { check: Some(check) } => {
            sections.push(table(
                "Immutability",
                &[
                    ("Transitive", yes_no(check.is_transitive)),
                    ("Explicit", yes_no(check.is_explicit)),
                ],
            ));
        }
        DeclAnalysis::Record {
            counts,
            public_methods,
            public_fields,
        } => {
            if let Some(counts) = counts {
                let entries: Vec<_> = counts
                    .entries()
                    .into_iter()
                    .map(|(name, value)| (name, value.to_string()))
                    .collect();
                sections.push(table("Statistics", &entries));
            }
            sections.push(section("Public methods", &decl_rows(public_methods.as_slice())));
            sections.push(section("Public fields", &decl_rows(public_fields.as_slice())));
        }
        DeclAnalysis::Field { check: None } | DeclAnalysis::None => {}
    }

    let title = if node.is_root() || node.path.is_empty() {
        node.display_name().to_string()
    } else {
        node.path.clone()
    };
    let content = detail(&title, &summary, &sections);
    render_page(&title, &breadcrumb(&links), &content)
}
