use actix_web::web;
use cppdoc_store_db::{Package, PackageName};

use crate::config::Config;
use crate::page;
use crate::template::{breadcrumb, detail, href, render_page, row, section, table};
use crate::{ServerResult, html_response};

/// Breadcrumb links down to a package, or to one of its versions.
pub(crate) fn crumbs(name: &PackageName, package: Option<&Package>) -> Vec<(String, String)> {
    let mut links = vec![
        ("/".to_string(), "Home".to_string()),
        (href(&["package"]), "Packages".to_string()),
        (href(&["package", name.slug.as_str()]), name.name.clone()),
    ];
    if let Some(package) = package {
        links.push((
            href(&["package", name.slug.as_str(), package.version.as_str()]),
            package.version.clone(),
        ));
    }
    links
}

pub(crate) async fn list(config: web::Data<Config>) -> ServerResult {
    let names = config.store.run(page::package_names).await?;

    let rows: Vec<_> = names
        .iter()
        .map(|name| row(&href(&["package", name.slug.as_str()]), &name.name, ""))
        .collect();
    let content = detail("Packages", "", &[section("Packages", &rows)]);
    let html = render_page(
        "Packages",
        &breadcrumb(&[
            ("/".into(), "Home".into()),
            (href(&["package"]), "Packages".into()),
        ]),
        &content,
    );
    Ok(html_response(html))
}

pub(crate) async fn versions(path: web::Path<String>, config: web::Data<Config>) -> ServerResult {
    let slug = path.into_inner();
    let page = config
        .store
        .run(move |db| page::package_versions(db, &slug))
        .await?;

    let rows: Vec<_> = page
        .packages
        .iter()
        .map(|package| {
            row(
                &href(&["package", page.name.slug.as_str(), package.version.as_str()]),
                package.version.as_str(),
                "",
            )
        })
        .collect();
    let content = detail(&page.name.name, "", &[section("Versions", &rows)]);
    let html = render_page(
        &page.name.name,
        &breadcrumb(&crumbs(&page.name, None)),
        &content,
    );
    Ok(html_response(html))
}

pub(crate) async fn get(
    path: web::Path<(String, String)>,
    config: web::Data<Config>,
) -> ServerResult {
    let (slug, version) = path.into_inner();
    let page = config
        .store
        .run(move |db| page::package_detail(db, &slug, &version))
        .await?;

    let name = &page.name;
    let version = page.package.version.as_str();
    let summary = table(
        "Contents",
        &[
            ("Files", page.file_count.to_string()),
            ("Declarations", page.decl_count.to_string()),
        ],
    );
    let rows = vec![
        row(&href(&["package", name.slug.as_str(), version, "file"]), "Files", ""),
        row(
            &href(&["package", name.slug.as_str(), version, "decl"]),
            "Declarations",
            "",
        ),
    ];
    let title = format!("{} {version}", name.name);
    let content = detail(&title, &summary, &[section("Browse", &rows)]);
    let html = render_page(
        &title,
        &breadcrumb(&crumbs(name, Some(&page.package))),
        &content,
    );
    Ok(html_response(html))
}
