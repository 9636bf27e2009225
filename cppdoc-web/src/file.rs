use actix_web::web;

use crate::config::Config;
use crate::page::{self, FilePage};
use crate::package::crumbs;
use crate::template::{breadcrumb, detail, escape, href, render_page, row, section};
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
    let page = config
        .store
        .run(move |db| page::file_page(db, &slug, &version, id))
        .await?;
    Ok(html_response(render(&page)))
}

fn render(page: &FilePage) -> String {
    let slug = page.name.slug.as_str();
    let version = page.package.version.as_str();
    let file_href =
        |id: i64| href(&["package", slug, version, "file", id.to_string().as_str()]);
    let decl_href =
        |id: i64| href(&["package", slug, version, "decl", id.to_string().as_str()]);

    let mut links = crumbs(&page.name, Some(&page.package));
    links.push((href(&["package", slug, version, "file"]), "Files".into()));
    for file in &page.tree.ancestors {
        links.push((file_href(file.id), file.name.clone()));
    }
    let node = &page.tree.node;
    if !node.is_root() {
        links.push((file_href(node.id), node.name.clone()));
    }

    let mut sections = Vec::new();
    if node.is_root() || !page.children.is_empty() {
        let rows: Vec<_> = page
            .children
            .iter()
            .map(|child| row(&file_href(child.id), &child.name, ""))
            .collect();
        sections.push(section("Contents", &rows));
    }
    if !page.compile_commands.is_empty() {
        let rows: Vec<_> = page
            .compile_commands
            .iter()
            .map(|command| {
                format!(
                    "    <li><code>{}</code></li>\n",
                    escape(&command.to_string())
                )
            })
            .collect();
        sections.push(section("Compile commands", &rows));
    }
    if !page.linkages.is_empty() {
        let rows: Vec<_> = page
            .linkages
            .iter()
            .map(|(linkage, input)| match input {
                Some(input) => row(&file_href(input.id), &input.path, ""),
                None => format!("    <li>file {}</li>\n", linkage.file_id),
            })
            .collect();
        sections.push(section("Linked from", &rows));
    }
    if !page.decls.is_empty() {
        let rows: Vec<_> = page
            .decls
            .iter()
            .map(|decl| row(&decl_href(decl.id), decl.display_name(), decl.kind.label()))
            .collect();
        sections.push(section("Declarations", &rows));
    }

    let title = node.to_string();
    let summary = format!(
        "<p>{} {} &middot; <code>{}</code></p>",
        escape(&page.name.name),
        escape(version),
        escape(if node.is_root() { "/" } else { node.path.as_str() }),
    );
    let content = detail(&title, &summary, &sections);
    render_page(&title, &breadcrumb(&links), &content)
}
