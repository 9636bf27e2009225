use std::collections::HashMap;

use actix_web::web;

use crate::config::Config;
use crate::page;
use crate::template::{LANDING_TEMPLATE, breadcrumb, render, render_page};
use crate::{CARGO_NAME, ServerResult, html_response};

pub(crate) async fn get(config: web::Data<Config>) -> ServerResult {
    let (packages, versions) = config
        .store
        .run(|db| Ok((page::package_names(db)?.len(), db.count_packages()?)))
        .await?;

    let mut vars = HashMap::new();
    vars.insert("packages", packages.to_string());
    vars.insert("versions", versions.to_string());

    let content = render(LANDING_TEMPLATE, &vars);
    let html = render_page(
        &format!("C++ package catalog - {CARGO_NAME}"),
        &breadcrumb(&[("/".into(), "Home".into())]),
        &content,
    );
    Ok(html_response(html))
}
