#![warn(clippy::dbg_macro)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::time::Duration;

use actix_web::{App, HttpServer, middleware, web};
use cppdoc_web::config;
use cppdoc_web::error::{IoErrorContext, Result, ServerError};
use url::Url;

async fn inner_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config::load()?;
    if !config.database.exists() {
        log::warn!(
            "catalog database {} does not exist yet, requests will fail until it does",
            config.database.display()
        );
    }

    let c = web::Data::new(config);
    let config_data = c.clone();

    log::info!("listening on {}", c.bind);
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Condition::new(
                config_data.enable_compression,
                middleware::Compress::default(),
            ))
            .app_data(config_data.clone())
            .configure(cppdoc_web::routes)
    })
    // default is 5 seconds, which is too small when doing mass requests on slow machines
    .client_request_timeout(Duration::from_secs(30))
    .workers(c.workers)
    .max_connection_rate(c.max_connection_rate);

    let try_url = Url::parse(&c.bind);
    let (bind, uds) = if let Ok(url) = try_url.as_ref() {
        if url.scheme() != "unix" {
            (c.bind.as_str(), false)
        } else if url.host().is_none() {
            (url.path(), true)
        } else {
            return Err(ServerError::Startup {
                reason: "Can only bind to file URLs without host portion.".to_string(),
            }
            .into());
        }
    } else {
        (c.bind.as_str(), false)
    };

    if uds {
        let socket_path = Path::new(bind);
        server = server
            .bind_uds(socket_path)
            .io_context("Failed to bind to Unix domain socket")?;
        fs::set_permissions(socket_path, fs::Permissions::from_mode(0o777))
            .io_context("Failed to set socket permissions")?;
    } else {
        server = server
            .bind(c.bind.clone())
            .io_context("Failed to bind server")?;
    }

    server.run().await.io_context("Failed to start server")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    inner_main().await.map_err(std::io::Error::other)
}
