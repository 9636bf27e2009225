#![warn(clippy::dbg_macro)]

//! Read-only web frontend for the C++ package catalog.
//!
//! Pages are plain HTML rendered from embedded templates. Lookups run on
//! the blocking pool against read-only catalog handles from
//! [`store::Store`], so requests never wait on each other.

use std::fmt::Display;

use actix_web::{HttpResponse, http, web};
use cppdoc_store_db::Error as StoreDbError;
use error::CatalogError;

pub mod config;
pub mod error;
pub mod page;
pub mod store;

mod decl;
mod file;
mod health;
mod package;
mod root;
mod template;

pub use config::Config;

const CATALOG_CSS: &str = include_str!("styles/catalog.css");

const CARGO_NAME: &str = env!("CARGO_PKG_NAME");
const CARGO_VERSION: &str = env!("CARGO_PKG_VERSION");
const CARGO_HOME_PAGE: &str = env!("CARGO_PKG_HOMEPAGE");

const SLUG: &str = r"{slug:[A-Za-z][-.\w]*}";
const VERSION: &str = r"{version:[-\w.]+}";
const ID: &str = "{id:[0-9]+}";

#[derive(Debug)]
pub struct ServerError {
    err: CatalogError,
}

impl Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.err)
    }
}

impl actix_web::error::ResponseError for ServerError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match &self.err {
            CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,
            CatalogError::Store(
                StoreDbError::MissingRoot { .. } | StoreDbError::CorruptTree { .. },
            ) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self.err);
        } else {
            log::debug!("{}", self.err);
        }
        HttpResponse::build(status)
            .insert_header(http::header::ContentType(mime::TEXT_PLAIN_UTF_8))
            .body(self.err.to_string())
    }
}

impl From<CatalogError> for ServerError {
    fn from(err: CatalogError) -> ServerError {
        ServerError { err }
    }
}

impl From<StoreDbError> for ServerError {
    fn from(err: StoreDbError) -> ServerError {
        ServerError { err: err.into() }
    }
}

type ServerResult = std::result::Result<HttpResponse, ServerError>;

fn html_response(html: String) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(http::header::ContentType(mime::TEXT_HTML_UTF_8))
        .body(html)
}

/// Register every catalog route.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root::get))
        .route("/health", web::get().to(health::get))
        .route("/package/", web::get().to(package::list))
        .route(&format!("/package/{SLUG}/"), web::get().to(package::versions))
        .route(
            &format!("/package/{SLUG}/{VERSION}/"),
            web::get().to(package::get),
        )
        .route(
            &format!("/package/{SLUG}/{VERSION}/file/"),
            web::get().to(file::root),
        )
        .route(
            &format!("/package/{SLUG}/{VERSION}/file/{ID}/"),
            web::get().to(file::get),
        )
        .route(
            &format!("/package/{SLUG}/{VERSION}/decl/"),
            web::get().to(decl::root),
        )
        .route(
            &format!("/package/{SLUG}/{VERSION}/decl/{ID}/"),
            web::get().to(decl::get),
        );
}
