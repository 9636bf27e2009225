//! Requests served in-process against an on-disk catalog.


use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use catalog::Catalog;
use cppdoc_web::Config;
use rstest::rstest;

async fn get(config: Config, uri: &str) -> (StatusCode, String) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(config))
            .configure(cppdoc_web::routes),
    )
    .await;
    let req = test::TestRequest::get().uri(uri).to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}

fn config(catalog: &Catalog) -> Config {
    Config::default().with_database(&catalog.path)
}

#[actix_web::test]
async fn test_health() {
    let (status, body) = get(Config::default(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK\n");
}

#[actix_web::test]
async fn test_listing_pages() -> catalog::Result<()> {
    let catalog = Catalog::create()?;

    let (status, body) = get(config(&catalog), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<!DOCTYPE html>") || body.contains("<html"));

    let (status, body) = get(config(&catalog), "/package/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Ninja"));
    assert!(body.contains("Mosh"));

    let (status, body) = get(config(&catalog), "/package/ninja/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("1.7.2"));
    assert!(!body.contains("1.3.2"));

    let (status, body) = get(config(&catalog), "/package/ninja/1.7.2/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/package/ninja/1.7.2/file/"));
    assert!(body.contains("/package/ninja/1.7.2/decl/"));
    Ok(())
}

#[actix_web::test]
async fn test_file_endpoints() -> catalog::Result<()> {
    let catalog = Catalog::create()?;

    let (status, body) = get(config(&catalog), "/package/ninja/1.7.2/file/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(&format!("/package/ninja/1.7.2/file/{}/", catalog.src)));

    let uri = format!("/package/ninja/1.7.2/file/{}/", catalog.build_cc);
    let (status, body) = get(config(&catalog), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("-Wall"));
    assert!(body.contains("build.cc"));
    Ok(())
}

#[actix_web::test]
async fn test_decl_endpoints() -> catalog::Result<()> {
    let catalog = Catalog::create()?;

    let (status, body) = get(config(&catalog), "/package/ninja/1.7.2/decl/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(&format!("/package/ninja/1.7.2/decl/{}/", catalog.ns)));

    let uri = format!("/package/ninja/1.7.2/decl/{}/", catalog.state);
    let (status, body) = get(config(&catalog), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("https://github.com/ninja-build/ninja/tree/v1.7.2/src/state.h#L42"));
    assert!(body.contains(&format!("/package/ninja/1.7.2/file/{}/", catalog.state_h)));
    assert!(body.contains("Statistics"));

    let uri = format!("/package/ninja/1.7.2/decl/{}/", catalog.reset);
    let (status, body) = get(config(&catalog), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Immutability"));
    assert!(body.contains("Dump"));
    Ok(())
}

#[rstest]
#[case::unknown_slug("/package/gcc/")]
#[case::unknown_version("/package/ninja/9.9.9/")]
#[case::slug_starts_with_digit("/package/7zip/")]
#[case::non_numeric_id("/package/ninja/1.7.2/file/build.cc/")]
#[case::missing_trailing_slash("/package/ninja")]
#[case::package_without_tree("/package/fish/2.6.0/file/")]
#[case::decls_without_tree("/package/fish/2.6.0/decl/")]
#[case::two_file_roots("/package/bitcoin/0.15.1/file/")]
#[case::two_decl_roots("/package/bitcoin/0.15.1/decl/")]
#[actix_web::test]
async fn test_not_found(#[case] uri: &str) -> catalog::Result<()> {
    let catalog = Catalog::create()?;
    let (status, _) = get(config(&catalog), uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    Ok(())
}

#[actix_web::test]
async fn test_foreign_ids() -> catalog::Result<()> {
    let catalog = Catalog::create()?;
    for uri in [
        format!("/package/ninja/1.7.2/file/{}/", catalog.mosh_file),
        format!("/package/ninja/1.7.2/decl/{}/", catalog.mosh_decl),
        format!("/package/mosh/1.3.2/decl/{}/", catalog.state),
    ] {
        let (status, _) = get(config(&catalog), &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
    Ok(())
}

#[actix_web::test]
async fn test_parent_in_other_package() -> catalog::Result<()> {
    let catalog = Catalog::create()?;
    let uri = format!("/package/protobuf/3.4.0/file/{}/", catalog.stray);
    let (status, _) = get(config(&catalog), &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[actix_web::test]
async fn test_missing_database() -> catalog::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = Config::default().with_database(dir.path().join("absent.sqlite3"));
    let (status, _) = get(config, "/package/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, body) = get(Config::default(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK\n");
    Ok(())
}
