use actix_web::{HttpResponse, http};

pub(crate) async fn get() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(http::header::ContentType(mime::TEXT_PLAIN_UTF_8))
        .body("OK\n")
}
