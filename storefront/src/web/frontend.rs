// storefront/src/web/frontend.rs

use actix_web::http::header::ContentType;
use actix_web::HttpResponse;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Serves the single-page storefront. It talks to `/api` on the same origin.
pub async fn index_handler() -> HttpResponse {
  HttpResponse::Ok().content_type(ContentType::html()).body(INDEX_HTML)
}
