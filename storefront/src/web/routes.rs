// storefront/src/web/routes.rs

use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::errors::AppError;
use crate::web::frontend;
use crate::web::handlers::{cart_handlers, checkout_handlers, product_handlers};

fn json_payload_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::Validation(format!("Invalid JSON body: {}", err)).into()
}

/// Mounts the JSON API under `/api` and the single-page frontend at `/`.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .service(
      web::scope("/api")
        .app_data(web::JsonConfig::default().error_handler(json_payload_error))
        .route("/health", web::get().to(product_handlers::health_check_handler))
        .route("/products", web::get().to(product_handlers::list_products_handler))
        .service(
          web::resource("/cart")
            .route(web::get().to(cart_handlers::view_cart_handler))
            .route(web::post().to(cart_handlers::add_to_cart_handler)),
        )
        .service(
          web::resource("/cart/{cart_item_id}")
            .route(web::put().to(cart_handlers::update_cart_item_handler))
            .route(web::delete().to(cart_handlers::remove_from_cart_handler)),
        )
        .route("/checkout", web::post().to(checkout_handlers::checkout_handler)),
    )
    .route("/", web::get().to(frontend::index_handler));
}
