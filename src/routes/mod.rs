use std::fmt::{Debug, Display};

use actix_multipart::form::MultipartFormConfig;
use actix_web::error::InternalError;
use actix_web::{HttpResponse, web};

use crate::dto::ApiMessage;
use crate::models::config::ServerConfig;
use crate::services::ServiceError;

pub mod categories;
pub mod gallery;
pub mod main;
pub mod products;

/// Upper bound for a whole multipart body: a full bulk upload plus fields.
const MULTIPART_TOTAL_LIMIT: usize = 21 * 5 * 1024 * 1024;

/// Register every API route, the extractor error handlers and the JSON 404
/// fallback.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| reject(err, "Invalid JSON body")),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| reject(err, "Invalid query parameters")),
    )
    .app_data(
        MultipartFormConfig::default()
            .total_limit(MULTIPART_TOTAL_LIMIT)
            .error_handler(|err, _req| reject(err, "Invalid upload")),
    )
    .service(main::index)
    .service(main::health)
    .service(categories::list_categories)
    .service(categories::create_category)
    .service(categories::update_category)
    .service(categories::delete_category)
    .service(products::list_products)
    .service(products::get_product)
    .service(products::create_product)
    .service(products::update_product)
    .service(products::delete_product)
    .service(gallery::list_images)
    .service(gallery::upload_image)
    .service(gallery::upload_images)
    .service(gallery::delete_images)
    .service(gallery::delete_image)
    .default_service(web::route().to(main::not_found));
}

fn reject<E>(err: E, message: &str) -> actix_web::Error
where
    E: Debug + Display + 'static,
{
    let body = ApiMessage::failure(message).with_error(Some(err.to_string()));
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

/// Translate a service error into the JSON error envelope.
///
/// `not_found` and `failure` are the messages used for 404 and 500
/// responses. Database details are only included in development.
pub fn error_response(
    err: &ServiceError,
    not_found: &str,
    failure: &str,
    server_config: &ServerConfig,
) -> HttpResponse {
    match err {
        ServiceError::Form(message) => HttpResponse::BadRequest().json(ApiMessage::failure(message)),
        ServiceError::TypeConstraint(_) => {
            HttpResponse::BadRequest().json(ApiMessage::failure(err.to_string()))
        }
        ServiceError::NotFound => HttpResponse::NotFound().json(ApiMessage::failure(not_found)),
        ServiceError::Conflict(message) => {
            HttpResponse::Conflict().json(ApiMessage::failure(message))
        }
        ServiceError::Upload(detail) => HttpResponse::BadGateway().json(
            ApiMessage::failure("Error uploading image to media store")
                .with_error(Some(detail.clone())),
        ),
        ServiceError::Database(_) => {
            log::error!("{failure}: {err}");
            let detail = server_config
                .is_development()
                .then(|| err.detail().map(str::to_string))
                .flatten();
            HttpResponse::InternalServerError()
                .json(ApiMessage::failure(failure).with_error(detail))
        }
    }
}
