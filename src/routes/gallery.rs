use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, delete, get, post, web};

use crate::dto::ApiMessage;
use crate::dto::gallery::{
    BulkDeleteResponse, BulkUploadResponse, MediaAssetDto, UploadImageResponse,
};
use crate::forms::gallery::{
    BulkDeleteForm, BulkDeletePayload, BulkUploadForm, BulkUploadPayload, UploadImageForm,
    UploadImagePayload,
};
use crate::media::MediaStore;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::gallery::{
    delete_image as delete_image_service, delete_images as delete_images_service,
    list_images as list_images_service, upload_image as upload_image_service,
    upload_images as upload_images_service,
};

const NOT_FOUND: &str = "Image not found";

#[get("/api/gallery")]
pub async fn list_images(
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match list_images_service(repo.get_ref()) {
        Ok(images) => HttpResponse::Ok().json(
            images
                .into_iter()
                .map(MediaAssetDto::from)
                .collect::<Vec<_>>(),
        ),
        Err(err) => error_response(
            &err,
            NOT_FOUND,
            "Error fetching gallery images",
            &server_config,
        ),
    }
}

#[post("/api/gallery")]
pub async fn upload_image(
    repo: web::Data<DieselRepository>,
    store: web::Data<dyn MediaStore>,
    server_config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<UploadImageForm>,
) -> impl Responder {
    let failure = "Error uploading gallery image";
    let payload: UploadImagePayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(&ServiceError::from(e), NOT_FOUND, failure, &server_config),
    };

    match upload_image_service(payload, repo.get_ref(), store.get_ref()).await {
        Ok(asset) => HttpResponse::Created().json(UploadImageResponse {
            success: true,
            message: "Image uploaded successfully".to_string(),
            image: asset.into(),
        }),
        Err(err) => error_response(&err, NOT_FOUND, failure, &server_config),
    }
}

#[post("/api/gallery/bulk-upload")]
pub async fn upload_images(
    repo: web::Data<DieselRepository>,
    store: web::Data<dyn MediaStore>,
    server_config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<BulkUploadForm>,
) -> impl Responder {
    let failure = "Error bulk uploading gallery images";
    let payload: BulkUploadPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(&ServiceError::from(e), NOT_FOUND, failure, &server_config),
    };

    match upload_images_service(payload, repo.get_ref(), store.get_ref()).await {
        Ok(report) => HttpResponse::Created().json(BulkUploadResponse::from(report)),
        Err(err) => error_response(&err, NOT_FOUND, failure, &server_config),
    }
}

#[post("/api/gallery/bulk-delete")]
pub async fn delete_images(
    repo: web::Data<DieselRepository>,
    store: web::Data<dyn MediaStore>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<BulkDeleteForm>,
) -> impl Responder {
    let failure = "Error bulk deleting gallery images";
    let payload: BulkDeletePayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(&ServiceError::from(e), NOT_FOUND, failure, &server_config),
    };

    match delete_images_service(payload, repo.get_ref(), store.get_ref()).await {
        Ok(report) => HttpResponse::Ok().json(BulkDeleteResponse::from(report)),
        Err(err) => error_response(&err, NOT_FOUND, failure, &server_config),
    }
}

#[delete("/api/gallery/{image_id}")]
pub async fn delete_image(
    image_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    store: web::Data<dyn MediaStore>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match delete_image_service(image_id.into_inner(), repo.get_ref(), store.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(ApiMessage::ok("Image deleted successfully")),
        Err(err) => error_response(&err, NOT_FOUND, "Error deleting gallery image", &server_config),
    }
}
