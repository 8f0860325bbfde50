use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::dto::categories::{CategoryDeletedResponse, CategoryDto, CategoryResponse};
use crate::forms::categories::{CategoryForm, CategoryFormPayload};
use crate::media::MediaStore;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::categories::{
    create_category as create_category_service, delete_category as delete_category_service,
    list_categories as list_categories_service, update_category as update_category_service,
};

const NOT_FOUND: &str = "Category not found";

#[get("/api/categories")]
pub async fn list_categories(
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match list_categories_service(repo.get_ref()) {
        Ok(categories) => HttpResponse::Ok().json(
            categories
                .into_iter()
                .map(CategoryDto::from)
                .collect::<Vec<_>>(),
        ),
        Err(err) => error_response(&err, NOT_FOUND, "Error fetching categories", &server_config),
    }
}

#[post("/api/categories")]
pub async fn create_category(
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<CategoryForm>,
) -> impl Responder {
    let failure = "Error creating category";
    let payload: CategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(&ServiceError::from(e), NOT_FOUND, failure, &server_config),
    };

    match create_category_service(payload, repo.get_ref()) {
        Ok(category) => HttpResponse::Created().json(CategoryResponse {
            success: true,
            message: "Category created successfully".to_string(),
            category: category.into(),
        }),
        Err(err) => error_response(&err, NOT_FOUND, failure, &server_config),
    }
}

#[put("/api/categories/{category_id}")]
pub async fn update_category(
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<CategoryForm>,
) -> impl Responder {
    let failure = "Error updating category";
    let payload: CategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(&ServiceError::from(e), NOT_FOUND, failure, &server_config),
    };

    match update_category_service(category_id.into_inner(), payload, repo.get_ref()) {
        Ok(category) => HttpResponse::Ok().json(CategoryResponse {
            success: true,
            message: "Category updated successfully".to_string(),
            category: category.into(),
        }),
        Err(err) => error_response(&err, NOT_FOUND, failure, &server_config),
    }
}

#[delete("/api/categories/{category_id}")]
pub async fn delete_category(
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    store: web::Data<dyn MediaStore>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match delete_category_service(category_id.into_inner(), repo.get_ref(), store.get_ref()).await
    {
        Ok(removal) => HttpResponse::Ok().json(CategoryDeletedResponse {
            success: true,
            message: "Category deleted successfully".to_string(),
            deleted_products: removal.removed_products,
        }),
        Err(err) => error_response(&err, NOT_FOUND, "Error deleting category", &server_config),
    }
}
