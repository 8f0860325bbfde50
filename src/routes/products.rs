use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::dto::ApiMessage;
use crate::dto::products::{ProductDto, ProductResponse};
use crate::forms::products::{
    CreateProductPayload, ProductForm, ProductListParams, UpdateProductPayload,
};
use crate::media::MediaStore;
use crate::models::config::ServerConfig;
use crate::repository::{DieselRepository, ProductListQuery};
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::products::{
    create_product as create_product_service, delete_product as delete_product_service,
    get_product as get_product_service, list_products as list_products_service,
    update_product as update_product_service,
};

const NOT_FOUND: &str = "Product not found";

#[get("/api/products")]
pub async fn list_products(
    params: web::Query<ProductListParams>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let failure = "Error fetching products";
    let query: ProductListQuery = match params.into_inner().try_into() {
        Ok(query) => query,
        Err(e) => return error_response(&ServiceError::from(e), NOT_FOUND, failure, &server_config),
    };

    match list_products_service(query, repo.get_ref()) {
        Ok(products) => HttpResponse::Ok().json(
            products
                .into_iter()
                .map(ProductDto::from)
                .collect::<Vec<_>>(),
        ),
        Err(err) => error_response(&err, NOT_FOUND, failure, &server_config),
    }
}

#[get("/api/products/{product_id}")]
pub async fn get_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match get_product_service(product_id.into_inner(), repo.get_ref()) {
        Ok(product) => HttpResponse::Ok().json(ProductDto::from(product)),
        Err(err) => error_response(&err, NOT_FOUND, "Error fetching product", &server_config),
    }
}

#[post("/api/products")]
pub async fn create_product(
    repo: web::Data<DieselRepository>,
    store: web::Data<dyn MediaStore>,
    server_config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<ProductForm>,
) -> impl Responder {
    let failure = "Error creating product";
    let payload: CreateProductPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(&ServiceError::from(e), NOT_FOUND, failure, &server_config),
    };

    match create_product_service(payload, repo.get_ref(), store.get_ref()).await {
        Ok(product) => HttpResponse::Created().json(ProductResponse {
            success: true,
            message: "Product created successfully".to_string(),
            product: product.into(),
        }),
        Err(err) => error_response(&err, NOT_FOUND, failure, &server_config),
    }
}

#[put("/api/products/{product_id}")]
pub async fn update_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    store: web::Data<dyn MediaStore>,
    server_config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<ProductForm>,
) -> impl Responder {
    let failure = "Error updating product";
    let payload: UpdateProductPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(&ServiceError::from(e), NOT_FOUND, failure, &server_config),
    };

    match update_product_service(
        product_id.into_inner(),
        payload,
        repo.get_ref(),
        store.get_ref(),
    )
    .await
    {
        Ok(updated) => HttpResponse::Ok().json(ProductResponse {
            success: true,
            message: "Product updated successfully".to_string(),
            product: updated.value.into(),
        }),
        Err(err) => error_response(&err, NOT_FOUND, failure, &server_config),
    }
}

#[delete("/api/products/{product_id}")]
pub async fn delete_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    store: web::Data<dyn MediaStore>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match delete_product_service(product_id.into_inner(), repo.get_ref(), store.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(ApiMessage::ok("Product deleted successfully")),
        Err(err) => error_response(&err, NOT_FOUND, "Error deleting product", &server_config),
    }
}
