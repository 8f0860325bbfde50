use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use chrono::Utc;
use serde_json::json;

use crate::models::config::ServerConfig;

#[get("/api")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "API is running",
        "endpoints": {
            "products": "/api/products",
            "categories": "/api/categories",
            "gallery": "/api/gallery",
            "health": "/api/health",
        }
    }))
}

#[get("/api/health")]
pub async fn health(server_config: web::Data<ServerConfig>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "status": "Server is running",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": server_config.environment,
    }))
}

pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "success": false,
        "message": "Route not found",
        "path": req.path(),
        "method": req.method().as_str(),
    }))
}
