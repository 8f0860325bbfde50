use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use diesel::prelude::*;
use diesel::sql_query;
use pushkind_storefront::media::MediaStore;
use pushkind_storefront::repository::DieselRepository;
use pushkind_storefront::routes;
use serde_json::{Value, json};

mod common;

use common::{MemoryMediaStore, TestDb, multipart_body, server_config};

macro_rules! app {
    ($db:expr, $store:expr) => {{
        let store: Arc<dyn MediaStore> = $store;
        test::init_service(
            App::new()
                .app_data(web::Data::new(DieselRepository::new($db.pool())))
                .app_data(web::Data::from(store))
                .app_data(web::Data::new(server_config()))
                .configure(routes::configure),
        )
        .await
    }};
}

fn logo_png() -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    bytes.resize(2048, 7);
    bytes
}

fn upload_request(file_name: &str) -> test::TestRequest {
    let png = logo_png();
    let (content_type, body) =
        multipart_body(&[("image", file_name, "image/png", png.as_slice())], &[]);
    test::TestRequest::post()
        .uri("/api/gallery")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
}

#[actix_web::test]
async fn upload_then_delete_gallery_image() {
    let db = TestDb::new();
    let store = Arc::new(MemoryMediaStore::default());
    let app = app!(db, store.clone());

    let resp = test::call_service(&app, upload_request("logo.png").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["displayName"], "logo.png");
    assert!(body["url"].as_str().is_some_and(|u| u.starts_with("https://")));
    let remote_id = body["remoteId"].as_str().expect("remote id").to_string();
    assert_eq!(store.objects(), vec![remote_id]);
    let id = body["id"].as_i64().expect("id");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/gallery/{id}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"success": true, "message": "Image deleted successfully"}));
    assert!(store.objects().is_empty());

    let req = test::TestRequest::delete()
        .uri(&format!("/api/gallery/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"success": false, "message": "Image not found"}));

    let req = test::TestRequest::get().uri("/api/gallery").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed, json!([]));
}

#[actix_web::test]
async fn legacy_local_image_is_listed_and_deleted() {
    let db = TestDb::new();
    {
        let mut conn = db.pool().get().unwrap();
        sql_query(
            "INSERT INTO media_assets (url, display_name, remote_id) \
             VALUES ('/uploads/old.png', 'old.png', NULL)",
        )
        .execute(&mut conn)
        .expect("should seed legacy asset");
    }
    let store = Arc::new(MemoryMediaStore::failing_deletes());
    let app = app!(db, store.clone());

    let req = test::TestRequest::get().uri("/api/gallery").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed[0]["url"], "/uploads/old.png");

    let req = test::TestRequest::delete().uri("/api/gallery/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/gallery").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed, json!([]));
}

#[actix_web::test]
async fn upload_accepts_files_just_under_five_mebibytes() {
    let db = TestDb::new();
    let app = app!(db, Arc::new(MemoryMediaStore::default()));
    let mut png = logo_png();
    png.resize(5_100_000, 0);

    let (content_type, body) =
        multipart_body(&[("image", "large.png", "image/png", png.as_slice())], &[]);
    let req = test::TestRequest::post()
        .uri("/api/gallery")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn upload_without_file_is_a_validation_error() {
    let db = TestDb::new();
    let app = app!(db, Arc::new(MemoryMediaStore::default()));

    let (content_type, body) = multipart_body(&[], &[("caption", "nothing")]);
    let req = test::TestRequest::post()
        .uri("/api/gallery")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "No image file provided");
}

#[actix_web::test]
async fn bulk_delete_reports_missing_ids() {
    let db = TestDb::new();
    let store = Arc::new(MemoryMediaStore::failing_deletes());
    let app = app!(db, store.clone());

    let resp = test::call_service(&app, upload_request("logo.png").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], 1);

    let req = test::TestRequest::post()
        .uri("/api/gallery/bulk-delete")
        .set_json(json!({"ids": [1, 999]}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["deletedCount"], 1);
    assert_eq!(body["failedCount"], 1);
    assert_eq!(body["deletedIds"], json!([1]));
    assert_eq!(body["errors"], json!([{"id": 999, "message": "Image not found"}]));

    let req = test::TestRequest::get().uri("/api/gallery").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed, json!([]));
}

#[actix_web::test]
async fn bulk_upload_reports_counts() {
    let db = TestDb::new();
    let app = app!(db, Arc::new(MemoryMediaStore::default()));
    let png = logo_png();

    let (content_type, body) = multipart_body(
        &[
            ("images", "a.png", "image/png", png.as_slice()),
            ("images", "b.png", "image/png", png.as_slice()),
        ],
        &[],
    );
    let req = test::TestRequest::post()
        .uri("/api/gallery/bulk-upload")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["uploadedCount"], 2);
    assert_eq!(body["failedCount"], 0);
    assert!(body.get("errors").is_none());
}

#[actix_web::test]
async fn bulk_upload_rejects_non_images() {
    let db = TestDb::new();
    let store = Arc::new(MemoryMediaStore::default());
    let app = app!(db, store.clone());

    let (content_type, body) = multipart_body(
        &[("images", "notes.txt", "text/plain", b"hello".as_slice())],
        &[],
    );
    let req = test::TestRequest::post()
        .uri("/api/gallery/bulk-upload")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(store.objects().is_empty());
}

#[actix_web::test]
async fn product_lifecycle_with_image_replace() {
    let db = TestDb::new();
    let store = Arc::new(MemoryMediaStore::default());
    let app = app!(db, store.clone());

    let req = test::TestRequest::post()
        .uri("/api/categories")
        .set_json(json!({"name": "Teas", "description": "Loose leaf"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let category_id = body["category"]["id"].as_i64().expect("category id");

    let png = logo_png();
    let category = category_id.to_string();
    let (content_type, body) = multipart_body(
        &[("image", "sencha.png", "image/png", png.as_slice())],
        &[("name", "Sencha"), ("category_id", category.as_str())],
    );
    let req = test::TestRequest::post()
        .uri("/api/products")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let product_id = body["product"]["id"].as_i64().expect("product id");
    let first_image = body["product"]["imageRemoteId"].as_str().unwrap().to_string();
    assert_eq!(body["product"]["categoryName"], "Teas");

    let (content_type, body) = multipart_body(
        &[("image", "sencha-2.png", "image/png", png.as_slice())],
        &[("is_active", "false")],
    );
    let req = test::TestRequest::put()
        .uri(&format!("/api/products/{product_id}"))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let second_image = body["product"]["imageRemoteId"].as_str().unwrap().to_string();
    assert_ne!(first_image, second_image);
    assert_eq!(body["product"]["isActive"], false);
    assert_eq!(store.objects(), vec![second_image]);

    let req = test::TestRequest::get()
        .uri("/api/products?is_active=false")
        .to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/categories/{category_id}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["deletedProducts"], 1);
    assert!(store.objects().is_empty());

    let req = test::TestRequest::get()
        .uri(&format!("/api/products/{product_id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn failed_replace_upload_keeps_stored_image() {
    let db = TestDb::new();
    let store = Arc::new(MemoryMediaStore::default());
    let app = app!(db, store.clone());

    let req = test::TestRequest::post()
        .uri("/api/categories")
        .set_json(json!({"name": "Teas"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let category = body["category"]["id"].as_i64().expect("category id").to_string();

    let png = logo_png();
    let (content_type, body) = multipart_body(
        &[("image", "sencha.png", "image/png", png.as_slice())],
        &[("name", "Sencha"), ("category_id", category.as_str())],
    );
    let req = test::TestRequest::post()
        .uri("/api/products")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let product_id = created["product"]["id"].as_i64().expect("product id");

    store.fail_uploads();
    let (content_type, body) = multipart_body(
        &[("image", "sencha-2.png", "image/png", png.as_slice())],
        &[("name", "Sencha Premium")],
    );
    let req = test::TestRequest::put()
        .uri(&format!("/api/products/{product_id}"))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let req = test::TestRequest::get()
        .uri(&format!("/api/products/{product_id}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["name"], "Sencha");
    assert!(created["product"]["imageUrl"].is_string());
    assert_eq!(body["imageUrl"], created["product"]["imageUrl"]);
    assert_eq!(body["imageRemoteId"], created["product"]["imageRemoteId"]);
}

#[actix_web::test]
async fn duplicate_category_is_a_conflict() {
    let db = TestDb::new();
    let app = app!(db, Arc::new(MemoryMediaStore::default()));

    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let req = test::TestRequest::post()
            .uri("/api/categories")
            .set_json(json!({"name": "Teas"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);
    }
}

#[actix_web::test]
async fn health_and_unknown_routes() {
    let db = TestDb::new();
    let app = app!(db, Arc::new(MemoryMediaStore::default()));

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["environment"], "test");

    let req = test::TestRequest::get().uri("/api/nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({"success": false, "message": "Route not found", "path": "/api/nope", "method": "GET"})
    );
}
