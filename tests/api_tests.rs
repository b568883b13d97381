mod test_utils;

use actix_web::{
    http::{header, StatusCode},
    middleware::NormalizePath,
    test, web, App,
};
use chrono::Duration;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use screensort_backend::{middlewares::auth::AuthMiddleware, routes::configure_routes, AppState};
use test_utils::*;

/// State backed by a pool that never connects. Only requests answered
/// before any query is issued are exercised here.
fn app_state() -> web::Data<AppState> {
    let config = test_config();
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy(&config.database_url)
        .expect("Failed to build lazy pool");

    web::Data::new(AppState::new(&config, pool).expect("Failed to build app state"))
}

macro_rules! init_app {
    () => {
        test::init_service(
            App::new()
                .app_data(app_state())
                .wrap(AuthMiddleware)
                .wrap(NormalizePath::trim())
                .configure(configure_routes),
        )
        .await
    };
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

#[actix_rt::test]
async fn home_is_public() {
    let app = init_app!();

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["endpoints"]["health"], "/api/v1/health");
}

#[actix_rt::test]
async fn library_routes_require_a_token() {
    let app = init_app!();

    for uri in ["/api/v1/images", "/api/v1/search?q=car"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[actix_rt::test]
async fn token_signed_with_another_secret_is_rejected() {
    let app = init_app!();
    let token = sign_token(
        &Uuid::new_v4().to_string(),
        "a-completely-different-secret-of-enough-length",
        Duration::hours(1),
    );

    let req = test::TestRequest::get()
        .uri("/api/v1/search?q=car")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn expired_token_is_rejected() {
    let app = init_app!();
    let token = sign_token(&Uuid::new_v4().to_string(), TEST_SECRET, Duration::hours(-2));

    let req = test::TestRequest::get()
        .uri("/api/v1/search?q=car")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn non_uuid_subject_is_a_bad_request() {
    let app = init_app!();
    let token = sign_token("service-account", TEST_SECRET, Duration::hours(1));

    let req = test::TestRequest::get()
        .uri("/api/v1/search?q=")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn blank_search_returns_empty_list() {
    let app = init_app!();
    let token = owner_token(Uuid::new_v4());

    for uri in ["/api/v1/search?q=", "/api/v1/search?q=%20%20", "/api/v1/search/", "/api/v1/search?q=&mode=tags"] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!([]), "{uri}");
    }
}

#[actix_rt::test]
async fn unknown_search_mode_is_a_bad_request() {
    let app = init_app!();
    let token = owner_token(Uuid::new_v4());

    let req = test::TestRequest::get()
        .uri("/api/v1/search?q=car&mode=fuzzy")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap_or_default().contains("fuzzy"));
}

#[actix_rt::test]
async fn malformed_image_id_is_a_bad_request() {
    let app = init_app!();
    let token = owner_token(Uuid::new_v4());

    let req = test::TestRequest::get()
        .uri("/api/v1/images/not-a-uuid")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn malformed_json_body_is_a_bad_request() {
    let app = init_app!();
    let token = owner_token(Uuid::new_v4());

    let req = test::TestRequest::post()
        .uri("/api/v1/images")
        .insert_header(bearer(&token))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"file_name\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap_or_default().starts_with("JSON payload error"));
}

#[actix_rt::test]
async fn invalid_new_image_is_rejected_before_storage() {
    let app = init_app!();
    let token = owner_token(Uuid::new_v4());

    let req = test::TestRequest::post()
        .uri("/api/v1/images")
        .insert_header(bearer(&token))
        .set_json(serde_json::json!({
            "file_name": "",
            "file_url": "not a url",
            "file_size": 10
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
