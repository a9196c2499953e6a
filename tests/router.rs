mod common;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use catering_api::routes::create_app;
use tower::ServiceExt;

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_route_responds() {
    let app = create_app(common::lazy_state());

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn unknown_route_falls_back_to_404() {
    let app = create_app(common::lazy_state());

    let response = app
        .oneshot(
            Request::get("/api/nowhere")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["data"]["path"], "/api/nowhere");
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() {
    for uri in ["/api/users/me", "/api/orders/getallorders", "/api/payments"] {
        let response = create_app(common::lazy_state())
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn garbage_tokens_are_rejected() {
    let response = create_app(common::lazy_state())
        .oneshot(
            Request::post("/api/notifications/send-sms")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"to":"+442079460958","message":"hi"}"#))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn docs_are_served() {
    let response = create_app(common::lazy_state())
        .oneshot(Request::get("/docs").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
}
