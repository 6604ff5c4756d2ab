use axum::extract::Request;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::{from_fn, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use super::handlers::{core, students};
use super::types::{AppState, ErrorBody};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(core::health))
        .route("/api/students", get(students::list).post(students::create))
        .route(
            "/api/students/:id",
            get(students::get_one)
                .put(students::update)
                .delete(students::delete),
        )
        .fallback(unknown_route)
        .layer(from_fn(cors_middleware))
        .layer(from_fn(request_log_middleware))
        .with_state(state)
}

async fn unknown_route(method: Method, uri: axum::http::Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: format!("unknown route: {method} {}", uri.path()),
        }),
    )
        .into_response()
}

async fn request_log_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    tracing::info!(%method, %path, status = response.status().as_u16(), "request");
    response
}

/// The browser client is served from its own origin.
async fn cors_middleware(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type"),
    );
    response
}
