//! Route table and HTTP middleware

use axum::{
    Json, Router,
    extract::Request,
    http::{Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::books::{AppState, add_book, delete_book, list_books, login};

/// Build the application routes
///
/// - POST /login - Exchange credentials for a token
/// - GET /home - List books visible to the caller
/// - POST /addBook - Add a book (admin)
/// - DELETE /deleteBook?name= - Remove a book by name (admin)
/// - GET /health - Liveness probe
pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/home", get(list_books))
        .route("/addBook", post(add_book))
        .route("/deleteBook", delete(delete_book))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(middleware::from_fn(short_circuit_options))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// Any origin; GET, POST, DELETE and OPTIONS; Content-Type and Authorization headers
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Answer every OPTIONS request with an empty 200
async fn short_circuit_options(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(request).await
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "shelf-rs"
    }))
}
