//! HTTP handlers for login and book operations
//!
//! Protected handlers follow the same sequence:
//! 1. [`AuthContext`] extraction (token present, verified, claims readable)
//! 2. [`AccessPolicy::authorize`] for the requested [`Action`]
//! 3. body/query decoding
//! 4. the content store call

use axum::{
    Json,
    body::Bytes,
    extract::{FromRef, Query, State},
    http::{StatusCode, Uri},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::error::{AuthError, RequestError, ShelfError};
use crate::core::extractors::parse_json;
use crate::core::service::{ContentStore, CredentialStore, RemoveOutcome};
use crate::core::{AccessPolicy, Action, AuthContext, Book, TokenService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<dyn CredentialStore>,
    pub content: Arc<dyn ContentStore>,
    pub tokens: TokenService,
}

impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

/// Request body for login
///
/// Absent fields decode as empty strings and simply fail authentication.
/// Any `role` sent by the client is ignored.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Response for a successful login
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<LoginResponse>, ShelfError> {
    let request: LoginRequest = parse_json(&body)?;

    let Some(role) = state
        .credentials
        .authenticate(&request.username, &request.password)
        .await
    else {
        tracing::warn!(username = %request.username, "login failed");
        return Err(AuthError::InvalidCredentials.into());
    };

    let token = state.tokens.issue(&request.username, role)?;

    tracing::info!(username = %request.username, %role, "user logged in");

    Ok(Json(LoginResponse { token }))
}

/// GET /home
pub async fn list_books(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<Book>>, ShelfError> {
    AccessPolicy::authorize(&auth, Action::ListBooks)?;

    let books = state.content.list_visible(auth.role).await?;
    Ok(Json(books))
}

/// POST /addBook
pub async fn add_book(
    State(state): State<AppState>,
    auth: AuthContext,
    body: Bytes,
) -> Result<StatusCode, ShelfError> {
    AccessPolicy::authorize(&auth, Action::AddBook)?;

    let book: Book = parse_json(&body)?;
    let name = book.name.clone();
    state.content.add(book).await?;

    tracing::info!(username = %auth.username, book = %name, "book added");

    Ok(StatusCode::CREATED)
}

/// DELETE /deleteBook?name=...
///
/// Answers `204 No Content` whether or not a book was removed. The query is
/// read only after the policy check; a repeated `name` uses the first value.
pub async fn delete_book(
    State(state): State<AppState>,
    auth: AuthContext,
    uri: Uri,
) -> Result<StatusCode, ShelfError> {
    AccessPolicy::authorize(&auth, Action::DeleteBook)?;

    let name = book_name_param(&uri)?;

    match state.content.remove(&name).await? {
        RemoveOutcome::Removed(book) => {
            tracing::info!(username = %auth.username, book = %book.name, "book removed");
        }
        RemoveOutcome::NotFound => {
            tracing::debug!(username = %auth.username, book = %name, "no book to remove");
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Value of the first `name` pair in the query string, which must not be empty
fn book_name_param(uri: &Uri) -> Result<String, ShelfError> {
    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri).map_err(|e| {
        RequestError::MalformedBody {
            message: e.body_text(),
        }
    })?;

    pairs
        .into_iter()
        .find(|(key, _)| key == "name")
        .map(|(_, value)| value)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            RequestError::MissingParameter {
                parameter: "name".to_string(),
            }
            .into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShelfConfig;
    use crate::core::{Partition, Role};
    use crate::storage::{InMemoryContentStore, InMemoryCredentialStore};

    fn state() -> (AppState, InMemoryContentStore) {
        let config = ShelfConfig::default_config();
        let content = InMemoryContentStore::from_config(&config.books);
        let state = AppState {
            credentials: Arc::new(InMemoryCredentialStore::from_config(&config.users)),
            content: Arc::new(content.clone()),
            tokens: TokenService::with_secret(b"handler-tests"),
        };
        (state, content)
    }

    #[tokio::test]
    async fn test_login_issues_token_with_stored_role() {
        let (state, _) = state();
        let body = Bytes::from_static(br#"{"username":"user","password":"user123","role":"admin"}"#);
        let Json(response) = login(State(state.clone()), body).await.unwrap();
        let ctx = state.tokens.verify(&response.token).unwrap();
        assert_eq!(ctx.role, Role::Regular);
    }

    #[tokio::test]
    async fn test_login_bad_credentials() {
        let (state, _) = state();
        let body = Bytes::from_static(br#"{"username":"user","password":"nope"}"#);
        let err = login(State(state), body).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Invalid username or password");
    }

    #[tokio::test]
    async fn test_login_missing_fields_is_unauthorized() {
        let (state, _) = state();
        let err = login(State(state), Bytes::from_static(b"{}")).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_bad_json_is_bad_request() {
        let (state, _) = state();
        let err = login(State(state), Bytes::from_static(b"username=admin"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_regular_add_forbidden_before_body_parse() {
        let (state, content) = state();
        let auth = AuthContext::new("user", Role::Regular);
        let err = add_book(State(state), auth, Bytes::from_static(b"garbage"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Unauthorized");
        assert_eq!(content.len(Partition::Base).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_admin_add_validation() {
        let (state, content) = state();
        let auth = AuthContext::new("admin", Role::Admin);
        let body = Bytes::from_static(br#"{"name":"","author":"A","publicationYear":1}"#);
        let err = add_book(State(state), auth, body).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid book data");
        assert_eq!(content.len(Partition::Base).await.unwrap(), 2);
    }

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_delete_without_name() {
        let (state, _) = state();
        let auth = AuthContext::new("admin", Role::Admin);
        for target in ["/deleteBook", "/deleteBook?name=", "/deleteBook?title=Book%201"] {
            let err = delete_book(State(state.clone()), auth.clone(), uri(target))
                .await
                .unwrap_err();
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "{}", target);
            assert_eq!(err.to_string(), "Missing book name parameter");
        }
    }

    #[tokio::test]
    async fn test_delete_unknown_name_still_no_content() {
        let (state, content) = state();
        let auth = AuthContext::new("admin", Role::Admin);
        let status = delete_book(State(state), auth, uri("/deleteBook?name=Book%2042"))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(content.len(Partition::Base).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_repeated_name_uses_first() {
        let (state, content) = state();
        let auth = AuthContext::new("admin", Role::Admin);
        let status = delete_book(
            State(state),
            auth,
            uri("/deleteBook?name=book%201&name=Book%202"),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let remaining = content.list(&[Partition::Base]).await.unwrap();
        assert_eq!(remaining, vec![Book::new("Book 2", "Author 2", 2019)]);
    }

    #[tokio::test]
    async fn test_regular_delete_forbidden_before_query_parse() {
        let (state, content) = state();
        let auth = AuthContext::new("user", Role::Regular);
        for target in ["/deleteBook?name=Book%201&name=Book%202", "/deleteBook"] {
            let err = delete_book(State(state.clone()), auth.clone(), uri(target))
                .await
                .unwrap_err();
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
            assert_eq!(err.to_string(), "Unauthorized");
        }
        assert_eq!(content.len(Partition::Base).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_list_for_regular() {
        let (state, _) = state();
        let Json(books) = list_books(State(state), AuthContext::new("user", Role::Regular))
            .await
            .unwrap();
        assert_eq!(books.len(), 2);
    }
}
