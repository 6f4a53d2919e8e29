//! Loading configuration from YAML files on disk

use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use serde_json::json;
use shelf::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

const CUSTOM: &str = r#"
server:
  bind: "127.0.0.1:3000"
auth:
  secret: "file-secret"
  token_ttl_hours: 1
users:
  - username: librarian
    password: hunter2
    role: admin
  - username: reader
    password: reader1
    role: regular
books:
  base:
    - name: Dune
      author: Frank Herbert
      publicationYear: 1965
  privileged:
    - name: Necronomicon
      author: Abdul Alhazred
      publicationYear: 730
"#;

#[test]
fn test_load_full_file() {
    let file = write_config(CUSTOM);
    let config = ShelfConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();

    assert_eq!(config.server.bind, "127.0.0.1:3000");
    assert_eq!(config.auth.secret, "file-secret");
    assert_eq!(config.auth.token_ttl_hours, 1);
    assert_eq!(config.users.len(), 2);
    assert_eq!(config.users[0].role, Role::Admin);
    assert_eq!(config.books.base, vec![Book::new("Dune", "Frank Herbert", 1965)]);
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_file_reports_path() {
    let err = ShelfConfig::from_yaml_file("/nonexistent/shelf.yaml").unwrap_err();
    assert!(format!("{:#}", err).contains("/nonexistent/shelf.yaml"));
}

#[test]
fn test_invalid_yaml_is_rejected() {
    let file = write_config("auth: [not, a, map]\n");
    assert!(ShelfConfig::from_yaml_file(file.path().to_str().unwrap()).is_err());
}

#[test]
fn test_invalid_seed_fails_validation() {
    let file = write_config(
        "books:\n  base:\n    - name: Nameless\n      author: \"\"\n      publicationYear: 2000\n",
    );
    let config = ShelfConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_env_overrides_apply_on_top_of_file() {
    let file = write_config(CUSTOM);
    let config = ShelfConfig::from_yaml_file(file.path().to_str().unwrap())
        .unwrap()
        .with_overrides(|key| match key {
            "SHELF_JWT_SECRET" => Some("override".to_string()),
            _ => None,
        })
        .unwrap();

    assert_eq!(config.auth.secret, "override");
    assert_eq!(config.server.bind, "127.0.0.1:3000");
}

#[tokio::test]
async fn test_server_runs_on_file_config() {
    let file = write_config(CUSTOM);
    let config = ShelfConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();
    let server = TestServer::new(ServerBuilder::new().with_config(config).build().unwrap());

    server
        .post("/login")
        .json(&json!({ "username": "admin", "password": "admin123" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let token = server
        .post("/login")
        .json(&json!({ "username": "librarian", "password": "hunter2" }))
        .await
        .json::<LoginResponse>()
        .token;

    let ctx = TokenService::with_secret(b"file-secret").verify(&token).unwrap();
    assert_eq!(ctx.role, Role::Admin);

    let books = server
        .get("/home")
        .add_header(header::AUTHORIZATION, HeaderValue::from_str(&token).unwrap())
        .await
        .json::<Vec<Book>>();
    let names: Vec<_> = books.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["Dune", "Necronomicon"]);
}
