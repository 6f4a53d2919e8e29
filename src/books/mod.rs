//! Book endpoints: login, listing and mutation

pub mod handlers;

pub use handlers::{AppState, LoginRequest, LoginResponse, add_book, delete_book, list_books, login};
