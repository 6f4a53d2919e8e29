//! Server module for building the HTTP service
//!
//! [`ServerBuilder`] assembles the stores and token service into an
//! [`AppState`](crate::books::AppState) and exposes it through the routes in
//! [`router`].

pub mod builder;
pub mod router;

pub use builder::ServerBuilder;
pub use router::{build_routes, cors_layer};
