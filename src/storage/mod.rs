//! Storage implementations

pub mod credentials;
pub mod in_memory;

pub use credentials::InMemoryCredentialStore;
pub use in_memory::InMemoryContentStore;
