//! Validation of incoming content
//!
//! Validators are applied on the add path only; seed data loaded from
//! configuration is checked separately by the config loader.

pub mod validators;

pub use validators::{non_empty, non_zero};
