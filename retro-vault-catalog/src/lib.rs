//! Game catalog data model types and platform classification.
//!
//! This crate defines the catalog data model without any database
//! dependencies. Consumers can use these types directly for serialization
//! and display, or pass them to `retro-vault-db` for persistence.

pub mod classifier;
pub mod types;

pub use classifier::{
    classify, matching_rule, rules, PlatformFamily, Rule, RULES, UNKNOWN_MANUFACTURER,
};
pub use types::*;
