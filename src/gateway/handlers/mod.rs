//! HTTP handlers

pub mod account;
pub mod health;
pub mod transaction;

// Glob re-exports keep the utoipa `__path_*` items next to their handlers
pub use account::*;
pub use health::*;
pub use transaction::*;
