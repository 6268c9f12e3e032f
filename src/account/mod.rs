//! Account management module
//!
//! Account rows are created once and afterwards only mutated by the
//! transfer engine's balance-update step. They are never deleted.

pub mod models;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use models::{Account, NewAccount};
pub use repository::AccountRepository;
pub use service::AccountService;
