//! Transaction records: the immutable history of transfer attempts

pub mod models;
pub mod repository;

pub use models::{
    INSUFFICIENT_BALANCE_MESSAGE, NewTransaction, TransactionRecord, TransactionStatus,
};
pub use repository::TransactionRepository;
