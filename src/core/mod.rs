//! Core domain types and the SQLite article store.

pub mod article;
pub mod store;

pub use article::Article;
pub use store::{ArticleStore, StoreStats};
