//! Persistence module split across logical submodules.

mod articles;
mod connection;

pub use articles::{count_articles, insert_article, search_articles};
pub use connection::{create_tables, ensure_schema};
