//! Core library surface for the Towermourne knowledge base: a terminal UI for
//! adding short articles to a local SQLite table and searching them by
//! substring.
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod preview;
pub mod ui;

/// Persistence entry points used by `main.rs` and the integration tests.
pub use db::{count_articles, create_tables, ensure_schema, insert_article, search_articles};

pub use config::Config;
pub use models::{Article, NewArticle};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
