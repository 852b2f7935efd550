//! Infrastructure layer - database and Redis.

mod cache;
mod db;
pub mod migrations;

pub use cache::Cache;
pub use db::Database;
pub use migrations::Migrator;
