//! Database repositories for data access layer
//!
//! SQLite-backed repositories for users, refresh tokens and video metadata. Each
//! repository owns a pool handle and maps sqlx failures into `AppError`.

pub mod db;

pub use db::pool::{connect, run_migrations};
pub use db::reset::reset_database;
pub use db::{RefreshTokenRepository, UserRepository, VideoRepository};
