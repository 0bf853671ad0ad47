//! Authentication: HS256 access tokens, refresh tokens and password hashing.

pub mod jwt;
pub mod models;
pub mod password;
pub mod tokens;

pub use models::AuthUser;
