pub mod pool;
mod refresh_tokens;
pub mod reset;
mod users;
mod videos;

pub use refresh_tokens::RefreshTokenRepository;
pub use users::UserRepository;
pub use videos::VideoRepository;
