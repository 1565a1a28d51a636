mod credentials;
mod loader;
mod types;

pub use credentials::{SecureString, SESSION_TOKEN_ENV};
pub use loader::ConfigError;
pub use types::{ApiConfig, Config, ViewerConfig};
