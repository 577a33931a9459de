// S3 Gateway - streams objects out of S3-compatible storage over HTTP

pub mod config;
pub mod models;
pub mod types;
pub mod storage;
pub mod routes;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;
