// Re-export the lottery service building blocks for the binary and tests
pub mod api;
pub mod cache;
pub mod config;
pub mod demo;
pub mod fetch;
pub mod scrape;
pub mod types;
pub mod utils;

pub use cache::*;
pub use demo::*;
pub use fetch::*;
pub use scrape::*;
pub use types::*;
pub use utils::*;
