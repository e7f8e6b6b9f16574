//! CLI command implementations

pub mod build;
pub mod cache;
pub mod completions;
pub mod config;
pub mod plan;

pub use build::execute as build;
pub use cache::execute as cache;
pub use completions::execute as completions;
pub use config::execute as config;
pub use plan::execute as plan;
