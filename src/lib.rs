//! pylayer - Python container images with stable dependency layers
//!
//! Reads a requirements file, merges its dependencies into the install
//! order recorded for the same Python version, and builds an image with
//! one layer per dependency in that order.

pub mod cli;
pub mod config;
pub mod error;
pub mod image;
pub mod orchestration;
pub mod order;
pub mod requirements;
pub mod ui;

pub use error::{PylayerError, PylayerResult};
