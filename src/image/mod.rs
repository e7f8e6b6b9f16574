//! Image assembly
//!
//! Turns a reconciled install order into a build context and hands it to
//! an `ImageBuilder`. Images are named after the requirements file and
//! tagged with the Python version.

pub mod build;
pub mod dockerfile;
pub mod naming;

pub use build::{build, plan_build, BuildOptions, BuildOutcome};
pub use dockerfile::{base_image, generate_dockerfile, plan_digest};
pub use naming::{derive_image_name, image_reference};
