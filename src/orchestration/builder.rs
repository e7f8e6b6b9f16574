//! Image builder abstraction
//!
//! The build pipeline only needs to hand a prepared build context to
//! something that turns it into a tagged image. Backends implement this
//! trait; tests substitute a recording fake.

use crate::error::PylayerResult;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait ImageBuilder: Send + Sync {
    /// Fail early if the builder cannot run on this system
    async fn ensure_ready(&self) -> PylayerResult<()>;

    /// Build the context directory into an image tagged `tag`.
    ///
    /// Each line of builder output is passed to `on_output` as it arrives.
    async fn build_image(
        &self,
        context_dir: &Path,
        tag: &str,
        on_output: &(dyn Fn(String) + Send + Sync),
    ) -> PylayerResult<()>;

    /// Human-readable builder name for display
    fn builder_name(&self) -> &'static str;
}
