//! Container engine CLI builder
//!
//! Implements `ImageBuilder` by shelling out to `podman build` or
//! `docker build`. Both accept the same arguments for what we need.

use crate::config::Engine;
use crate::error::{PylayerError, PylayerResult};
use crate::orchestration::builder::ImageBuilder;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::debug;

/// Image builder driving a container engine executable
pub struct EngineBuilder {
    engine: Engine,
}

impl EngineBuilder {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    /// Check if the engine executable is installed
    async fn engine_installed(&self) -> bool {
        Command::new(self.engine.program())
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Spawn an engine command with stdout and stderr piped
    fn spawn_piped(&self, args: &[&str]) -> PylayerResult<Child> {
        debug!("Spawning: {} {:?}", self.engine, args);

        Command::new(self.engine.program())
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| PylayerError::command_failed(format!("{} {:?}", self.engine, args), e))
    }
}

#[async_trait]
impl ImageBuilder for EngineBuilder {
    async fn ensure_ready(&self) -> PylayerResult<()> {
        if !self.engine_installed().await {
            return Err(PylayerError::EngineNotFound(self.engine.to_string()));
        }
        Ok(())
    }

    async fn build_image(
        &self,
        context_dir: &Path,
        tag: &str,
        on_output: &(dyn Fn(String) + Send + Sync),
    ) -> PylayerResult<()> {
        let context_str = context_dir.display().to_string();
        let mut child = self.spawn_piped(&["build", "-t", tag, &context_str])?;

        let all_output = super::stream_child_output(&mut child, on_output).await?;

        let status = child
            .wait()
            .await
            .map_err(|e| PylayerError::command_failed(format!("{} build", self.engine), e))?;

        if !status.success() {
            let combined = all_output.join("\n");
            return Err(PylayerError::ImageBuild {
                tag: tag.to_string(),
                reason: super::build_error_output(&combined, ""),
            });
        }

        Ok(())
    }

    fn builder_name(&self) -> &'static str {
        match self.engine {
            Engine::Podman => "Podman",
            Engine::Docker => "Docker",
        }
    }
}
