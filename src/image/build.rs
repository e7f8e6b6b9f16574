//! Build pipeline
//!
//! requirements → recorded order → reconciled plan → Dockerfile → image.
//!
//! The order file is committed according to `CommitPolicy`: with `Always`
//! it is written before the builder runs, so a failed build still moves the
//! recorded order forward; with `OnSuccess` it is written only once the
//! image exists.

use crate::config::schema::{BuilderConfig, CommitPolicy};
use crate::error::{PylayerError, PylayerResult};
use crate::image::dockerfile::generate_dockerfile;
use crate::order::{reconcile, OrderStore, ReconciledPlan};
use crate::orchestration::ImageBuilder;
use crate::requirements::DependencySpec;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Per-invocation build settings
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Full image reference to produce
    pub image: String,

    /// When to write the reconciled order
    pub commit: CommitPolicy,

    /// Treat the recorded order as empty
    pub ignore_recorded: bool,

    /// Leave the build context on disk after the build
    pub keep_build_dir: bool,

    /// Parent directory for build contexts
    pub builds_dir: PathBuf,
}

/// Result of a successful build
#[derive(Debug)]
pub struct BuildOutcome {
    pub image: String,
    pub plan: ReconciledPlan,
    /// Build context, when kept
    pub build_dir: Option<PathBuf>,
}

/// Load the recorded order for the requirements' Python version and reconcile
/// the requested dependencies against it. Never writes.
pub async fn plan_build(
    spec: &DependencySpec,
    store: &dyn OrderStore,
    ignore_recorded: bool,
) -> PylayerResult<ReconciledPlan> {
    let recorded = if ignore_recorded {
        debug!("Ignoring recorded order for python {}", spec.runtime_version);
        Vec::new()
    } else {
        store.load(&spec.runtime_version).await?
    };

    let plan = reconcile(&recorded, &spec.entries);
    info!(
        "Plan for python {}: {} steps, {} reusable, {} added, {} dropped",
        spec.runtime_version,
        plan.build_steps().len(),
        plan.reusable(),
        plan.added().len(),
        plan.dropped().len()
    );
    Ok(plan)
}

/// Reconcile, commit the order, and build the image.
pub async fn build(
    spec: &DependencySpec,
    store: &dyn OrderStore,
    builder: &dyn ImageBuilder,
    config: &BuilderConfig,
    options: &BuildOptions,
    on_output: &(dyn Fn(String) + Send + Sync),
) -> PylayerResult<BuildOutcome> {
    let plan = plan_build(spec, store, options.ignore_recorded).await?;

    if options.commit == CommitPolicy::Always {
        store.save(&spec.runtime_version, plan.new_order()).await?;
    }

    let dockerfile = generate_dockerfile(config, &spec.runtime_version, plan.build_steps());
    let build_dir = prepare_build_dir(&options.builds_dir, &dockerfile).await?;
    debug!("Build context: {}", build_dir.display());

    let result = builder
        .build_image(&build_dir, &options.image, on_output)
        .await;

    let kept = if options.keep_build_dir {
        Some(build_dir)
    } else {
        // Best-effort cleanup
        if let Err(e) = tokio::fs::remove_dir_all(&build_dir).await {
            warn!("Failed to remove build context {}: {}", build_dir.display(), e);
        }
        None
    };

    if let Err(e) = result {
        if options.commit == CommitPolicy::Always {
            warn!(
                "Build failed; recorded order for python {} was already updated",
                spec.runtime_version
            );
        }
        return Err(e);
    }

    if options.commit == CommitPolicy::OnSuccess {
        store.save(&spec.runtime_version, plan.new_order()).await?;
    }

    info!("Built {}", options.image);
    Ok(BuildOutcome {
        image: options.image.clone(),
        plan,
        build_dir: kept,
    })
}

/// Create a unique build context directory containing the Dockerfile
async fn prepare_build_dir(builds_dir: &Path, dockerfile: &str) -> PylayerResult<PathBuf> {
    let build_dir = builds_dir.join(uuid::Uuid::new_v4().to_string());
    tokio::fs::create_dir_all(&build_dir)
        .await
        .map_err(|e| PylayerError::io("creating build directory", e))?;

    tokio::fs::write(build_dir.join("Dockerfile"), dockerfile)
        .await
        .map_err(|e| PylayerError::io("writing Dockerfile", e))?;

    Ok(build_dir)
}
