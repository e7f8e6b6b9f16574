//! Build command - reconcile the install order and build the image

use crate::cli::args::BuildArgs;
use crate::cli::commands::plan::print_plan_table;
use crate::config::{CommitPolicy, Config, ConfigManager};
use crate::error::PylayerResult;
use crate::image::{build, generate_dockerfile, image_reference, plan_build, BuildOptions};
use crate::order::FileOrderStore;
use crate::orchestration::create_builder;
use crate::requirements::DependencySpec;
use crate::ui::{self, BuildProgress, TaskSpinner, UiContext};
use tracing::debug;

/// Execute the build command
pub async fn execute(args: BuildArgs, config: &Config) -> PylayerResult<()> {
    let ctx = UiContext::detect();

    // Parse before touching anything so a bad file leaves the store alone
    let spec = DependencySpec::load(&args.file).await?;
    let image = image_reference(&args.file, &spec.runtime_version, args.tag.as_deref());
    let store = FileOrderStore::new(ConfigManager::orders_dir(config));
    debug!("Order store: {}", store.dir().display());

    if args.dry_run {
        let plan = plan_build(&spec, &store, args.no_cache_order).await?;
        ui::intro(&ctx, &format!("Dry run: {}", image));
        print_plan_table(&plan);
        println!();
        print!(
            "{}",
            generate_dockerfile(&config.builder, &spec.runtime_version, plan.build_steps())
        );
        return Ok(());
    }

    ui::intro(&ctx, &format!("Building {}", image));

    let builder = create_builder(&config.builder);
    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!("Checking {}...", builder.builder_name()));
    if let Err(e) = builder.ensure_ready().await {
        spinner.stop_error(&format!("{} unavailable", builder.builder_name()));
        return Err(e);
    }
    spinner.stop(&format!("{} ready", builder.builder_name()));

    let commit = if args.commit_on_success {
        CommitPolicy::OnSuccess
    } else {
        config.cache.commit
    };

    let options = BuildOptions {
        image: image.clone(),
        commit,
        ignore_recorded: args.no_cache_order,
        keep_build_dir: args.keep_build_dir,
        builds_dir: ConfigManager::builds_dir(),
    };

    let progress = BuildProgress::new(&ctx, &image);
    let result = build(
        &spec,
        &store,
        &*builder,
        &config.builder,
        &options,
        &|line: String| progress.on_line(line),
    )
    .await;
    progress.finish();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            if commit == CommitPolicy::Always {
                ui::remark(&ctx, "Recorded install order was updated before the build");
            }
            ui::outro_error(&ctx, "Build failed");
            return Err(e);
        }
    };

    let plan = &outcome.plan;
    ui::step_ok_detail(
        &ctx,
        &format!("{} install layers", plan.build_steps().len()),
        &format!(
            "{} reused, {} rebuilt, {} dropped",
            plan.reusable(),
            plan.build_steps().len() - plan.reusable(),
            plan.dropped().len()
        ),
    );
    if !plan.is_changed() {
        ui::step_info(&ctx, "Install order unchanged");
    }
    if let Some(ref dir) = outcome.build_dir {
        ui::key_value(&ctx, "build context", &dir.display().to_string());
    }

    ui::outro_success(&ctx, &format!("Built {}", outcome.image));
    Ok(())
}
