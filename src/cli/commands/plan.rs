//! Plan command - show the install order a build would use

use crate::cli::args::{OutputFormat, PlanArgs};
use crate::config::{Config, ConfigManager};
use crate::error::PylayerResult;
use crate::image::{image_reference, plan_build, plan_digest};
use crate::order::{FileOrderStore, ReconciledPlan};
use crate::requirements::DependencySpec;
use console::style;

/// Execute the plan command
pub async fn execute(args: PlanArgs, config: &Config) -> PylayerResult<()> {
    let spec = DependencySpec::load(&args.file).await?;
    let store = FileOrderStore::new(ConfigManager::orders_dir(config));
    let plan = plan_build(&spec, &store, false).await?;
    let image = image_reference(&args.file, &spec.runtime_version, None);

    match args.format {
        OutputFormat::Table => {
            println!(
                "{} {} (python {})",
                style("Plan for").bold(),
                style(&image).cyan(),
                spec.runtime_version
            );
            print_plan_table(&plan);
        }
        OutputFormat::Json => print_plan_json(&spec, &image, &plan)?,
        OutputFormat::Plain => {
            for step in plan.build_steps() {
                println!("{}", step);
            }
        }
    }

    Ok(())
}

/// How a step relates to the recorded order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepStatus {
    /// Same position as recorded; the layer can be reused
    Cached,
    /// Recorded, but an earlier change shifts it
    Rebuilt,
    /// Not recorded before
    Added,
}

impl StepStatus {
    fn marker(&self) -> console::StyledObject<&'static str> {
        match self {
            Self::Cached => style("=").green(),
            Self::Rebuilt => style("~").yellow(),
            Self::Added => style("+").cyan(),
        }
    }
}

fn step_statuses(plan: &ReconciledPlan) -> Vec<StepStatus> {
    let known = plan.known().len();
    (0..plan.build_steps().len())
        .map(|i| {
            if i < plan.reusable() {
                StepStatus::Cached
            } else if i < known {
                StepStatus::Rebuilt
            } else {
                StepStatus::Added
            }
        })
        .collect()
}

/// Print the step list with per-step markers and dropped entries
pub(crate) fn print_plan_table(plan: &ReconciledPlan) {
    let statuses = step_statuses(plan);
    let width = plan.build_steps().len().to_string().len();

    for (i, (step, status)) in plan.build_steps().iter().zip(&statuses).enumerate() {
        println!("  {} {:>width$}. {}", status.marker(), i + 1, step, width = width);
    }
    for entry in plan.dropped() {
        println!("  {} {}", style("-").red(), style(entry).dim());
    }

    println!();
    println!(
        "{} steps: {} cached, {} rebuilt, {} added, {} dropped",
        plan.build_steps().len(),
        plan.reusable(),
        plan.known().len() - plan.reusable(),
        plan.added().len(),
        plan.dropped().len()
    );
}

fn print_plan_json(spec: &DependencySpec, image: &str, plan: &ReconciledPlan) -> PylayerResult<()> {
    #[derive(serde::Serialize)]
    struct PlanJson<'a> {
        python: &'a str,
        image: &'a str,
        digest: String,
        steps: &'a [String],
        reusable: usize,
        added: &'a [String],
        dropped: &'a [String],
    }

    let json = PlanJson {
        python: &spec.runtime_version,
        image,
        digest: plan_digest(&spec.runtime_version, plan.build_steps()),
        steps: plan.build_steps(),
        reusable: plan.reusable(),
        added: plan.added(),
        dropped: plan.dropped(),
    };

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
