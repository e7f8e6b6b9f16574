//! Progress indicators with CI fallback

use super::context::UiContext;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// A task spinner with CI fallback
pub struct TaskSpinner {
    spinner: Option<cliclack::ProgressBar>,
    interactive: bool,
}

impl TaskSpinner {
    pub fn new(ctx: &UiContext) -> Self {
        Self {
            spinner: None,
            interactive: ctx.use_fancy_output(),
        }
    }

    /// Start the spinner with a message
    pub fn start(&mut self, message: &str) {
        if self.interactive {
            let spinner = cliclack::spinner();
            spinner.start(message);
            self.spinner = Some(spinner);
        } else {
            println!("{} {}", style("...").dim(), message);
        }
    }

    /// Stop with success message
    pub fn stop(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.stop(message);
        } else {
            println!("{} {}", style("[OK]").green(), message);
        }
    }

    /// Stop with error message
    pub fn stop_error(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.error(message);
        } else {
            println!("{} {}", style("[FAIL]").red(), message);
        }
    }
}

/// Progress bar for image builds.
///
/// Understands the step markers printed by podman (`STEP 3/9: RUN ...`),
/// the classic docker builder (`Step 3/9 : RUN ...`) and BuildKit plain
/// output (`#7 [3/9] RUN ...`).
pub struct BuildProgress {
    bar: Option<ProgressBar>,
}

impl BuildProgress {
    /// Shows an indicatif bar in interactive mode, plain text in CI.
    pub fn new(ctx: &UiContext, label: &str) -> Self {
        let bar = if ctx.use_fancy_output() {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("  {spinner:.cyan} Building {prefix}  {bar:20.cyan/dim} {pos}/{len} {msg:.dim}  {elapsed:.dim}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                    .progress_chars("━╸─"),
            );
            bar.set_prefix(label.to_string());
            bar.enable_steady_tick(std::time::Duration::from_millis(120));
            Some(bar)
        } else {
            println!("Building {}...", label);
            None
        };
        Self { bar }
    }

    /// Process a build output line
    pub fn on_line(&self, line: String) {
        if let Some((n, total, instruction)) = parse_step_line(&line) {
            if let Some(ref bar) = self.bar {
                bar.set_length(total);
                bar.set_position(n);
                bar.set_message(instruction.to_string());
            } else {
                println!("  STEP {}/{}: {}", n, total, instruction);
            }
        } else if let Some(ref bar) = self.bar {
            let trimmed = line.trim();
            if !trimmed.is_empty() && !is_build_noise(trimmed) {
                bar.set_message(truncate(trimmed, 60));
            }
        }
    }

    /// Finish and clear the progress bar.
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}

/// Filter out builder bookkeeping lines that aren't useful to display.
fn is_build_noise(line: &str) -> bool {
    line.starts_with("--->")
        || line.starts_with("-->")
        || line.starts_with("Removing intermediate")
        || line.starts_with("COMMIT")
        || line.starts_with("Successfully tagged")
}

fn truncate(line: &str, max_chars: usize) -> String {
    if line.chars().count() > max_chars {
        let head: String = line.chars().take(max_chars - 3).collect();
        format!("{}...", head)
    } else {
        line.to_string()
    }
}

/// Parse a build step line into (step, total, instruction)
fn parse_step_line(line: &str) -> Option<(u64, u64, &str)> {
    let (counter, instruction) = if let Some(rest) = line.strip_prefix("STEP ") {
        rest.split_once(':')?
    } else if let Some(rest) = line.strip_prefix("Step ") {
        rest.split_once(" : ")?
    } else if line.starts_with('#') {
        let open = line.find('[')?;
        let close = line.find(']')?;
        if close <= open {
            return None;
        }
        (&line[open + 1..close], &line[close + 1..])
    } else {
        return None;
    };

    let (n, total) = counter.trim().split_once('/')?;
    let n: u64 = n.trim().parse().ok()?;
    let total: u64 = total.trim().parse().ok()?;
    Some((n, total, instruction.trim()))
}
