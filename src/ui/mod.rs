//! Terminal output
//!
//! Uses `cliclack` for interactive sessions and falls back to plain,
//! prefix-tagged lines (`[OK]`, `[WARN]`, ...) in CI or when piped.

mod context;
mod output;
mod progress;
mod prompts;
mod theme;

pub use context::UiContext;
pub use output::{
    intro, key_value, outro_error, outro_success, remark, step_info, step_ok, step_ok_detail,
    step_warn_hint,
};
pub use progress::{BuildProgress, TaskSpinner};
pub use prompts::confirm;
pub use theme::init_theme;
