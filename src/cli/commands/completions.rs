//! Completions command - print a shell completion script

use crate::cli::args::Cli;
use crate::error::PylayerResult;
use clap::CommandFactory;
use clap_complete::Shell;

/// Execute the completions command
pub fn execute(shell: Shell) -> PylayerResult<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
