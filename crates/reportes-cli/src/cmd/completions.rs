//! `rp completions` — print a shell completion script.

use anyhow::Result;
use clap::Args;
use clap_complete::{Shell, generate};
use std::io::Write;

const BIN_NAME: &str = "rp";

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script generation.
    #[arg(value_enum)]
    pub shell: Shell,
}

fn write_completions(shell: Shell, command: &mut clap::Command, out: &mut dyn Write) {
    generate(shell, command, BIN_NAME, out);
}

/// Write the completion script for `args.shell` to stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be flushed.
pub fn run_completions(args: &CompletionsArgs, command: &mut clap::Command) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_completions(args.shell, command, &mut out);
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> clap::Command {
        clap::Command::new(BIN_NAME)
            .subcommand(clap::Command::new("stats"))
            .subcommand(clap::Command::new("trend"))
    }

    #[test]
    fn bash_script_names_the_binary_and_subcommands() {
        let mut buf = Vec::new();
        write_completions(Shell::Bash, &mut command(), &mut buf);
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("_rp()"));
        assert!(script.contains("stats"));
    }

    #[test]
    fn zsh_script_is_generated() {
        let mut buf = Vec::new();
        write_completions(Shell::Zsh, &mut command(), &mut buf);
        assert!(String::from_utf8(buf).unwrap().contains("#compdef rp"));
    }
}
