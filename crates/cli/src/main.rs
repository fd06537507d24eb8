use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod cmd;
mod output;

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .without_time()
    .init();

  let cli = cli::Cli::parse();
  match cli.command {
    cli::Command::Build {
      branch,
      chromium_branch,
      build_type,
      platform,
      clean,
      jobs,
    } => cmd::cmd_build(
      &cli.root,
      branch,
      chromium_branch,
      build_type,
      platform,
      clean,
      jobs,
    ),
    cli::Command::Resolve => cmd::cmd_resolve(),
    cli::Command::Status => cmd::cmd_status(&cli.root),
  }
}
