use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(author, version, about = "Project automation commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the testpick test suite through cargo nextest
    Nextest {
        #[arg(long)]
        profile: Option<String>,
        /// Only run tests whose name matches this filter
        filter: Option<String>,
    },
    /// Run the tests and review pending insta snapshots
    Snapshots {
        /// Accept every pending snapshot instead of reviewing interactively
        #[arg(long)]
        accept: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Nextest { profile, filter } => run_nextest(profile, filter),
        Commands::Snapshots { accept } => review_snapshots(accept),
    }
}

fn run_nextest(profile: Option<String>, filter: Option<String>) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["nextest", "run", "-p", "testpick"]);
    if let Some(profile) = profile {
        cmd.arg("--profile").arg(profile);
    }
    if let Some(filter) = filter {
        cmd.arg(filter);
    }
    run(cmd, "cargo nextest run")
}

fn review_snapshots(accept: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["insta", "test", "-p", "testpick"]);
    cmd.arg(if accept { "--accept" } else { "--review" });
    run(cmd, "cargo insta test")
}

fn run(mut cmd: Command, label: &str) -> Result<()> {
    let status = cmd
        .status()
        .with_context(|| format!("failed to launch {label}"))?;
    if !status.success() {
        anyhow::bail!("{label} failed");
    }
    Ok(())
}
