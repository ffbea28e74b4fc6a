mod breakdown;
mod compare;
mod parameters;
mod project;
mod shell;

use clap::{Parser, Subcommand};

use crate::{
    cli::{compare::CompareArgs, project::ProjectArgs, shell::ShellArgs},
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Project the cumulative cost of both vehicles year by year.
    #[clap(name = "project")]
    Project(Box<ProjectArgs>),

    /// Project locally and fetch the itemized breakdown from the remote service.
    #[clap(name = "compare")]
    Compare(Box<CompareArgs>),

    /// Interactively edit the parameters and watch the projection change.
    #[clap(name = "shell")]
    Shell(Box<ShellArgs>),
}

impl Command {
    pub async fn run(self) -> Result {
        match self {
            Self::Project(args) => args.run(),
            Self::Compare(args) => args.run().await,
            Self::Shell(args) => args.run().await,
        }
    }
}
