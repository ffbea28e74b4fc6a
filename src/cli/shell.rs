use std::str::FromStr;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, stdin};

use crate::{
    api::{
        breakdown::{BreakdownService, CalculateRequest},
        lifecycle::{Outcome, Requests},
    },
    cli::{
        breakdown::BreakdownArgs,
        parameters::ParametersArgs,
        project::{print_breakdown, print_projection},
    },
    core::{
        parameters::Field,
        session::{Recompute, Session},
    },
    prelude::*,
};

const HELP: &str = "\
Commands:
  set <parameter> <value>  change a parameter, for example `set monthly-km 2500`
  show                     print the parameters and the projection
  calculate                request the breakdown from the remote service
  cancel                   cancel the outstanding breakdown request
  help                     print this message
  quit                     exit";

#[derive(Parser)]
pub struct ShellArgs {
    #[clap(flatten)]
    parameters: ParametersArgs,

    #[clap(flatten)]
    breakdown: BreakdownArgs,
}

impl ShellArgs {
    #[instrument(skip_all)]
    pub async fn run(self) -> Result {
        let mut session = Session::try_new(self.parameters.load()?)?;
        let (mut requests, mut completions) = Requests::new(self.breakdown.new_client()?);
        let mut lines = BufReader::new(stdin()).lines();

        print_projection(session.projection());
        println!("{HELP}");

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("failed to read the command")? else {
                        break;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<ShellCommand>() {
                        Ok(ShellCommand::Quit) => break,
                        Ok(command) => command.execute(&mut session, &mut requests),
                        Err(error) => warn!("{error:#}"),
                    }
                }
                Some(completion) = completions.recv() => match requests.resolve(completion) {
                    Outcome::Fresh(breakdown) => print_breakdown(&breakdown),
                    Outcome::Failed(error) => warn!("the breakdown is not shown: {error:#}"),
                    Outcome::Stale => {}
                },
            }
        }

        requests.cancel();
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
enum ShellCommand {
    Set { field: Field, value: String },
    Show,
    Calculate,
    Cancel,
    Help,
    Quit,
}

impl ShellCommand {
    fn execute<S: BreakdownService + 'static>(
        self,
        session: &mut Session,
        requests: &mut Requests<S>,
    ) {
        match self {
            Self::Set { field, value } => match session.set(field, &value) {
                Ok(Recompute::Redrawn) => print_projection(session.projection()),
                Ok(Recompute::Unchanged) => info!(%field, "unchanged"),
                Err(error) => warn!("rejected: {error:#}"),
            },
            Self::Show => {
                println!("{:#?}", session.parameters());
                print_projection(session.projection());
            }
            Self::Calculate => {
                let generation = requests.submit(CalculateRequest::from(session.parameters()));
                info!(generation, "requested the breakdown…");
            }
            Self::Cancel => {
                if !requests.cancel() {
                    info!("nothing to cancel");
                }
            }
            Self::Help => println!("{HELP}"),
            Self::Quit => {}
        }
    }
}

impl FromStr for ShellCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = match words.next() {
            Some("set") => {
                let field = words.next().context("missing parameter name")?.parse()?;
                let value = words.next().context("missing parameter value")?.to_string();
                Self::Set { field, value }
            }
            Some("show") => Self::Show,
            Some("calculate") => Self::Calculate,
            Some("cancel") => Self::Cancel,
            Some("help" | "?") => Self::Help,
            Some("quit" | "exit") => Self::Quit,
            Some(command) => bail!("unknown command `{command}`, try `help`"),
            None => bail!("empty command"),
        };
        ensure!(words.next().is_none(), "unexpected trailing arguments");
        Ok(command)
    }
}
