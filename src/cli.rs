mod color;
mod compound;
mod config;
mod database;
mod feature;
mod foldchange;
mod job;
mod project;
mod run;
mod spinner;
mod tag;
mod yaml;

use std::{io::Write as _, str::FromStr, time};

use anyhow::bail;
use serde::Serialize;
use sirius_client::{
    ApiRequest, Client, ClientError, PagedModel, Profile,
    account::{GetAccountInfo, IsLoggedIn},
};

use clap::{Parser, Subcommand};
use tabwriter::TabWriter;
use tracing::debug;

use crate::cli::color::*;

#[derive(Debug, Parser)]
#[command(
    name = "sirius-client",
    about = "A command-line client for the SIRIUS REST API",
    version = env!("SIRIUS_CLIENT_VERSION"),
    propagate_version = true
)]
pub(crate) struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// How to format output.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum Output {
    Json,
    #[default]
    Tty,
}

/// key=value string pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeyValue(String, String);

impl KeyValue {
    fn into_strings(self) -> (String, String) {
        (self.0, self.1)
    }
}

impl FromStr for KeyValue {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((left, right)) = s.split_once('=') else {
            bail!("Invalid key=value pair: {}", s);
        };

        Ok(KeyValue(left.to_owned(), right.to_owned()))
    }
}

#[derive(Debug, clap::Args)]
#[command(next_help_heading = "Global Options")]
pub(crate) struct GlobalArgs {
    /// Name of the profile to use
    #[arg(long, short = 'P', global = true)]
    pub profile: Option<String>,
    /// Output format
    #[arg(long, short = 'O', global = true)]
    pub output: Option<Output>,
    /// Timeout (in seconds) for client operations (-1 = no timeout)
    #[arg(long, global = true)]
    pub client_timeout: Option<i64>,
    /// Print verbose logs
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// The project a command operates on.
#[derive(Debug, clap::Args)]
pub(crate) struct ProjectArg {
    /// Project id
    #[arg(long, short = 'p')]
    pub project: String,
}

/// Paging options for list commands.
#[derive(Debug, clap::Args)]
pub(crate) struct PageArgs {
    /// Limit the number of results to show
    #[arg(long)]
    pub limit: Option<usize>,
    /// Number of results to fetch per request
    #[arg(long, default_value = "100")]
    pub page_size: u32,
    /// Sort criteria, e.g. "name,asc" (can be specified multiple times)
    #[arg(long, action = clap::ArgAction::Append)]
    pub sort: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Print version.
    Version,
    /// Print debug information about the current environment
    Info,
    /// Configure SIRIUS client settings
    Config(config::ConfigArgs),
    /// Manage projects
    Project(project::ProjectArgs),
    /// Manage compounds
    Compound(compound::CompoundArgs),
    /// Manage aligned features
    Feature(feature::FeatureArgs),
    /// Manage jobs
    Job(job::JobArgs),
    /// Manage LC-MS runs
    Run(run::RunArgs),
    /// Manage tag definitions
    Tag(tag::TagArgs),
    /// Manage tag groups
    Group(tag::GroupArgs),
    /// Manage searchable databases
    Db(database::DatabaseArgs),
    /// Compute and show fold changes between tag groups
    Foldchange(foldchange::FoldChangeArgs),
}

pub(crate) struct Cli {
    pub(crate) global: GlobalArgs,
    pub(crate) client: Client,
    pub(crate) multiprogress: indicatif::MultiProgress,
}

pub(crate) fn run(args: Args) -> anyhow::Result<()> {
    // Some commands don't require any config.
    match args.command {
        Command::Version => {
            println!("sirius-client {}", env!("SIRIUS_CLIENT_VERSION"));
            return Ok(());
        }
        Command::Config(config_args) => return config::handle(config_args, args.global),
        _ => (),
    }

    let profile = if let Some(name) = args.global.profile.as_deref() {
        Profile::from_env(name)
    } else {
        Profile::from_default_env()
    };

    let profile = profile?.with_ua_product("sirius-client-cli");

    let timeout = match args.global.client_timeout {
        Some(-1) => None,
        None => Some(sirius_client::DEFAULT_TIMEOUT),
        Some(v) if v > 0 => Some(time::Duration::from_secs(v as _)),
        Some(v) => bail!("Invalid timeout value: {v}"),
    };

    debug!(?profile, command = ?args.command, "cli invocation");

    let cli = Cli {
        client: Client::with_timeout(profile, timeout),
        global: args.global,
        multiprogress: indicatif::MultiProgress::new(),
    };

    match args.command {
        Command::Version => unreachable!(),
        Command::Config(_) => unreachable!(),
        Command::Info => handle_info(&cli),
        Command::Project(args) => project::handle(&cli, args),
        Command::Compound(args) => compound::handle(&cli, args),
        Command::Feature(args) => feature::handle(&cli, args),
        Command::Job(args) => job::handle(&cli, args),
        Command::Run(args) => run::handle(&cli, args),
        Command::Tag(args) => tag::handle(&cli, args),
        Command::Group(args) => tag::handle_group(&cli, args),
        Command::Db(args) => database::handle(&cli, args),
        Command::Foldchange(args) => foldchange::handle(&cli, args),
    }
}

impl Cli {
    pub(crate) fn profile(&self) -> &Profile {
        self.client.profile()
    }

    pub(crate) fn output(&self) -> Output {
        self.global.output.unwrap_or_default()
    }

    pub(crate) fn roundtrip<T: ApiRequest>(&self, req: T) -> anyhow::Result<T::Response> {
        Ok(self.client.roundtrip(req)?)
    }

    /// Fetches all pages of a paged request, up to the limit.
    pub(crate) fn paginate<R, T>(
        &self,
        req: R,
        page: &PageArgs,
    ) -> anyhow::Result<impl Iterator<Item = anyhow::Result<T>>>
    where
        R: ApiRequest<Response = PagedModel<T>> + Clone,
    {
        let iter = self.client.paginate_sorted(
            req,
            Some(page.page_size),
            page.sort.clone(),
            page.limit,
        )?;

        Ok(iter.map(|r| r.map_err(anyhow::Error::from)))
    }
}

/// Returns true if the error is a 404 from the server.
pub(crate) fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ClientError>()
        .and_then(ClientError::api_error)
        .is_some_and(|e| e.is_not_found())
}

pub(crate) fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer(&mut out, value)?;
    writeln!(&mut out)?;
    Ok(())
}

/// Formats an optional value, or an empty string.
pub(crate) fn opt<T: std::fmt::Display>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

fn handle_info(cli: &Cli) -> anyhow::Result<()> {
    let mut out = anstream::stdout().lock();
    let mut tw = TabWriter::new(&mut out).ansi(true);

    let profile = cli.profile();
    writeln!(&mut tw, "{GREEN}Profile{GREEN:#}\t{}", profile.name)?;
    writeln!(&mut tw, "{GREEN}Endpoint{GREEN:#}\t{}", profile.api_endpoint)?;
    writeln!(
        &mut tw,
        "{GREEN}Client Version{GREEN:#}\t{}",
        env!("SIRIUS_CLIENT_VERSION")
    )?;

    let logged_in = cli.roundtrip(IsLoggedIn)?;
    writeln!(&mut tw, "{GREEN}Logged In{GREEN:#}\t{logged_in}")?;

    if logged_in {
        let account = cli.roundtrip(GetAccountInfo {
            include_subs: Some(true),
        })?;

        writeln!(&mut tw, "\n{HEADER}Account{HEADER:#}")?;
        writeln!(&mut tw, "{BLUE}Username{BLUE:#}\t{}", opt(account.username))?;
        writeln!(&mut tw, "{BLUE}Email{BLUE:#}\t{}", opt(account.user_email))?;

        let active = account.active_subscription_id.as_deref();
        for sub in account.subscriptions.unwrap_or_default() {
            let marker = if Some(sub.sid.as_str()) == active {
                "*"
            } else {
                " "
            };

            writeln!(
                &mut tw,
                "{BLUE}Subscription{BLUE:#}\t{marker} {} {}",
                sub.sid,
                Styled(DIM, opt(sub.name))
            )?;
        }
    }

    tw.flush()?;
    Ok(())
}
