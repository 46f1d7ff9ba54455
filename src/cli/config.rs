use std::io::Write;

use sirius_client::{ConfigError, DEFAULT_API_ENDPOINT, Profile};
use tabwriter::TabWriter;

use crate::cli::{GlobalArgs, Output, color::*, yaml};

#[derive(Debug, clap::Args)]
pub(crate) struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, clap::Subcommand)]
pub(crate) enum ConfigCommand {
    /// Set a configuration value
    Set(ConfigSetArgs),
    /// Get the current configuration
    Get(ConfigGetArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[clap(rename_all = "snake_case")]
pub(crate) enum ConfigSetting {
    ApiEndpoint,
    ApiKey,
}

impl std::fmt::Display for ConfigSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSetting::ApiEndpoint => f.write_str("api_endpoint"),
            ConfigSetting::ApiKey => f.write_str("api_key"),
        }
    }
}

#[derive(Debug, clap::Args)]
#[command(after_long_help = CliExamples("
  # Point the default profile at a local SIRIUS service
  sirius-client config set api_endpoint http://localhost:8080

  # Store an API key in a named profile
  sirius-client -P remote config set api_key your_key
"))]
pub(crate) struct ConfigSetArgs {
    /// Setting name
    pub name: ConfigSetting,
    /// Value to set
    pub value: String,
}

#[derive(Debug, clap::Args)]
#[command(after_long_help = CliExamples("
  # Show the active profile
  sirius-client config get

  # Show all profiles
  sirius-client config get --all
"))]
pub(crate) struct ConfigGetArgs {
    /// Show all the available profiles
    #[arg(short, long)]
    pub all: bool,
}

pub(crate) fn handle(args: ConfigArgs, global: GlobalArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Set(args) => config_set(args, global),
        ConfigCommand::Get(args) => config_get(args, global),
    }
}

fn profile_name(global: &GlobalArgs) -> String {
    global
        .profile
        .clone()
        .or_else(|| std::env::var("SIRIUS_PROFILE").ok())
        .unwrap_or_else(|| "default".to_owned())
}

fn load_profile(global: &GlobalArgs) -> anyhow::Result<Profile> {
    Ok(Profile::from_env(&profile_name(global))?)
}

fn config_set(args: ConfigSetArgs, global: GlobalArgs) -> anyhow::Result<()> {
    if args.name == ConfigSetting::ApiEndpoint {
        args.value
            .parse::<http::Uri>()
            .map_err(|e| anyhow::anyhow!("invalid endpoint {:?}: {e}", args.value))?;
    }

    let key = args.name.to_string();
    let name = profile_name(&global);
    let profile = match Profile::from_env(&name) {
        Ok(profile) => profile,
        // Setting a value on a missing profile creates it.
        Err(ConfigError::ProfileNotFound(_)) => Profile {
            name,
            ..Profile::with_endpoint(DEFAULT_API_ENDPOINT)?
        },
        Err(e) => return Err(e.into()),
    };

    let Some(config_path) = &profile.config_path else {
        anyhow::bail!("no home directory to store the config file in");
    };

    yaml::edit(config_path, |doc| {
        let mut mapping = yaml::mapping_at_path(doc, &["profiles", &profile.name])?;
        yaml::upsert_str(&mut mapping, &key, &args.value);
        Ok(())
    })?;

    eprintln!(
        "Set {key} for profile {:?} in {}",
        profile.name,
        config_path.display()
    );

    Ok(())
}

fn config_get(args: ConfigGetArgs, global: GlobalArgs) -> anyhow::Result<()> {
    let mut out = anstream::stdout().lock();

    match (global.output.unwrap_or_default(), args.all) {
        (Output::Tty, false) => {
            let profile = load_profile(&global)?;
            let mut tw = TabWriter::new(&mut out).ansi(true);
            print_profile(&mut tw, &profile)?;
            tw.flush()?;
        }
        (Output::Tty, true) => {
            let mut tw = TabWriter::new(&mut out).ansi(true);
            for (i, profile) in Profile::load_all()?.enumerate() {
                if i > 0 {
                    writeln!(&mut tw)?;
                }
                print_profile(&mut tw, &profile)?;
            }
            tw.flush()?;
        }
        (Output::Json, false) => {
            let profile = load_profile(&global)?;
            serde_json::to_writer(&mut out, &profile)?;
            writeln!(&mut out)?;
        }
        (Output::Json, true) => {
            let profiles: Vec<_> = Profile::load_all()?.collect();
            serde_json::to_writer(&mut out, &profiles)?;
            writeln!(&mut out)?;
        }
    }

    Ok(())
}

fn print_profile(out: &mut impl Write, profile: &Profile) -> anyhow::Result<()> {
    let api_key = if profile.api_key.is_some() {
        "*********"
    } else {
        "(none)"
    };

    writeln!(out, "{HEADER}Profile {:?}{HEADER:#}", profile.name)?;
    writeln!(out, "{GREEN}API Endpoint{GREEN:#}\t{}", profile.api_endpoint)?;
    writeln!(out, "{GREEN}API Key{GREEN:#}\t{api_key}")?;

    Ok(())
}
