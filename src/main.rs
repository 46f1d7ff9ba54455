mod cli;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt::time::ChronoUtc};

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    let default_directive = if args.global.verbose {
        "sirius_client=debug"
    } else {
        "sirius_client=info"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoUtc::new("%Y-%m-%dT%H:%M:%SZ".to_owned()))
        .with_writer(std::io::stderr)
        .init();

    cli::run(args)
}
