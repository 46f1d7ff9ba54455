use std::io::Write as _;

use sirius_client::database::*;
use tabwriter::TabWriter;

use crate::cli::{Cli, Output, color::*, is_not_found, opt, print_json};

#[derive(Debug, clap::Args)]
pub(crate) struct DatabaseArgs {
    #[command(subcommand)]
    pub command: DatabaseCommand,
}

#[derive(Debug, clap::Subcommand)]
pub(crate) enum DatabaseCommand {
    /// List searchable databases
    #[clap(alias = "list")]
    Ls(DatabaseLsArgs),
    /// Get information about a database
    Get(DatabaseGetArgs),
    /// Create a custom database
    Create(DatabaseCreateArgs),
    /// Remove a custom database
    #[clap(alias = "delete")]
    Rm(DatabaseRmArgs),
}

#[derive(Debug, clap::Args)]
pub(crate) struct DatabaseLsArgs {
    /// Only show custom databases
    #[arg(long, conflicts_with = "included")]
    pub custom: bool,
    /// Only show databases included with SIRIUS
    #[arg(long)]
    pub included: bool,
    /// Include structure and spectrum counts
    #[arg(long)]
    pub stats: bool,
}

#[derive(Debug, clap::Args)]
pub(crate) struct DatabaseGetArgs {
    /// Database id
    pub database_id: String,
}

#[derive(Debug, clap::Args)]
#[command(after_long_help = CliExamples("
  # Create an empty custom database
  sirius-client db create my-db --display-name 'My Standards' --location /data/my-db.siriusdb
"))]
pub(crate) struct DatabaseCreateArgs {
    /// Database id
    pub database_id: String,
    /// Human-readable name
    #[arg(long)]
    pub display_name: Option<String>,
    /// Where to store the database on the server's filesystem
    #[arg(long)]
    pub location: Option<String>,
    /// Match retention times of reference spectra
    #[arg(long)]
    pub match_rt: bool,
}

#[derive(Debug, clap::Args)]
pub(crate) struct DatabaseRmArgs {
    /// Database id
    pub database_id: String,
    /// Also delete the database file
    #[arg(long)]
    pub delete: bool,
    /// Do not fail if the database does not exist
    #[arg(long)]
    pub if_exists: bool,
}

pub(crate) fn handle(cli: &Cli, args: DatabaseArgs) -> anyhow::Result<()> {
    match args.command {
        DatabaseCommand::Ls(args) => list_databases(cli, args),
        DatabaseCommand::Get(args) => get_database(cli, args),
        DatabaseCommand::Create(args) => create_database(cli, args),
        DatabaseCommand::Rm(args) => remove_database(cli, args),
    }
}

fn list_databases(cli: &Cli, args: DatabaseLsArgs) -> anyhow::Result<()> {
    let include_stats = Some(args.stats);

    let dbs = if args.custom {
        cli.roundtrip(GetCustomDatabases {
            include_stats,
            include_with_errors: Some(true),
        })?
    } else if args.included {
        cli.roundtrip(GetIncludedDatabases { include_stats })?
    } else {
        cli.roundtrip(GetDatabases {
            include_stats,
            include_with_errors: Some(true),
        })?
    };

    match cli.output() {
        Output::Json => print_json(&dbs)?,
        Output::Tty => {
            let mut out = anstream::stdout().lock();
            let mut tw = TabWriter::new(&mut out).ansi(true);
            writeln!(&mut tw, "ID\tNAME\tCUSTOM\tSTRUCTURES\tSTATUS")?;
            for db in dbs {
                writeln!(
                    &mut tw,
                    "{}\t{}\t{}\t{}\t{}",
                    db.database_id,
                    opt(db.display_name.as_deref()),
                    db.custom_db,
                    opt(db.number_of_structures),
                    database_status(&db),
                )?;
            }

            tw.flush()?;
        }
    }

    Ok(())
}

fn get_database(cli: &Cli, args: DatabaseGetArgs) -> anyhow::Result<()> {
    let db = cli.roundtrip(GetDatabase {
        database_id: &args.database_id,
        include_stats: Some(true),
    })?;

    match cli.output() {
        Output::Json => print_json(&db)?,
        Output::Tty => print_database(&db)?,
    }

    Ok(())
}

fn create_database(cli: &Cli, args: DatabaseCreateArgs) -> anyhow::Result<()> {
    let parameters = SearchableDatabaseParameters {
        display_name: args.display_name,
        location: args.location,
        match_rt_of_reference_spectra: args.match_rt.then_some(true),
    };

    let db = cli.roundtrip(CreateDatabase {
        database_id: &args.database_id,
        parameters: Some(&parameters),
    })?;

    match cli.output() {
        Output::Json => print_json(&db)?,
        Output::Tty => eprintln!(
            "Created database {:?} at {}",
            db.database_id,
            opt(db.location.as_deref())
        ),
    }

    Ok(())
}

fn remove_database(cli: &Cli, args: DatabaseRmArgs) -> anyhow::Result<()> {
    let req = RemoveDatabase {
        database_id: &args.database_id,
        delete: Some(args.delete),
    };

    match cli.roundtrip(req) {
        Ok(()) => eprintln!("Removed database {:?}", args.database_id),
        Err(e) if args.if_exists && is_not_found(&e) => {
            eprintln!("Database {:?} does not exist", args.database_id)
        }
        Err(e) => return Err(e),
    }

    Ok(())
}

fn database_status(db: &SearchableDatabase) -> Styled<&'static str> {
    if db.error_message.is_some() {
        Styled(RED, "error")
    } else if db.update_needed {
        Styled(YELLOW, "needs update")
    } else if db.searchable {
        Styled(GREEN, "ok")
    } else {
        Styled(DIM, "not searchable")
    }
}

fn print_database(db: &SearchableDatabase) -> anyhow::Result<()> {
    let mut out = anstream::stdout().lock();
    let mut tw = TabWriter::new(&mut out).ansi(true);

    writeln!(&mut tw, "{HEADER}Database {:?}{HEADER:#}", db.database_id)?;
    if let Some(name) = &db.display_name {
        writeln!(&mut tw, "{GREEN}Name{GREEN:#}\t{name}")?;
    }
    if let Some(location) = &db.location {
        writeln!(&mut tw, "{GREEN}Location{GREEN:#}\t{location}")?;
    }
    writeln!(&mut tw, "{GREEN}Custom{GREEN:#}\t{}", db.custom_db)?;
    writeln!(&mut tw, "{GREEN}Status{GREEN:#}\t{}", database_status(db))?;
    if let Some(version) = db.db_version {
        writeln!(&mut tw, "{GREEN}Version{GREEN:#}\t{version}")?;
    }
    if let Some(n) = db.number_of_structures {
        writeln!(&mut tw, "{GREEN}Structures{GREEN:#}\t{n}")?;
    }
    if let Some(n) = db.number_of_formulas {
        writeln!(&mut tw, "{GREEN}Formulas{GREEN:#}\t{n}")?;
    }
    if let Some(n) = db.number_of_reference_spectra {
        writeln!(&mut tw, "{GREEN}Reference Spectra{GREEN:#}\t{n}")?;
    }
    if let Some(err) = &db.error_message {
        writeln!(&mut tw, "{GREEN}Error{GREEN:#}\t{}", Styled(RED, err))?;
    }

    tw.flush()?;
    Ok(())
}
