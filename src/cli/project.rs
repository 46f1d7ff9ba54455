use std::io::{Write as _, stdout};

use sirius_client::project::*;
use tabwriter::TabWriter;

use crate::cli::{Cli, Output, color::*, is_not_found, opt, print_json};

#[derive(Debug, clap::Args)]
pub(crate) struct ProjectArgs {
    #[command(subcommand)]
    pub command: ProjectCommand,
}

#[derive(Debug, clap::Subcommand)]
pub(crate) enum ProjectCommand {
    /// List open projects
    #[clap(alias = "list")]
    Ls,
    /// Get information about an open project
    Get(ProjectGetArgs),
    /// Open an existing project file
    Open(ProjectOpenArgs),
    /// Create a new project
    Create(ProjectOpenArgs),
    /// Close an open project
    Close(ProjectCloseArgs),
}

#[derive(Debug, clap::Args)]
pub(crate) struct ProjectGetArgs {
    /// Project id
    pub project_id: String,
    /// Include compatibility and size information
    #[arg(long)]
    pub details: bool,
}

#[derive(Debug, clap::Args)]
#[command(after_long_help = CliExamples("
  # Create a project in the default location
  sirius-client project create my-project

  # Open a project file under a custom id
  sirius-client project open my-project --path /data/experiment.sirius
"))]
pub(crate) struct ProjectOpenArgs {
    /// Project id
    pub project_id: String,
    /// Path to the project file on the server's filesystem
    #[arg(long)]
    pub path: Option<String>,
}

#[derive(Debug, clap::Args)]
pub(crate) struct ProjectCloseArgs {
    /// Project id
    pub project_id: String,
    /// Compact the project file before closing
    #[arg(long)]
    pub compact: bool,
    /// Do not fail if the project is not open
    #[arg(long)]
    pub if_exists: bool,
}

pub(crate) fn handle(cli: &Cli, args: ProjectArgs) -> anyhow::Result<()> {
    match args.command {
        ProjectCommand::Ls => list_projects(cli),
        ProjectCommand::Get(args) => get_project(cli, args),
        ProjectCommand::Open(args) => open_project(cli, args, false),
        ProjectCommand::Create(args) => open_project(cli, args, true),
        ProjectCommand::Close(args) => close_project(cli, args),
    }
}

fn list_projects(cli: &Cli) -> anyhow::Result<()> {
    let projects = cli.roundtrip(GetProjects)?;

    match cli.output() {
        Output::Json => print_json(&projects)?,
        Output::Tty => {
            let mut tw = TabWriter::new(stdout());
            writeln!(&mut tw, "ID\tTYPE\tLOCATION")?;
            for p in projects {
                writeln!(
                    &mut tw,
                    "{}\t{}\t{}",
                    p.project_id,
                    opt(p.project_type),
                    p.location
                )?;
            }

            tw.flush()?;
        }
    }

    Ok(())
}

fn get_project(cli: &Cli, args: ProjectGetArgs) -> anyhow::Result<()> {
    let opt_fields = [
        ProjectInfoOptField::CompatibilityInfo,
        ProjectInfoOptField::SizeInformation,
    ];

    let project = cli.roundtrip(GetProject {
        project_id: &args.project_id,
        opt_fields: args.details.then_some(&opt_fields[..]),
    })?;

    match cli.output() {
        Output::Json => print_json(&project)?,
        Output::Tty => print_project(&project)?,
    }

    Ok(())
}

fn open_project(cli: &Cli, args: ProjectOpenArgs, create: bool) -> anyhow::Result<()> {
    let project = if create {
        cli.roundtrip(CreateProject {
            project_id: &args.project_id,
            path_to_project: args.path.as_deref(),
            opt_fields: None,
        })?
    } else {
        cli.roundtrip(OpenProject {
            project_id: &args.project_id,
            path_to_project: args.path.as_deref(),
            opt_fields: None,
        })?
    };

    match cli.output() {
        Output::Json => print_json(&project)?,
        Output::Tty => {
            let verb = if create { "Created" } else { "Opened" };
            eprintln!(
                "{verb} project {:?} at {}",
                project.project_id, project.location
            );
        }
    }

    Ok(())
}

fn close_project(cli: &Cli, args: ProjectCloseArgs) -> anyhow::Result<()> {
    let req = CloseProject {
        project_id: &args.project_id,
        compact: args.compact.then_some(true),
    };

    match cli.roundtrip(req) {
        Ok(()) => eprintln!("Closed project {:?}", args.project_id),
        Err(e) if args.if_exists && is_not_found(&e) => {
            eprintln!("Project {:?} is not open", args.project_id)
        }
        Err(e) => return Err(e),
    }

    Ok(())
}

fn print_project(project: &ProjectInfo) -> anyhow::Result<()> {
    let mut out = anstream::stdout().lock();
    let mut tw = TabWriter::new(&mut out).ansi(true);

    writeln!(&mut tw, "{HEADER}Project {:?}{HEADER:#}", project.project_id)?;
    writeln!(&mut tw, "{GREEN}Location{GREEN:#}\t{}", project.location)?;
    if let Some(desc) = &project.description {
        writeln!(&mut tw, "{GREEN}Description{GREEN:#}\t{desc}")?;
    }
    if let Some(t) = &project.project_type {
        writeln!(&mut tw, "{GREEN}Type{GREEN:#}\t{t}")?;
    }
    if let Some(compatible) = project.compatible {
        let style = if compatible { GREEN } else { RED };
        writeln!(
            &mut tw,
            "{GREEN}Compatible{GREEN:#}\t{}",
            Styled(style, compatible)
        )?;
    }
    if let Some(n) = project.num_of_compounds {
        writeln!(&mut tw, "{GREEN}Compounds{GREEN:#}\t{n}")?;
    }
    if let Some(n) = project.num_of_features {
        writeln!(&mut tw, "{GREEN}Features{GREEN:#}\t{n}")?;
    }
    if let Some(n) = project.num_of_bytes {
        writeln!(&mut tw, "{GREEN}Size{GREEN:#}\t{n} bytes")?;
    }

    tw.flush()?;
    Ok(())
}
