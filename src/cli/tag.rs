use std::io::{Write as _, stdout};

use sirius_client::tag::*;
use tabwriter::TabWriter;

use crate::cli::{Cli, Output, ProjectArg, color::*, is_not_found, opt, print_json};

#[derive(Debug, clap::Args)]
pub(crate) struct TagArgs {
    #[command(subcommand)]
    pub command: TagCommand,
}

#[derive(Debug, clap::Subcommand)]
pub(crate) enum TagCommand {
    /// List the tag definitions of a project
    #[clap(alias = "list")]
    Ls(TagLsArgs),
    /// Define a new tag
    Create(TagCreateArgs),
    /// Delete a tag definition, removing it from all objects
    #[clap(alias = "delete")]
    Rm(TagRmArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum ValueTypeArg {
    None,
    Boolean,
    Integer,
    Real,
    Text,
    Date,
    Time,
}

impl From<ValueTypeArg> for ValueType {
    fn from(arg: ValueTypeArg) -> Self {
        match arg {
            ValueTypeArg::None => ValueType::None,
            ValueTypeArg::Boolean => ValueType::Boolean,
            ValueTypeArg::Integer => ValueType::Integer,
            ValueTypeArg::Real => ValueType::Real,
            ValueTypeArg::Text => ValueType::Text,
            ValueTypeArg::Date => ValueType::Date,
            ValueTypeArg::Time => ValueType::Time,
        }
    }
}

#[derive(Debug, clap::Args)]
pub(crate) struct TagLsArgs {
    #[command(flatten)]
    pub project: ProjectArg,
    /// Only show tags of this type
    #[arg(long = "type")]
    pub tag_type: Option<String>,
}

#[derive(Debug, clap::Args)]
#[command(after_long_help = CliExamples("
  # A free-text tag
  sirius-client tag create -p my-project comment --value-type text

  # A tag with a fixed set of values
  sirius-client tag create -p my-project sample_type --value-type text \\
      --possible-value sample --possible-value blank --possible-value control
"))]
pub(crate) struct TagCreateArgs {
    #[command(flatten)]
    pub project: ProjectArg,
    /// Tag name
    pub tag_name: String,
    /// The type of the tag's values
    #[arg(long, default_value = "none")]
    pub value_type: ValueTypeArg,
    /// A description of the tag
    #[arg(long)]
    pub description: Option<String>,
    /// A free-form type used to group tags
    #[arg(long = "type")]
    pub tag_type: Option<String>,
    /// An allowed value, parsed as JSON or used as a plain string (can be
    /// specified multiple times)
    #[arg(long = "possible-value", action = clap::ArgAction::Append)]
    pub possible_values: Vec<String>,
}

#[derive(Debug, clap::Args)]
pub(crate) struct TagRmArgs {
    #[command(flatten)]
    pub project: ProjectArg,
    /// Tag name
    pub tag_name: String,
    /// Do not fail if the tag does not exist
    #[arg(long)]
    pub if_exists: bool,
}

#[derive(Debug, clap::Args)]
pub(crate) struct GroupArgs {
    #[command(subcommand)]
    pub command: GroupCommand,
}

#[derive(Debug, clap::Subcommand)]
pub(crate) enum GroupCommand {
    /// List the tag groups of a project
    #[clap(alias = "list")]
    Ls(GroupLsArgs),
    /// Create a group from a tag filter
    Create(GroupCreateArgs),
    /// Delete a group
    #[clap(alias = "delete")]
    Rm(GroupRmArgs),
}

#[derive(Debug, clap::Args)]
pub(crate) struct GroupLsArgs {
    #[command(flatten)]
    pub project: ProjectArg,
    /// Only show groups of this type
    #[arg(long = "type")]
    pub group_type: Option<String>,
}

#[derive(Debug, clap::Args)]
#[command(after_long_help = CliExamples("
  # Group all blank runs
  sirius-client group create -p my-project blanks --filter 'tags.sample_type:blank' --type run
"))]
pub(crate) struct GroupCreateArgs {
    #[command(flatten)]
    pub project: ProjectArg,
    /// Group name
    pub group_name: String,
    /// The tag filter selecting the group's members
    #[arg(long)]
    pub filter: String,
    /// The type of object the group contains
    #[arg(long = "type")]
    pub group_type: String,
}

#[derive(Debug, clap::Args)]
pub(crate) struct GroupRmArgs {
    #[command(flatten)]
    pub project: ProjectArg,
    /// Group name
    pub group_name: String,
    /// Do not fail if the group does not exist
    #[arg(long)]
    pub if_exists: bool,
}

pub(crate) fn handle(cli: &Cli, args: TagArgs) -> anyhow::Result<()> {
    match args.command {
        TagCommand::Ls(args) => list_tags(cli, args),
        TagCommand::Create(args) => create_tag(cli, args),
        TagCommand::Rm(args) => delete_tag(cli, args),
    }
}

pub(crate) fn handle_group(cli: &Cli, args: GroupArgs) -> anyhow::Result<()> {
    match args.command {
        GroupCommand::Ls(args) => list_groups(cli, args),
        GroupCommand::Create(args) => create_group(cli, args),
        GroupCommand::Rm(args) => delete_group(cli, args),
    }
}

fn list_tags(cli: &Cli, args: TagLsArgs) -> anyhow::Result<()> {
    let tags = cli.roundtrip(GetTags {
        project_id: &args.project.project,
        tag_type: args.tag_type.as_deref(),
    })?;

    match cli.output() {
        Output::Json => print_json(&tags)?,
        Output::Tty => {
            let mut tw = TabWriter::new(stdout());
            writeln!(&mut tw, "NAME\tVALUE TYPE\tTYPE\tPOSSIBLE VALUES")?;
            for tag in tags {
                let possible = tag
                    .possible_values
                    .unwrap_or_default()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(",");

                writeln!(
                    &mut tw,
                    "{}\t{}\t{}\t{}",
                    tag.tag_name,
                    tag.value_type,
                    opt(tag.tag_type),
                    possible
                )?;
            }

            tw.flush()?;
        }
    }

    Ok(())
}

fn create_tag(cli: &Cli, args: TagCreateArgs) -> anyhow::Result<()> {
    let possible_values = if args.possible_values.is_empty() {
        None
    } else {
        Some(
            args.possible_values
                .into_iter()
                .map(|v| serde_json::from_str(&v).unwrap_or(serde_json::Value::String(v)))
                .collect(),
        )
    };

    let import = TagDefinitionImport {
        tag_name: args.tag_name.clone(),
        description: args.description,
        tag_type: args.tag_type,
        value_type: args.value_type.into(),
        possible_values,
        min_value: None,
        max_value: None,
    };

    let created = cli.roundtrip(CreateTags {
        project_id: &args.project.project,
        tags: std::slice::from_ref(&import),
    })?;

    match cli.output() {
        Output::Json => print_json(&created)?,
        Output::Tty => eprintln!("Created tag {:?}", args.tag_name),
    }

    Ok(())
}

fn delete_tag(cli: &Cli, args: TagRmArgs) -> anyhow::Result<()> {
    let req = DeleteTag {
        project_id: &args.project.project,
        tag_name: &args.tag_name,
    };

    match cli.roundtrip(req) {
        Ok(()) => eprintln!("Deleted tag {:?}", args.tag_name),
        Err(e) if args.if_exists && is_not_found(&e) => {
            eprintln!("Tag {:?} does not exist", args.tag_name)
        }
        Err(e) => return Err(e),
    }

    Ok(())
}

fn list_groups(cli: &Cli, args: GroupLsArgs) -> anyhow::Result<()> {
    let groups = cli.roundtrip(GetGroups {
        project_id: &args.project.project,
        group_type: args.group_type.as_deref(),
    })?;

    match cli.output() {
        Output::Json => print_json(&groups)?,
        Output::Tty => {
            let mut out = anstream::stdout().lock();
            let mut tw = TabWriter::new(&mut out).ansi(true);
            writeln!(&mut tw, "NAME\tTYPE\tFILTER")?;
            for group in groups {
                writeln!(
                    &mut tw,
                    "{}\t{}\t{}",
                    group.group_name,
                    opt(group.group_type),
                    Styled(DIM, opt(group.lucene_query))
                )?;
            }

            tw.flush()?;
        }
    }

    Ok(())
}

fn create_group(cli: &Cli, args: GroupCreateArgs) -> anyhow::Result<()> {
    let group = cli.roundtrip(AddGroup {
        project_id: &args.project.project,
        group_name: &args.group_name,
        filter: &args.filter,
        group_type: &args.group_type,
    })?;

    match cli.output() {
        Output::Json => print_json(&group)?,
        Output::Tty => eprintln!("Created group {:?}", group.group_name),
    }

    Ok(())
}

fn delete_group(cli: &Cli, args: GroupRmArgs) -> anyhow::Result<()> {
    let req = DeleteGroup {
        project_id: &args.project.project,
        group_name: &args.group_name,
    };

    match cli.roundtrip(req) {
        Ok(()) => eprintln!("Deleted group {:?}", args.group_name),
        Err(e) if args.if_exists && is_not_found(&e) => {
            eprintln!("Group {:?} does not exist", args.group_name)
        }
        Err(e) => return Err(e),
    }

    Ok(())
}
