use std::io::{Write as _, stdout};

use sirius_client::{run::*, tag::Tag};
use tabwriter::TabWriter;

use crate::cli::{Cli, KeyValue, Output, PageArgs, ProjectArg, color::*, opt, print_json};

#[derive(Debug, clap::Args)]
pub(crate) struct RunArgs {
    #[command(subcommand)]
    pub command: RunCommand,
}

#[derive(Debug, clap::Subcommand)]
pub(crate) enum RunCommand {
    /// List the LC-MS runs of a project
    #[clap(alias = "list")]
    Ls(RunLsArgs),
    /// Get a run and its tags
    Get(RunGetArgs),
    /// Add tags to a run
    Tag(RunTagArgs),
    /// Remove a tag from a run
    Untag(RunUntagArgs),
}

#[derive(Debug, clap::Args)]
#[command(after_long_help = CliExamples(r#"
  # List all runs
  sirius-client run ls -p my-project

  # List runs whose "sample type" tag is "blank"
  sirius-client run ls -p my-project --filter 'tags.sample_type:blank'

  # List the runs of a group
  sirius-client run ls -p my-project --group blanks
"#))]
pub(crate) struct RunLsArgs {
    #[command(flatten)]
    pub project: ProjectArg,
    /// Only show runs matching this tag filter
    #[arg(long, conflicts_with = "group")]
    pub filter: Option<String>,
    /// Only show runs in this group
    #[arg(long)]
    pub group: Option<String>,
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, clap::Args)]
pub(crate) struct RunGetArgs {
    #[command(flatten)]
    pub project: ProjectArg,
    /// Run id
    pub run_id: String,
}

#[derive(Debug, clap::Args)]
#[command(after_long_help = CliExamples("
  # Tag a run; values are parsed as JSON, or used as plain strings
  sirius-client run tag -p my-project 3 sample_type=blank dilution=0.5
"))]
pub(crate) struct RunTagArgs {
    #[command(flatten)]
    pub project: ProjectArg,
    /// Run id
    pub run_id: String,
    /// Tags to add, as name=value
    #[arg(required = true)]
    pub tags: Vec<KeyValue>,
}

#[derive(Debug, clap::Args)]
pub(crate) struct RunUntagArgs {
    #[command(flatten)]
    pub project: ProjectArg,
    /// Run id
    pub run_id: String,
    /// Tag name
    pub tag_name: String,
}

pub(crate) fn handle(cli: &Cli, args: RunArgs) -> anyhow::Result<()> {
    match args.command {
        RunCommand::Ls(args) => list_runs(cli, args),
        RunCommand::Get(args) => get_run(cli, args),
        RunCommand::Tag(args) => tag_run(cli, args),
        RunCommand::Untag(args) => untag_run(cli, args),
    }
}

fn list_runs(cli: &Cli, args: RunLsArgs) -> anyhow::Result<()> {
    let project_id = args.project.project.as_str();
    let opt_fields = Some(&[RunOptField::Tags][..]);

    let runs: Box<dyn Iterator<Item = anyhow::Result<Run>> + '_> =
        match (args.filter.as_deref(), args.group.as_deref()) {
            (Some(filter), _) => Box::new(cli.paginate(
                GetRunsByTag {
                    project_id,
                    filter,
                    opt_fields,
                },
                &args.page,
            )?),
            (None, Some(group)) => Box::new(cli.paginate(
                GetRunsByGroup {
                    project_id,
                    group,
                    opt_fields,
                },
                &args.page,
            )?),
            (None, None) => Box::new(cli.paginate(
                GetRunsPaged {
                    project_id,
                    opt_fields,
                },
                &args.page,
            )?),
        };

    match cli.output() {
        Output::Json => {
            let all = runs.collect::<anyhow::Result<Vec<_>>>()?;
            print_json(&all)?;
        }
        Output::Tty => {
            let mut tw = TabWriter::new(stdout());
            writeln!(&mut tw, "ID\tNAME\tCHROMATOGRAPHY\tIONIZATION\tTAGS")?;
            for run in runs {
                let run = run?;
                writeln!(
                    &mut tw,
                    "{}\t{}\t{}\t{}\t{}",
                    run.run_id,
                    opt(run.name.as_deref()),
                    opt(run.chromatography.as_deref()),
                    opt(run.ionization.as_deref()),
                    format_tags(&run),
                )?;
            }

            tw.flush()?;
        }
    }

    Ok(())
}

fn get_run(cli: &Cli, args: RunGetArgs) -> anyhow::Result<()> {
    let run = cli.roundtrip(GetRun {
        project_id: &args.project.project,
        run_id: &args.run_id,
        opt_fields: Some(&[RunOptField::Tags]),
    })?;

    if cli.output() == Output::Json {
        return print_json(&run);
    }

    let mut out = anstream::stdout().lock();
    let mut tw = TabWriter::new(&mut out).ansi(true);

    writeln!(&mut tw, "{HEADER}Run {}{HEADER:#}", run.run_id)?;
    for (label, value) in [
        ("Name", &run.name),
        ("Source", &run.source),
        ("Chromatography", &run.chromatography),
        ("Ionization", &run.ionization),
        ("Fragmentation", &run.fragmentation),
    ] {
        if let Some(value) = value {
            writeln!(&mut tw, "{GREEN}{label}{GREEN:#}\t{value}")?;
        }
    }
    if !run.mass_analyzers.is_empty() {
        writeln!(
            &mut tw,
            "{GREEN}Mass Analyzers{GREEN:#}\t{}",
            run.mass_analyzers.join(", ")
        )?;
    }

    if let Some(tags) = run.tags.as_ref().filter(|t| !t.is_empty()) {
        writeln!(&mut tw, "\n{HEADER}Tags{HEADER:#}")?;
        for tag in tags.values() {
            writeln!(&mut tw, "{BLUE}{}{BLUE:#}\t{}", tag.tag_name, tag.value)?;
        }
    }

    tw.flush()?;
    Ok(())
}

fn tag_run(cli: &Cli, args: RunTagArgs) -> anyhow::Result<()> {
    let tags: Vec<Tag> = args
        .tags
        .into_iter()
        .map(|kv| {
            let (tag_name, value) = kv.into_strings();
            let value = serde_json::from_str(&value).unwrap_or(serde_json::Value::String(value));
            Tag { tag_name, value }
        })
        .collect();

    let added = cli.roundtrip(AddRunTags {
        project_id: &args.project.project,
        run_id: &args.run_id,
        tags: &tags,
    })?;

    match cli.output() {
        Output::Json => print_json(&added)?,
        Output::Tty => eprintln!("Tagged run {:?} with {} tag(s)", args.run_id, added.len()),
    }

    Ok(())
}

fn untag_run(cli: &Cli, args: RunUntagArgs) -> anyhow::Result<()> {
    cli.roundtrip(DeleteRunTag {
        project_id: &args.project.project,
        run_id: &args.run_id,
        tag_name: &args.tag_name,
    })?;

    eprintln!("Removed tag {:?} from run {:?}", args.tag_name, args.run_id);
    Ok(())
}

fn format_tags(run: &Run) -> String {
    let Some(tags) = &run.tags else {
        return String::new();
    };

    tags.values()
        .map(|t| match &t.value {
            serde_json::Value::Null => t.tag_name.clone(),
            serde_json::Value::String(s) => format!("{}={s}", t.tag_name),
            v => format!("{}={v}", t.tag_name),
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_run_tags() {
        let run: Run = serde_json::from_value(serde_json::json!({
            "runId": "1",
            "tags": {
                "blank": {"tagName": "blank", "value": null},
                "dilution": {"tagName": "dilution", "value": 0.5},
                "type": {"tagName": "type", "value": "sample"},
            },
        }))
        .unwrap();

        assert_eq!(format_tags(&run), "blank,dilution=0.5,type=sample");
    }

    #[test]
    fn parse_key_value() {
        let kv: KeyValue = "a=b=c".parse().unwrap();
        assert_eq!(kv.into_strings(), ("a".to_owned(), "b=c".to_owned()));
        assert!("novalue".parse::<KeyValue>().is_err());
    }
}
