use std::io::Write as _;

use sirius_client::{job::JobOptField, statistics::*};
use tabwriter::TabWriter;

use crate::cli::{Cli, Output, ProjectArg, color::*, job::wait_for_job, print_json};

#[derive(Debug, clap::Args)]
pub(crate) struct FoldChangeArgs {
    #[command(subcommand)]
    pub command: FoldChangeCommand,
}

#[derive(Debug, clap::Subcommand)]
pub(crate) enum FoldChangeCommand {
    /// Start computing fold changes between two groups
    Compute(FoldChangeComputeArgs),
    /// Show all fold changes as a table
    Table(FoldChangeTableArgs),
    /// Delete the fold changes between two groups
    #[clap(alias = "delete")]
    Rm(FoldChangeRmArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum TargetArg {
    Compounds,
    Features,
}

impl From<TargetArg> for StatisticsTarget {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Compounds => StatisticsTarget::Compounds,
            TargetArg::Features => StatisticsTarget::AlignedFeatures,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum AggregationArg {
    Avg,
    Min,
    Max,
}

impl From<AggregationArg> for AggregationType {
    fn from(arg: AggregationArg) -> Self {
        match arg {
            AggregationArg::Avg => AggregationType::Avg,
            AggregationArg::Min => AggregationType::Min,
            AggregationArg::Max => AggregationType::Max,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum QuantArg {
    ApexIntensity,
    AreaUnderCurve,
}

impl From<QuantArg> for QuantMeasure {
    fn from(arg: QuantArg) -> Self {
        match arg {
            QuantArg::ApexIntensity => QuantMeasure::ApexIntensity,
            QuantArg::AreaUnderCurve => QuantMeasure::AreaUnderCurve,
        }
    }
}

/// Which fold changes a command applies to.
#[derive(Debug, clap::Args)]
pub(crate) struct FoldChangeKind {
    #[command(flatten)]
    pub project: ProjectArg,
    /// Compare compounds or aligned features
    #[arg(long, default_value = "compounds")]
    pub target: TargetArg,
    /// How the quantities of a group are combined
    #[arg(long)]
    pub aggregation: Option<AggregationArg>,
    /// The quantity to compare
    #[arg(long)]
    pub quantification: Option<QuantArg>,
}

#[derive(Debug, clap::Args)]
#[command(after_long_help = CliExamples("
  # Compare treated samples against controls, and wait for the result
  sirius-client foldchange compute -p my-project --left treated --right control --wait

  # Then show the table
  sirius-client foldchange table -p my-project
"))]
pub(crate) struct FoldChangeComputeArgs {
    #[command(flatten)]
    pub kind: FoldChangeKind,
    /// The group in the numerator
    #[arg(long)]
    pub left: String,
    /// The group in the denominator
    #[arg(long)]
    pub right: String,
    /// Wait for the job to finish
    #[arg(long)]
    pub wait: bool,
    /// How often to poll the job when waiting
    #[arg(long, default_value = "1s")]
    pub interval: humantime::Duration,
}

#[derive(Debug, clap::Args)]
pub(crate) struct FoldChangeTableArgs {
    #[command(flatten)]
    pub kind: FoldChangeKind,
}

#[derive(Debug, clap::Args)]
pub(crate) struct FoldChangeRmArgs {
    #[command(flatten)]
    pub kind: FoldChangeKind,
    /// The group in the numerator
    #[arg(long)]
    pub left: String,
    /// The group in the denominator
    #[arg(long)]
    pub right: String,
}

pub(crate) fn handle(cli: &Cli, args: FoldChangeArgs) -> anyhow::Result<()> {
    match args.command {
        FoldChangeCommand::Compute(args) => compute(cli, args),
        FoldChangeCommand::Table(args) => table(cli, args),
        FoldChangeCommand::Rm(args) => delete(cli, args),
    }
}

fn compute(cli: &Cli, args: FoldChangeComputeArgs) -> anyhow::Result<()> {
    let kind = &args.kind;
    let project_id = kind.project.project.as_str();

    let job = cli.roundtrip(ComputeFoldChanges {
        project_id,
        target: kind.target.into(),
        left_group_name: &args.left,
        right_group_name: &args.right,
        aggregation: kind.aggregation.map(Into::into),
        quantification: kind.quantification.map(Into::into),
        opt_fields: Some(&[JobOptField::Progress]),
    })?;

    let job = if args.wait {
        wait_for_job(cli, project_id, &job.id, args.interval.into(), None)?
    } else {
        job
    };

    match cli.output() {
        Output::Json => print_json(&job)?,
        Output::Tty if !args.wait => eprintln!("Started fold change job {}", job.id),
        Output::Tty => (),
    }

    Ok(())
}

fn table(cli: &Cli, args: FoldChangeTableArgs) -> anyhow::Result<()> {
    let kind = args.kind;
    let table = cli.roundtrip(GetFoldChangeTable {
        project_id: &kind.project.project,
        target: kind.target.into(),
        aggregation: kind.aggregation.map(Into::into),
        quantification: kind.quantification.map(Into::into),
    })?;

    match cli.output() {
        Output::Json => print_json(&table)?,
        Output::Tty => print_table(&table)?,
    }

    Ok(())
}

fn delete(cli: &Cli, args: FoldChangeRmArgs) -> anyhow::Result<()> {
    let kind = &args.kind;
    cli.roundtrip(DeleteFoldChanges {
        project_id: &kind.project.project,
        target: kind.target.into(),
        left_group_name: &args.left,
        right_group_name: &args.right,
        aggregation: kind.aggregation.map(Into::into),
        quantification: kind.quantification.map(Into::into),
    })?;

    eprintln!("Deleted fold changes {} / {}", args.left, args.right);
    Ok(())
}

fn print_table(table: &StatisticsTable) -> anyhow::Result<()> {
    if table.column_names.is_empty() {
        eprintln!("No fold changes");
        return Ok(());
    }

    let mut out = anstream::stdout().lock();
    let mut tw = TabWriter::new(&mut out).ansi(true);

    write!(&mut tw, "{BOLD}ID\tNAME{BOLD:#}")?;
    for (i, name) in table.column_names.iter().enumerate() {
        match (
            table.column_left_groups.get(i),
            table.column_right_groups.get(i),
        ) {
            (Some(left), Some(right)) => write!(&mut tw, "\t{BOLD}{left}/{right}{BOLD:#}")?,
            _ => write!(&mut tw, "\t{BOLD}{name}{BOLD:#}")?,
        }
    }
    writeln!(&mut tw)?;

    for (row, values) in table.values.iter().enumerate() {
        let id = table.row_ids.get(row).map(ToString::to_string);
        let name = table.row_names.get(row).map(String::as_str);
        write!(
            &mut tw,
            "{}\t{}",
            id.unwrap_or_default(),
            name.unwrap_or_default()
        )?;

        for v in values {
            let style = if *v >= 1.0 { GREEN } else { RED };
            write!(&mut tw, "\t{}", Styled(style, format!("{v:.3}")))?;
        }
        writeln!(&mut tw)?;
    }

    tw.flush()?;
    Ok(())
}
