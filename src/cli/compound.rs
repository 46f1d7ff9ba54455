use std::io::{Write as _, stdout};

use sirius_client::{compound::*, feature::AlignedFeatureOptField};
use tabwriter::TabWriter;

use crate::cli::{Cli, Output, PageArgs, ProjectArg, color::*, is_not_found, opt, print_json};

#[derive(Debug, clap::Args)]
pub(crate) struct CompoundArgs {
    #[command(subcommand)]
    pub command: CompoundCommand,
}

#[derive(Debug, clap::Subcommand)]
pub(crate) enum CompoundCommand {
    /// List the compounds of a project
    #[clap(alias = "list")]
    Ls(CompoundLsArgs),
    /// Get a compound and its features
    Get(CompoundGetArgs),
    /// Delete a compound and all its features
    #[clap(alias = "delete")]
    Rm(CompoundRmArgs),
}

#[derive(Debug, clap::Args)]
#[command(after_long_help = CliExamples("
  # List the first 20 compounds, heaviest first
  sirius-client compound ls -p my-project --limit 20 --sort neutralMass,desc
"))]
pub(crate) struct CompoundLsArgs {
    #[command(flatten)]
    pub project: ProjectArg,
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, clap::Args)]
pub(crate) struct CompoundGetArgs {
    #[command(flatten)]
    pub project: ProjectArg,
    /// Compound id
    pub compound_id: String,
}

#[derive(Debug, clap::Args)]
pub(crate) struct CompoundRmArgs {
    #[command(flatten)]
    pub project: ProjectArg,
    /// Compound id
    pub compound_id: String,
    /// Do not fail if the compound does not exist
    #[arg(long)]
    pub if_exists: bool,
}

pub(crate) fn handle(cli: &Cli, args: CompoundArgs) -> anyhow::Result<()> {
    match args.command {
        CompoundCommand::Ls(args) => list_compounds(cli, args),
        CompoundCommand::Get(args) => get_compound(cli, args),
        CompoundCommand::Rm(args) => delete_compound(cli, args),
    }
}

fn list_compounds(cli: &Cli, args: CompoundLsArgs) -> anyhow::Result<()> {
    let req = GetCompoundsPaged {
        project_id: &args.project.project,
        opt_fields: Some(&[]),
        opt_fields_features: Some(&[]),
    };

    let compounds = cli.paginate(req, &args.page)?;

    match cli.output() {
        Output::Json => {
            let all = compounds.collect::<anyhow::Result<Vec<_>>>()?;
            print_json(&all)?;
        }
        Output::Tty => {
            let mut tw = TabWriter::new(stdout());
            writeln!(&mut tw, "ID\tNAME\tNEUTRAL MASS\tFEATURES")?;
            for c in compounds {
                let c = c?;
                writeln!(
                    &mut tw,
                    "{}\t{}\t{}\t{}",
                    c.compound_id,
                    opt(c.name),
                    opt(c.neutral_mass.map(|m| format!("{m:.4}"))),
                    c.features.len()
                )?;
            }

            tw.flush()?;
        }
    }

    Ok(())
}

fn get_compound(cli: &Cli, args: CompoundGetArgs) -> anyhow::Result<()> {
    let compound = cli.roundtrip(GetCompound {
        project_id: &args.project.project,
        compound_id: &args.compound_id,
        opt_fields: Some(&[CompoundOptField::ConsensusAnnotations]),
        opt_fields_features: Some(&[AlignedFeatureOptField::TopAnnotations]),
    })?;

    if cli.output() == Output::Json {
        return print_json(&compound);
    }

    let mut out = anstream::stdout().lock();
    let mut tw = TabWriter::new(&mut out).ansi(true);

    writeln!(&mut tw, "{HEADER}Compound {}{HEADER:#}", compound.compound_id)?;
    if let Some(name) = &compound.name {
        writeln!(&mut tw, "{GREEN}Name{GREEN:#}\t{name}")?;
    }
    if let Some(mass) = compound.neutral_mass {
        writeln!(&mut tw, "{GREEN}Neutral Mass{GREEN:#}\t{mass:.4}")?;
    }
    if let (Some(start), Some(end)) = (compound.rt_start_seconds, compound.rt_end_seconds) {
        writeln!(&mut tw, "{GREEN}Retention Time{GREEN:#}\t{start:.1}s - {end:.1}s")?;
    }
    if let Some(consensus) = &compound.consensus_annotations {
        writeln!(
            &mut tw,
            "{GREEN}Consensus Formula{GREEN:#}\t{}",
            opt(consensus.molecular_formula.as_deref())
        )?;
        if let Some(structure) = &consensus.csi_finger_id_structure {
            writeln!(
                &mut tw,
                "{GREEN}Consensus Structure{GREEN:#}\t{} {}",
                structure.inchi_key,
                Styled(DIM, opt(structure.structure_name.as_deref()))
            )?;
        }
    }

    writeln!(&mut tw, "\n{BOLD}FEATURE\tION MASS\tCHARGE\tRT APEX\tFORMULA{BOLD:#}")?;
    for f in &compound.features {
        let formula = f
            .top_annotations
            .as_ref()
            .and_then(|a| a.formula_annotation.as_ref())
            .and_then(|c| c.molecular_formula.as_deref());

        writeln!(
            &mut tw,
            "{}\t{}\t{}\t{}\t{}",
            f.aligned_feature_id,
            opt(f.ion_mass.map(|m| format!("{m:.4}"))),
            opt(f.charge),
            opt(f.rt_apex_seconds.map(|rt| format!("{rt:.1}s"))),
            opt(formula),
        )?;
    }

    tw.flush()?;
    Ok(())
}

fn delete_compound(cli: &Cli, args: CompoundRmArgs) -> anyhow::Result<()> {
    let req = DeleteCompound {
        project_id: &args.project.project,
        compound_id: &args.compound_id,
    };

    match cli.roundtrip(req) {
        Ok(()) => eprintln!("Deleted compound {:?}", args.compound_id),
        Err(e) if args.if_exists && is_not_found(&e) => {
            eprintln!("Compound {:?} does not exist", args.compound_id)
        }
        Err(e) => return Err(e),
    }

    Ok(())
}
