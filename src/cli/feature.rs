use std::io::{Write as _, stdout};

use sirius_client::feature::*;
use tabwriter::TabWriter;

use crate::cli::{Cli, Output, PageArgs, ProjectArg, color::*, opt, print_json};

#[derive(Debug, clap::Args)]
pub(crate) struct FeatureArgs {
    #[command(subcommand)]
    pub command: FeatureCommand,
}

#[derive(Debug, clap::Subcommand)]
pub(crate) enum FeatureCommand {
    /// List the aligned features of a project
    #[clap(alias = "list")]
    Ls(FeatureLsArgs),
    /// Get an aligned feature and its top annotations
    Get(FeatureGetArgs),
    /// Delete one or more aligned features
    #[clap(alias = "delete")]
    Rm(FeatureRmArgs),
    /// List the formula candidates of an aligned feature
    Formulas(FeatureFormulasArgs),
}

#[derive(Debug, clap::Args)]
pub(crate) struct FeatureLsArgs {
    #[command(flatten)]
    pub project: ProjectArg,
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, clap::Args)]
pub(crate) struct FeatureGetArgs {
    #[command(flatten)]
    pub project: ProjectArg,
    /// Aligned feature id
    pub feature_id: String,
}

#[derive(Debug, clap::Args)]
pub(crate) struct FeatureRmArgs {
    #[command(flatten)]
    pub project: ProjectArg,
    /// Aligned feature ids
    #[arg(required = true)]
    pub feature_ids: Vec<String>,
}

#[derive(Debug, clap::Args)]
#[command(after_long_help = CliExamples("
  # Show the five best formula candidates of a feature
  sirius-client feature formulas -p my-project 587 --limit 5
"))]
pub(crate) struct FeatureFormulasArgs {
    #[command(flatten)]
    pub project: ProjectArg,
    /// Aligned feature id
    pub feature_id: String,
    #[command(flatten)]
    pub page: PageArgs,
}

pub(crate) fn handle(cli: &Cli, args: FeatureArgs) -> anyhow::Result<()> {
    match args.command {
        FeatureCommand::Ls(args) => list_features(cli, args),
        FeatureCommand::Get(args) => get_feature(cli, args),
        FeatureCommand::Rm(args) => delete_features(cli, args),
        FeatureCommand::Formulas(args) => list_formulas(cli, args),
    }
}

fn list_features(cli: &Cli, args: FeatureLsArgs) -> anyhow::Result<()> {
    let req = GetAlignedFeaturesPaged {
        project_id: &args.project.project,
        opt_fields: Some(&[]),
    };

    let features = cli.paginate(req, &args.page)?;

    match cli.output() {
        Output::Json => {
            let all = features.collect::<anyhow::Result<Vec<_>>>()?;
            print_json(&all)?;
        }
        Output::Tty => {
            let mut tw = TabWriter::new(stdout());
            writeln!(&mut tw, "ID\tCOMPOUND\tION MASS\tCHARGE\tRT APEX\tQUALITY")?;
            for f in features {
                let f = f?;
                writeln!(
                    &mut tw,
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    f.aligned_feature_id,
                    opt(f.compound_id),
                    opt(f.ion_mass.map(|m| format!("{m:.4}"))),
                    opt(f.charge),
                    opt(f.rt_apex_seconds.map(|rt| format!("{rt:.1}s"))),
                    opt(f.quality),
                )?;
            }

            tw.flush()?;
        }
    }

    Ok(())
}

fn get_feature(cli: &Cli, args: FeatureGetArgs) -> anyhow::Result<()> {
    let feature = cli.roundtrip(GetAlignedFeature {
        project_id: &args.project.project,
        aligned_feature_id: &args.feature_id,
        opt_fields: Some(&[
            AlignedFeatureOptField::TopAnnotations,
            AlignedFeatureOptField::ComputedTools,
        ]),
    })?;

    if cli.output() == Output::Json {
        return print_json(&feature);
    }

    let mut out = anstream::stdout().lock();
    let mut tw = TabWriter::new(&mut out).ansi(true);

    writeln!(&mut tw, "{HEADER}Feature {}{HEADER:#}", feature.aligned_feature_id)?;
    if let Some(name) = &feature.name {
        writeln!(&mut tw, "{GREEN}Name{GREEN:#}\t{name}")?;
    }
    if let Some(id) = &feature.compound_id {
        writeln!(&mut tw, "{GREEN}Compound{GREEN:#}\t{id}")?;
    }
    if let Some(mass) = feature.ion_mass {
        writeln!(&mut tw, "{GREEN}Ion Mass{GREEN:#}\t{mass:.4}")?;
    }
    if let Some(charge) = feature.charge {
        writeln!(&mut tw, "{GREEN}Charge{GREEN:#}\t{charge}")?;
    }
    if !feature.detected_adducts.is_empty() {
        writeln!(
            &mut tw,
            "{GREEN}Adducts{GREEN:#}\t{}",
            feature.detected_adducts.join(", ")
        )?;
    }
    if let Some(rt) = feature.rt_apex_seconds {
        writeln!(&mut tw, "{GREEN}RT Apex{GREEN:#}\t{rt:.1}s")?;
    }
    if let Some(quality) = &feature.quality {
        writeln!(&mut tw, "{GREEN}Quality{GREEN:#}\t{quality}")?;
    }

    if let Some(tools) = &feature.computed_tools {
        let done: Vec<&str> = [
            ("spectral library search", tools.library_search),
            ("formula", tools.formula_search),
            ("zodiac", tools.zodiac),
            ("fingerprint", tools.fingerprint),
            ("canopus", tools.canopus),
            ("structure", tools.structure_search),
            ("de novo structure", tools.de_novo_search),
        ]
        .into_iter()
        .filter_map(|(name, computed)| computed.then_some(name))
        .collect();

        writeln!(&mut tw, "{GREEN}Computed{GREEN:#}\t{}", done.join(", "))?;
    }

    if let Some(top) = &feature.top_annotations {
        writeln!(&mut tw, "\n{HEADER}Top Annotations{HEADER:#}")?;
        if let Some(formula) = &top.formula_annotation {
            writeln!(
                &mut tw,
                "{BLUE}Formula{BLUE:#}\t{} {}",
                opt(formula.molecular_formula.as_deref()),
                Styled(DIM, opt(formula.adduct.as_deref()))
            )?;
        }
        if let Some(structure) = &top.structure_annotation {
            writeln!(
                &mut tw,
                "{BLUE}Structure{BLUE:#}\t{} {}",
                structure.inchi_key,
                Styled(DIM, opt(structure.structure_name.as_deref()))
            )?;
        }
        if let Some(confidence) = top.confidence_exact_match {
            writeln!(&mut tw, "{BLUE}Confidence{BLUE:#}\t{confidence:.3}")?;
        }
    }

    tw.flush()?;
    Ok(())
}

fn delete_features(cli: &Cli, args: FeatureRmArgs) -> anyhow::Result<()> {
    let project_id = &args.project.project;

    if let [feature_id] = args.feature_ids.as_slice() {
        cli.roundtrip(DeleteAlignedFeature {
            project_id,
            aligned_feature_id: feature_id,
        })?;
    } else {
        let ids: Vec<&str> = args.feature_ids.iter().map(String::as_str).collect();
        cli.roundtrip(DeleteAlignedFeatures {
            project_id,
            aligned_feature_ids: &ids,
        })?;
    }

    eprintln!("Deleted {} feature(s)", args.feature_ids.len());
    Ok(())
}

fn list_formulas(cli: &Cli, args: FeatureFormulasArgs) -> anyhow::Result<()> {
    let req = GetFormulaCandidatesPaged {
        project_id: &args.project.project,
        aligned_feature_id: &args.feature_id,
        opt_fields: Some(&[]),
    };

    let candidates = cli.paginate(req, &args.page)?;

    match cli.output() {
        Output::Json => {
            let all = candidates.collect::<anyhow::Result<Vec<_>>>()?;
            print_json(&all)?;
        }
        Output::Tty => {
            let mut tw = TabWriter::new(stdout());
            writeln!(
                &mut tw,
                "RANK\tFORMULA\tADDUCT\tSIRIUS SCORE\tZODIAC SCORE\tID"
            )?;
            for c in candidates {
                let c = c?;
                writeln!(
                    &mut tw,
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    opt(c.rank),
                    opt(c.molecular_formula),
                    opt(c.adduct),
                    opt(c.sirius_score.map(|s| format!("{s:.3}"))),
                    opt(c.zodiac_score.map(|s| format!("{s:.3}"))),
                    c.formula_id,
                )?;
            }

            tw.flush()?;
        }
    }

    Ok(())
}
