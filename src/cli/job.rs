use std::{
    io::{Write as _, stdout},
    time::{Duration, Instant},
};

use anyhow::bail;
use sirius_client::job::*;
use tabwriter::TabWriter;
use tracing::debug;

use crate::cli::{
    Cli, Output, PageArgs, ProjectArg, color::*, is_not_found, opt, print_json,
    spinner::JobSpinnerExt as _,
};

#[derive(Debug, clap::Args)]
pub(crate) struct JobArgs {
    #[command(subcommand)]
    pub command: JobCommand,
}

#[derive(Debug, clap::Subcommand)]
pub(crate) enum JobCommand {
    /// List the jobs of a project
    #[clap(alias = "list")]
    Ls(JobLsArgs),
    /// Get information about a job
    Get(JobGetArgs),
    /// Cancel and delete a job
    #[clap(alias = "delete")]
    Rm(JobRmArgs),
    /// Wait for a job to finish
    Wait(JobWaitArgs),
}

#[derive(Debug, clap::Args)]
pub(crate) struct JobLsArgs {
    #[command(flatten)]
    pub project: ProjectArg,
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, clap::Args)]
pub(crate) struct JobGetArgs {
    #[command(flatten)]
    pub project: ProjectArg,
    /// Job id
    pub job_id: String,
}

#[derive(Debug, clap::Args)]
pub(crate) struct JobRmArgs {
    #[command(flatten)]
    pub project: ProjectArg,
    /// Job id
    pub job_id: String,
    /// Fail instead of canceling the job if it is still running
    #[arg(long)]
    pub no_cancel: bool,
    /// Do not fail if the job does not exist
    #[arg(long)]
    pub if_exists: bool,
}

#[derive(Debug, clap::Args)]
#[command(after_long_help = CliExamples("
  # Wait for a job, polling every five seconds
  sirius-client job wait -p my-project 12 --interval 5s

  # Give up after ten minutes
  sirius-client job wait -p my-project 12 --timeout 10m
"))]
pub(crate) struct JobWaitArgs {
    #[command(flatten)]
    pub project: ProjectArg,
    /// Job id
    pub job_id: String,
    /// How often to poll the job
    #[arg(long, default_value = "1s")]
    pub interval: humantime::Duration,
    /// Stop waiting after this long
    #[arg(long)]
    pub timeout: Option<humantime::Duration>,
}

pub(crate) fn handle(cli: &Cli, args: JobArgs) -> anyhow::Result<()> {
    match args.command {
        JobCommand::Ls(args) => list_jobs(cli, args),
        JobCommand::Get(args) => get_job(cli, args),
        JobCommand::Rm(args) => delete_job(cli, args),
        JobCommand::Wait(args) => wait_job(cli, args),
    }
}

const PROGRESS: &[JobOptField] = &[JobOptField::Command, JobOptField::Progress];

fn list_jobs(cli: &Cli, args: JobLsArgs) -> anyhow::Result<()> {
    let req = GetJobsPaged {
        project_id: &args.project.project,
        opt_fields: Some(PROGRESS),
    };

    let jobs = cli.paginate(req, &args.page)?;

    match cli.output() {
        Output::Json => {
            let all = jobs.collect::<anyhow::Result<Vec<_>>>()?;
            print_json(&all)?;
        }
        Output::Tty => {
            let mut out = anstream::stdout().lock();
            let mut tw = TabWriter::new(&mut out).ansi(true);
            writeln!(&mut tw, "ID\tSTATE\tPROGRESS\tCOMMAND")?;
            for job in jobs {
                let job = job?;
                writeln!(
                    &mut tw,
                    "{}\t{}\t{}\t{}",
                    job.id,
                    format_state(&job),
                    format_progress(&job),
                    opt(job.command.as_deref()),
                )?;
            }

            tw.flush()?;
        }
    }

    Ok(())
}

fn get_job(cli: &Cli, args: JobGetArgs) -> anyhow::Result<()> {
    let job = cli.roundtrip(GetJob {
        project_id: &args.project.project,
        job_id: &args.job_id,
        opt_fields: Some(&[
            JobOptField::Command,
            JobOptField::Progress,
            JobOptField::AffectedIds,
        ]),
    })?;

    if cli.output() == Output::Json {
        return print_json(&job);
    }

    let mut out = anstream::stdout().lock();
    let mut tw = TabWriter::new(&mut out).ansi(true);

    writeln!(&mut tw, "{HEADER}Job {}{HEADER:#}", job.id)?;
    writeln!(&mut tw, "{GREEN}State{GREEN:#}\t{}", format_state(&job))?;
    writeln!(&mut tw, "{GREEN}Progress{GREEN:#}\t{}", format_progress(&job))?;
    if let Some(command) = &job.command {
        writeln!(&mut tw, "{GREEN}Command{GREEN:#}\t{command}")?;
    }
    if let Some(effect) = &job.job_effect {
        writeln!(&mut tw, "{GREEN}Effect{GREEN:#}\t{effect}")?;
    }
    if let Some(progress) = &job.progress {
        if let Some(msg) = &progress.message {
            writeln!(&mut tw, "{GREEN}Message{GREEN:#}\t{msg}")?;
        }
        if let Some(err) = &progress.error_message {
            writeln!(&mut tw, "{GREEN}Error{GREEN:#}\t{}", Styled(RED, err))?;
        }
    }
    if let Some(ids) = &job.affected_compound_ids {
        writeln!(&mut tw, "{GREEN}Compounds{GREEN:#}\t{}", ids.len())?;
    }
    if let Some(ids) = &job.affected_aligned_feature_ids {
        writeln!(&mut tw, "{GREEN}Features{GREEN:#}\t{}", ids.len())?;
    }

    tw.flush()?;
    Ok(())
}

fn delete_job(cli: &Cli, args: JobRmArgs) -> anyhow::Result<()> {
    let req = DeleteJob {
        project_id: &args.project.project,
        job_id: &args.job_id,
        cancel_if_running: Some(!args.no_cancel),
        await_deletion: Some(true),
    };

    match cli.roundtrip(req) {
        Ok(()) => eprintln!("Deleted job {:?}", args.job_id),
        Err(e) if args.if_exists && is_not_found(&e) => {
            eprintln!("Job {:?} does not exist", args.job_id)
        }
        Err(e) => return Err(e),
    }

    Ok(())
}

fn wait_job(cli: &Cli, args: JobWaitArgs) -> anyhow::Result<()> {
    let job = wait_for_job(
        cli,
        &args.project.project,
        &args.job_id,
        args.interval.into(),
        args.timeout.map(Into::into),
    )?;

    if cli.output() == Output::Json {
        print_json(&job)?;
    }

    Ok(())
}

/// Polls a job until it reaches a terminal state, showing a spinner with
/// its progress. Returns an error if the job failed or was canceled, or if
/// the server reports no progress for it.
pub(crate) fn wait_for_job(
    cli: &Cli,
    project_id: &str,
    job_id: &str,
    interval: Duration,
    timeout: Option<Duration>,
) -> anyhow::Result<Job> {
    let start = Instant::now();
    let spinner = cli.job_spinner(job_id);

    let (job, progress) = loop {
        let job = cli.roundtrip(GetJob {
            project_id,
            job_id,
            opt_fields: Some(PROGRESS),
        });

        let job = match job {
            Ok(job) => job,
            Err(e) => {
                spinner.finish_with_error();
                return Err(e);
            }
        };

        debug!(job_id, progress = ?job.progress, "polled job");

        let Some(progress) = job.progress.clone() else {
            spinner.finish_with_error();
            bail!("job {job_id} has no progress information");
        };

        if progress.state.is_terminal() {
            break (job, progress);
        }

        spinner.set_job(&job);

        if timeout.is_some_and(|t| start.elapsed() >= t) {
            spinner.finish_with_timeout();
            bail!("timed out waiting for job {job_id}");
        }

        std::thread::sleep(interval);
    };

    spinner.finish_with_state(&progress.state);
    if progress.state != JobState::Done {
        let reason = progress
            .error_message
            .as_deref()
            .unwrap_or("no error message");
        bail!("job {job_id} ended in state {}: {reason}", progress.state);
    }

    Ok(job)
}

fn format_state(job: &Job) -> String {
    match &job.progress {
        Some(p) => Styled(job_state(&p.state), &p.state).to_string(),
        None => String::new(),
    }
}

pub(crate) fn format_progress(job: &Job) -> String {
    let Some(p) = &job.progress else {
        return String::new();
    };

    match (p.current_progress, p.max_progress) {
        (Some(cur), Some(max)) if max > 0 && !p.indeterminate => {
            format!("{cur}/{max} ({:.0}%)", cur as f64 * 100.0 / max as f64)
        }
        _ => p.message.clone().unwrap_or_default(),
    }
}
