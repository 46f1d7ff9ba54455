use std::{fmt::Write, time::Duration};

use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use sirius_client::job::{Job, JobState};

use crate::cli::{
    color::{RED, Styled, YELLOW, job_state},
    job::format_progress,
};

const TICK_INTERVAL: Duration = Duration::from_millis(100);

impl super::Cli {
    /// Creates a ticking spinner for a job. The timestamp and elapsed time
    /// columns line up with the log output.
    pub(crate) fn job_spinner(&self, job_id: &str) -> ProgressBar {
        fn elapsed_decimal(state: &ProgressState, w: &mut dyn Write) {
            let _ = write!(w, "[{:.1}s]", state.elapsed().as_secs_f64());
        }
        fn current_timestamp(_state: &ProgressState, w: &mut dyn Write) {
            let _ = write!(w, "{}", chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"));
        }

        let style = ProgressStyle::with_template(
            "{current_timestamp:.dim} {elapsed_decimal:<8.dim} {prefix:.blue} {msg} {spinner:.cyan/blue}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .with_key("elapsed_decimal", elapsed_decimal)
        .with_key("current_timestamp", current_timestamp)
        .tick_strings(&["⠋", "⠙", "⠚", "⠞", "⠖", "⠦", "⠴", "⠲", "⠳", "⠓", ""]);

        let spinner = self.multiprogress.add(
            ProgressBar::new_spinner()
                .with_style(style)
                .with_prefix(format!("Job {job_id}")),
        );
        spinner.enable_steady_tick(TICK_INTERVAL);
        spinner
    }
}

pub(crate) trait JobSpinnerExt {
    /// Shows the state and progress of a polled job.
    fn set_job(&self, job: &Job);
    /// Stops the spinner, showing the final state of the job.
    fn finish_with_state(&self, state: &JobState);
    fn finish_with_timeout(&self);
    fn finish_with_error(&self);
}

impl JobSpinnerExt for ProgressBar {
    fn set_job(&self, job: &Job) {
        let Some(progress) = &job.progress else {
            return;
        };

        self.set_message(format!(
            "{} {}",
            Styled(job_state(&progress.state), &progress.state),
            format_progress(job)
        ));
    }

    fn finish_with_state(&self, state: &JobState) {
        self.finish_with_message(Styled(job_state(state), state).to_string());
    }

    fn finish_with_timeout(&self) {
        self.finish_with_message(Styled(YELLOW, "timed out").to_string());
    }

    fn finish_with_error(&self) {
        self.finish_with_message(Styled(RED, "failed").to_string());
    }
}
