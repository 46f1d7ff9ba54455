//! API operations concerning background jobs and stored job configurations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::api::{ApiRequest, DataResponse, PagedModel, QueryParams, segment};

api_enum! {
    /// The lifecycle state of a job.
    pub enum JobState {
        "WAITING" => Waiting,
        "READY" => Ready,
        "QUEUED" => Queued,
        "SUBMITTED" => Submitted,
        "RUNNING" => Running,
        "CANCELED" => Canceled,
        "FAILED" => Failed,
        "DONE" => Done,
    }
}

impl JobState {
    /// Returns true if the job will not make any more progress.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Done | JobState::Failed | JobState::Canceled)
    }
}

api_enum! {
    /// What a job does to the project.
    pub enum JobEffect {
        "IMPORT" => Import,
        "COMPUTATION" => Computation,
        "DELETION" => Deletion,
    }
}

api_enum! {
    /// Optional fields of a [Job].
    pub enum JobOptField {
        "command" => Command,
        "progress" => Progress,
        "affectedIds" => AffectedIds,
    }
}

/// The progress of a job.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProgress {
    /// True if there is no meaningful progress value.
    #[serde(default)]
    pub indeterminate: bool,
    /// The current state.
    pub state: JobState,
    /// Progress so far, out of `max_progress`.
    pub current_progress: Option<u64>,
    /// The progress value at which the job is complete.
    pub max_progress: Option<u64>,
    /// A status message.
    pub message: Option<String>,
    /// The error, if the job failed.
    pub error_message: Option<String>,
}

/// A background job.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// The job id, unique within the service.
    pub id: String,
    /// The command line equivalent of the job. Only set with
    /// [JobOptField::Command].
    pub command: Option<String>,
    /// Only set with [JobOptField::Progress].
    pub progress: Option<JobProgress>,
    /// Compounds the job touches. Only set with [JobOptField::AffectedIds].
    pub affected_compound_ids: Option<Vec<String>>,
    /// Aligned features the job touches.
    pub affected_aligned_feature_ids: Option<Vec<String>>,
    /// What the job does to the project.
    pub job_effect: Option<JobEffect>,
}

impl DataResponse for Job {}

impl Job {
    /// Returns true if the job is done, failed or was canceled. A job with no
    /// progress information is never considered finished.
    pub fn is_finished(&self) -> bool {
        self.progress.as_ref().is_some_and(|p| p.state.is_terminal())
    }
}

/// The tools and parameters to run on a set of features.
///
/// Tool parameter objects are passed through as raw JSON; fetch
/// [GetDefaultJobConfig] to get a template with all parameters set.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSubmission {
    /// Compounds to compute. Their features are added to `aligned_feature_ids`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compound_ids: Option<Vec<String>>,
    /// Aligned features to compute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aligned_feature_ids: Option<Vec<String>>,
    /// Adducts to use if none were detected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_adducts: Option<Vec<String>>,
    /// Adducts that are always considered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforced_adducts: Option<Vec<String>>,
    /// Adducts that may be detected from the data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detectable_adducts: Option<Vec<String>>,
    /// Recompute results that already exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recompute: Option<bool>,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spectra_search_params: Option<serde_json::Value>,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula_id_params: Option<serde_json::Value>,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zodiac_params: Option<serde_json::Value>,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint_prediction_params: Option<serde_json::Value>,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canopus_params: Option<serde_json::Value>,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure_db_search_params: Option<serde_json::Value>,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ms_novelist_params: Option<serde_json::Value>,
    /// Raw configuration keys, as used on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map: Option<BTreeMap<String, String>>,
}

impl DataResponse for JobSubmission {}

/// A named job configuration stored by the service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredJobSubmission {
    /// The name of the configuration.
    pub name: String,
    /// False for built-in configurations.
    #[serde(default)]
    pub editable: bool,
    /// The stored configuration.
    pub job_submission: JobSubmission,
}

impl DataResponse for StoredJobSubmission {}

/// A raw command line to run as a job.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandSubmission<'a> {
    /// Compounds to run the command on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compound_ids: Option<&'a [&'a str]>,
    /// Aligned features to run the command on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aligned_feature_ids: Option<&'a [&'a str]>,
    /// The command and its arguments, without input options.
    pub command: &'a [&'a str],
}

/// Get a single job.
#[derive(Debug, Clone)]
pub struct GetJob<'a> {
    /// The project the job runs on.
    pub project_id: &'a str,
    /// The job to fetch.
    pub job_id: &'a str,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [JobOptField]>,
}

impl ApiRequest for GetJob<'_> {
    type Response = Job;

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/jobs/{}",
            segment(self.project_id),
            segment(self.job_id)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_fields("optFields", self.opt_fields))
    }
}

/// List the jobs of a project.
#[derive(Debug, Clone)]
pub struct GetJobs<'a> {
    /// The project.
    pub project_id: &'a str,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [JobOptField]>,
}

impl ApiRequest for GetJobs<'_> {
    type Response = Vec<Job>;

    fn path(&self) -> String {
        format!("/api/projects/{}/jobs", segment(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_fields("optFields", self.opt_fields))
    }
}

/// List the jobs of a project, page by page.
#[derive(Debug, Clone)]
pub struct GetJobsPaged<'a> {
    /// The project.
    pub project_id: &'a str,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [JobOptField]>,
}

impl ApiRequest for GetJobsPaged<'_> {
    type Response = PagedModel<Job>;

    fn path(&self) -> String {
        format!("/api/projects/{}/jobs/page", segment(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_fields("optFields", self.opt_fields))
    }
}

/// Check whether a project has jobs.
#[derive(Debug, Clone)]
pub struct HasJobs<'a> {
    /// The project.
    pub project_id: &'a str,
    /// Count finished jobs as well.
    pub include_finished: Option<bool>,
}

impl ApiRequest for HasJobs<'_> {
    type Response = bool;

    fn path(&self) -> String {
        format!("/api/projects/{}/has-jobs", segment(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_param("includeFinished", self.include_finished))
    }
}

/// Start computing a set of features.
#[derive(Debug, Clone)]
pub struct StartJob<'a> {
    /// The project.
    pub project_id: &'a str,
    /// What to compute.
    pub submission: &'a JobSubmission,
    /// Optional fields of the returned job.
    pub opt_fields: Option<&'a [JobOptField]>,
}

impl ApiRequest for StartJob<'_> {
    type Response = Job;

    fn method(&self) -> http::Method {
        http::Method::POST
    }

    fn path(&self) -> String {
        format!("/api/projects/{}/jobs", segment(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_fields("optFields", self.opt_fields))
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(self.submission)
    }
}

/// Start a job from a raw command line.
#[derive(Debug, Clone)]
pub struct StartCommand<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The command to run.
    pub submission: CommandSubmission<'a>,
    /// Optional fields of the returned job.
    pub opt_fields: Option<&'a [JobOptField]>,
}

impl ApiRequest for StartCommand<'_> {
    type Response = Job;

    fn method(&self) -> http::Method {
        http::Method::POST
    }

    fn path(&self) -> String {
        format!("/api/projects/{}/jobs/run-command", segment(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_fields("optFields", self.opt_fields))
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(&self.submission)
    }
}

/// Start computing a set of features with a stored configuration.
#[derive(Debug, Clone)]
pub struct StartJobFromConfig<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The name of the stored configuration.
    pub job_config_name: &'a str,
    /// Aligned features to compute.
    pub aligned_feature_ids: &'a [&'a str],
    /// Recompute results that already exist.
    pub recompute: Option<bool>,
    /// Optional fields of the returned job.
    pub opt_fields: Option<&'a [JobOptField]>,
}

impl ApiRequest for StartJobFromConfig<'_> {
    type Response = Job;

    fn method(&self) -> http::Method {
        http::Method::POST
    }

    fn path(&self) -> String {
        format!("/api/projects/{}/jobs/from-config", segment(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .param("jobConfigName", self.job_config_name)
                .opt_param("recompute", self.recompute)
                .opt_fields("optFields", self.opt_fields),
        )
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(self.aligned_feature_ids)
    }
}

/// Cancel and delete a job.
#[derive(Debug, Clone)]
pub struct DeleteJob<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The job to delete.
    pub job_id: &'a str,
    /// Cancel the job first if it is still running.
    pub cancel_if_running: Option<bool>,
    /// Block until the job has been deleted.
    pub await_deletion: Option<bool>,
}

impl ApiRequest for DeleteJob<'_> {
    type Response = ();

    fn method(&self) -> http::Method {
        http::Method::DELETE
    }

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/jobs/{}",
            segment(self.project_id),
            segment(self.job_id)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .opt_param("cancelIfRunning", self.cancel_if_running)
                .opt_param("awaitDeletion", self.await_deletion),
        )
    }
}

/// Cancel and delete all jobs of a project.
#[derive(Debug, Clone)]
pub struct DeleteJobs<'a> {
    /// The project.
    pub project_id: &'a str,
    /// Cancel jobs first if they are still running.
    pub cancel_if_running: Option<bool>,
    /// Block until the jobs have been deleted.
    pub await_deletion: Option<bool>,
}

impl ApiRequest for DeleteJobs<'_> {
    type Response = ();

    fn method(&self) -> http::Method {
        http::Method::DELETE
    }

    fn path(&self) -> String {
        format!("/api/projects/{}/jobs", segment(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .opt_param("cancelIfRunning", self.cancel_if_running)
                .opt_param("awaitDeletion", self.await_deletion),
        )
    }
}

/// Get the default job configuration, a template for [JobSubmission].
#[derive(Debug, Clone, Copy, Default)]
pub struct GetDefaultJobConfig {
    /// Include the raw configuration map.
    pub include_config_map: Option<bool>,
    /// Move tool parameters into the configuration map.
    pub move_parameters_to_config_map: Option<bool>,
    /// Include custom databases in the structure search parameters.
    pub include_custom_dbs_for_structure_search: Option<bool>,
}

impl ApiRequest for GetDefaultJobConfig {
    type Response = JobSubmission;

    fn path(&self) -> String {
        "/api/default-job-config".to_string()
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .opt_param("includeConfigMap", self.include_config_map)
                .opt_param(
                    "moveParametersToConfigMap",
                    self.move_parameters_to_config_map,
                )
                .opt_param(
                    "includeCustomDbsForStructureSearch",
                    self.include_custom_dbs_for_structure_search,
                ),
        )
    }
}

/// List the names of all stored job configurations.
#[derive(Debug, Clone, Copy)]
pub struct GetJobConfigNames;

impl ApiRequest for GetJobConfigNames {
    type Response = Vec<String>;

    fn path(&self) -> String {
        "/api/job-config-names".to_string()
    }
}

/// List all stored job configurations.
#[derive(Debug, Clone, Copy)]
pub struct GetJobConfigs;

impl ApiRequest for GetJobConfigs {
    type Response = Vec<StoredJobSubmission>;

    fn path(&self) -> String {
        "/api/job-configs".to_string()
    }
}

/// Get a stored job configuration by name.
#[derive(Debug, Clone)]
pub struct GetJobConfig<'a> {
    /// The name of the configuration.
    pub name: &'a str,
    /// Move tool parameters into the configuration map.
    pub move_parameters_to_config_map: Option<bool>,
}

impl ApiRequest for GetJobConfig<'_> {
    type Response = StoredJobSubmission;

    fn path(&self) -> String {
        format!("/api/job-configs/{}", segment(self.name))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_param(
            "moveParametersToConfigMap",
            self.move_parameters_to_config_map,
        ))
    }
}

/// Store a job configuration under a name.
#[derive(Debug, Clone)]
pub struct SaveJobConfig<'a> {
    /// The name to store the configuration under.
    pub name: &'a str,
    /// The configuration.
    pub submission: &'a JobSubmission,
    /// Replace an existing configuration with the same name.
    pub override_existing: Option<bool>,
    /// Move tool parameters into the configuration map.
    pub move_parameters_to_config_map: Option<bool>,
}

impl ApiRequest for SaveJobConfig<'_> {
    type Response = StoredJobSubmission;

    fn method(&self) -> http::Method {
        http::Method::POST
    }

    fn path(&self) -> String {
        format!("/api/job-configs/{}", segment(self.name))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .opt_param("overrideExisting", self.override_existing)
                .opt_param(
                    "moveParametersToConfigMap",
                    self.move_parameters_to_config_map,
                ),
        )
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(self.submission)
    }
}

/// Delete a stored job configuration.
#[derive(Debug, Clone)]
pub struct DeleteJobConfig<'a> {
    /// The name of the configuration.
    pub name: &'a str,
}

impl ApiRequest for DeleteJobConfig<'_> {
    type Response = ();

    fn method(&self) -> http::Method {
        http::Method::DELETE
    }

    fn path(&self) -> String {
        format!("/api/job-configs/{}", segment(self.name))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::api::test::{build, respond};

    #[test]
    fn start_job_request() {
        let submission = JobSubmission {
            aligned_feature_ids: Some(vec!["1".to_owned(), "2".to_owned()]),
            recompute: Some(false),
            formula_id_params: Some(serde_json::json!({"enabled": true})),
            ..Default::default()
        };

        let req = build(StartJob {
            project_id: "p",
            submission: &submission,
            opt_fields: Some(&[JobOptField::Progress, JobOptField::Command]),
        });

        assert_eq!(req.method(), http::Method::POST);
        assert_eq!(req.uri().path(), "/api/projects/p/jobs");
        assert_eq!(
            req.uri().query(),
            Some("optFields=progress&optFields=command")
        );
        assert_eq!(
            req.body(),
            r#"{"alignedFeatureIds":["1","2"],"recompute":false,"formulaIdParams":{"enabled":true}}"#
        );
    }

    #[test]
    fn start_job_from_config_request() {
        let req = build(StartJobFromConfig {
            project_id: "p",
            job_config_name: "fast mode",
            aligned_feature_ids: &["7"],
            recompute: Some(true),
            opt_fields: None,
        });

        assert_eq!(req.uri().path(), "/api/projects/p/jobs/from-config");
        assert_eq!(
            req.uri().query(),
            Some("jobConfigName=fast+mode&recompute=true")
        );
        assert_eq!(req.body(), r#"["7"]"#);
    }

    #[test]
    fn start_command_body() {
        let req = build(StartCommand {
            project_id: "p",
            submission: CommandSubmission {
                aligned_feature_ids: Some(&["1"]),
                command: &["formula", "--profile", "orbitrap"],
                ..Default::default()
            },
            opt_fields: None,
        });

        assert_eq!(
            req.body(),
            r#"{"alignedFeatureIds":["1"],"command":["formula","--profile","orbitrap"]}"#
        );
    }

    #[test]
    fn delete_job_request() {
        let req = build(DeleteJob {
            project_id: "p",
            job_id: "12",
            cancel_if_running: Some(true),
            await_deletion: None,
        });

        assert_eq!(req.method(), http::Method::DELETE);
        assert_eq!(req.uri().path(), "/api/projects/p/jobs/12");
        assert_eq!(req.uri().query(), Some("cancelIfRunning=true"));
    }

    #[test]
    fn parse_job() {
        let body = r#"{
            "id": "3",
            "command": "sirius formula",
            "progress": {
                "indeterminate": false,
                "state": "RUNNING",
                "currentProgress": 5,
                "maxProgress": 10,
                "message": "computing"
            },
            "affectedCompoundIds": ["1"],
            "affectedAlignedFeatureIds": ["2", "3"],
            "jobEffect": "COMPUTATION"
        }"#;

        let mut job = respond::<Job>(200, body).unwrap();
        assert!(!job.is_finished());
        assert_eq!(job.job_effect, Some(JobEffect::Computation));

        if let Some(p) = job.progress.as_mut() {
            p.state = JobState::Canceled;
        }
        assert!(job.is_finished());
    }

    #[test]
    fn job_without_progress_is_not_finished() {
        let job = respond::<Job>(200, r#"{"id": "1"}"#).unwrap();
        assert!(!job.is_finished());
    }

    #[test]
    fn parse_stored_job_submission() {
        let body = r#"{
            "name": "Default",
            "editable": false,
            "jobSubmission": {
                "fallbackAdducts": ["[M+H]+"],
                "configMap": {"AlgorithmProfile": "qtof"},
                "canopusParams": {"enabled": false}
            }
        }"#;

        let stored = respond::<StoredJobSubmission>(200, body).unwrap();
        assert!(!stored.editable);
        assert_eq!(
            stored.job_submission.config_map.unwrap()["AlgorithmProfile"],
            "qtof"
        );
    }
}
