//! API operations concerning project-spaces.

use serde::{Deserialize, Serialize};

use crate::api::{
    ApiRequest, DataResponse, PlainText, QueryParams,
    job::{Job, JobOptField},
    segment,
};

api_enum! {
    /// How the data in a project was imported.
    pub enum ProjectType {
        "DIRECT_IMPORT" => DirectImport,
        "PEAKLISTS" => Peaklists,
        "ALIGNED_RUNS" => AlignedRuns,
        "UNALIGNED_RUNS" => UnalignedRuns,
    }
}

api_enum! {
    /// Optional fields of a [ProjectInfo].
    pub enum ProjectInfoOptField {
        "compatibilityInfo" => CompatibilityInfo,
        "sizeInformation" => SizeInformation,
    }
}

/// A project-space known to the service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    /// The unique name of the project.
    pub project_id: String,
    /// The location of the project on the server's filesystem.
    pub location: String,
    /// A description of the project.
    pub description: Option<String>,
    /// How the data in the project was imported.
    #[serde(rename = "type")]
    pub project_type: Option<ProjectType>,
    /// Whether the project can be used with the running service version.
    /// Only set with [ProjectInfoOptField::CompatibilityInfo].
    pub compatible: Option<bool>,
    /// The number of aligned features. Only set with
    /// [ProjectInfoOptField::SizeInformation].
    pub num_of_features: Option<u64>,
    /// The number of compounds.
    pub num_of_compounds: Option<u64>,
    /// The size of the project on disk.
    pub num_of_bytes: Option<u64>,
}

impl DataResponse for ProjectInfo {}

/// List all opened projects.
#[derive(Debug, Clone, Copy)]
pub struct GetProjects;

impl ApiRequest for GetProjects {
    type Response = Vec<ProjectInfo>;

    fn path(&self) -> String {
        "/api/projects".to_string()
    }
}

/// Get a single opened project.
#[derive(Debug, Clone)]
pub struct GetProject<'a> {
    /// The project to fetch.
    pub project_id: &'a str,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [ProjectInfoOptField]>,
}

impl ApiRequest for GetProject<'_> {
    type Response = ProjectInfo;

    fn path(&self) -> String {
        format!("/api/projects/{}", segment(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_fields("optFields", self.opt_fields))
    }
}

/// Open an existing project-space and make it accessible under the given id.
#[derive(Debug, Clone)]
pub struct OpenProject<'a> {
    /// The id to open the project under.
    pub project_id: &'a str,
    /// The location of the project on the server. If unset, the project is
    /// looked up in the server's default project directory.
    pub path_to_project: Option<&'a str>,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [ProjectInfoOptField]>,
}

impl ApiRequest for OpenProject<'_> {
    type Response = ProjectInfo;

    fn method(&self) -> http::Method {
        http::Method::PUT
    }

    fn path(&self) -> String {
        format!("/api/projects/{}", segment(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .opt_param("pathToProject", self.path_to_project)
                .opt_fields("optFields", self.opt_fields),
        )
    }
}

/// Create and open a new project-space.
#[derive(Debug, Clone)]
pub struct CreateProject<'a> {
    /// The id for the new project. Must be unique among open projects.
    pub project_id: &'a str,
    /// Where to create the project on the server. If unset, it is created
    /// in the server's default project directory.
    pub path_to_project: Option<&'a str>,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [ProjectInfoOptField]>,
}

impl ApiRequest for CreateProject<'_> {
    type Response = ProjectInfo;

    fn method(&self) -> http::Method {
        http::Method::POST
    }

    fn path(&self) -> String {
        format!("/api/projects/{}", segment(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .opt_param("pathToProject", self.path_to_project)
                .opt_fields("optFields", self.opt_fields),
        )
    }
}

/// Close a project-space. The project is not deleted from disk.
#[derive(Debug, Clone)]
pub struct CloseProject<'a> {
    /// The project to close.
    pub project_id: &'a str,
    /// Compact the project storage after closing.
    pub compact: Option<bool>,
}

impl ApiRequest for CloseProject<'_> {
    type Response = ();

    fn method(&self) -> http::Method {
        http::Method::DELETE
    }

    fn path(&self) -> String {
        format!("/api/projects/{}", segment(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_param("compact", self.compact))
    }
}

/// Copy a project-space to a new location. The copy is only opened if
/// `copy_project_id` is set.
#[derive(Debug, Clone)]
pub struct CopyProject<'a> {
    /// The project to copy.
    pub project_id: &'a str,
    /// The destination on the server.
    pub path_to_copied_project: &'a str,
    /// Open the copy under this id.
    pub copy_project_id: Option<&'a str>,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [ProjectInfoOptField]>,
}

impl ApiRequest for CopyProject<'_> {
    type Response = ProjectInfo;

    fn method(&self) -> http::Method {
        http::Method::PUT
    }

    fn path(&self) -> String {
        format!("/api/projects/{}/copy", segment(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .param("pathToCopiedProject", self.path_to_copied_project)
                .opt_param("copyProjectId", self.copy_project_id)
                .opt_fields("optFields", self.opt_fields),
        )
    }
}

/// The objects created by an import.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    /// Ids of the compounds that were created.
    #[serde(default)]
    pub affected_compound_ids: Vec<String>,
    /// Ids of the aligned features that were created.
    #[serde(default)]
    pub affected_aligned_feature_ids: Vec<String>,
}

impl DataResponse for ImportResult {}

/// Feature finding and alignment parameters for importing LC-MS runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LcmsSubmissionParameters {
    /// Align the runs after feature finding.
    pub align_lcms_runs: Option<bool>,
    /// The noise level; estimated from the data if unset.
    pub noise_intensity: Option<f64>,
    /// Maximal allowed mass deviation within a trace, in ppm.
    pub trace_max_mass_deviation: Option<f64>,
    /// Maximal allowed mass deviation for aligning features, in ppm.
    pub align_max_mass_deviation: Option<f64>,
    /// Maximal allowed retention time deviation for aligning features, in
    /// seconds.
    pub align_max_retention_time_deviation: Option<f64>,
    /// Minimal signal-to-noise ratio for a feature.
    pub min_snr: Option<f64>,
}

impl LcmsSubmissionParameters {
    fn to_query(self) -> QueryParams {
        QueryParams::new()
            .opt_param("alignLCMSRuns", self.align_lcms_runs)
            .opt_param("noiseIntensity", self.noise_intensity)
            .opt_param("traceMaxMassDeviation", self.trace_max_mass_deviation)
            .opt_param("alignMaxMassDeviation", self.align_max_mass_deviation)
            .opt_param(
                "alignMaxRetentionTimeDeviation",
                self.align_max_retention_time_deviation,
            )
            .opt_param("minSNR", self.min_snr)
    }
}

/// Import and align full LC-MS runs (mzML, mzXML) from paths on the server's
/// filesystem.
#[derive(Debug, Clone)]
pub struct ImportMsRunDataLocally<'a> {
    /// The project to import into.
    pub project_id: &'a str,
    /// Files or directories on the server.
    pub paths: &'a [&'a str],
    /// Feature finding and alignment parameters.
    pub parameters: LcmsSubmissionParameters,
}

impl ApiRequest for ImportMsRunDataLocally<'_> {
    type Response = ImportResult;

    fn method(&self) -> http::Method {
        http::Method::POST
    }

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/import/ms-local-data-files",
            segment(self.project_id)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(self.parameters.to_query())
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(self.paths)
    }
}

/// Like [ImportMsRunDataLocally], but runs the import as a background job.
#[derive(Debug, Clone)]
pub struct ImportMsRunDataAsJobLocally<'a> {
    /// The project to import into.
    pub project_id: &'a str,
    /// Files or directories on the server.
    pub paths: &'a [&'a str],
    /// Feature finding and alignment parameters.
    pub parameters: LcmsSubmissionParameters,
    /// Optional fields of the returned job.
    pub opt_fields: Option<&'a [JobOptField]>,
}

impl ApiRequest for ImportMsRunDataAsJobLocally<'_> {
    type Response = Job;

    fn method(&self) -> http::Method {
        http::Method::POST
    }

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/import/ms-data-local-files-job",
            segment(self.project_id)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            self.parameters
                .to_query()
                .opt_fields("optFields", self.opt_fields),
        )
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(self.paths)
    }
}

/// Import already preprocessed data (peak lists, e.g. `.ms`, `.mgf`, `.mat`)
/// from paths on the server's filesystem.
#[derive(Debug, Clone)]
pub struct ImportPreprocessedDataLocally<'a> {
    /// The project to import into.
    pub project_id: &'a str,
    /// Files or directories on the server.
    pub paths: &'a [&'a str],
    /// Ignore molecular formulas given in the input files.
    pub ignore_formulas: Option<bool>,
    /// Import features that have no MS/MS data.
    pub allow_ms1_only: Option<bool>,
}

impl ApiRequest for ImportPreprocessedDataLocally<'_> {
    type Response = ImportResult;

    fn method(&self) -> http::Method {
        http::Method::POST
    }

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/import/preprocessed-local-data-files",
            segment(self.project_id)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .opt_param("ignoreFormulas", self.ignore_formulas)
                .opt_param("allowMs1Only", self.allow_ms1_only),
        )
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(self.paths)
    }
}

/// Like [ImportPreprocessedDataLocally], but runs the import as a background
/// job.
#[derive(Debug, Clone)]
pub struct ImportPreprocessedDataAsJobLocally<'a> {
    /// The project to import into.
    pub project_id: &'a str,
    /// Files or directories on the server.
    pub paths: &'a [&'a str],
    /// Ignore molecular formulas given in the input files.
    pub ignore_formulas: Option<bool>,
    /// Import features that have no MS/MS data.
    pub allow_ms1_only: Option<bool>,
    /// Optional fields of the returned job.
    pub opt_fields: Option<&'a [JobOptField]>,
}

impl ApiRequest for ImportPreprocessedDataAsJobLocally<'_> {
    type Response = Job;

    fn method(&self) -> http::Method {
        http::Method::POST
    }

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/import/preprocessed-local-data-files-job",
            segment(self.project_id)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .opt_param("ignoreFormulas", self.ignore_formulas)
                .opt_param("allowMs1Only", self.allow_ms1_only)
                .opt_fields("optFields", self.opt_fields),
        )
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(self.paths)
    }
}

/// Which predictor training data to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictorData {
    /// The CSI:FingerID fingerprint definition.
    FingerId,
    /// The CANOPUS ClassyFire class definitions.
    CanopusClassyFire,
    /// The CANOPUS NPC class definitions.
    CanopusNpc,
}

/// Export the fingerprint or compound class definitions used by the
/// predictors of a project, as CSV.
#[derive(Debug, Clone)]
pub struct GetPredictorData<'a> {
    /// The project.
    pub project_id: &'a str,
    /// Which definitions to export.
    pub data: PredictorData,
    /// The ion mode, `1` or `-1`.
    pub charge: i32,
}

impl ApiRequest for GetPredictorData<'_> {
    type Response = PlainText;

    fn path(&self) -> String {
        let kind = match self.data {
            PredictorData::FingerId => "fingerid-data",
            PredictorData::CanopusClassyFire => "cf-data",
            PredictorData::CanopusNpc => "npc-data",
        };

        format!("/api/projects/{}/{kind}", segment(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().param("charge", self.charge))
    }

    fn accept(&self) -> &'static str {
        "application/CSV"
    }
}
