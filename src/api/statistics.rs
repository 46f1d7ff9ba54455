//! API operations concerning fold-change statistics between groups of runs.

use serde::{Deserialize, Serialize};

use crate::api::{
    ApiRequest, DataResponse, QueryParams,
    job::{Job, JobOptField},
    quant::QuantRowType,
    segment,
};

api_enum! {
    /// How quantities of one group are combined.
    pub enum AggregationType {
        "AVG" => Avg,
        "MIN" => Min,
        "MAX" => Max,
    }
}

api_enum! {
    /// The quantity compared between groups.
    pub enum QuantMeasure {
        "APEX_INTENSITY" => ApexIntensity,
        "AREA_UNDER_CURVE" => AreaUnderCurve,
    }
}

api_enum! {
    /// The kind of statistic in a [StatisticsTable].
    pub enum StatisticsType {
        "FOLD_CHANGE" => FoldChange,
    }
}

/// The objects fold changes are computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatisticsTarget {
    /// Compounds.
    Compounds,
    /// Aligned features.
    AlignedFeatures,
}

impl StatisticsTarget {
    fn path(self, project_id: &str) -> String {
        let target = match self {
            StatisticsTarget::Compounds => "compounds",
            StatisticsTarget::AlignedFeatures => "aligned-features",
        };

        format!("/api/projects/{}/{target}/statistics", segment(project_id))
    }
}

/// The fold change of one object between two groups.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoldChange {
    /// The name of the left group.
    pub left_group: String,
    /// The name of the right group.
    pub right_group: String,
    /// How quantities were aggregated.
    pub aggregation: Option<AggregationType>,
    /// What was quantified.
    pub quantification: Option<QuantMeasure>,
    /// The compound or aligned feature.
    pub object_id: Option<String>,
    /// The ratio of left to right.
    pub fold_change: f64,
}

impl DataResponse for FoldChange {}

/// All computed fold changes of one kind, one column per pair of groups.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsTable {
    /// The kind of statistic.
    pub statistics_type: Option<StatisticsType>,
    /// How quantities were aggregated.
    pub aggregation_type: Option<AggregationType>,
    /// What was quantified.
    pub quantification_measure: Option<QuantMeasure>,
    /// What the rows stand for.
    pub row_type: Option<QuantRowType>,
    /// The object ids of the rows.
    #[serde(default)]
    pub row_ids: Vec<i64>,
    /// The ids of the columns.
    #[serde(default)]
    pub column_ids: Vec<i64>,
    /// Display names of the rows.
    #[serde(default)]
    pub row_names: Vec<String>,
    /// Display names of the columns.
    #[serde(default)]
    pub column_names: Vec<String>,
    /// The left group of each column.
    #[serde(default)]
    pub column_left_groups: Vec<String>,
    /// The right group of each column.
    #[serde(default)]
    pub column_right_groups: Vec<String>,
    /// Row-major values.
    #[serde(default)]
    pub values: Vec<Vec<f64>>,
}

impl DataResponse for StatisticsTable {}

/// Start a job computing the fold changes between two tag groups.
#[derive(Debug, Clone)]
pub struct ComputeFoldChanges<'a> {
    /// The project.
    pub project_id: &'a str,
    /// Whether to compare compounds or aligned features.
    pub target: StatisticsTarget,
    /// The group in the numerator.
    pub left_group_name: &'a str,
    /// The group in the denominator.
    pub right_group_name: &'a str,
    /// How quantities of one group are combined. Defaults to the average.
    pub aggregation: Option<AggregationType>,
    /// The quantity compared. Defaults to the apex intensity.
    pub quantification: Option<QuantMeasure>,
    /// Optional fields of the returned job.
    pub opt_fields: Option<&'a [JobOptField]>,
}

impl ApiRequest for ComputeFoldChanges<'_> {
    type Response = Job;

    fn method(&self) -> http::Method {
        http::Method::PUT
    }

    fn path(&self) -> String {
        format!("{}/foldchange/compute", self.target.path(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .param("leftGroupName", self.left_group_name)
                .param("rightGroupName", self.right_group_name)
                .opt_param("aggregation", self.aggregation.as_ref())
                .opt_param("quantification", self.quantification.as_ref())
                .opt_fields("optFields", self.opt_fields),
        )
    }
}

/// Delete the fold changes between two tag groups.
#[derive(Debug, Clone)]
pub struct DeleteFoldChanges<'a> {
    /// The project.
    pub project_id: &'a str,
    /// Whether to delete compound or aligned feature fold changes.
    pub target: StatisticsTarget,
    /// The group in the numerator.
    pub left_group_name: &'a str,
    /// The group in the denominator.
    pub right_group_name: &'a str,
    /// The aggregation the fold changes were computed with.
    pub aggregation: Option<AggregationType>,
    /// The quantity the fold changes were computed with.
    pub quantification: Option<QuantMeasure>,
}

impl ApiRequest for DeleteFoldChanges<'_> {
    type Response = ();

    fn method(&self) -> http::Method {
        http::Method::DELETE
    }

    fn path(&self) -> String {
        format!("{}/foldchanges", self.target.path(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .param("leftGroupName", self.left_group_name)
                .param("rightGroupName", self.right_group_name)
                .opt_param("aggregation", self.aggregation.as_ref())
                .opt_param("quantification", self.quantification.as_ref()),
        )
    }
}

/// Get all fold changes of a kind as a table.
#[derive(Debug, Clone)]
pub struct GetFoldChangeTable<'a> {
    /// The project.
    pub project_id: &'a str,
    /// Whether to list compound or aligned feature fold changes.
    pub target: StatisticsTarget,
    /// Only fold changes computed with this aggregation.
    pub aggregation: Option<AggregationType>,
    /// Only fold changes computed with this quantity.
    pub quantification: Option<QuantMeasure>,
}

impl ApiRequest for GetFoldChangeTable<'_> {
    type Response = StatisticsTable;

    fn path(&self) -> String {
        format!("{}/foldchanges/stats-table", self.target.path(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .opt_param("aggregation", self.aggregation.as_ref())
                .opt_param("quantification", self.quantification.as_ref()),
        )
    }
}

/// List the compound fold changes between two tag groups.
#[derive(Debug, Clone)]
pub struct GetCompoundFoldChanges<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The group in the numerator.
    pub left_group_name: &'a str,
    /// The group in the denominator.
    pub right_group_name: &'a str,
    /// The aggregation the fold changes were computed with.
    pub aggregation: Option<AggregationType>,
    /// The quantity the fold changes were computed with.
    pub quantification: Option<QuantMeasure>,
}

impl ApiRequest for GetCompoundFoldChanges<'_> {
    type Response = Vec<FoldChange>;

    fn path(&self) -> String {
        format!(
            "{}/foldchanges",
            StatisticsTarget::Compounds.path(self.project_id)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .param("leftGroupName", self.left_group_name)
                .param("rightGroupName", self.right_group_name)
                .opt_param("aggregation", self.aggregation.as_ref())
                .opt_param("quantification", self.quantification.as_ref()),
        )
    }
}

/// List all fold changes of a single aligned feature.
#[derive(Debug, Clone)]
pub struct GetFeatureFoldChanges<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The aligned feature.
    pub object_id: &'a str,
}

impl ApiRequest for GetFeatureFoldChanges<'_> {
    type Response = Vec<FoldChange>;

    fn path(&self) -> String {
        format!(
            "{}/foldchanges/{}",
            StatisticsTarget::AlignedFeatures.path(self.project_id),
            segment(self.object_id)
        )
    }
}
