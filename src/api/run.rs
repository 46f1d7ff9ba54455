//! API operations concerning LC-MS runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::api::{
    ApiRequest, DataResponse, PagedModel, QueryParams,
    job::{Job, JobOptField},
    segment,
    tag::{Tag, TagGroup},
};

api_enum! {
    /// Optional fields of a [Run].
    pub enum RunOptField {
        "tags" => Tags,
    }
}

/// A single LC-MS run (one sample file) in a project.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    /// The run id, unique within the project.
    pub run_id: String,
    /// The name of the run, usually the file name.
    pub name: Option<String>,
    /// The file the run was imported from.
    pub source: Option<String>,
    /// The chromatography method.
    pub chromatography: Option<String>,
    /// The ionization method.
    pub ionization: Option<String>,
    /// The fragmentation method.
    pub fragmentation: Option<String>,
    /// The mass analyzers.
    #[serde(default)]
    pub mass_analyzers: Vec<String>,
    /// Tags by tag name. Only set with [RunOptField::Tags].
    pub tags: Option<BTreeMap<String, Tag>>,
}

impl DataResponse for Run {}

/// The runs to compare in a blank subtraction.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleTypeFoldChangeRequest {
    /// The sample runs.
    #[serde(default)]
    pub sample_run_ids: Vec<String>,
    /// The blank runs.
    #[serde(default)]
    pub blank_run_ids: Vec<String>,
    /// The control runs.
    #[serde(default)]
    pub control_run_ids: Vec<String>,
}

/// Get a run by id.
#[derive(Debug, Clone)]
pub struct GetRun<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The run.
    pub run_id: &'a str,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [RunOptField]>,
}

impl ApiRequest for GetRun<'_> {
    type Response = Run;

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/runs/{}",
            segment(self.project_id),
            segment(self.run_id)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_fields("optFields", self.opt_fields))
    }
}

/// List the runs of a project, page by page.
#[derive(Debug, Clone)]
pub struct GetRunsPaged<'a> {
    /// The project.
    pub project_id: &'a str,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [RunOptField]>,
}

impl ApiRequest for GetRunsPaged<'_> {
    type Response = PagedModel<Run>;

    fn path(&self) -> String {
        format!("/api/projects/{}/runs/page", segment(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_fields("optFields", self.opt_fields))
    }
}

/// List the runs matching a tag filter, page by page. See [crate::api::tag]
/// for the filter syntax.
#[derive(Debug, Clone)]
pub struct GetRunsByTag<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The tag filter. An empty filter matches all runs.
    pub filter: &'a str,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [RunOptField]>,
}

impl ApiRequest for GetRunsByTag<'_> {
    type Response = PagedModel<Run>;

    fn path(&self) -> String {
        format!("/api/projects/{}/runs/tagged", segment(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .param("filter", self.filter)
                .opt_fields("optFields", self.opt_fields),
        )
    }
}

/// List the runs in a tag group, page by page.
#[derive(Debug, Clone)]
pub struct GetRunsByGroup<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The name of the tag group.
    pub group: &'a str,
    /// Optional fields to include.
    pub opt_fields: Option<&'a [RunOptField]>,
}

impl ApiRequest for GetRunsByGroup<'_> {
    type Response = PagedModel<Run>;

    fn path(&self) -> String {
        format!("/api/projects/{}/runs/grouped", segment(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .param("group", self.group)
                .opt_fields("optFields", self.opt_fields),
        )
    }
}

/// Add tags to a run. Tags with the same name are replaced.
#[derive(Debug, Clone)]
pub struct AddRunTags<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The run.
    pub run_id: &'a str,
    /// The tags to add.
    pub tags: &'a [Tag],
}

impl ApiRequest for AddRunTags<'_> {
    type Response = Vec<Tag>;

    fn method(&self) -> http::Method {
        http::Method::PUT
    }

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/runs/tags/{}",
            segment(self.project_id),
            segment(self.run_id)
        )
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(self.tags)
    }
}

/// Remove a tag from a run.
#[derive(Debug, Clone)]
pub struct DeleteRunTag<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The run.
    pub run_id: &'a str,
    /// The tag to remove.
    pub tag_name: &'a str,
}

impl ApiRequest for DeleteRunTag<'_> {
    type Response = ();

    fn method(&self) -> http::Method {
        http::Method::DELETE
    }

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/runs/tags/{}/{}",
            segment(self.project_id),
            segment(self.run_id),
            segment(self.tag_name)
        )
    }
}

/// Start a job computing the fold change of sample runs against blank and
/// control runs.
#[derive(Debug, Clone)]
pub struct ComputeBlankSubtraction<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The runs to compare.
    pub request: &'a SampleTypeFoldChangeRequest,
    /// Optional fields of the returned job.
    pub opt_fields: Option<&'a [JobOptField]>,
}

impl ApiRequest for ComputeBlankSubtraction<'_> {
    type Response = Job;

    fn method(&self) -> http::Method {
        http::Method::PUT
    }

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/runs/blanksubtract/compute",
            segment(self.project_id)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_fields("optFields", self.opt_fields))
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(self.request)
    }
}

/// List the run groups of a project.
#[derive(Debug, Clone)]
pub struct GetRunGroups<'a> {
    /// The project.
    pub project_id: &'a str,
}

impl ApiRequest for GetRunGroups<'_> {
    type Response = Vec<TagGroup>;

    fn path(&self) -> String {
        format!("/api/projects/{}/runs/groups", segment(self.project_id))
    }
}

/// List the run groups of a given type.
#[derive(Debug, Clone)]
pub struct GetRunGroupsByType<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The group type, e.g. `sample`.
    pub group_type: &'a str,
}

impl ApiRequest for GetRunGroupsByType<'_> {
    type Response = Vec<TagGroup>;

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/runs/groups/type/{}",
            segment(self.project_id),
            segment(self.group_type)
        )
    }
}

/// Get a run group by name.
#[derive(Debug, Clone)]
pub struct GetRunGroup<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The group to fetch.
    pub group_name: &'a str,
}

impl ApiRequest for GetRunGroup<'_> {
    type Response = TagGroup;

    fn path(&self) -> String {
        run_group_path(self.project_id, self.group_name)
    }
}

/// Create a run group from a tag filter.
#[derive(Debug, Clone)]
pub struct AddRunGroup<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The name of the new group.
    pub group_name: &'a str,
    /// The filter selecting the runs in the group.
    pub filter: &'a str,
    /// The type of the group.
    pub group_type: &'a str,
}

impl ApiRequest for AddRunGroup<'_> {
    type Response = TagGroup;

    fn method(&self) -> http::Method {
        http::Method::PUT
    }

    fn path(&self) -> String {
        run_group_path(self.project_id, self.group_name)
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .param("filter", self.filter)
                .param("type", self.group_type),
        )
    }
}

/// Delete a run group. The runs and their tags are kept.
#[derive(Debug, Clone)]
pub struct DeleteRunGroup<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The group to delete.
    pub group_name: &'a str,
}

impl ApiRequest for DeleteRunGroup<'_> {
    type Response = ();

    fn method(&self) -> http::Method {
        http::Method::DELETE
    }

    fn path(&self) -> String {
        run_group_path(self.project_id, self.group_name)
    }
}

fn run_group_path(project_id: &str, group_name: &str) -> String {
    format!(
        "/api/projects/{}/runs/groups/{}",
        segment(project_id),
        segment(group_name)
    )
}
