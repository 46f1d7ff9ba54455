//! API operations concerning tags and tag groups.
//!
//! Tags attach typed values to runs, compounds and features. A tag group is
//! a saved filter over tags; its filter uses clauses like `category:sample`,
//! `text:"new york"` or `integer>=5`, combined with `AND`, `OR` and `NOT`.

use serde::{Deserialize, Serialize};

use crate::api::{ApiRequest, DataResponse, QueryParams, segment};

api_enum! {
    /// The type of the values a tag can hold.
    pub enum ValueType {
        "NONE" => None,
        "BOOLEAN" => Boolean,
        "INTEGER" => Integer,
        "REAL" => Real,
        "TEXT" => Text,
        "DATE" => Date,
        "TIME" => Time,
    }
}

/// A tag value attached to an object.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// The name of the tag definition.
    pub tag_name: String,
    /// The value, of the definition's [ValueType]. Null for tags without a
    /// value.
    #[serde(default)]
    pub value: serde_json::Value,
}

impl DataResponse for Tag {}

/// The definition of a tag: its name, scope and allowed values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagDefinition {
    /// The unique name of the tag.
    pub tag_name: String,
    /// A description.
    pub description: Option<String>,
    /// A free-form scope, e.g. `sample`.
    pub tag_type: Option<String>,
    /// The type of the values.
    pub value_type: ValueType,
    /// The allowed values, if restricted.
    pub possible_values: Option<Vec<serde_json::Value>>,
    /// The minimal allowed value, for numeric types.
    pub min_value: Option<serde_json::Value>,
    /// The maximal allowed value, for numeric types.
    pub max_value: Option<serde_json::Value>,
    /// False for built-in tags.
    #[serde(default)]
    pub editable: bool,
}

impl DataResponse for TagDefinition {}

/// A tag definition to create.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagDefinitionImport {
    /// The unique name of the tag.
    pub tag_name: String,
    /// A description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// A free-form scope, e.g. `sample`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_type: Option<String>,
    /// The type of the values.
    pub value_type: ValueType,
    /// The allowed values, if restricted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub possible_values: Option<Vec<serde_json::Value>>,
    /// The minimal allowed value, for numeric types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<serde_json::Value>,
    /// The maximal allowed value, for numeric types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<serde_json::Value>,
}

/// A named filter over tags.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagGroup {
    /// The unique name of the group.
    pub group_name: String,
    /// The filter, in the query syntax described in the [module
    /// docs](self).
    pub lucene_query: Option<String>,
    /// A free-form type, e.g. `sample`.
    pub group_type: Option<String>,
}

impl DataResponse for TagGroup {}

/// Create tag definitions.
#[derive(Debug, Clone)]
pub struct CreateTags<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The definitions to create.
    pub tags: &'a [TagDefinitionImport],
}

impl ApiRequest for CreateTags<'_> {
    type Response = Vec<TagDefinition>;

    fn method(&self) -> http::Method {
        http::Method::PUT
    }

    fn path(&self) -> String {
        format!("/api/projects/{}/tags", segment(self.project_id))
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(self.tags)
    }
}

/// Get a tag definition by name.
#[derive(Debug, Clone)]
pub struct GetTag<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The tag to fetch.
    pub tag_name: &'a str,
}

impl ApiRequest for GetTag<'_> {
    type Response = TagDefinition;

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/tags/{}",
            segment(self.project_id),
            segment(self.tag_name)
        )
    }
}

/// List tag definitions.
#[derive(Debug, Clone)]
pub struct GetTags<'a> {
    /// The project.
    pub project_id: &'a str,
    /// Only list tags with this scope.
    pub tag_type: Option<&'a str>,
}

impl ApiRequest for GetTags<'_> {
    type Response = Vec<TagDefinition>;

    fn path(&self) -> String {
        format!("/api/projects/{}/tags", segment(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_param("tagType", self.tag_type))
    }
}

/// Delete a tag definition and remove it from all objects.
#[derive(Debug, Clone)]
pub struct DeleteTag<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The tag to delete.
    pub tag_name: &'a str,
}

impl ApiRequest for DeleteTag<'_> {
    type Response = ();

    fn method(&self) -> http::Method {
        http::Method::DELETE
    }

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/tags/{}",
            segment(self.project_id),
            segment(self.tag_name)
        )
    }
}

/// Extend the allowed values of a tag definition.
#[derive(Debug, Clone)]
pub struct AddPossibleValuesToTag<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The tag to extend.
    pub tag_name: &'a str,
    /// The values to allow.
    pub values: &'a [serde_json::Value],
}

impl ApiRequest for AddPossibleValuesToTag<'_> {
    type Response = TagDefinition;

    fn method(&self) -> http::Method {
        http::Method::PATCH
    }

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/tags/{}",
            segment(self.project_id),
            segment(self.tag_name)
        )
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(self.values)
    }
}

/// Create a tag group. The name must not exist yet.
#[derive(Debug, Clone)]
pub struct AddGroup<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The name of the new group.
    pub group_name: &'a str,
    /// The filter selecting the group's members.
    pub filter: &'a str,
    /// The type of the group.
    pub group_type: &'a str,
}

impl ApiRequest for AddGroup<'_> {
    type Response = TagGroup;

    fn method(&self) -> http::Method {
        http::Method::POST
    }

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/groups/{}",
            segment(self.project_id),
            segment(self.group_name)
        )
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .param("filter", self.filter)
                .param("type", self.group_type),
        )
    }
}

/// Get a tag group by name.
#[derive(Debug, Clone)]
pub struct GetGroup<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The group to fetch.
    pub group_name: &'a str,
}

impl ApiRequest for GetGroup<'_> {
    type Response = TagGroup;

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/groups/{}",
            segment(self.project_id),
            segment(self.group_name)
        )
    }
}

/// List tag groups.
#[derive(Debug, Clone)]
pub struct GetGroups<'a> {
    /// The project.
    pub project_id: &'a str,
    /// Only list groups of this type.
    pub group_type: Option<&'a str>,
}

impl ApiRequest for GetGroups<'_> {
    type Response = Vec<TagGroup>;

    fn path(&self) -> String {
        format!("/api/projects/{}/groups", segment(self.project_id))
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_param("groupType", self.group_type))
    }
}

/// Delete a tag group. Tags are not affected.
#[derive(Debug, Clone)]
pub struct DeleteGroup<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The group to delete.
    pub group_name: &'a str,
}

impl ApiRequest for DeleteGroup<'_> {
    type Response = ();

    fn method(&self) -> http::Method {
        http::Method::DELETE
    }

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/groups/{}",
            segment(self.project_id),
            segment(self.group_name)
        )
    }
}
