//! API operations concerning tag categories.

use serde::{Deserialize, Serialize};

use crate::api::{ApiRequest, DataResponse, segment, tag::ValueType};

/// A category of tags sharing a value type.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagCategory {
    /// The unique name of the category.
    pub name: String,
    /// A description.
    pub description: Option<String>,
    /// The type of the values of tags in this category.
    pub value_type: ValueType,
    /// The allowed values, if restricted.
    pub possible_values: Option<Vec<serde_json::Value>>,
    /// A free-form type used to group categories, e.g. `sample`.
    pub category_type: Option<String>,
    /// False for built-in categories.
    #[serde(default)]
    pub editable: bool,
}

impl DataResponse for TagCategory {}

/// A tag category to create.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagCategoryImport {
    /// The unique name of the category.
    pub name: String,
    /// A description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The type of the values of tags in this category.
    pub value_type: ValueType,
    /// The allowed values, if restricted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub possible_values: Option<Vec<serde_json::Value>>,
    /// A free-form type used to group categories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_type: Option<String>,
}

fn category_path(project_id: &str, name: &str) -> String {
    format!(
        "/api/projects/{}/categories/{}",
        segment(project_id),
        segment(name)
    )
}

/// Create tag categories.
#[derive(Debug, Clone)]
pub struct AddCategories<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The categories to create.
    pub categories: &'a [TagCategoryImport],
}

impl ApiRequest for AddCategories<'_> {
    type Response = Vec<TagCategory>;

    fn method(&self) -> http::Method {
        http::Method::PUT
    }

    fn path(&self) -> String {
        format!("/api/projects/{}/categories", segment(self.project_id))
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(self.categories)
    }
}

/// List all tag categories of a project.
#[derive(Debug, Clone)]
pub struct GetCategories<'a> {
    /// The project.
    pub project_id: &'a str,
}

impl ApiRequest for GetCategories<'_> {
    type Response = Vec<TagCategory>;

    fn path(&self) -> String {
        format!("/api/projects/{}/categories", segment(self.project_id))
    }
}

/// List the tag categories of a given type.
#[derive(Debug, Clone)]
pub struct GetCategoriesByType<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The category type.
    pub category_type: &'a str,
}

impl ApiRequest for GetCategoriesByType<'_> {
    type Response = Vec<TagCategory>;

    fn path(&self) -> String {
        format!(
            "/api/projects/{}/categories/type/{}",
            segment(self.project_id),
            segment(self.category_type)
        )
    }
}

/// Get a tag category by name.
#[derive(Debug, Clone)]
pub struct GetCategory<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The category.
    pub name: &'a str,
}

impl ApiRequest for GetCategory<'_> {
    type Response = TagCategory;

    fn path(&self) -> String {
        category_path(self.project_id, self.name)
    }
}

/// Extend the allowed values of a tag category.
#[derive(Debug, Clone)]
pub struct AddPossibleValuesToCategory<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The category.
    pub name: &'a str,
    /// The values to allow.
    pub values: &'a [serde_json::Value],
}

impl ApiRequest for AddPossibleValuesToCategory<'_> {
    type Response = TagCategory;

    fn method(&self) -> http::Method {
        http::Method::PUT
    }

    fn path(&self) -> String {
        category_path(self.project_id, self.name)
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(self.values)
    }
}

/// Delete a tag category.
#[derive(Debug, Clone)]
pub struct DeleteCategory<'a> {
    /// The project.
    pub project_id: &'a str,
    /// The category.
    pub name: &'a str,
}

impl ApiRequest for DeleteCategory<'_> {
    type Response = ();

    fn method(&self) -> http::Method {
        http::Method::DELETE
    }

    fn path(&self) -> String {
        category_path(self.project_id, self.name)
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::api::test::{build, respond};

    #[test]
    fn add_categories_request() {
        let categories = [TagCategoryImport {
            name: "batch".to_owned(),
            description: None,
            value_type: ValueType::Integer,
            possible_values: None,
            category_type: None,
        }];

        let req = build(AddCategories {
            project_id: "p",
            categories: &categories,
        });

        assert_eq!(req.method(), http::Method::PUT);
        assert_eq!(req.uri().path(), "/api/projects/p/categories");
        assert_eq!(req.body(), r#"[{"name":"batch","valueType":"INTEGER"}]"#);
    }

    #[test]
    fn category_paths() {
        let req = build(GetCategoriesByType {
            project_id: "p",
            category_type: "sample",
        });
        assert_eq!(req.uri().path(), "/api/projects/p/categories/type/sample");

        let values = [json!("QC")];
        let req = build(AddPossibleValuesToCategory {
            project_id: "p",
            name: "sample type",
            values: &values,
        });
        assert_eq!(req.method(), http::Method::PUT);
        assert_eq!(req.uri().path(), "/api/projects/p/categories/sample%20type");
        assert_eq!(req.body(), r#"["QC"]"#);

        let req = build(DeleteCategory {
            project_id: "p",
            name: "batch",
        });
        assert_eq!(req.method(), http::Method::DELETE);
    }

    #[test]
    fn parse_category() {
        let body = r#"{
            "name": "sample type",
            "valueType": "TEXT",
            "possibleValues": ["blank", "sample"],
            "categoryType": "sample",
            "editable": false
        }"#;

        let category = respond::<TagCategory>(200, body).unwrap();
        assert_eq!(category.value_type, ValueType::Text);
        assert_eq!(category.possible_values.unwrap().len(), 2);
    }
}
