//! API operations concerning searchable structure databases.
//!
//! Databases are global to the server, not to a project. Included databases
//! ship with the server; custom databases are created from local files.

use serde::{Deserialize, Serialize};

use crate::api::{ApiRequest, DataResponse, QueryParams, segment};

/// A database that structures can be searched in.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchableDatabase {
    /// The database id, used in search parameters.
    pub database_id: String,
    /// A display name.
    pub display_name: Option<String>,
    /// The location of a custom database on the server.
    pub location: Option<String>,
    /// Whether reference spectra are matched by retention time.
    #[serde(default)]
    pub match_rt_of_reference_spectra: bool,
    /// True for user-created databases.
    #[serde(default)]
    pub custom_db: bool,
    /// False if the database cannot be used for searching.
    #[serde(default)]
    pub searchable: bool,
    /// When the database was built.
    pub db_date: Option<String>,
    /// The database schema version.
    pub db_version: Option<i32>,
    /// Whether the database must be rebuilt for this server version.
    #[serde(default)]
    pub update_needed: bool,
    /// Only set with statistics.
    pub number_of_structures: Option<u64>,
    /// Only set with statistics.
    pub number_of_formulas: Option<u64>,
    /// Only set with statistics.
    pub number_of_reference_spectra: Option<u64>,
    /// Why the database could not be loaded.
    pub error_message: Option<String>,
}

impl DataResponse for SearchableDatabase {}

/// Settings of a custom database.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchableDatabaseParameters {
    /// A display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Where the database is stored on the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Whether reference spectra are matched by retention time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_rt_of_reference_spectra: Option<bool>,
}

fn database_path(database_id: &str) -> String {
    format!("/api/databases/{}", segment(database_id))
}

/// List all databases.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetDatabases {
    /// Include the number of structures, formulas and spectra.
    pub include_stats: Option<bool>,
    /// Include databases that failed to load.
    pub include_with_errors: Option<bool>,
}

impl ApiRequest for GetDatabases {
    type Response = Vec<SearchableDatabase>;

    fn path(&self) -> String {
        "/api/databases".to_string()
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .opt_param("includeStats", self.include_stats)
                .opt_param("includeWithErrors", self.include_with_errors),
        )
    }
}

/// List custom databases.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetCustomDatabases {
    /// Include the number of structures, formulas and spectra.
    pub include_stats: Option<bool>,
    /// Include databases that failed to load.
    pub include_with_errors: Option<bool>,
}

impl ApiRequest for GetCustomDatabases {
    type Response = Vec<SearchableDatabase>;

    fn path(&self) -> String {
        "/api/databases/custom".to_string()
    }

    fn query(&self) -> Option<QueryParams> {
        Some(
            QueryParams::new()
                .opt_param("includeStats", self.include_stats)
                .opt_param("includeWithErrors", self.include_with_errors),
        )
    }
}

/// List the databases that ship with the server.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetIncludedDatabases {
    /// Include the number of structures, formulas and spectra.
    pub include_stats: Option<bool>,
}

impl ApiRequest for GetIncludedDatabases {
    type Response = Vec<SearchableDatabase>;

    fn path(&self) -> String {
        "/api/databases/included".to_string()
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_param("includeStats", self.include_stats))
    }
}

/// Get a database by id.
#[derive(Debug, Clone)]
pub struct GetDatabase<'a> {
    /// The database.
    pub database_id: &'a str,
    /// Include the number of structures, formulas and spectra.
    pub include_stats: Option<bool>,
}

impl ApiRequest for GetDatabase<'_> {
    type Response = SearchableDatabase;

    fn path(&self) -> String {
        database_path(self.database_id)
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_param("includeStats", self.include_stats))
    }
}

/// Create an empty custom database.
#[derive(Debug, Clone)]
pub struct CreateDatabase<'a> {
    /// The id of the new database.
    pub database_id: &'a str,
    /// Its settings.
    pub parameters: Option<&'a SearchableDatabaseParameters>,
}

impl ApiRequest for CreateDatabase<'_> {
    type Response = SearchableDatabase;

    fn method(&self) -> http::Method {
        http::Method::POST
    }

    fn path(&self) -> String {
        database_path(self.database_id)
    }

    fn body(&self) -> Option<impl Serialize> {
        self.parameters
    }
}

/// Change the settings of a custom database.
#[derive(Debug, Clone)]
pub struct UpdateDatabase<'a> {
    /// The database.
    pub database_id: &'a str,
    /// The new settings.
    pub parameters: &'a SearchableDatabaseParameters,
}

impl ApiRequest for UpdateDatabase<'_> {
    type Response = SearchableDatabase;

    fn method(&self) -> http::Method {
        http::Method::PUT
    }

    fn path(&self) -> String {
        database_path(self.database_id)
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(self.parameters)
    }
}

/// Register existing custom database files with the server.
#[derive(Debug, Clone)]
pub struct AddDatabases<'a> {
    /// Paths to the database files, local to the server.
    pub paths: &'a [&'a str],
}

impl ApiRequest for AddDatabases<'_> {
    type Response = Vec<SearchableDatabase>;

    fn method(&self) -> http::Method {
        http::Method::POST
    }

    fn path(&self) -> String {
        "/api/databases".to_string()
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(self.paths)
    }
}

/// Unregister a custom database, optionally deleting its files.
#[derive(Debug, Clone)]
pub struct RemoveDatabase<'a> {
    /// The database.
    pub database_id: &'a str,
    /// Also delete the database files.
    pub delete: Option<bool>,
}

impl ApiRequest for RemoveDatabase<'_> {
    type Response = ();

    fn method(&self) -> http::Method {
        http::Method::DELETE
    }

    fn path(&self) -> String {
        database_path(self.database_id)
    }

    fn query(&self) -> Option<QueryParams> {
        Some(QueryParams::new().opt_param("delete", self.delete))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::api::test::{build, respond};

    #[test]
    fn list_requests() {
        let req = build(GetDatabases {
            include_stats: Some(true),
            include_with_errors: Some(false),
        });
        assert_eq!(req.uri().path(), "/api/databases");
        assert_eq!(
            req.uri().query(),
            Some("includeStats=true&includeWithErrors=false")
        );

        let req = build(GetCustomDatabases::default());
        assert_eq!(req.uri().path(), "/api/databases/custom");
        assert_eq!(req.uri().query(), None);

        let req = build(GetIncludedDatabases {
            include_stats: Some(true),
        });
        assert_eq!(req.uri().path(), "/api/databases/included");
    }

    #[test]
    fn create_database_without_parameters() {
        let req = build(CreateDatabase {
            database_id: "my-db",
            parameters: None,
        });

        assert_eq!(req.method(), http::Method::POST);
        assert_eq!(req.uri().path(), "/api/databases/my-db");
        assert_eq!(req.body(), "");
        assert!(!req.headers().contains_key(http::header::CONTENT_TYPE));
    }

    #[test]
    fn update_database_request() {
        let parameters = SearchableDatabaseParameters {
            display_name: Some("My DB".to_owned()),
            ..Default::default()
        };

        let req = build(UpdateDatabase {
            database_id: "my-db",
            parameters: &parameters,
        });

        assert_eq!(req.method(), http::Method::PUT);
        assert_eq!(req.body(), r#"{"displayName":"My DB"}"#);
    }

    #[test]
    fn remove_database_request() {
        let req = build(RemoveDatabase {
            database_id: "my-db",
            delete: Some(true),
        });

        assert_eq!(req.method(), http::Method::DELETE);
        assert_eq!(req.uri().query(), Some("delete=true"));
    }

    #[test]
    fn parse_databases() {
        let body = r#"[{
            "databaseId": "BIO",
            "displayName": "Biological",
            "customDb": false,
            "searchable": true,
            "numberOfStructures": 120000
        }, {
            "databaseId": "broken",
            "customDb": true,
            "errorMessage": "file not found"
        }]"#;

        let dbs = respond::<Vec<SearchableDatabase>>(200, body).unwrap();
        assert_eq!(dbs[0].number_of_structures, Some(120000));
        assert!(dbs[1].custom_db);
        assert!(!dbs[1].searchable);
        assert_eq!(dbs[1].error_message.as_deref(), Some("file not found"));
    }
}
