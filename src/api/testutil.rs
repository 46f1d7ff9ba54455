//! Test utilities for API integration tests against a running server.

use crate::{ApiError, ApiRequest, ApiResponse, Profile};
use std::{
    hash::{BuildHasher, Hasher},
    sync::OnceLock,
    time,
};

fn test_profile() -> &'static Profile {
    static PROFILE: OnceLock<Profile> = OnceLock::new();
    PROFILE.get_or_init(|| {
        Profile::from_default_env()
            .expect("Failed to load test profile. Did you forget to set SIRIUS_API_ENDPOINT?")
    })
}

/// Execute an API request and parse the response.
pub(crate) fn roundtrip<T: ApiRequest>(req: T) -> Result<T::Response, ApiError> {
    let agent = ureq::Agent::new_with_config(
        ureq::config::Config::builder()
            .http_status_as_error(false)
            .build(),
    );

    let profile = test_profile();
    let req = req.into_request(profile).expect("Failed to create request");
    let resp = agent.run(req).expect("HTTP Error");
    T::Response::from_response(resp.map(ureq::Body::into_reader))
}

/// Generate a unique name for test resources.
pub(crate) fn test_name(prefix: &str) -> String {
    let ts = time::SystemTime::now()
        .duration_since(time::UNIX_EPOCH)
        .unwrap()
        .as_millis();
    let rand: u32 = std::hash::RandomState::new().build_hasher().finish() as u32;

    format!("{prefix}_{ts}_{rand:08x}")
}

/// A temporary project that is closed when dropped. The project files stay
/// in the server's default location.
pub(crate) struct TestProject {
    pub id: String,
}

impl TestProject {
    /// Create a new, empty project.
    pub(crate) fn new(prefix: &str) -> Result<Self, ApiError> {
        let id = test_name(prefix);
        let req = crate::project::CreateProject {
            project_id: &id,
            path_to_project: None,
            opt_fields: Some(&[]),
        };
        roundtrip(req)?;

        Ok(Self { id })
    }
}

impl Drop for TestProject {
    fn drop(&mut self) {
        let req = crate::project::CloseProject {
            project_id: &self.id,
            compact: None,
        };
        if let Err(e) = roundtrip(req) {
            eprintln!("Warning: failed to close test project {}: {e}", self.id);
        }
    }
}
