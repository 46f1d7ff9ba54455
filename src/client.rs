use std::time;

use tracing::debug;

use crate::{ApiError, ApiRequest, ApiResponse, PagedModel, Profile};

/// The default timeout for a single request.
pub const DEFAULT_TIMEOUT: time::Duration = time::Duration::from_secs(30);

/// An error from [Client::roundtrip].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request could not be built, e.g. because of an invalid header.
    #[error("invalid request: {0}")]
    Validation(#[from] http::Error),
    /// The server could not be reached, or the connection failed.
    #[error(transparent)]
    Transport(#[from] ureq::Error),
    /// The server returned an error, or a response that could not be parsed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ClientError {
    /// The API error, if the server responded with one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// A blocking client for the SIRIUS REST API.
///
/// ```no_run
/// use sirius_client::{Client, Profile, project::GetProjects};
///
/// # fn main() -> anyhow::Result<()> {
/// let client = Client::new(Profile::from_default_env()?);
/// for project in client.roundtrip(GetProjects)? {
///     println!("{} at {}", project.project_id, project.location);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    profile: Profile,
    agent: ureq::Agent,
}

impl Client {
    /// Create a client with the [default timeout](DEFAULT_TIMEOUT).
    pub fn new(profile: Profile) -> Self {
        Self::with_timeout(profile, Some(DEFAULT_TIMEOUT))
    }

    /// Create a client with the given timeout for each request. `None`
    /// disables the timeout.
    pub fn with_timeout(profile: Profile, timeout: Option<time::Duration>) -> Self {
        // Allows error responses to be parsed.
        let cfg = ureq::config::Config::builder()
            .http_status_as_error(false)
            .timeout_global(timeout);

        Self {
            profile,
            agent: ureq::Agent::new_with_config(cfg.build()),
        }
    }

    /// The profile requests are sent with.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Send a request and parse the response.
    pub fn roundtrip<T: ApiRequest>(&self, req: T) -> Result<T::Response, ClientError> {
        let req = req.into_request(&self.profile)?;
        debug!(method = %req.method(), uri = %req.uri(), "sending request");

        let resp = self.agent.run(req)?;
        debug!(status = %resp.status(), "received response");

        let resp = <T::Response as ApiResponse>::from_response(resp.map(ureq::Body::into_reader))?;
        Ok(resp)
    }

    /// Fetch all items of a paged endpoint, page by page. Pages are only
    /// requested as the iterator advances.
    pub fn paginate<R, T>(
        &self,
        req: R,
        page_size: Option<u32>,
        limit: Option<usize>,
    ) -> Result<impl Iterator<Item = Result<T, ClientError>>, ClientError>
    where
        R: ApiRequest<Response = PagedModel<T>> + Clone,
    {
        self.paginate_sorted(req, page_size, Vec::new(), limit)
    }

    /// Like [Client::paginate], with sort criteria such as `name,asc`.
    pub fn paginate_sorted<R, T>(
        &self,
        req: R,
        page_size: Option<u32>,
        sort: Vec<String>,
        limit: Option<usize>,
    ) -> Result<impl Iterator<Item = Result<T, ClientError>>, ClientError>
    where
        R: ApiRequest<Response = PagedModel<T>> + Clone,
    {
        crate::paginate(req, page_size, sort, limit, move |r| self.roundtrip(r))
    }
}
