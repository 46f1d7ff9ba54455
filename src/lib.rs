//! A client for the [SIRIUS](https://bio.informatik.uni-jena.de/software/sirius/)
//! mass-spectrometry REST API.
//!
//! Every endpoint is a plain struct implementing [ApiRequest]. Requests are
//! grouped by resource: [project], [compound], [feature], [run], [tag],
//! [category], [statistics], [job], [database] and [account].
//!
//! # HTTP Requests and Responses
//!
//! The API types are designed to work with any HTTP client that uses the [`http`]
//! crate. Use [`ApiRequest::into_request`] to create a request, and
//! [`ApiResponse::from_response`] to parse the response. [Client] does this
//! for you with a blocking [ureq] agent.
//!
//! # Example with ureq
//!
//! ```no_run
//! use sirius_client::{ApiRequest, ApiResponse, Profile, compound::GetCompound};
//!
//! # fn main() -> anyhow::Result<()> {
//! let profile = Profile::from_default_env()?;
//!
//! let req = GetCompound {
//!     project_id: "my-project",
//!     compound_id: "42",
//!     opt_fields: None,
//!     opt_fields_features: None,
//! };
//!
//! let http_req = req.into_request(&profile)?;
//! let agent = ureq::Agent::new_with_config(
//!     ureq::config::Config::builder()
//!         .http_status_as_error(false)
//!         .build(),
//! );
//! let resp = agent.run(http_req)?;
//!
//! // You can use the associated type to read the response, or use e.g.
//! // Compound directly.
//! let compound = <GetCompound<'_> as ApiRequest>::Response::from_response(
//!     resp.map(ureq::Body::into_reader),
//! )?;
//!
//! println!("Compound {} ({} features)", compound.compound_id, compound.features.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Example with reqwest
//!
//! ```no_run
//! use sirius_client::{ApiRequest, ApiResponse, Profile, project::GetProjects};
//! use http_body_util::BodyExt;
//! use std::io::Cursor;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let profile = Profile::from_default_env()?;
//! let client = reqwest::Client::new();
//!
//! let http_req = GetProjects.into_request(&profile)?;
//! let reqwest_req: reqwest::Request = http_req.try_into()?;
//!
//! let resp = client.execute(reqwest_req).await?;
//! let http_resp: http::Response<_> = resp.into();
//! let (parts, body) = http_resp.into_parts();
//! let bytes = body.collect().await?.to_bytes();
//!
//! let projects = <GetProjects as ApiRequest>::Response::from_response_parts(parts, Cursor::new(bytes))?;
//! for project in projects {
//!     println!("{}", project.project_id);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Pagination
//!
//! Endpoints ending in `Paged` return one [PagedModel] at a time. Use
//! [paginate] or [Client::paginate] to iterate over all items:
//!
//! ```no_run
//! use sirius_client::{Client, Profile, run::GetRunsPaged};
//!
//! # fn main() -> anyhow::Result<()> {
//! let client = Client::new(Profile::from_default_env()?);
//! let req = GetRunsPaged {
//!     project_id: "my-project",
//!     opt_fields: None,
//! };
//!
//! for run in client.paginate(req, Some(100), Some(1000))? {
//!     println!("{}", run?.run_id);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(
    anonymous_parameters,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    rust_2018_idioms,
    single_use_lifetimes,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_qualifications,
    variant_size_differences
)]

mod api;
mod client;
mod config;

pub use api::*;
pub use client::*;
pub use config::{DEFAULT_API_ENDPOINT, Error as ConfigError, Profile};
